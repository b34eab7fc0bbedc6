//! Status & damage reactor.

use std::collections::{BTreeMap, BTreeSet};

use super::{thresholds_crossed, CombatEntity, DamageCategory, ParticleFactory};
use crate::rng::RandomSource;

/// Status effect with an immediate kinetic side effect on application.
pub const KNOCKBACK_EFFECT: &str = "Knockback";

/// Particle jitter around the visual center (±, world units).
const PARTICLE_JITTER: i32 = 5;
const PARTICLES_MIN: i32 = 3;
const PARTICLES_MAX: i32 = 5;

/// Everything a reaction needs from the outside world for one tick.
pub struct ReactorContext<'a> {
    pub now: u64,
    pub rng: &'a mut dyn RandomSource,
    pub particles: &'a dyn ParticleFactory,
}

/// What a status effect may be applied to.
pub trait StatusTarget {
    fn attributes(&self) -> &BTreeSet<String>;

    fn status_effects_mut(&mut self) -> &mut BTreeMap<String, u64>;

    /// Immediate reaction to the `Knockback` status. Returns whether it started.
    fn knock_back(&mut self, now: u64) -> bool;
}

impl StatusTarget for CombatEntity {
    fn attributes(&self) -> &BTreeSet<String> {
        &self.attributes
    }

    fn status_effects_mut(&mut self) -> &mut BTreeMap<String, u64> {
        &mut self.status_effects
    }

    fn knock_back(&mut self, now: u64) -> bool {
        CombatEntity::knock_back(self, now, None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageReport {
    pub hp_after: f32,
    pub particles_spawned: usize,
    pub thresholds_crossed: i32,
    pub knockback_started: bool,
    /// Alive before this hit, dead after it
    pub defeated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    NoTarget,
    ChanceFailed,
    Immune,
    Applied { expires_at: u64, knocked_back: bool },
}

impl CombatEntity {
    /// Apply incoming damage.
    ///
    /// Survivors emit a 3–5 particle burst for the damage category (unknown
    /// types emit nothing). One knockback per hit if any threshold was
    /// crossed. `last_hp` is updated unconditionally.
    pub fn take_damage(
        &mut self,
        damage: f32,
        damage_type: &str,
        ctx: &mut ReactorContext<'_>,
    ) -> DamageReport {
        let was_alive = self.is_alive();
        self.hp = (self.hp - damage).min(self.max_hp);

        let mut particles_spawned = 0;
        if self.hp > 0.0 {
            if let Some(category) = DamageCategory::parse(damage_type) {
                particles_spawned = self.spawn_hit_particles(category, ctx);
            }
        }

        let crossed = thresholds_crossed(self.last_hp, self.hp, self.kb_threshold);
        let knockback_started = crossed > 0 && CombatEntity::knock_back(self, ctx.now, None);
        self.last_hp = self.hp;

        let defeated = was_alive && !self.is_alive();
        if defeated {
            crate::logger::log_info(&format!(
                "☠️ Unit defeated ({:.1} {} damage)",
                damage, damage_type
            ));
        }

        DamageReport {
            hp_after: self.hp,
            particles_spawned,
            thresholds_crossed: crossed,
            knockback_started,
            defeated,
        }
    }

    fn spawn_hit_particles(&mut self, category: DamageCategory, ctx: &mut ReactorContext<'_>) -> usize {
        let center = self.visual_center();
        let count = ctx.rng.range_inclusive(PARTICLES_MIN, PARTICLES_MAX);

        for _ in 0..count {
            let dx = ctx.rng.range_inclusive(-PARTICLE_JITTER, PARTICLE_JITTER) as f32;
            let dy = ctx.rng.range_inclusive(-PARTICLE_JITTER, PARTICLE_JITTER) as f32;
            let effect = ctx.particles.spawn(category, center.x + dx, center.y + dy);
            self.particles.push(category, effect);
        }

        count.max(0) as usize
    }

    /// Try to put `effect` on `target` for `duration_secs`.
    ///
    /// Chance roll first, then this unit's immunity table against every
    /// tag of the target. `Knockback` also knocks the target back immediately.
    pub fn apply_status_effect(
        &self,
        effect: &str,
        duration_secs: f32,
        chance: f32,
        target: Option<&mut dyn StatusTarget>,
        now: u64,
        rng: &mut dyn RandomSource,
    ) -> StatusOutcome {
        let Some(target) = target else {
            return StatusOutcome::NoTarget;
        };

        if !rng.roll_chance(chance) {
            return StatusOutcome::ChanceFailed;
        }

        let blocked = target.attributes().iter().any(|attr| {
            self.immunities
                .get(attr)
                .is_some_and(|blocked| blocked.contains(effect))
        });
        if blocked {
            crate::logger::log(&format!("🛡️ Status `{}` blocked by immunity", effect));
            return StatusOutcome::Immune;
        }

        // Огромная длительность упирается в u64::MAX
        let duration_ms = (duration_secs.max(0.0) * 1000.0).round() as u64;
        let expires_at = now.saturating_add(duration_ms);
        target
            .status_effects_mut()
            .insert(effect.to_string(), expires_at);

        let knocked_back = effect == KNOCKBACK_EFFECT && target.knock_back(now);

        crate::logger::log(&format!(
            "🧪 Status `{}` applied until {}ms",
            effect, expires_at
        ));
        StatusOutcome::Applied {
            expires_at,
            knocked_back,
        }
    }

    /// Drop effects whose expiry is at or before `now`. Returns the removed names.
    pub fn expire_status_effects(&mut self, now: u64) -> Vec<String> {
        let expired: Vec<String> = self
            .status_effects
            .iter()
            .filter(|(_, expires_at)| **expires_at <= now)
            .map(|(name, _)| name.clone())
            .collect();

        for name in &expired {
            self.status_effects.remove(name);
        }
        expired
    }

    pub fn has_status(&self, effect: &str, now: u64) -> bool {
        self.status_effects
            .get(effect)
            .is_some_and(|expires_at| *expires_at > now)
    }
}
