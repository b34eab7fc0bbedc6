//! Reactor systems: apply damage, status and retreat intents.

use bevy::prelude::*;

use crate::clock::SimClock;
use crate::combat::{
    DamageIntent, DamageTaken, Defeated, HitParticles, KnockbackCause, KnockbackStarted,
    RetreatIntent, StatusEffectIntent, UnitDefeated,
};
use crate::rng::RandomSource;
use crate::unit::{CombatEntity, ReactorContext, StatusOutcome, StatusTarget};
use crate::DeterministicRng;

/// Система: `DamageIntent` → `take_damage`.
///
/// Порядок обработки = порядок событий (writer пишет отсортированно).
/// Убитый unit получает `Defeated`, `UnitDefeated` пишется один раз.
pub fn apply_damage_intents(
    mut commands: Commands,
    mut intents: EventReader<DamageIntent>,
    clock: Res<SimClock>,
    mut rng: ResMut<DeterministicRng>,
    particles: Res<HitParticles>,
    mut units: Query<&mut CombatEntity>,
    mut taken_events: EventWriter<DamageTaken>,
    mut defeated_events: EventWriter<UnitDefeated>,
    mut knockback_events: EventWriter<KnockbackStarted>,
) {
    for intent in intents.read() {
        let Ok(mut unit) = units.get_mut(intent.target) else {
            crate::logger::log_warning(&format!(
                "⚠️ DamageIntent for missing unit {:?}",
                intent.target
            ));
            continue;
        };

        let mut ctx = ReactorContext {
            now: clock.now_ms,
            rng: &mut *rng,
            particles: particles.factory(),
        };
        let report = unit.take_damage(intent.amount, &intent.damage_type, &mut ctx);

        taken_events.write(DamageTaken {
            target: intent.target,
            attacker: intent.attacker,
            amount: intent.amount,
            hp_after: report.hp_after,
            particles_spawned: report.particles_spawned,
        });

        if report.knockback_started {
            knockback_events.write(KnockbackStarted {
                entity: intent.target,
                cause: KnockbackCause::Damage,
            });
        }

        if report.defeated {
            commands.entity(intent.target).insert(Defeated);
            defeated_events.write(UnitDefeated {
                entity: intent.target,
                killer: intent.attacker,
            });
            crate::logger::log_info(&format!(
                "💀 Unit {:?} defeated (killer: {:?})",
                intent.target, intent.attacker
            ));
        }
    }
}

/// Система: `StatusEffectIntent` → `apply_status_effect` (source проверяет
/// свои immunities, target получает эффект).
pub fn apply_status_intents(
    mut intents: EventReader<StatusEffectIntent>,
    clock: Res<SimClock>,
    mut rng: ResMut<DeterministicRng>,
    mut units: Query<&mut CombatEntity>,
    mut knockback_events: EventWriter<KnockbackStarted>,
) {
    for intent in intents.read() {
        if intent.source == intent.target {
            crate::logger::log_warning(&format!(
                "⚠️ Self-applied status `{}` on {:?} ignored",
                intent.effect, intent.source
            ));
            continue;
        }

        let Ok([source, mut target]) = units.get_many_mut([intent.source, intent.target]) else {
            // Источник или цель уже despawned
            continue;
        };
        if !target.is_alive() {
            continue;
        }

        let rng: &mut dyn RandomSource = &mut *rng;
        let outcome = source.apply_status_effect(
            &intent.effect,
            intent.duration_secs,
            intent.chance,
            Some(&mut *target as &mut dyn StatusTarget),
            clock.now_ms,
            rng,
        );

        if let StatusOutcome::Applied {
            knocked_back: true, ..
        } = outcome
        {
            knockback_events.write(KnockbackStarted {
                entity: intent.target,
                cause: KnockbackCause::Status,
            });
        }
    }
}

/// Система: `RetreatIntent` → `start_retreat`.
pub fn apply_retreat_intents(
    mut intents: EventReader<RetreatIntent>,
    clock: Res<SimClock>,
    mut units: Query<&mut CombatEntity, Without<Defeated>>,
    mut knockback_events: EventWriter<KnockbackStarted>,
) {
    for intent in intents.read() {
        let Ok(mut unit) = units.get_mut(intent.entity) else {
            continue;
        };

        if unit.start_retreat(clock.now_ms, intent.distance) {
            knockback_events.write(KnockbackStarted {
                entity: intent.entity,
                cause: KnockbackCause::Retreat,
            });
        }
    }
}
