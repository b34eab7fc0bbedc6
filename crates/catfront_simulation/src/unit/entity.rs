//! CombatEntity component: position, vitals, stats, flags.

use std::collections::{BTreeMap, BTreeSet};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{AnimState, FrameDurations, FrameTable, KnockbackState, ParticleQueues};
use crate::config::{CombatEntityConfig, ConfigError, StatusEffectSpec};

/// Сторона, в которую unit идёт и бьёт. Кошки идут к −x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Left,
    Right,
}

impl Facing {
    /// Sign of the advance direction along x.
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Боевой unit (кошка на линии фронта)
///
/// Три под-поведения делят эту структуру: animation state machine,
/// knockback physics, status & damage reactor. Каждое реализовано
/// отдельным `impl` блоком в своём модуле.
///
/// Инварианты:
/// - `hp <= max_hp`
/// - `anim_progress ∈ [0, 1]`
/// - `knockback_count() <= kb_limit`
/// - после knockback `y == y0`
#[derive(Component, Debug)]
pub struct CombatEntity {
    // === Position ===
    pub x: f32,
    pub y: f32,
    /// Rest baseline restored after knockback
    pub y0: f32,
    pub width: f32,
    pub height: f32,
    pub facing: Facing,

    // === Vitals ===
    pub hp: f32,
    pub max_hp: f32,
    /// HP at the previous damage reading (threshold crossing detection)
    pub last_hp: f32,

    // === Combat stats ===
    pub atk: f32,
    pub speed: f32,
    pub attack_range: f32,
    pub is_aoe: bool,
    pub attack_type: String,
    pub attack_interval_ms: u64,
    pub last_attack_time: Option<u64>,
    pub kb_limit: u32,
    pub kb_threshold: f32,
    pub kb_distance: f32,
    pub(super) kb_count: u32,

    // === Animation ===
    pub anim_state: AnimState,
    pub anim_start_time: u64,
    pub anim_progress: f32,
    pub frames: FrameTable,
    pub frame_durations: FrameDurations,

    pub knockback: KnockbackState,

    // === Flags ===
    pub is_attacking: bool,
    pub done_attack: bool,
    pub has_retreated: bool,

    // === Tags & effects ===
    pub attributes: BTreeSet<String>,
    pub target_attributes: BTreeSet<String>,
    pub immunities: BTreeMap<String, BTreeSet<String>>,
    pub boosts: BTreeMap<String, f32>,
    /// effect name → expiry timestamp (ms)
    pub status_effects: BTreeMap<String, u64>,
    pub status_effects_config: BTreeMap<String, StatusEffectSpec>,

    pub particles: ParticleQueues,
}

impl CombatEntity {
    pub fn new(config: &CombatEntityConfig, frames: FrameTable) -> Result<Self, ConfigError> {
        config.validate()?;

        let y0 = config.baseline_y();
        Ok(Self {
            x: config.x,
            y: y0,
            y0,
            width: config.width,
            height: config.height,
            facing: config.facing,
            hp: config.hp,
            max_hp: config.hp,
            last_hp: config.hp,
            atk: config.atk,
            speed: config.speed,
            attack_range: config.attack_range,
            is_aoe: config.is_aoe,
            attack_type: config.attack_type.clone(),
            attack_interval_ms: config.attack_interval_ms,
            last_attack_time: None,
            kb_limit: config.kb_limit,
            kb_threshold: config.effective_kb_threshold(),
            kb_distance: config.kb_distance,
            kb_count: 0,
            anim_state: AnimState::Idle,
            anim_start_time: 0,
            anim_progress: 0.0,
            frames,
            frame_durations: config.frame_durations,
            knockback: KnockbackState::new(config.kb_duration_ms),
            is_attacking: false,
            done_attack: false,
            has_retreated: false,
            attributes: config.attributes.clone(),
            target_attributes: config.target_attributes.clone(),
            immunities: config.immunities.clone(),
            boosts: config.boosts.clone(),
            status_effects: BTreeMap::new(),
            status_effects_config: config.status_effects_config.clone(),
            particles: ParticleQueues::default(),
        })
    }

    /// Step toward the enemy line (−x for `Facing::Left`). Blocked during attacks and knockback.
    pub fn move_step(&mut self) -> bool {
        if self.is_attacking || self.knockback.active || self.anim_state.is_attack_phase() {
            return false;
        }
        self.x += self.facing.sign() * self.speed;
        self.anim_state = AnimState::Moving;
        true
    }

    /// Stop advancing; the looping idle cycle resumes on the next update.
    pub fn halt(&mut self) {
        if self.anim_state == AnimState::Moving {
            self.anim_state = AnimState::Idle;
        }
    }

    /// Enter windup. Requires no running attack/knockback and an elapsed attack interval.
    pub fn begin_attack(&mut self, now: u64) -> bool {
        if self.is_attacking || self.knockback.active || !self.is_alive() {
            return false;
        }
        if let Some(last) = self.last_attack_time {
            if now.saturating_sub(last) < self.attack_interval_ms {
                return false;
            }
        }

        self.is_attacking = true;
        self.done_attack = false;
        self.last_attack_time = Some(now);
        self.anim_state = AnimState::Windup;
        self.anim_start_time = now;
        self.anim_progress = 0.0;

        crate::logger::log(&format!("⚔️ Unit: attack started at {}ms", now));
        true
    }

    /// Hit may land once per sequence, during `attacking`.
    pub fn can_deliver_hit(&self) -> bool {
        self.is_attacking
            && !self.done_attack
            && !self.knockback.active
            && self.anim_state == AnimState::Attacking
    }

    pub fn mark_hit_delivered(&mut self) {
        self.done_attack = true;
    }

    /// Body rectangle.
    pub fn get_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Strip of `attack_range` in front of the unit.
    pub fn get_attack_zone(&self) -> Rect {
        match self.facing {
            Facing::Left => Rect::new(
                self.x - self.attack_range,
                self.y,
                self.x,
                self.y + self.height,
            ),
            Facing::Right => Rect::new(
                self.x + self.width,
                self.y,
                self.x + self.width + self.attack_range,
                self.y + self.height,
            ),
        }
    }

    pub fn visual_center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// `target_attributes` empty → hits anything.
    pub fn can_target(&self, attributes: &BTreeSet<String>) -> bool {
        self.target_attributes.is_empty()
            || self.target_attributes.iter().any(|tag| attributes.contains(tag))
    }

    /// Product of boosts whose condition matches one of the target's tags.
    pub fn boost_against(&self, attributes: &BTreeSet<String>) -> f32 {
        self.boosts
            .iter()
            .filter(|(condition, _)| attributes.contains(*condition))
            .map(|(_, multiplier)| *multiplier)
            .product()
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Heal up to `max_hp`. Never triggers knockback.
    pub fn heal(&mut self, amount: f32) {
        self.hp = (self.hp + amount.max(0.0)).min(self.max_hp);
        self.last_hp = self.hp;
    }

    /// 0..1, for HP bars.
    pub fn hp_fraction(&self) -> f32 {
        (self.hp / self.max_hp).clamp(0.0, 1.0)
    }
}
