//! Knockback physics.
//!
//! Timed linear displacement along x that overrides movement and the
//! attack sequence. Retreat reuses the same displacement but does not
//! count against `kb_limit`.

use bevy::prelude::*;

use super::{looping_progress, AnimState, CombatEntity};

/// Peak visual tilt, reached at `progress == 0.5`.
pub const KB_MAX_ROTATION_DEG: f32 = 20.0;

/// Transient knockback state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct KnockbackState {
    pub active: bool,
    pub start_time: u64,
    pub duration_ms: u64,
    pub start_x: f32,
    pub target_x: f32,
    pub start_y: f32,
    /// 0..1 through the current displacement
    pub progress: f32,
    /// Visual tilt, degrees
    pub rotation: f32,
}

impl KnockbackState {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            ..Default::default()
        }
    }

    fn progress_at(&self, now: u64) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start_time);
        (elapsed as f32 / self.duration_ms as f32).min(1.0)
    }
}

/// Triangular tilt profile: 0° → 20° over the first half, back to 0° over the second.
pub fn tilt_for_progress(progress: f32) -> f32 {
    let progress = progress.clamp(0.0, 1.0);
    if progress < 0.5 {
        2.0 * KB_MAX_ROTATION_DEG * progress
    } else {
        2.0 * KB_MAX_ROTATION_DEG * (1.0 - progress)
    }
}

/// Number of `kb_threshold` boundaries crossed going from `last_hp` down to `hp`.
///
/// Healing yields a non-positive value and never triggers anything.
pub fn thresholds_crossed(last_hp: f32, hp: f32, kb_threshold: f32) -> i32 {
    if !(kb_threshold > 0.0) {
        return 0;
    }
    ((last_hp / kb_threshold).floor() - (hp / kb_threshold).floor()) as i32
}

impl CombatEntity {
    /// Start a knockback. `direction` overrides the configured displacement.
    ///
    /// Ignored while another displacement is running or once `kb_limit`
    /// knockbacks have happened. Returns whether a knockback started.
    pub fn knock_back(&mut self, now: u64, direction: Option<f32>) -> bool {
        if self.knockback.active {
            return false;
        }
        if self.kb_count >= self.kb_limit {
            crate::logger::log(&format!(
                "🛑 Unit: knockback limit reached ({}/{})",
                self.kb_count, self.kb_limit
            ));
            return false;
        }

        self.kb_count += 1;
        // По умолчанию отбрасывает назад, против facing
        let displacement = direction.unwrap_or(-self.facing.sign() * self.kb_distance);
        self.begin_displacement(now, displacement);

        crate::logger::log_info(&format!(
            "💨 Unit knocked back {:.1} at {}ms ({}/{})",
            displacement, now, self.kb_count, self.kb_limit
        ));
        true
    }

    /// One-shot retreat by `distance` away from the front.
    ///
    /// No-op mid-attack, mid-displacement, or after a previous retreat.
    pub fn start_retreat(&mut self, now: u64, distance: f32) -> bool {
        if self.is_attacking || self.has_retreated || self.knockback.active {
            return false;
        }

        self.begin_displacement(now, -self.facing.sign() * distance);
        self.has_retreated = true;

        crate::logger::log_info(&format!("🏃 Unit retreating {:.1} at {}ms", distance, now));
        true
    }

    fn begin_displacement(&mut self, now: u64, displacement: f32) {
        self.knockback = KnockbackState {
            active: true,
            start_time: now,
            duration_ms: self.knockback.duration_ms,
            start_x: self.x,
            target_x: self.x + displacement,
            start_y: self.y,
            progress: 0.0,
            rotation: 0.0,
        };
        self.anim_state = AnimState::Knockback;
    }

    /// Per-tick displacement step. Linear in progress.
    pub(super) fn step_knockback(&mut self, now: u64) {
        let progress = self.knockback.progress_at(now);
        let kb = &mut self.knockback;

        kb.progress = progress;
        kb.rotation = tilt_for_progress(progress);
        self.x = kb.start_x + (kb.target_x - kb.start_x) * progress;
        self.y = kb.start_y;
        self.anim_progress = looping_progress(now, self.frame_durations.moving);

        if progress >= 1.0 {
            kb.active = false;
            kb.rotation = 0.0;
            self.anim_state = AnimState::Idle;
            self.anim_start_time = now;
            self.is_attacking = false;
            self.done_attack = false;
            // Снэп на baseline без накопленной float-ошибки
            self.y = self.y0;

            crate::logger::log(&format!("✅ Unit: knockback finished at x={:.1}", self.x));
        }
    }

    pub fn knockback_count(&self) -> u32 {
        self.kb_count
    }

    pub fn is_knocked_back(&self) -> bool {
        self.knockback.active
    }
}
