//! Animation state machine.
//!
//! Всё считается от абсолютного `now` и записанного времени входа в
//! состояние, никаких накопленных delta, поэтому пропущенные кадры не
//! сбивают фазы.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::CombatEntity;

/// Animation states (windup → attacking → recovery = attack sequence).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Reflect, Serialize, Deserialize,
)]
pub enum AnimState {
    #[default]
    Idle,
    Moving,
    Windup,
    Attacking,
    Recovery,
    /// Position is driven by knockback physics, frames come from `Moving`
    Knockback,
}

impl AnimState {
    pub const ALL: [AnimState; 6] = [
        AnimState::Idle,
        AnimState::Moving,
        AnimState::Windup,
        AnimState::Attacking,
        AnimState::Recovery,
        AnimState::Knockback,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AnimState::Idle => "idle",
            AnimState::Moving => "moving",
            AnimState::Windup => "windup",
            AnimState::Attacking => "attacking",
            AnimState::Recovery => "recovery",
            AnimState::Knockback => "knockback",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.name() == name)
    }

    pub fn is_attack_phase(&self) -> bool {
        matches!(
            self,
            AnimState::Windup | AnimState::Attacking | AnimState::Recovery
        )
    }

    /// Next phase of the attack sequence (`Recovery` → `Idle`).
    pub fn next_phase(&self) -> Option<AnimState> {
        match self {
            AnimState::Windup => Some(AnimState::Attacking),
            AnimState::Attacking => Some(AnimState::Recovery),
            AnimState::Recovery => Some(AnimState::Idle),
            _ => None,
        }
    }
}

/// Opaque frame id from the asset tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub struct FrameHandle(pub u32);

/// Per-frame duration (ms) for every state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameDurations {
    pub idle: u64,
    pub moving: u64,
    pub windup: u64,
    pub attacking: u64,
    pub recovery: u64,
}

impl Default for FrameDurations {
    fn default() -> Self {
        Self {
            idle: 200,
            moving: 150,
            windup: 200,
            attacking: 100,
            recovery: 50,
        }
    }
}

impl FrameDurations {
    pub fn for_state(&self, state: AnimState) -> u64 {
        match state {
            AnimState::Idle => self.idle,
            AnimState::Moving | AnimState::Knockback => self.moving,
            AnimState::Windup => self.windup,
            AnimState::Attacking => self.attacking,
            AnimState::Recovery => self.recovery,
        }
    }
}

/// State → ordered frames, plus the image shown when nothing else exists.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameTable {
    frames: BTreeMap<AnimState, Vec<FrameHandle>>,
    pub fallback: FrameHandle,
}

impl FrameTable {
    pub fn new(fallback: FrameHandle) -> Self {
        Self {
            frames: BTreeMap::new(),
            fallback,
        }
    }

    pub fn with_frames(mut self, state: AnimState, frames: Vec<FrameHandle>) -> Self {
        self.frames.insert(state, frames);
        self
    }

    /// `frames_per_state` sequential handles for every state except knockback.
    /// Handle 0 is the fallback.
    pub fn uniform(frames_per_state: usize) -> Self {
        let mut table = Self::new(FrameHandle(0));
        let mut next = 1;
        for state in AnimState::ALL {
            if state == AnimState::Knockback {
                continue;
            }
            let frames = (0..frames_per_state)
                .map(|i| FrameHandle(next + i as u32))
                .collect();
            next += frames_per_state as u32;
            table.frames.insert(state, frames);
        }
        table
    }

    /// Insert by asset-table name. Unknown names are ignored (returns false).
    pub fn insert_named(&mut self, name: &str, frames: Vec<FrameHandle>) -> bool {
        let Some(state) = AnimState::from_name(name) else {
            return false;
        };
        self.frames.insert(state, frames);
        true
    }

    pub fn frames(&self, state: AnimState) -> &[FrameHandle] {
        self.frames.get(&state).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn frame_count(&self, state: AnimState) -> usize {
        self.frames(state).len()
    }
}

/// Stateless looping phase: `(now / frame_ms) mod 1`, 0 for zero-length frames.
pub fn looping_progress(now: u64, frame_ms: u64) -> f32 {
    if frame_ms == 0 {
        return 0.0;
    }
    (now % frame_ms) as f32 / frame_ms as f32
}

impl CombatEntity {
    /// Total length of an attack phase: frame duration × frame count.
    pub fn phase_duration(&self, state: AnimState) -> u64 {
        // Длительности из конфига не ограничены сверху
        self.frame_durations
            .for_state(state)
            .saturating_mul(self.frames.frame_count(state) as u64)
    }

    /// Advance the state machine to `now`. Knockback pre-empts everything.
    pub fn update_animation(&mut self, now: u64) {
        if self.knockback.active {
            self.step_knockback(now);
            return;
        }

        match self.anim_state {
            AnimState::Windup | AnimState::Attacking | AnimState::Recovery => {
                self.advance_attack_phase(now);
            }
            AnimState::Moving => {
                self.anim_progress = looping_progress(now, self.frame_durations.moving);
            }
            AnimState::Idle | AnimState::Knockback => {
                self.anim_state = AnimState::Idle;
                self.anim_progress = looping_progress(now, self.frame_durations.idle);
            }
        }
    }

    fn advance_attack_phase(&mut self, now: u64) {
        let duration = self.phase_duration(self.anim_state);
        let elapsed = now.saturating_sub(self.anim_start_time);
        let progress = if duration > 0 {
            (elapsed as f32 / duration as f32).min(1.0)
        } else {
            0.0
        };

        if elapsed >= duration {
            let Some(next) = self.anim_state.next_phase() else {
                return;
            };
            crate::logger::log(&format!(
                "🎞️ Unit: {} → {} at {}ms",
                self.anim_state.name(),
                next.name(),
                now
            ));
            self.anim_state = next;
            self.anim_start_time = now;
            // На тике перехода progress ещё от завершённой фазы
            self.anim_progress = progress;

            if next == AnimState::Idle {
                self.is_attacking = false;
                self.done_attack = false;
            }
            return;
        }

        self.anim_progress = progress;
    }

    /// Frame to display for the current state and progress.
    ///
    /// Empty state → idle frames → fallback image.
    pub fn get_current_frame(&self) -> FrameHandle {
        let state = if self.knockback.active || self.anim_state == AnimState::Knockback {
            AnimState::Moving
        } else {
            self.anim_state
        };

        let mut frames = self.frames.frames(state);
        if frames.is_empty() {
            frames = self.frames.frames(AnimState::Idle);
        }
        if frames.is_empty() {
            return self.frames.fallback;
        }

        let count = frames.len();
        let index = (self.anim_progress * count as f32).floor() as usize % count;
        frames[index]
    }
}
