//! Shared fixtures for unit tests.

use super::*;
use crate::config::CombatEntityConfig;

/// idle 4, moving 3, windup 2, attacking 1, recovery 1 frames.
pub fn scenario_frames() -> FrameTable {
    FrameTable::new(FrameHandle(0))
        .with_frames(AnimState::Idle, vec![FrameHandle(1), FrameHandle(2), FrameHandle(3), FrameHandle(4)])
        .with_frames(AnimState::Moving, vec![FrameHandle(10), FrameHandle(11), FrameHandle(12)])
        .with_frames(AnimState::Windup, vec![FrameHandle(20), FrameHandle(21)])
        .with_frames(AnimState::Attacking, vec![FrameHandle(30)])
        .with_frames(AnimState::Recovery, vec![FrameHandle(40)])
}

/// hp 100, threshold 25, windup 2×100ms, attacking 1×100ms, recovery 1×50ms.
pub fn scenario_config() -> CombatEntityConfig {
    CombatEntityConfig {
        x: 500.0,
        y: 400.0,
        hp: 100.0,
        kb_limit: 4,
        kb_threshold: Some(25.0),
        kb_distance: 60.0,
        kb_duration_ms: 300,
        attack_interval_ms: 0,
        frame_durations: FrameDurations {
            idle: 200,
            moving: 150,
            windup: 100,
            attacking: 100,
            recovery: 50,
        },
        ..Default::default()
    }
}

pub fn scenario_unit() -> CombatEntity {
    CombatEntity::new(&scenario_config(), scenario_frames()).expect("scenario config is valid")
}

pub fn unit_with(edit: impl FnOnce(&mut CombatEntityConfig)) -> CombatEntity {
    let mut config = scenario_config();
    edit(&mut config);
    CombatEntity::new(&config, scenario_frames()).expect("edited config is valid")
}
