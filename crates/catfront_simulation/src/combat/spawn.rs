//! Unit spawning.

use bevy::prelude::*;

use super::{Advancing, Squad};
use crate::config::{CombatEntityConfig, ConfigError};
use crate::unit::{CombatEntity, FrameTable};

/// Spawn a unit that advances toward −x.
///
/// Конфиг валидируется до spawn: невалидный unit в мир не попадает.
pub fn spawn_unit(
    commands: &mut Commands,
    config: &CombatEntityConfig,
    frames: FrameTable,
    squad: Squad,
) -> Result<Entity, ConfigError> {
    let unit = CombatEntity::new(config, frames)?;
    let entity = commands.spawn((unit, squad, Advancing)).id();

    crate::logger::log(&format!(
        "🐱 Spawned unit {:?} (squad {}) at x={:.1}, hp={}",
        entity, squad.0, config.x, config.hp
    ));
    Ok(entity)
}

/// Same as [`spawn_unit`] but the unit holds its ground.
pub fn spawn_stationary_unit(
    commands: &mut Commands,
    config: &CombatEntityConfig,
    frames: FrameTable,
    squad: Squad,
) -> Result<Entity, ConfigError> {
    let unit = CombatEntity::new(config, frames)?;
    let entity = commands.spawn((unit, squad)).id();

    crate::logger::log(&format!(
        "🏰 Spawned stationary unit {:?} (squad {}) at x={:.1}",
        entity, squad.0, config.x
    ));
    Ok(entity)
}
