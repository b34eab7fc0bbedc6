//! Per-tick unit upkeep and cleanup of defeated units.

use bevy::prelude::*;

use crate::clock::SimClock;
use crate::combat::Defeated;
use crate::unit::CombatEntity;

/// Система: animation/knockback step, частицы, истечение статусов.
pub fn tick_units(clock: Res<SimClock>, mut units: Query<(Entity, &mut CombatEntity)>) {
    let now = clock.now_ms;

    for (entity, mut unit) in units.iter_mut() {
        unit.update_animation(now);
        unit.particles.prune();

        let expired = unit.expire_status_effects(now);
        if !expired.is_empty() {
            crate::logger::log(&format!("⏳ {:?}: status expired {:?}", entity, expired));
        }
    }
}

/// Система: убрать побеждённых из мира (active-entity pool).
pub fn despawn_defeated(mut commands: Commands, defeated: Query<Entity, With<Defeated>>) {
    for entity in defeated.iter() {
        commands.entity(entity).despawn();
        crate::logger::log(&format!("🗑️ Despawned defeated unit {:?}", entity));
    }
}
