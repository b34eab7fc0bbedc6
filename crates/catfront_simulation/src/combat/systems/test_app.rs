//! Minimal App for system tests: события, ресурсы, без времени.

use bevy::prelude::*;

use crate::clock::SimClock;
use crate::combat::*;
use crate::config::CombatEntityConfig;
use crate::unit::{CombatEntity, FrameTable};
use crate::DeterministicRng;

pub fn test_app(now_ms: u64) -> App {
    let mut app = App::new();
    app.add_event::<DamageIntent>()
        .add_event::<StatusEffectIntent>()
        .add_event::<RetreatIntent>()
        .add_event::<DamageTaken>()
        .add_event::<UnitDefeated>()
        .add_event::<KnockbackStarted>()
        .insert_resource(SimClock::new(now_ms))
        .insert_resource(DeterministicRng::new(7))
        .init_resource::<HitParticles>();
    app
}

/// Ground line 400, 50×50 → rect y ∈ [350, 400] у всех.
pub fn unit_config(x: f32) -> CombatEntityConfig {
    CombatEntityConfig {
        x,
        y: 400.0,
        hp: 100.0,
        atk: 10.0,
        kb_limit: 4,
        ..Default::default()
    }
}

pub fn spawn(app: &mut App, config: CombatEntityConfig, squad: u8, advancing: bool) -> Entity {
    let unit = CombatEntity::new(&config, FrameTable::uniform(1)).expect("valid test config");
    let mut entity = app.world_mut().spawn((unit, Squad(squad)));
    if advancing {
        entity.insert(Advancing);
    }
    entity.id()
}

pub fn unit(app: &App, entity: Entity) -> &CombatEntity {
    app.world()
        .get::<CombatEntity>(entity)
        .expect("unit exists")
}

pub fn unit_mut(app: &mut App, entity: Entity) -> Mut<'_, CombatEntity> {
    app.world_mut()
        .get_mut::<CombatEntity>(entity)
        .expect("unit exists")
}

pub fn current_events<E: Event + Clone>(app: &App) -> Vec<E> {
    app.world()
        .resource::<Events<E>>()
        .iter_current_update_events()
        .cloned()
        .collect()
}
