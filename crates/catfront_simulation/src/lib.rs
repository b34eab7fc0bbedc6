//! Catfront Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: боевые units (кошки) на линии фронта.
//!
//! - `unit` = логика одного юнита (animation, knockback, reactor), без ECS
//! - `combat` = systems, которые гоняют units в FixedUpdate
//! - Рендер снаружи: через `DrawSurface` / `ParticleFactory` seams

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod clock;
pub mod combat;
pub mod config;
pub mod logger;
pub mod rng;
pub mod unit;

// Re-export базовых типов для удобства
pub use clock::{advance_sim_clock, SimClock};
pub use combat::{
    spawn_stationary_unit, spawn_unit, Advancing, CombatPlugin, DamageIntent, DamageTaken,
    Defeated, HitParticles, KnockbackCause, KnockbackStarted, RetreatIntent, Squad,
    StatusEffectIntent, UnitDefeated,
};
pub use config::{CombatEntityConfig, ConfigError, StatusEffectSpec};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};
pub use rng::{RandomSource, ScriptedRandom};
pub use unit::{AnimState, CombatEntity, DamageCategory, Facing, FrameHandle, FrameTable};

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Seed из create_headless_app не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<SimClock>()
            .init_resource::<HitParticles>()
            .add_plugins(CombatPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (все коллекции в units: BTree*)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
