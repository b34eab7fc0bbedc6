//! ECS components вокруг CombatEntity.

use bevy::prelude::*;

use crate::unit::{HitSparkFactory, ParticleFactory};

/// Сторона фронта. Units одного squad не атакуют друг друга.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
#[reflect(Component)]
pub struct Squad(pub u8);

/// Маркер: unit идёт вперёд (по `facing`), пока в attack zone нет врагов.
/// Без него unit стоит на месте (турель, база).
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Advancing;

/// Маркер: HP <= 0. Вешается reactor system'ой, `despawn_defeated` убирает entity.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Defeated;

/// Фабрика частиц попадания (renderer подменяет на свою).
#[derive(Resource)]
pub struct HitParticles(pub Box<dyn ParticleFactory>);

impl HitParticles {
    pub fn factory(&self) -> &dyn ParticleFactory {
        self.0.as_ref()
    }
}

impl Default for HitParticles {
    fn default() -> Self {
        Self(Box::new(HitSparkFactory::default()))
    }
}
