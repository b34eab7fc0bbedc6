//! Combat module: CombatEntity внутри Bevy App
//!
//! ECS ответственность:
//! - Engagement: шаг вперёд или остановка + начало атаки
//! - Hit resolution: attack zone → DamageIntent / StatusEffectIntent
//! - Reactor: take_damage, статус-эффекты, отступление
//! - Upkeep: анимация, частицы, истечение статусов, despawn убитых
//!
//! Вся логика юнита живёт в `crate::unit`, здесь только orchestration.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod spawn;
pub mod systems;

pub use components::*;
pub use events::*;
pub use spawn::*;
pub use systems::zones_overlap;

use crate::clock::advance_sim_clock;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. advance_sim_clock: один sample `Time<Fixed>` на тик
/// 2. engage_or_advance: шаг вперёд или begin_attack
/// 3. resolve_attack_hits: attacking → intents
/// 4. apply_damage_intents: take_damage → DamageTaken / UnitDefeated
/// 5. apply_status_intents: статус-эффекты
/// 6. apply_retreat_intents: одноразовое отступление
/// 7. tick_units: update_animation, частицы, expiry
/// 8. despawn_defeated: убираем мёртвых
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<DamageIntent>()
            .add_event::<StatusEffectIntent>()
            .add_event::<RetreatIntent>()
            .add_event::<DamageTaken>()
            .add_event::<UnitDefeated>()
            .add_event::<KnockbackStarted>();

        app.add_systems(
            FixedUpdate,
            (
                // Фаза 1: Время
                advance_sim_clock,
                // Фаза 2: Движение и решения
                systems::engage_or_advance,
                systems::resolve_attack_hits,
                // Фаза 3: Реакции
                systems::apply_damage_intents,
                systems::apply_status_intents,
                systems::apply_retreat_intents,
                // Фаза 4: Upkeep
                systems::tick_units,
                systems::despawn_defeated,
            )
                .chain(), // Последовательное выполнение
        );
    }
}
