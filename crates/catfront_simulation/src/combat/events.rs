//! Combat events.
//!
//! Intent events пишут systems боевой логики (или внешний код: скрипты
//! уровней, тесты), reactor systems их применяют. Result events
//! (`DamageTaken`, `UnitDefeated`, `KnockbackStarted`) читает presentation.

use bevy::prelude::*;

/// Запрос на урон. `attacker = None` для урона от окружения/скриптов.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageIntent {
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub amount: f32,
    /// `kinetic` / `physical` / `elemental` / `chemical` (или alias)
    pub damage_type: String,
}

/// Запрос на статус-эффект: `source` проверяет свои immunities против
/// attributes `target` и кидает chance.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct StatusEffectIntent {
    pub source: Entity,
    pub target: Entity,
    pub effect: String,
    pub duration_secs: f32,
    pub chance: f32,
}

/// Одноразовый отход назад (не расходует kb_limit).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct RetreatIntent {
    pub entity: Entity,
    pub distance: f32,
}

/// Урон применён.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageTaken {
    pub target: Entity,
    pub attacker: Option<Entity>,
    pub amount: f32,
    pub hp_after: f32,
    pub particles_spawned: usize,
}

/// Unit потерял последние HP (ровно один раз за жизнь).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitDefeated {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum KnockbackCause {
    /// HP пересёк kb_threshold
    Damage,
    /// Статус-эффект `Knockback`
    Status,
    /// `RetreatIntent`
    Retreat,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnockbackStarted {
    pub entity: Entity,
    pub cause: KnockbackCause,
}
