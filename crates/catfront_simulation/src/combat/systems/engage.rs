//! Engagement: advance or stop and start an attack.

use std::collections::BTreeSet;

use bevy::prelude::*;

use crate::clock::SimClock;
use crate::combat::{Advancing, Defeated, Squad};
use crate::unit::CombatEntity;

/// Snapshot противника для проверок пересечения (без borrow на Query).
#[derive(Debug, Clone)]
pub(crate) struct Opponent {
    pub entity: Entity,
    pub squad: Squad,
    pub rect: Rect,
    pub attributes: BTreeSet<String>,
}

/// Strict overlap: касание краями не считается.
pub fn zones_overlap(a: Rect, b: Rect) -> bool {
    !a.intersect(b).is_empty()
}

/// Living units sorted by `Entity` (детерминированный порядок).
pub(crate) fn collect_opponents<'a>(
    units: impl Iterator<Item = (Entity, &'a CombatEntity, &'a Squad)>,
) -> Vec<Opponent> {
    let mut opponents: Vec<Opponent> = units
        .filter(|(_, unit, _)| unit.is_alive())
        .map(|(entity, unit, squad)| Opponent {
            entity,
            squad: *squad,
            rect: unit.get_rect(),
            attributes: unit.attributes.clone(),
        })
        .collect();
    opponents.sort_by_key(|opponent| opponent.entity);
    opponents
}

/// Система: юнит с врагом в attack zone останавливается и начинает атаку,
/// иначе (если `Advancing`) делает шаг вперёд.
///
/// `begin_attack` сам проверяет attack interval, running attack и knockback.
pub fn engage_or_advance(
    clock: Res<SimClock>,
    mut units: Query<(Entity, &mut CombatEntity, &Squad, Has<Advancing>), Without<Defeated>>,
) {
    let now = clock.now_ms;
    let opponents = collect_opponents(
        units
            .iter()
            .map(|(entity, unit, squad, _)| (entity, unit, squad)),
    );

    let mut ordered: Vec<_> = units.iter_mut().collect();
    ordered.sort_by_key(|(entity, ..)| *entity);

    for (entity, mut unit, squad, advancing) in ordered {
        if !unit.is_alive() {
            continue;
        }

        let zone = unit.get_attack_zone();
        let engaged = opponents.iter().any(|opponent| {
            opponent.entity != entity
                && opponent.squad != *squad
                && zones_overlap(zone, opponent.rect)
                && unit.can_target(&opponent.attributes)
        });

        if engaged {
            unit.halt();
            unit.begin_attack(now);
        } else if advancing {
            unit.move_step();
        } else {
            unit.halt();
        }
    }
}
