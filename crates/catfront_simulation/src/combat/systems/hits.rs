//! Hit resolution: attacking units turn into damage/status intents.

use bevy::prelude::*;

use super::engage::{collect_opponents, zones_overlap, Opponent};
use crate::combat::{DamageIntent, Defeated, Squad, StatusEffectIntent};
use crate::unit::CombatEntity;

/// Distance from the attacker's front edge to the opponent's near edge.
fn front_distance(attacker: &CombatEntity, opponent: &Opponent) -> f32 {
    let attacker_rect = attacker.get_rect();
    let gap_left = attacker_rect.min.x - opponent.rect.max.x;
    let gap_right = opponent.rect.min.x - attacker_rect.max.x;
    gap_left.max(gap_right).max(0.0)
}

/// Система: один hit на attack sequence.
///
/// Пока атакующий в `attacking` и `done_attack == false`: собираем врагов
/// в attack zone (все при `is_aoe`, иначе ближайший), пишем
/// `DamageIntent` (atk × boosts) и по `StatusEffectIntent` на каждую
/// запись `status_effects_config`. Потом `mark_hit_delivered`.
pub fn resolve_attack_hits(
    mut units: Query<(Entity, &mut CombatEntity, &Squad), Without<Defeated>>,
    mut damage_events: EventWriter<DamageIntent>,
    mut status_events: EventWriter<StatusEffectIntent>,
) {
    let opponents = collect_opponents(units.iter());

    let mut attackers: Vec<_> = units
        .iter_mut()
        .filter(|(_, unit, _)| unit.is_alive() && unit.can_deliver_hit())
        .collect();
    attackers.sort_by_key(|(entity, ..)| *entity);

    for (attacker, mut unit, squad) in attackers {
        let zone = unit.get_attack_zone();
        let mut victims: Vec<&Opponent> = opponents
            .iter()
            .filter(|opponent| {
                opponent.entity != attacker
                    && opponent.squad != *squad
                    && zones_overlap(zone, opponent.rect)
                    && unit.can_target(&opponent.attributes)
            })
            .collect();

        if victims.is_empty() {
            // Враг ушёл из зоны (knockback), замах в пустоту
            crate::logger::log(&format!("🌀 {:?}: attack whiffed", attacker));
            unit.mark_hit_delivered();
            continue;
        }

        if !unit.is_aoe {
            victims.sort_by(|a, b| {
                front_distance(&unit, a)
                    .total_cmp(&front_distance(&unit, b))
                    .then(a.entity.cmp(&b.entity))
            });
            victims.truncate(1);
        }

        for victim in victims {
            let amount = unit.atk * unit.boost_against(&victim.attributes);
            damage_events.write(DamageIntent {
                attacker: Some(attacker),
                target: victim.entity,
                amount,
                damage_type: unit.attack_type.clone(),
            });

            for (effect, spec) in &unit.status_effects_config {
                status_events.write(StatusEffectIntent {
                    source: attacker,
                    target: victim.entity,
                    effect: effect.clone(),
                    duration_secs: spec.duration_secs,
                    chance: spec.chance,
                });
            }

            crate::logger::log(&format!(
                "🗡️ {:?} hits {:?} for {:.1} ({})",
                attacker, victim.entity, amount, unit.attack_type
            ));
        }

        unit.mark_hit_delivered();
    }
}
