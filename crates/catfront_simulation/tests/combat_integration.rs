//! Combat integration test
//!
//! Кошки против собак headless, через полный SimulationPlugin
//!
//! Проверяем:
//! - Инварианты юнита каждый тик (hp, progress, kb_limit, baseline)
//! - Hit → урон/статус → despawn побеждённых
//! - Нет паники/крашей

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use catfront_simulation::*;

/// Helper: создать полный combat App (один fixed tick на update)
fn create_combat_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_micros(16_667)));
    app
}

fn cat_config(x: f32) -> CombatEntityConfig {
    CombatEntityConfig {
        x,
        y: 400.0,
        ..Default::default()
    }
}

fn dog_config(x: f32) -> CombatEntityConfig {
    CombatEntityConfig {
        x,
        y: 400.0,
        facing: Facing::Right,
        ..Default::default()
    }
}

fn spawn(app: &mut App, config: &CombatEntityConfig, squad: u8, advancing: bool) -> Entity {
    let frames = FrameTable::uniform(3);
    let result = if advancing {
        spawn_unit(&mut app.world_mut().commands(), config, frames, Squad(squad))
    } else {
        spawn_stationary_unit(&mut app.world_mut().commands(), config, frames, Squad(squad))
    };
    let entity = result.expect("valid config");
    app.world_mut().flush();
    entity
}

fn check_invariants(app: &mut App, tick: usize) {
    let world = app.world_mut();
    let mut query = world.query::<(Entity, &CombatEntity)>();

    for (entity, unit) in query.iter(world) {
        assert!(
            unit.hp <= unit.max_hp,
            "Tick {}: {:?} hp {} > max_hp {}",
            tick,
            entity,
            unit.hp,
            unit.max_hp
        );
        assert!(
            (0.0..=1.0).contains(&unit.anim_progress),
            "Tick {}: {:?} anim_progress {} out of [0, 1]",
            tick,
            entity,
            unit.anim_progress
        );
        assert!(
            unit.knockback_count() <= unit.kb_limit,
            "Tick {}: {:?} knockbacks {} > limit {}",
            tick,
            entity,
            unit.knockback_count(),
            unit.kb_limit
        );
        if !unit.is_knocked_back() {
            assert_eq!(unit.y, unit.y0, "Tick {}: {:?} off baseline", tick, entity);
        }
    }
}

/// Test: кошка и собака идут навстречу и дерутся 1000 тиков
#[test]
fn test_cat_and_dog_fight_1000_ticks() {
    let mut app = create_combat_app(42);

    let cat = spawn(&mut app, &cat_config(300.0), 0, true);
    let dog = spawn(&mut app, &dog_config(100.0), 1, true);

    for tick in 0..1000 {
        app.update();
        check_invariants(&mut app, tick);
    }

    assert!(app.world().resource::<SimClock>().now_ms > 0);

    // Кто-то получил урон (или уже убран из мира)
    let damaged = |entity: Entity| {
        app.world()
            .get::<CombatEntity>(entity)
            .map_or(true, |unit| unit.hp < unit.max_hp)
    };
    assert!(damaged(cat) || damaged(dog), "no hit landed in 1000 ticks");
}

/// Test: побеждённый unit исчезает, победитель остаётся
#[test]
fn test_defeated_unit_is_despawned() {
    let mut app = create_combat_app(7);

    let mut heavy = cat_config(300.0);
    heavy.atk = 200.0;
    let cat = spawn(&mut app, &heavy, 0, true);
    // Стоит в attack zone кошки [250, 300], сам смотрит в другую сторону
    let dummy = spawn(&mut app, &cat_config(240.0), 1, false);

    for _ in 0..60 {
        app.update();
    }

    assert!(app.world().get_entity(dummy).is_err(), "dummy still alive");
    let cat_unit = app.world().get::<CombatEntity>(cat).expect("cat alive");
    assert_eq!(cat_unit.x, 300.0, "cat holds position while engaged");
    assert_eq!(cat_unit.hp, cat_unit.max_hp);
}

/// Test: статус-эффект атакующего доходит до цели через hit
#[test]
fn test_hit_applies_configured_status() {
    let mut app = create_combat_app(7);

    let mut config = cat_config(300.0);
    config.atk = 1.0;
    config.status_effects_config.insert(
        "Slow".to_string(),
        StatusEffectSpec {
            duration_secs: 5.0,
            chance: 1.0,
        },
    );
    spawn(&mut app, &config, 0, false);
    let dummy = spawn(&mut app, &cat_config(240.0), 1, false);

    for _ in 0..60 {
        app.update();
    }

    let now = app.world().resource::<SimClock>().now_ms;
    let dummy_unit = app.world().get::<CombatEntity>(dummy).expect("dummy alive");
    assert_eq!(dummy_unit.hp, 99.0);
    assert!(dummy_unit.has_status("Slow", now));
}

/// Test: attack interval ограничивает частоту ударов
#[test]
fn test_interval_limits_hits() {
    let mut app = create_combat_app(7);

    let mut config = cat_config(300.0);
    config.atk = 5.0;
    config.attack_interval_ms = 1000;
    spawn(&mut app, &config, 0, false);

    let mut target = cat_config(240.0);
    target.kb_limit = 1;
    // Порог недостижим: без отбрасывания, стоит в зоне всё время
    target.kb_threshold = Some(1000.0);
    let dummy = spawn(&mut app, &target, 1, false);

    // ~2.5 секунды. Атака 1050ms (3 кадра на фазу), старты в 16ms и 1083ms,
    // третий windup не успевает закончиться
    for _ in 0..150 {
        app.update();
    }

    let dummy_unit = app.world().get::<CombatEntity>(dummy).expect("dummy alive");
    assert_eq!(dummy_unit.hp, 90.0);
}
