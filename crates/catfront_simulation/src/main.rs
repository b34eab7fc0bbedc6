//! Headless симуляция Catfront
//!
//! Две стороны идут навстречу друг другу, бой без рендера

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use catfront_simulation::{
    create_headless_app, log_error, spawn_unit, CombatEntity, CombatEntityConfig, Facing,
    FrameTable, SimClock, SimulationPlugin, Squad, StatusEffectSpec,
};

fn cat_config(x: f32) -> CombatEntityConfig {
    let mut config = CombatEntityConfig {
        x,
        y: 400.0,
        hp: 120.0,
        atk: 12.0,
        speed: 2.0,
        kb_limit: 3,
        attack_type: "physical".to_string(),
        ..Default::default()
    };
    config.attributes.insert("cat".to_string());
    config.boosts.insert("dog".to_string(), 1.5);
    config
}

fn dog_config(x: f32) -> CombatEntityConfig {
    let mut config = CombatEntityConfig {
        x,
        y: 400.0,
        hp: 90.0,
        atk: 15.0,
        speed: 1.5,
        facing: Facing::Right,
        kb_limit: 2,
        attack_type: "chemical".to_string(),
        ..Default::default()
    };
    config.attributes.insert("dog".to_string());
    config.status_effects_config.insert(
        "Slow".to_string(),
        StatusEffectSpec {
            duration_secs: 2.0,
            chance: 0.4,
        },
    );
    config
}

fn main() {
    let seed = 42;
    println!("Starting Catfront headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        // Ровно один fixed tick на update, одинаково на любой машине
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_micros(16_667)));

    let configs = [
        (cat_config(900.0), Squad(0)),
        (cat_config(980.0), Squad(0)),
        (dog_config(100.0), Squad(1)),
        (dog_config(20.0), Squad(1)),
    ];
    for (config, squad) in &configs {
        if let Err(err) = spawn_unit(
            &mut app.world_mut().commands(),
            config,
            FrameTable::uniform(4),
            *squad,
        ) {
            log_error(&format!("❌ Invalid unit config: {}", err));
            return;
        }
    }
    app.world_mut().flush();

    // Запускаем 1000 тиков симуляции
    for tick in 0..1000 {
        app.update();

        if tick % 100 == 0 {
            let world = app.world_mut();
            let now = world.resource::<SimClock>().now_ms;
            let mut squads = [0usize; 2];
            let mut query = world.query::<(&CombatEntity, &Squad)>();
            for (_, squad) in query.iter(world) {
                if let Some(count) = squads.get_mut(squad.0 as usize) {
                    *count += 1;
                }
            }
            println!(
                "Tick {} ({}ms): cats {}, dogs {}",
                tick, now, squads[0], squads[1]
            );
        }
    }

    println!("Simulation complete!");
}
