//! Headless симуляция FREERUN
//!
//! Прогоняет scripted runner по тестовому уровню и печатает смены состояний.
//! Usage: freerun_simulation [config.ron]

use bevy::prelude::*;
use std::path::Path;
use std::time::Duration;

use freerun_simulation::components::spawn_runner;
use freerun_simulation::{
    create_headless_app, log_error, log_info, Block, JumpIntent, LevelGeometry, LocomotionConfig,
    LocomotionStateChanged, MovementInput, SimulationPlugin,
};

const TICK_COUNT: u32 = 600;

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match LocomotionConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(err) => {
                log_error(&format!("{err}"));
                std::process::exit(1);
            }
        },
        None => LocomotionConfig::default(),
    };

    let mut app = create_headless_app();
    app.add_plugins(SimulationPlugin);

    // Пол + низкий ящик (vault) + высокая стена (wall slide) по направлению -Z
    app.insert_resource(
        LevelGeometry::flat(0.0)
            .with_block(Block::new(Vec3::new(-2.0, 0.0, -8.0), Vec3::new(2.0, 1.4, -7.0)))
            .with_block(Block::new(Vec3::new(-4.0, 0.0, -20.0), Vec3::new(4.0, 6.0, -19.0))),
    );

    let runner = spawn_runner(
        &mut app.world_mut().commands(),
        Vec3::new(0.0, 0.9, 0.0),
        config,
    );
    app.world_mut().flush();

    println!("Starting FREERUN headless simulation ({} ticks)", TICK_COUNT);

    let tick = Duration::from_secs_f64(1.0 / 60.0);
    let mut cursor = app
        .world()
        .resource::<Events<LocomotionStateChanged>>()
        .get_cursor();

    for frame in 0..TICK_COUNT {
        let input = scripted_input(frame);
        if let Some(mut movement) = app.world_mut().get_mut::<MovementInput>(runner) {
            *movement = input;
        }
        if frame == 420 || frame == 500 {
            app.world_mut().send_event(JumpIntent { entity: runner });
        }

        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .advance_by(tick);
        app.world_mut().run_schedule(FixedUpdate);

        let events = app.world().resource::<Events<LocomotionStateChanged>>();
        for change in cursor.read(events) {
            println!("Tick {}: {:?} -> {:?}", frame, change.from, change.to);
        }
    }

    if let Some(transform) = app.world().get::<Transform>(runner) {
        log_info(&format!("Final position: {:?}", transform.translation));
    }
    println!("Simulation complete!");
}

/// Сценарий: стоим → идём → спринт через ящик → упираемся в стену → прыжки
fn scripted_input(frame: u32) -> MovementInput {
    let forward = MovementInput::default().with_move_axis(Vec2::new(0.0, 1.0));
    match frame {
        0..=29 => MovementInput::default(),
        30..=89 => forward,
        90..=299 => MovementInput {
            sprint_held: true,
            ..forward
        },
        _ => forward,
    }
}
