//! FREERUN Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: locomotion state machine для runner.
//!
//! Слои:
//! - state_machine - generic transition engine (ничего не знает о locomotion)
//! - locomotion - 10 состояний, guards, граф, context, ECS systems
//! - physics - headless kinematic слой + spatial probe (Rapier как sync target)

use bevy::prelude::*;

// Публичные модули
pub mod components;
pub mod locomotion;
pub mod logger;
pub mod physics;
pub mod state_machine;

// Re-export базовых компонентов для удобства
pub use components::*;
pub use locomotion::{
    JumpIntent, LocomotionConfig, LocomotionContext, LocomotionMachine, LocomotionPlugin,
    LocomotionState, LocomotionStateChanged, LocomotionStateId, SprintBudgetChanged,
    SprintFxToggled,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use physics::{Block, KinematicController, KinematicControllerPlugin, LevelGeometry, PhysicsBody};

/// Порядок внутри FixedUpdate: locomotion решает → physics интегрирует
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Locomotion,
    Physics,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Пустой уровень по умолчанию (тесты/runner подменяют)
            .init_resource::<LevelGeometry>()
            .register_type::<LevelGeometry>()
            .configure_sets(
                FixedUpdate,
                (SimulationSet::Locomotion, SimulationSet::Physics).chain(),
            )
            .add_plugins((
                LocomotionPlugin::<LevelGeometry>::default(),
                KinematicControllerPlugin,
            ));
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    let mut snapshot = Vec::new();
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
