//! Locomotion domain - state machine движения runner
//!
//! Содержит:
//! - LocomotionConfig (tuning, RON)
//! - LocomotionContext (snapshot + actuator + sprint budget)
//! - 10 состояний + guards + граф переходов
//! - ECS systems и events
//!
//! Архитектура:
//! - Plain Rust ядро (context, states, graph) тестируется без ECS
//! - ECS слой только доставляет input/probe в контекст и применяет команды к телу

use bevy::prelude::*;
use std::marker::PhantomData;

pub mod config;
pub mod context;
pub mod events;
pub mod graph;
pub mod guards;
pub mod math;
pub mod sprint;
pub mod states;
pub mod systems;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod sprint_tests;

pub use config::{ConfigError, GroundProbe, LocomotionConfig};
pub use context::{Actuator, LocomotionContext, LocomotionSignal, SensedEnvironment, WallHit};
pub use events::{JumpIntent, LocomotionStateChanged, SprintBudgetChanged, SprintFxToggled};
pub use graph::{build_locomotion_machine, LocomotionMachine, LocomotionState, LocomotionStateMachine};
pub use sprint::SprintBudget;
pub use states::LocomotionStateId;
pub use systems::*;

use crate::physics::{LevelGeometry, SpatialProbe};

/// Plugin locomotion.
///
/// `P` - реализация spatial queries (headless: `LevelGeometry`).
pub struct LocomotionPlugin<P: SpatialProbe + Resource = LevelGeometry> {
    _probe: PhantomData<fn() -> P>,
}

impl<P: SpatialProbe + Resource> Default for LocomotionPlugin<P> {
    fn default() -> Self {
        Self {
            _probe: PhantomData,
        }
    }
}

impl<P: SpatialProbe + Resource> Plugin for LocomotionPlugin<P> {
    fn build(&self, app: &mut App) {
        app.add_event::<JumpIntent>()
            .add_event::<SprintFxToggled>()
            .add_event::<SprintBudgetChanged>()
            .add_event::<LocomotionStateChanged>()
            .register_type::<LocomotionState>()
            .register_type::<LocomotionStateId>()
            .register_type::<LocomotionConfig>()
            .add_systems(
                FixedUpdate,
                (
                    apply_look_yaw,
                    latch_jump_intents,
                    sense_environment::<P>,
                    tick_locomotion,
                    apply_velocity_commands,
                    emit_locomotion_events,
                )
                    .chain()
                    .in_set(crate::SimulationSet::Locomotion),
            );

        crate::log_info("LocomotionPlugin initialized");
    }
}
