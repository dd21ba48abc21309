//! Runner: актор с locomotion state machine

use bevy::prelude::*;

use crate::locomotion::{LocomotionConfig, LocomotionContext, LocomotionMachine, LocomotionState};
use crate::physics::{KinematicController, PhysicsBody};

/// Runner - маркер актора, управляемого locomotion
///
/// Автоматически добавляет тело, контроллер, input и машину через Required Components.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(
    Transform,
    PhysicsBody,
    KinematicController,
    MovementInput,
    LocomotionContext,
    LocomotionMachine,
    LocomotionState
)]
pub struct Runner;

/// Входные данные движения (level, не edge)
///
/// Для headless тестов - mock input через этот компонент.
/// Для игры - заполняется из input action map.
/// Jump - отдельный edge event (`JumpIntent`).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MovementInput {
    /// Normalized move axis: x = right, y = forward
    pub move_axis: Vec2,
    /// Look delta за tick (x = yaw)
    pub look_delta: Vec2,
    /// Sprint held
    pub sprint_held: bool,
}

impl MovementInput {
    /// Нормализует ось движения (диагональ не быстрее прямой)
    pub fn with_move_axis(mut self, axis: Vec2) -> Self {
        self.move_axis = if axis.length_squared() > 1.0 {
            axis.normalize()
        } else {
            axis
        };
        self
    }
}

/// Spawn helper для runner
///
/// Создает entity с полным набором компонентов (через Required Components)
/// и заданным config. Gravity и размеры тела копируются в KinematicController.
pub fn spawn_runner(commands: &mut Commands, position: Vec3, config: LocomotionConfig) -> Entity {
    commands
        .spawn((
            Runner,
            Transform::from_translation(position),
            KinematicController {
                gravity: config.gravity,
                half_height: config.body_half_height,
                radius: config.body_radius,
                ..default()
            },
            LocomotionContext::new(config),
        ))
        .id()
}
