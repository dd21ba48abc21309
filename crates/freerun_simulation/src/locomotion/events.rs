//! Locomotion events (input edge in, cosmetic/progress signals out)

use bevy::prelude::*;

use super::states::LocomotionStateId;

/// Event: нажатие прыжка (edge, не level)
///
/// Генерируется:
/// - Player input system (Space key)
/// - Scripted input (headless runner, тесты)
///
/// Обрабатывается:
/// - latch_jump_intents: взводит jump latch в LocomotionContext
#[derive(Event, Debug, Clone)]
pub struct JumpIntent {
    pub entity: Entity,
}

/// Event: sprint FX on/off (FOV widen / narrow на стороне камеры)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct SprintFxToggled {
    pub entity: Entity,
    pub active: bool,
}

/// Event: изменился sprint budget (normalized [0, 1], для UI)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct SprintBudgetChanged {
    pub entity: Entity,
    pub fraction: f32,
}

/// Event: смена locomotion состояния (анимации, звук, аналитика)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct LocomotionStateChanged {
    pub entity: Entity,
    pub from: LocomotionStateId,
    pub to: LocomotionStateId,
}
