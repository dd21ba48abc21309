//! Guard predicates для locomotion графа.
//!
//! Чистые функции `&LocomotionContext` → bool, пересчитываются каждый tick
//! из свежего snapshot. Hidden state здесь запрещён.

use super::context::LocomotionContext;

/// Порог "держит вперёд" для normalized input
const FORWARD_THRESHOLD: f32 = 0.0;

pub fn is_moving(ctx: &LocomotionContext) -> bool {
    ctx.senses.move_input != bevy::math::Vec2::ZERO
}

pub fn not_moving(ctx: &LocomotionContext) -> bool {
    !is_moving(ctx)
}

pub fn grounded(ctx: &LocomotionContext) -> bool {
    ctx.senses.grounded
}

pub fn not_grounded(ctx: &LocomotionContext) -> bool {
    !grounded(ctx)
}

/// На земле и не летим вверх (завершение импульсных состояний)
pub fn landed(ctx: &LocomotionContext) -> bool {
    grounded(ctx) && ctx.actuator.vertical_speed() <= 0.0
}

pub fn falling(ctx: &LocomotionContext) -> bool {
    ctx.actuator.vertical_speed() < 0.0
}

pub fn sprint_held_and_budget_available(ctx: &LocomotionContext) -> bool {
    ctx.senses.sprint_held && ctx.sprint.is_available()
}

pub fn sprint_released(ctx: &LocomotionContext) -> bool {
    !ctx.senses.sprint_held
}

pub fn budget_exhausted(ctx: &LocomotionContext) -> bool {
    ctx.sprint.is_exhausted()
}

pub fn jump_requested(ctx: &LocomotionContext) -> bool {
    ctx.jump_requested()
}

pub fn holding_forward(ctx: &LocomotionContext) -> bool {
    ctx.senses.move_input.y > FORWARD_THRESHOLD
}

pub fn not_holding_forward(ctx: &LocomotionContext) -> bool {
    !holding_forward(ctx)
}

pub fn holding_backward(ctx: &LocomotionContext) -> bool {
    ctx.senses.move_input.y < 0.0
}

pub fn facing_wall_and_holding_forward(ctx: &LocomotionContext) -> bool {
    ctx.senses.is_facing_wall() && holding_forward(ctx)
}

pub fn not_facing_wall(ctx: &LocomotionContext) -> bool {
    !ctx.senses.is_facing_wall()
}

pub fn vault_candidate_and_holding_forward(ctx: &LocomotionContext) -> bool {
    ctx.senses.is_facing_wall() && ctx.senses.can_vault() && holding_forward(ctx)
}

pub fn no_ledge(ctx: &LocomotionContext) -> bool {
    !ctx.senses.can_vault()
}
