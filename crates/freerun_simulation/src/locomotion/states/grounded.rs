//! Ground states: Idle, Walking, Sprinting, Jumping.

use crate::locomotion::context::{LocomotionContext, LocomotionSignal};
use crate::state_machine::State;

/// Стоим: гасим горизонтальную скорость, вертикаль оставляем гравитации
#[derive(Debug, Default)]
pub struct Idle;

impl State<LocomotionContext> for Idle {
    fn on_enter(&mut self, ctx: &mut LocomotionContext) {
        let vertical = ctx.actuator.vertical_speed();
        ctx.actuator.set_velocity_local(0.0, vertical, 0.0);
    }
}

/// Ходьба: local velocity = move vector (x = right, z = forward)
#[derive(Debug, Default)]
pub struct Walking;

impl State<LocomotionContext> for Walking {
    fn tick(&mut self, ctx: &mut LocomotionContext) {
        let move_vector = ctx.move_vector();
        let vertical = ctx.actuator.vertical_speed();
        ctx.actuator
            .set_velocity_local(move_vector.x, vertical, move_vector.y);
    }
}

/// Спринт: move vector * sprint_multiplier, FX на время состояния.
///
/// Budget тратится снаружи (`LocomotionContext::advance_sprint`) пока Sprinting активен.
#[derive(Debug, Default)]
pub struct Sprinting;

impl State<LocomotionContext> for Sprinting {
    fn on_enter(&mut self, ctx: &mut LocomotionContext) {
        ctx.signal(LocomotionSignal::SprintFx(true));
    }

    fn tick(&mut self, ctx: &mut LocomotionContext) {
        let move_vector = ctx.move_vector() * ctx.config.sprint_multiplier;
        let vertical = ctx.actuator.vertical_speed();
        ctx.actuator
            .set_velocity_local(move_vector.x, vertical, move_vector.y);
    }

    fn on_exit(&mut self, ctx: &mut LocomotionContext) {
        ctx.signal(LocomotionSignal::SprintFx(false));
    }
}

/// Прыжок: один импульс вверх при входе, дальше гравитация
#[derive(Debug, Default)]
pub struct Jumping;

impl State<LocomotionContext> for Jumping {
    fn on_enter(&mut self, ctx: &mut LocomotionContext) {
        let velocity = ctx.actuator.velocity();
        ctx.actuator.set_velocity_world(
            velocity.x,
            velocity.y + ctx.config.jump_speed,
            velocity.z,
        );
        ctx.consume_jump();
    }
}
