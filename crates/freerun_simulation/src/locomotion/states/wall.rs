//! Wall states: WallSliding, WallJumping.

use crate::locomotion::context::LocomotionContext;
use crate::state_machine::State;

/// Скольжение по стене: медленный спуск + strafe вдоль стены
#[derive(Debug, Default)]
pub struct WallSliding;

impl State<LocomotionContext> for WallSliding {
    fn tick(&mut self, ctx: &mut LocomotionContext) {
        let strafe = ctx.senses.move_input.x * ctx.config.horizontal_wall_slide_speed;
        ctx.actuator
            .set_velocity_local(strafe, -ctx.config.wall_slide_speed, 0.0);
    }
}

/// Отталкивание от стены: импульс вверх и назад, потом lockout input.
///
/// Lockout живёт в actuator и истекает через `wall_jump_duration`
/// независимо от того, в каком состоянии актор к тому моменту.
#[derive(Debug, Default)]
pub struct WallJumping;

impl State<LocomotionContext> for WallJumping {
    fn on_enter(&mut self, ctx: &mut LocomotionContext) {
        ctx.actuator.set_velocity_local(
            0.0,
            ctx.config.wall_jump_up_speed,
            -ctx.config.wall_jump_out_speed,
        );
        ctx.consume_jump();
        ctx.actuator.lock_for(ctx.config.wall_jump_duration);
    }
}
