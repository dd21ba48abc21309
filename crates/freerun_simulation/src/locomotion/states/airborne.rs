//! Midair: ограниченный air control.
//!
//! Cap фиксируется при входе: max(|v|, move_speed) по world X и Z.
//! Input ускоряет горизонталь на move vector * air_control * dt, не выходя за cap.
//! Vertical не трогаем (гравитация).

use bevy::prelude::*;

use crate::locomotion::context::LocomotionContext;
use crate::locomotion::math::{clamp_symmetric, planar_direction};
use crate::state_machine::State;

#[derive(Debug, Default)]
pub struct Midair {
    /// Per-axis cap (world X / Z), y не используется
    velocity_cap: Vec3,
}

impl Midair {
    pub fn velocity_cap(&self) -> Vec3 {
        self.velocity_cap
    }
}

impl State<LocomotionContext> for Midair {
    fn on_enter(&mut self, ctx: &mut LocomotionContext) {
        let velocity = ctx.actuator.velocity();
        let move_speed = ctx.config.move_speed;
        self.velocity_cap = Vec3::new(
            velocity.x.abs().max(move_speed),
            velocity.y,
            velocity.z.abs().max(move_speed),
        );
    }

    fn tick(&mut self, ctx: &mut LocomotionContext) {
        // Jump в воздухе не копится
        ctx.consume_jump();

        if ctx.senses.move_input == Vec2::ZERO {
            return;
        }

        let direction = planar_direction(ctx.senses.rotation, ctx.move_vector());
        let step = ctx.config.air_control * ctx.delta();
        let velocity = ctx.actuator.velocity();

        let x = clamp_symmetric(velocity.x + direction.x * step, self.velocity_cap.x);
        let z = clamp_symmetric(velocity.z + direction.z * step, self.velocity_cap.z);
        ctx.actuator.set_velocity_world(x, velocity.y, z);
    }
}
