//! Ledge states: Vaulting, LedgeGrabbing, LedgeClimbing.
//!
//! Все три читают `senses.vault_landing` - верхнюю точку препятствия за стеной.

use bevy::prelude::*;

use crate::locomotion::context::LocomotionContext;
use crate::locomotion::math::{distance_along_normal, vault_arc};
use crate::state_machine::State;

/// Перепрыгивание невысокого препятствия по ballistic arc.
///
/// - стена ближе `min_vault_distance` → snap на уступ
/// - иначе launch speed рассчитан так, чтобы через t оказаться на высоте уступа + clearance;
///   vertical velocity обнуляется через t (deferred в actuator)
#[derive(Debug, Default)]
pub struct Vaulting;

impl State<LocomotionContext> for Vaulting {
    fn on_enter(&mut self, ctx: &mut LocomotionContext) {
        let (Some(wall), Some(landing)) = (ctx.senses.wall, ctx.senses.vault_landing) else {
            crate::log_warning("Vaulting entered without wall/landing, skipping arc");
            return;
        };

        let position = ctx.senses.position;
        let distance = distance_along_normal(position, wall.point, wall.normal);

        if distance <= ctx.config.min_vault_distance {
            ctx.actuator.snap_to(Vec3::new(
                position.x,
                landing.y + ctx.config.vault_clearance,
                position.z,
            ));
            return;
        }

        let velocity = ctx.actuator.velocity();
        // Стоячий / медленный подход - считаем от move_speed
        let approach_speed = velocity.length().max(ctx.config.move_speed);
        let height_delta = landing.y - position.y + ctx.config.vault_clearance;
        let arc = vault_arc(
            distance,
            approach_speed,
            height_delta,
            ctx.config.gravity,
            ctx.delta(),
        );

        ctx.actuator
            .set_velocity_world(velocity.x, arc.launch_speed, velocity.z);
        ctx.actuator.schedule_vertical_reset(arc.flight_time);
    }
}

/// Висим на уступе.
///
/// Хват срабатывает один раз, когда верх уступа в полосе
/// (ledge_grab_min_offset, vault_height) над центром тела: гравитация off, vertical = 0.
#[derive(Debug, Default)]
pub struct LedgeGrabbing {
    grabbed: bool,
}

impl LedgeGrabbing {
    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }
}

impl State<LocomotionContext> for LedgeGrabbing {
    fn on_enter(&mut self, _ctx: &mut LocomotionContext) {
        self.grabbed = false;
    }

    fn tick(&mut self, ctx: &mut LocomotionContext) {
        if !self.grabbed {
            if let Some(ledge) = ctx.senses.vault_landing {
                let offset = ledge.y - ctx.senses.position.y;
                if offset > ctx.config.ledge_grab_min_offset && offset < ctx.config.vault_height {
                    self.grabbed = true;
                    ctx.actuator.set_gravity_enabled(false);
                }
            }
        }

        let strafe = ctx.senses.move_input.x * ctx.config.horizontal_wall_slide_speed;
        let vertical = if self.grabbed {
            0.0
        } else {
            ctx.actuator.vertical_speed()
        };
        ctx.actuator.set_velocity_local(strafe, vertical, 0.0);
    }

    fn on_exit(&mut self, ctx: &mut LocomotionContext) {
        ctx.actuator.set_gravity_enabled(true);
        self.grabbed = false;
    }
}

/// Подтягивание: один вертикальный импульс `ledge_climb_speed`
#[derive(Debug, Default)]
pub struct LedgeClimbing;

impl State<LocomotionContext> for LedgeClimbing {
    fn on_enter(&mut self, ctx: &mut LocomotionContext) {
        let velocity = ctx.actuator.velocity();
        ctx.actuator
            .set_velocity_world(velocity.x, ctx.config.ledge_climb_speed, velocity.z);
        ctx.consume_jump();
    }
}
