//! Locomotion ECS systems (FixedUpdate, chained)
//!
//! Pipeline одного tick:
//! 1. apply_look_yaw - поворот вокруг world-up
//! 2. latch_jump_intents - JumpIntent → jump latch
//! 3. sense_environment - snapshot (input + transform + body + SpatialProbe)
//! 4. tick_locomotion - таймеры → machine tick → sprint budget → зеркало состояния
//! 5. apply_velocity_commands - actuator → PhysicsBody / KinematicController / Transform
//! 6. emit_locomotion_events - signals → Bevy events

use bevy::prelude::*;

use super::context::{LocomotionContext, LocomotionSignal, SensedEnvironment};
use super::events::{JumpIntent, LocomotionStateChanged, SprintBudgetChanged, SprintFxToggled};
use super::graph::{LocomotionMachine, LocomotionState};
use super::math::local_to_world;
use super::states::LocomotionStateId;
use crate::components::MovementInput;
use crate::physics::{KinematicController, PhysicsBody, SpatialProbe};

/// Yaw от look delta (pitch - забота камеры)
pub fn apply_look_yaw(mut query: Query<(&MovementInput, &LocomotionContext, &mut Transform)>) {
    for (input, ctx, mut transform) in query.iter_mut() {
        if input.look_delta.x != 0.0 {
            // Мышь вправо → поворот вправо (по часовой сверху)
            transform.rotate_y(-input.look_delta.x * ctx.config.look_sensitivity);
        }
    }
}

/// JumpIntent (edge) → latch. Latch сбрасывает только потребляющее состояние.
pub fn latch_jump_intents(
    mut intents: EventReader<JumpIntent>,
    mut query: Query<&mut LocomotionContext>,
) {
    for intent in intents.read() {
        match query.get_mut(intent.entity) {
            Ok(mut ctx) => ctx.request_jump(),
            Err(_) => crate::log_warning(&format!(
                "JumpIntent for {:?} ignored: entity has no LocomotionContext",
                intent.entity
            )),
        }
    }
}

/// Snapshot окружения на начало tick
pub fn sense_environment<P: SpatialProbe + Resource>(
    probe: Res<P>,
    time: Res<Time<Fixed>>,
    mut query: Query<(&MovementInput, &Transform, &PhysicsBody, &mut LocomotionContext)>,
) {
    let delta = time.delta_secs();

    for (input, transform, body, mut ctx) in query.iter_mut() {
        let position = transform.translation;
        let rotation = transform.rotation;
        let forward = local_to_world(rotation, Vec3::Z);

        let grounded = probe.probe_ground(position, &ctx.config);
        let wall = probe.probe_wall(position, forward, ctx.config.wall_check_distance);
        let vault_landing =
            wall.and_then(|hit| probe.probe_vault_landing(position, &hit, &ctx.config));

        let senses = SensedEnvironment {
            grounded,
            wall,
            vault_landing,
            move_input: input.move_axis,
            look_delta: input.look_delta,
            sprint_held: input.sprint_held,
            position,
            rotation,
            velocity: body.velocity,
        };
        ctx.refresh(senses, delta);
    }
}

/// Machine tick для каждого runner
pub fn tick_locomotion(
    mut query: Query<(
        Entity,
        &mut LocomotionMachine,
        &mut LocomotionContext,
        &mut LocomotionState,
    )>,
    mut changes: EventWriter<LocomotionStateChanged>,
) {
    for (entity, mut machine, mut ctx, mut state) in query.iter_mut() {
        let ctx = &mut *ctx;
        let machine = &mut machine.0;

        // Deferred эффекты (lockout, vault vertical reset) до guards
        let delta = ctx.delta();
        ctx.actuator.advance_timers(delta);

        if !machine.is_started() {
            machine.start(ctx);
        }

        if let Some(change) = machine.tick(ctx) {
            changes.write(LocomotionStateChanged {
                entity,
                from: change.from,
                to: change.to,
            });
            state.previous = Some(change.from);
        }

        let current = machine.current();
        if state.current != current {
            state.current = current;
        }

        let had_budget = ctx.sprint.is_available();
        ctx.advance_sprint(current == LocomotionStateId::Sprinting);
        if had_budget && ctx.sprint.is_exhausted() {
            crate::log_info(&format!("{:?}: sprint budget exhausted", entity));
        }
    }
}

/// Actuator → тело
pub fn apply_velocity_commands(
    mut query: Query<(
        &mut LocomotionContext,
        &mut PhysicsBody,
        &mut KinematicController,
        &mut Transform,
    )>,
) {
    for (mut ctx, mut body, mut controller, mut transform) in query.iter_mut() {
        if let Some(velocity) = ctx.actuator.take_velocity_command() {
            body.velocity = velocity;
        }

        let gravity_enabled = ctx.actuator.gravity_enabled();
        if controller.gravity_enabled != gravity_enabled {
            controller.gravity_enabled = gravity_enabled;
        }

        if let Some(target) = ctx.actuator.take_snap_target() {
            crate::log(&format!("Snap to {:?}", target));
            transform.translation = target;
        }
    }
}

/// Signals из контекста → Bevy events (FX, budget progress)
pub fn emit_locomotion_events(
    mut query: Query<(Entity, &mut LocomotionContext)>,
    mut fx: EventWriter<SprintFxToggled>,
    mut budget: EventWriter<SprintBudgetChanged>,
) {
    for (entity, mut ctx) in query.iter_mut() {
        for signal in ctx.drain_signals() {
            match signal {
                LocomotionSignal::SprintFx(active) => {
                    fx.write(SprintFxToggled { entity, active });
                }
                LocomotionSignal::SprintBudget(fraction) => {
                    budget.write(SprintBudgetChanged { entity, fraction });
                }
            }
        }
    }
}
