//! Locomotion граф: регистрация 10 состояний + guarded transitions.
//!
//! Порядок transitions внутри source = приоритет (первый открытый guard выигрывает).
//! Any-transitions граф не использует.

use bevy::prelude::*;

use super::context::LocomotionContext;
use super::guards::*;
use super::states::{airborne, grounded, ledge, wall, LocomotionStateId};
use crate::state_machine::StateMachine;

pub type LocomotionStateMachine = StateMachine<LocomotionStateId, LocomotionContext>;

/// Собирает машину с initial = Idle. `start()` вызывает tick system на первом tick.
pub fn build_locomotion_machine() -> LocomotionStateMachine {
    use LocomotionStateId::*;

    let mut machine = StateMachine::new(Idle);

    machine.add_state(Idle, grounded::Idle);
    machine.add_state(Walking, grounded::Walking);
    machine.add_state(Sprinting, grounded::Sprinting);
    machine.add_state(Jumping, grounded::Jumping);
    machine.add_state(Midair, airborne::Midair::default());
    machine.add_state(WallSliding, wall::WallSliding);
    machine.add_state(WallJumping, wall::WallJumping);
    machine.add_state(Vaulting, ledge::Vaulting);
    machine.add_state(LedgeGrabbing, ledge::LedgeGrabbing::default());
    machine.add_state(LedgeClimbing, ledge::LedgeClimbing);

    // Idle
    machine.add_transition(Idle, Midair, not_grounded);
    machine.add_transition(Idle, Jumping, jump_requested);
    machine.add_transition(Idle, Walking, is_moving);

    // Walking
    machine.add_transition(Walking, Midair, not_grounded);
    machine.add_transition(Walking, Jumping, jump_requested);
    machine.add_transition(Walking, Vaulting, vault_candidate_and_holding_forward);
    machine.add_transition(Walking, Idle, not_moving);
    machine.add_transition(Walking, Sprinting, sprint_held_and_budget_available);

    // Sprinting
    machine.add_transition(Sprinting, Midair, not_grounded);
    machine.add_transition(Sprinting, Jumping, jump_requested);
    machine.add_transition(Sprinting, Vaulting, vault_candidate_and_holding_forward);
    machine.add_transition(Sprinting, Idle, not_moving);
    machine.add_transition(Sprinting, Walking, sprint_released);
    machine.add_transition(Sprinting, Walking, budget_exhausted);

    // Jumping
    machine.add_transition(Jumping, Midair, not_grounded);
    machine.add_transition(Jumping, Idle, landed);

    // Midair
    machine.add_transition(Midair, Idle, grounded);
    machine.add_transition(Midair, LedgeGrabbing, vault_candidate_and_holding_forward);
    machine.add_transition(Midair, WallSliding, facing_wall_and_holding_forward);

    // WallSliding
    machine.add_transition(WallSliding, Idle, grounded);
    machine.add_transition(WallSliding, LedgeGrabbing, vault_candidate_and_holding_forward);
    machine.add_transition(WallSliding, WallJumping, jump_requested);
    machine.add_transition(WallSliding, Midair, not_holding_forward);
    machine.add_transition(WallSliding, Midair, not_facing_wall);

    // WallJumping
    machine.add_transition(WallJumping, Midair, not_grounded);

    // Vaulting: дуга не прерывается до начала падения
    machine.add_transition(Vaulting, Idle, landed);
    machine.add_transition(Vaulting, Midair, falling);

    // LedgeGrabbing
    machine.add_transition(LedgeGrabbing, LedgeClimbing, jump_requested);
    machine.add_transition(LedgeGrabbing, Idle, grounded);
    machine.add_transition(LedgeGrabbing, Midair, not_facing_wall);
    machine.add_transition(LedgeGrabbing, Midair, holding_backward);
    machine.add_transition(LedgeGrabbing, Midair, no_ledge);

    // LedgeClimbing
    machine.add_transition(LedgeClimbing, Idle, landed);
    machine.add_transition(LedgeClimbing, Midair, not_facing_wall);
    machine.add_transition(LedgeClimbing, Midair, falling);

    machine
}

/// Component: машина состояний актора (arena + таблица переходов)
#[derive(Component)]
pub struct LocomotionMachine(pub LocomotionStateMachine);

impl Default for LocomotionMachine {
    fn default() -> Self {
        Self(build_locomotion_machine())
    }
}

impl LocomotionMachine {
    pub fn current(&self) -> LocomotionStateId {
        self.0.current()
    }
}

/// Component: зеркало текущего состояния для остальных систем (read-only снаружи)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub struct LocomotionState {
    pub current: LocomotionStateId,
    /// Предыдущее состояние (до последнего перехода)
    pub previous: Option<LocomotionStateId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locomotion::context::{SensedEnvironment, WallHit};
    use crate::state_machine::StateChange;

    const TICK: f32 = 1.0 / 60.0;

    /// В воздухе перед стеной; `ledge_y` - верх уступа (None = глухая стена)
    fn wall_senses(ledge_y: Option<f32>, velocity: Vec3) -> SensedEnvironment {
        SensedEnvironment {
            grounded: false,
            move_input: Vec2::new(0.0, 1.0),
            velocity,
            wall: Some(WallHit {
                point: Vec3::new(0.0, 0.0, -0.5),
                normal: Vec3::Z,
            }),
            vault_landing: ledge_y.map(|y| Vec3::new(0.0, y, -1.0)),
            ..default()
        }
    }

    fn step(
        machine: &mut LocomotionStateMachine,
        ctx: &mut LocomotionContext,
        senses: SensedEnvironment,
    ) -> Option<StateChange<LocomotionStateId>> {
        ctx.refresh(senses, TICK);
        machine.tick(ctx)
    }

    /// Стартует машину и сваливает её в Midair
    fn airborne_machine() -> (LocomotionStateMachine, LocomotionContext) {
        let mut machine = build_locomotion_machine();
        let mut ctx = LocomotionContext::default();
        machine.start(&mut ctx);

        let airborne = SensedEnvironment {
            grounded: false,
            velocity: Vec3::new(0.0, -3.0, 0.0),
            ..default()
        };
        step(&mut machine, &mut ctx, airborne);
        assert_eq!(machine.current(), LocomotionStateId::Midair);

        (machine, ctx)
    }

    #[test]
    fn test_midair_prefers_ledge_grab_over_wall_slide() {
        use LocomotionStateId::*;
        let (mut machine, mut ctx) = airborne_machine();

        let change = step(&mut machine, &mut ctx, wall_senses(Some(1.0), Vec3::new(0.0, -3.0, 0.0)));

        assert_eq!(change, Some(StateChange { from: Midair, to: LedgeGrabbing }));
        // Уступ в полосе хвата: висим без гравитации
        assert!(!ctx.actuator.gravity_enabled());
        assert_eq!(ctx.actuator.velocity().y, 0.0);
    }

    #[test]
    fn test_midair_blank_wall_slides() {
        use LocomotionStateId::*;
        let (mut machine, mut ctx) = airborne_machine();

        let change = step(&mut machine, &mut ctx, wall_senses(None, Vec3::new(0.0, -3.0, 0.0)));

        assert_eq!(change, Some(StateChange { from: Midair, to: WallSliding }));
    }

    #[test]
    fn test_ledge_grab_jump_climbs_and_restores_gravity() {
        use LocomotionStateId::*;
        let (mut machine, mut ctx) = airborne_machine();
        step(&mut machine, &mut ctx, wall_senses(Some(1.0), Vec3::new(0.0, -3.0, 0.0)));
        assert_eq!(machine.current(), LedgeGrabbing);
        assert!(!ctx.actuator.gravity_enabled());

        ctx.request_jump();
        let change = step(&mut machine, &mut ctx, wall_senses(Some(1.0), Vec3::ZERO));

        assert_eq!(change, Some(StateChange { from: LedgeGrabbing, to: LedgeClimbing }));
        assert!(ctx.actuator.gravity_enabled());
        assert_eq!(ctx.actuator.velocity().y, 5.0);
        assert!(!ctx.jump_requested());
    }

    #[test]
    fn test_ledge_climb_lands_in_idle() {
        use LocomotionStateId::*;
        let (mut machine, mut ctx) = airborne_machine();
        step(&mut machine, &mut ctx, wall_senses(Some(1.0), Vec3::ZERO));
        ctx.request_jump();
        step(&mut machine, &mut ctx, wall_senses(Some(1.0), Vec3::ZERO));
        assert_eq!(machine.current(), LedgeClimbing);

        // Ещё поднимаемся у стены - остаёмся в climb
        assert_eq!(
            step(&mut machine, &mut ctx, wall_senses(Some(0.5), Vec3::new(0.0, 4.0, 0.0))),
            None
        );

        let on_top = SensedEnvironment {
            grounded: true,
            move_input: Vec2::new(0.0, 1.0),
            ..default()
        };
        let change = step(&mut machine, &mut ctx, on_top);
        assert_eq!(change, Some(StateChange { from: LedgeClimbing, to: Idle }));
    }

    #[test]
    fn test_ledge_climb_past_wall_goes_midair() {
        use LocomotionStateId::*;
        let (mut machine, mut ctx) = airborne_machine();
        step(&mut machine, &mut ctx, wall_senses(Some(1.0), Vec3::ZERO));
        ctx.request_jump();
        step(&mut machine, &mut ctx, wall_senses(Some(1.0), Vec3::ZERO));

        let cleared = SensedEnvironment {
            grounded: false,
            move_input: Vec2::new(0.0, 1.0),
            velocity: Vec3::new(0.0, 4.0, 0.0),
            ..default()
        };
        let change = step(&mut machine, &mut ctx, cleared);
        assert_eq!(change, Some(StateChange { from: LedgeClimbing, to: Midair }));
    }

    #[test]
    fn test_wall_slide_ledge_grab_beats_wall_jump() {
        use LocomotionStateId::*;
        let (mut machine, mut ctx) = airborne_machine();
        step(&mut machine, &mut ctx, wall_senses(None, Vec3::new(0.0, -3.0, 0.0)));
        assert_eq!(machine.current(), WallSliding);

        ctx.request_jump();
        let change = step(&mut machine, &mut ctx, wall_senses(Some(1.0), Vec3::new(0.0, -1.0, 0.0)));

        assert_eq!(change, Some(StateChange { from: WallSliding, to: LedgeGrabbing }));
        // Latch остаётся для climb на следующем tick
        assert!(ctx.jump_requested());
        let change = step(&mut machine, &mut ctx, wall_senses(Some(1.0), Vec3::ZERO));
        assert_eq!(change, Some(StateChange { from: LedgeGrabbing, to: LedgeClimbing }));
    }

    #[test]
    fn test_wall_slide_jump_without_ledge_wall_jumps() {
        use LocomotionStateId::*;
        let (mut machine, mut ctx) = airborne_machine();
        step(&mut machine, &mut ctx, wall_senses(None, Vec3::new(0.0, -3.0, 0.0)));

        ctx.request_jump();
        let change = step(&mut machine, &mut ctx, wall_senses(None, Vec3::new(0.0, -1.0, 0.0)));

        assert_eq!(change, Some(StateChange { from: WallSliding, to: WallJumping }));
        assert!(ctx.actuator.is_locked_out());
    }

    #[test]
    fn test_ledge_grab_releases_when_pulling_back() {
        use LocomotionStateId::*;
        let (mut machine, mut ctx) = airborne_machine();
        step(&mut machine, &mut ctx, wall_senses(Some(1.0), Vec3::ZERO));
        assert!(!ctx.actuator.gravity_enabled());

        let pulling_back = SensedEnvironment {
            move_input: Vec2::new(0.0, -1.0),
            ..wall_senses(Some(1.0), Vec3::ZERO)
        };
        let change = step(&mut machine, &mut ctx, pulling_back);

        assert_eq!(change, Some(StateChange { from: LedgeGrabbing, to: Midair }));
        assert!(ctx.actuator.gravity_enabled());
    }

    #[test]
    fn test_graph_registers_every_state() {
        let machine = build_locomotion_machine();
        for id in LocomotionStateId::ALL {
            assert!(machine.is_registered(id), "{:?} not registered", id);
        }
        assert_eq!(machine.current(), LocomotionStateId::Idle);
    }

    #[test]
    fn test_graph_transition_counts() {
        use LocomotionStateId::*;

        let machine = build_locomotion_machine();
        let expected = [
            (Idle, 3),
            (Walking, 5),
            (Sprinting, 6),
            (Jumping, 2),
            (Midair, 3),
            (WallSliding, 5),
            (WallJumping, 1),
            (Vaulting, 2),
            (LedgeGrabbing, 5),
            (LedgeClimbing, 3),
        ];
        for (id, count) in expected {
            assert_eq!(machine.transition_count(id), count, "{:?}", id);
        }
        assert_eq!(machine.any_transition_count(), 0);
    }
}
