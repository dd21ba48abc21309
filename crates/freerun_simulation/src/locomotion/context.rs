//! Movement context: sensed snapshot + actuator + sprint budget + signals.
//!
//! Архитектура:
//! - `sense_environment` перезаписывает snapshot каждый tick (read-only для states)
//! - states пишут velocity только через `Actuator`
//! - deferred эффекты (lockout, vertical reset) - countdown таймеры, тикаются до machine tick
//! - signals (FX, budget progress) копятся в outbox → Bevy events в `emit_locomotion_events`

use bevy::prelude::*;

use super::config::LocomotionConfig;
use super::math::{local_to_world, world_to_local};
use super::sprint::SprintBudget;

/// Точка попадания wall check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    pub point: Vec3,
    pub normal: Vec3,
}

/// Per-tick snapshot окружения и input (заполняется до machine tick)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensedEnvironment {
    pub grounded: bool,
    /// Some - смотрим в стену в пределах wall_check_distance
    pub wall: Option<WallHit>,
    /// Some - за стеной есть достижимая точка приземления (can vault)
    pub vault_landing: Option<Vec3>,
    /// Normalized move axis: x = right, y = forward
    pub move_input: Vec2,
    pub look_delta: Vec2,
    pub sprint_held: bool,
    /// Центр тела (world)
    pub position: Vec3,
    pub rotation: Quat,
    /// Velocity тела на начало tick (world)
    pub velocity: Vec3,
}

impl Default for SensedEnvironment {
    fn default() -> Self {
        Self {
            grounded: true,
            wall: None,
            vault_landing: None,
            move_input: Vec2::ZERO,
            look_delta: Vec2::ZERO,
            sprint_held: false,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
        }
    }
}

impl SensedEnvironment {
    pub fn is_facing_wall(&self) -> bool {
        self.wall.is_some()
    }

    pub fn can_vault(&self) -> bool {
        self.vault_landing.is_some()
    }
}

/// Actuation sink: velocity command + gravity + lockout.
///
/// `velocity` - актуальная world velocity внутри tick: запись сразу видна следующим чтениям.
/// Пока активен lockout, set_velocity_* - no-op.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Actuator {
    velocity: Vec3,
    rotation: Quat,
    gravity_enabled: bool,
    lockout_remaining: f32,
    vertical_reset_in: Option<f32>,
    snap_target: Option<Vec3>,
    velocity_dirty: bool,
}

impl Default for Actuator {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            gravity_enabled: true,
            lockout_remaining: 0.0,
            vertical_reset_in: None,
            snap_target: None,
            velocity_dirty: false,
        }
    }
}

impl Actuator {
    /// Синхронизация с телом на начало tick
    pub fn sync(&mut self, velocity: Vec3, rotation: Quat) {
        self.velocity = velocity;
        self.rotation = rotation;
        self.velocity_dirty = false;
        self.snap_target = None;
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Velocity в local axes (right, up, forward)
    pub fn local_velocity(&self) -> Vec3 {
        world_to_local(self.rotation, self.velocity)
    }

    /// Local vertical component
    pub fn vertical_speed(&self) -> f32 {
        self.local_velocity().y
    }

    pub fn set_velocity_local(&mut self, x: f32, y: f32, z: f32) -> bool {
        let world = local_to_world(self.rotation, Vec3::new(x, y, z));
        self.set_velocity_world(world.x, world.y, world.z)
    }

    pub fn set_velocity_world(&mut self, x: f32, y: f32, z: f32) -> bool {
        if self.is_locked_out() {
            return false;
        }
        self.velocity = Vec3::new(x, y, z);
        self.velocity_dirty = true;
        true
    }

    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
    }

    pub fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    /// Мгновенное перемещение (vault на близкий уступ)
    pub fn snap_to(&mut self, position: Vec3) {
        self.snap_target = Some(position);
    }

    pub fn lock_for(&mut self, seconds: f32) {
        self.lockout_remaining = self.lockout_remaining.max(seconds);
    }

    pub fn is_locked_out(&self) -> bool {
        self.lockout_remaining > 0.0
    }

    pub fn lockout_remaining(&self) -> f32 {
        self.lockout_remaining
    }

    /// Обнулить vertical velocity через `seconds`
    pub fn schedule_vertical_reset(&mut self, seconds: f32) {
        self.vertical_reset_in = Some(seconds);
    }

    pub fn vertical_reset_in(&self) -> Option<f32> {
        self.vertical_reset_in
    }

    /// Countdown deferred эффектов. Вызывается раз в tick до machine tick.
    pub fn advance_timers(&mut self, delta: f32) {
        if self.lockout_remaining > 0.0 {
            self.lockout_remaining = (self.lockout_remaining - delta).max(0.0);
        }

        if let Some(remaining) = self.vertical_reset_in {
            let remaining = remaining - delta;
            if remaining <= 0.0 {
                // Запланированный reset, lockout его не блокирует
                self.vertical_reset_in = None;
                self.velocity.y = 0.0;
                self.velocity_dirty = true;
            } else {
                self.vertical_reset_in = Some(remaining);
            }
        }
    }

    /// Команда для тела: Some если velocity писали в этом tick
    pub fn take_velocity_command(&mut self) -> Option<Vec3> {
        std::mem::take(&mut self.velocity_dirty).then_some(self.velocity)
    }

    pub fn take_snap_target(&mut self) -> Option<Vec3> {
        self.snap_target.take()
    }
}

/// Сигналы наружу (fire-and-forget)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocomotionSignal {
    /// Sprint FX on/off (FOV widen / narrow)
    SprintFx(bool),
    /// Normalized sprint budget [0, 1]
    SprintBudget(f32),
}

/// Контекст одного актора. Принадлежит entity, мутируется только в его tick.
#[derive(Component, Debug, Clone)]
pub struct LocomotionContext {
    pub config: LocomotionConfig,
    pub senses: SensedEnvironment,
    pub actuator: Actuator,
    pub sprint: SprintBudget,
    jump_requested: bool,
    delta: f32,
    signals: Vec<LocomotionSignal>,
}

impl Default for LocomotionContext {
    fn default() -> Self {
        Self::new(LocomotionConfig::default())
    }
}

impl LocomotionContext {
    pub fn new(config: LocomotionConfig) -> Self {
        let sprint = SprintBudget::from_config(&config);
        Self {
            config,
            senses: SensedEnvironment::default(),
            actuator: Actuator::default(),
            sprint,
            jump_requested: false,
            delta: 0.0,
            signals: Vec::new(),
        }
    }

    /// Начало tick: новый snapshot + синхронизация actuator с телом
    pub fn refresh(&mut self, senses: SensedEnvironment, delta: f32) {
        self.senses = senses;
        self.delta = delta;
        self.actuator.sync(senses.velocity, senses.rotation);
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Move vector = input * move_speed (x = right, y = forward)
    pub fn move_vector(&self) -> Vec2 {
        self.senses.move_input * self.config.move_speed
    }

    /// Jump edge → latch (держится до consume состоянием)
    pub fn request_jump(&mut self) {
        self.jump_requested = true;
    }

    pub fn jump_requested(&self) -> bool {
        self.jump_requested
    }

    pub fn consume_jump(&mut self) {
        self.jump_requested = false;
    }

    pub fn signal(&mut self, signal: LocomotionSignal) {
        self.signals.push(signal);
    }

    pub fn drain_signals(&mut self) -> std::vec::Drain<'_, LocomotionSignal> {
        self.signals.drain(..)
    }

    /// Sprint budget tick; сигнал progress при любом изменении
    pub fn advance_sprint(&mut self, sprinting: bool) {
        if self.sprint.advance(sprinting, self.delta) {
            let fraction = self.sprint.fraction();
            self.signal(LocomotionSignal::SprintBudget(fraction));
        }
    }
}
