//! Locomotion states (10 штук) поверх `State<LocomotionContext>`.
//!
//! Группировка:
//! - grounded: Idle, Walking, Sprinting, Jumping
//! - airborne: Midair
//! - wall: WallSliding, WallJumping
//! - ledge: Vaulting, LedgeGrabbing, LedgeClimbing
//!
//! States пишут velocity только через `ctx.actuator`, читают только `ctx.senses`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod airborne;
pub mod grounded;
pub mod ledge;
pub mod wall;


pub use airborne::Midair;
pub use grounded::{Idle, Jumping, Sprinting, Walking};
pub use ledge::{LedgeClimbing, LedgeGrabbing, Vaulting};
pub use wall::{WallJumping, WallSliding};

/// Идентификатор locomotion состояния (ключ таблицы переходов)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum LocomotionStateId {
    #[default]
    Idle,
    Walking,
    Sprinting,
    Jumping,
    Midair,
    WallSliding,
    WallJumping,
    Vaulting,
    LedgeGrabbing,
    LedgeClimbing,
}

impl LocomotionStateId {
    pub const ALL: [Self; 10] = [
        Self::Idle,
        Self::Walking,
        Self::Sprinting,
        Self::Jumping,
        Self::Midair,
        Self::WallSliding,
        Self::WallJumping,
        Self::Vaulting,
        Self::LedgeGrabbing,
        Self::LedgeClimbing,
    ];
}
