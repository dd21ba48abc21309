//! Physics simulation module
//!
//! Headless kinematic слой + spatial probe для locomotion.
//! Rapier используется только как sync target (Velocity / GravityScale).

pub mod movement;
pub mod probe;

// Re-export основных типов
pub use movement::{KinematicController, KinematicControllerPlugin, PhysicsBody};
pub use probe::{Block, LevelGeometry, SpatialProbe};
