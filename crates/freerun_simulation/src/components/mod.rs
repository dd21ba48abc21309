//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - runner: locomotion актор (Runner, MovementInput)
//!
//! Locomotion / physics компоненты живут в своих модулях
//! (`crate::locomotion`, `crate::physics`).

pub mod runner;

// Re-exports для удобного импорта
pub use runner::*;
