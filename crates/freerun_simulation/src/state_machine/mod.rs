//! Generic transition-driven state machine
//!
//! State-agnostic: никаких зависимостей от locomotion.
//! Locomotion граф собирается в `crate::locomotion::graph`.

pub mod machine;


pub use machine::{Guard, State, StateChange, StateMachine, Transition};
