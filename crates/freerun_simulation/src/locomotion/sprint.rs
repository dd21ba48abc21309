//! Sprint budget (stamina для спринта)
//!
//! - Тратится 1 unit/sec пока активен Sprinting
//! - После спринта ждём `regeneration_delay`, потом регенерация `regeneration_rate`/sec
//! - Инвариант: 0.0 ≤ remaining ≤ max

use bevy::prelude::*;

use super::config::LocomotionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct SprintBudget {
    remaining: f32,
    max: f32,
    regeneration_delay: f32,
    regeneration_rate: f32,
    /// Сколько ещё ждать до начала регенерации
    delay_left: f32,
}

impl SprintBudget {
    pub fn new(max: f32, regeneration_delay: f32, regeneration_rate: f32) -> Self {
        Self {
            remaining: max,
            max,
            regeneration_delay,
            regeneration_rate,
            delay_left: regeneration_delay,
        }
    }

    pub fn from_config(config: &LocomotionConfig) -> Self {
        Self::new(
            config.sprint_duration,
            config.sprint_regeneration_delay,
            config.sprint_regeneration_rate,
        )
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn delay_left(&self) -> f32 {
        self.delay_left
    }

    /// Normalized [0, 1] для UI
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.remaining / self.max
        } else {
            0.0
        }
    }

    pub fn is_available(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn is_exhausted(&self) -> bool {
        !self.is_available()
    }

    /// Один tick. Возвращает true если remaining изменился.
    pub fn advance(&mut self, sprinting: bool, delta: f32) -> bool {
        let before = self.remaining;

        if sprinting {
            // Спринт сбрасывает задержку регенерации
            self.delay_left = self.regeneration_delay;
            self.remaining = (self.remaining - delta).max(0.0);
        } else if self.remaining < self.max {
            if self.delay_left > 0.0 {
                self.delay_left -= delta;
            } else {
                self.delay_left = 0.0;
                self.remaining = (self.remaining + self.regeneration_rate * delta).min(self.max);
            }
        }

        self.remaining != before
    }
}
