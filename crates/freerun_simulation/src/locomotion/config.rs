//! Параметры locomotion (скорости, тайминги, probe distances).
//!
//! Default значения - baseline для runner (метры, секунды).
//! Загрузка из RON: `LocomotionConfig::from_ron_str` / `LocomotionConfig::load`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Ошибки загрузки/валидации конфига
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse locomotion config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid locomotion config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Ground check (sphere cast вниз от центра тела)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundProbe {
    pub radius: f32,
    pub distance: f32,
}

impl Default for GroundProbe {
    fn default() -> Self {
        Self {
            radius: 0.3,
            distance: 0.7, // нижняя точка probe = 1.0м от центра (ноги на 0.9м)
        }
    }
}

/// Locomotion tuning
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Базовая скорость ходьбы (m/s), input (0,1) → forward * move_speed
    pub move_speed: f32,
    /// Вертикальный импульс прыжка (m/s)
    pub jump_speed: f32,
    /// Air control: ускорение в воздухе = move vector * air_control
    pub air_control: f32,
    /// Множитель sprint, допустимо [1, 2]
    pub sprint_multiplier: f32,

    /// Sprint budget (секунды спринта)
    pub sprint_duration: f32,
    /// Задержка перед регенерацией после спринта (секунды)
    pub sprint_regeneration_delay: f32,
    /// Скорость регенерации (секунд budget в секунду)
    pub sprint_regeneration_rate: f32,

    /// Lockout управления после wall jump (секунды)
    pub wall_jump_duration: f32,
    /// Wall jump: перпендикулярно от стены
    pub wall_jump_out_speed: f32,
    /// Wall jump: вверх вдоль стены
    pub wall_jump_up_speed: f32,
    /// Скорость сползания по стене (вниз)
    pub wall_slide_speed: f32,
    /// Горизонтальная скорость вдоль стены / ledge
    pub horizontal_wall_slide_speed: f32,

    /// Максимальная высота препятствия для vault / ledge grab (над центром тела)
    pub vault_height: f32,
    /// Ближе этой дистанции vault превращается в snap на уступ
    pub min_vault_distance: f32,
    /// Запас по высоте над точкой приземления
    pub vault_clearance: f32,
    /// Нижняя граница ledge offset для grab
    pub ledge_grab_min_offset: f32,
    /// Вертикальная скорость подъёма на уступ
    pub ledge_climb_speed: f32,

    /// Гравитация (m/s², со знаком)
    pub gravity: f32,
    /// Yaw: радиан на единицу look delta
    pub look_sensitivity: f32,

    pub ground_probe: GroundProbe,
    /// Длина луча wall check (вперёд от центра)
    pub wall_check_distance: f32,
    /// Насколько за стеной ищем точку приземления
    pub vault_probe_depth: f32,

    /// Половина высоты тела (центр → ноги)
    pub body_half_height: f32,
    pub body_radius: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            jump_speed: 5.0,
            air_control: 0.8,
            sprint_multiplier: 1.5,

            sprint_duration: 2.0,
            sprint_regeneration_delay: 1.0,
            sprint_regeneration_rate: 1.0,

            wall_jump_duration: 0.4,
            wall_jump_out_speed: 4.0,
            wall_jump_up_speed: 6.0,
            wall_slide_speed: 1.0,
            horizontal_wall_slide_speed: 2.0,

            vault_height: 1.5,
            min_vault_distance: 0.3,
            vault_clearance: 1.0,
            ledge_grab_min_offset: 0.5,
            ledge_climb_speed: 5.0,

            gravity: -9.81, // Earth gravity
            look_sensitivity: 0.01,

            ground_probe: GroundProbe::default(),
            wall_check_distance: 0.8,
            vault_probe_depth: 0.5,

            body_half_height: 0.9,
            body_radius: 0.4,
        }
    }
}

impl LocomotionConfig {
    /// Парсинг + валидация
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be positive",
                })
            }
        }

        fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value >= 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must not be negative",
                })
            }
        }

        positive("move_speed", self.move_speed)?;
        positive("jump_speed", self.jump_speed)?;
        positive("air_control", self.air_control)?;
        positive("sprint_duration", self.sprint_duration)?;
        positive("sprint_regeneration_rate", self.sprint_regeneration_rate)?;
        positive("wall_jump_duration", self.wall_jump_duration)?;
        positive("vault_height", self.vault_height)?;
        positive("ledge_climb_speed", self.ledge_climb_speed)?;
        positive("wall_check_distance", self.wall_check_distance)?;
        positive("body_half_height", self.body_half_height)?;
        positive("body_radius", self.body_radius)?;
        positive("ground_probe.radius", self.ground_probe.radius)?;
        positive("ground_probe.distance", self.ground_probe.distance)?;

        non_negative("sprint_regeneration_delay", self.sprint_regeneration_delay)?;
        non_negative("min_vault_distance", self.min_vault_distance)?;
        non_negative("vault_clearance", self.vault_clearance)?;
        non_negative("vault_probe_depth", self.vault_probe_depth)?;
        non_negative("wall_slide_speed", self.wall_slide_speed)?;
        non_negative("horizontal_wall_slide_speed", self.horizontal_wall_slide_speed)?;
        non_negative("look_sensitivity", self.look_sensitivity)?;

        if !(1.0..=2.0).contains(&self.sprint_multiplier) {
            return Err(ConfigError::Invalid {
                field: "sprint_multiplier",
                reason: "must be within [1, 2]",
            });
        }

        if self.gravity >= 0.0 {
            return Err(ConfigError::Invalid {
                field: "gravity",
                reason: "must point down (negative)",
            });
        }

        if self.ledge_grab_min_offset >= self.vault_height {
            return Err(ConfigError::Invalid {
                field: "ledge_grab_min_offset",
                reason: "must be below vault_height",
            });
        }

        Ok(())
    }
}
