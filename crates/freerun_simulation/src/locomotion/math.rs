//! Math helpers: local ↔ world axes, per-axis clamp, vault ballistic arc.
//!
//! Local axes: x = right, y = up, z = forward.
//! Bevy convention: forward = -Z, поэтому local z инвертируется при конвертации.

use bevy::prelude::*;

/// Коэффициент к approach speed при расчёте времени полёта vault
pub const VAULT_SPEED_FACTOR: f32 = 1.5;

pub fn local_to_world(rotation: Quat, local: Vec3) -> Vec3 {
    rotation * Vec3::new(local.x, local.y, -local.z)
}

pub fn world_to_local(rotation: Quat, world: Vec3) -> Vec3 {
    let local = rotation.inverse() * world;
    Vec3::new(local.x, local.y, -local.z)
}

/// Направление движения в world (XZ) из move vector (x = right, y = forward)
pub fn planar_direction(rotation: Quat, move_vector: Vec2) -> Vec3 {
    local_to_world(rotation, Vec3::new(move_vector.x, 0.0, move_vector.y))
}

/// Clamp значения в [-cap, cap]
pub fn clamp_symmetric(value: f32, cap: f32) -> f32 {
    value.clamp(-cap, cap)
}

/// Параметры ballistic arc для vault
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VaultArc {
    /// Время полёта до точки приземления (секунды)
    pub flight_time: f32,
    /// Вертикальная скорость старта
    pub launch_speed: f32,
}

/// Решает vertical launch speed для перелёта через препятствие.
///
/// t = d / (1.5 * s), v = h / t - 0.5 * g * t (g со знаком, отрицательная).
/// `min_flight_time` защищает от деления на ноль при вырожденной дистанции.
pub fn vault_arc(
    distance: f32,
    approach_speed: f32,
    height_delta: f32,
    gravity: f32,
    min_flight_time: f32,
) -> VaultArc {
    let speed = approach_speed.max(f32::EPSILON);
    let flight_time = (distance / (speed * VAULT_SPEED_FACTOR)).max(min_flight_time);
    let launch_speed = height_delta / flight_time - 0.5 * gravity * flight_time;

    VaultArc {
        flight_time,
        launch_speed,
    }
}

/// Дистанция до стены вдоль её нормали (стена приведена к высоте актора)
pub fn distance_along_normal(position: Vec3, wall_point: Vec3, wall_normal: Vec3) -> f32 {
    let flattened = Vec3::new(wall_point.x, position.y, wall_point.z);
    let normal = wall_normal.normalize_or_zero();
    (flattened - position).project_onto_normalized(normal).length()
}
