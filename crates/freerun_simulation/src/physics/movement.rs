//! Kinematic слой для runner
//!
//! Архитектура:
//! - Locomotion пишет velocity в PhysicsBody (через actuator flush)
//! - Здесь: gravity → интеграция velocity → выталкивание из LevelGeometry
//! - Если на entity есть Rapier `Velocity` / `GravityScale` - синхронизируем их
//!
//! Детерминизм: fixed timestep (60Hz), порядок систем зафиксирован через chain()

use bevy::prelude::*;
use bevy_rapier3d::prelude::{GravityScale, Velocity};

use super::probe::LevelGeometry;

/// Тело: velocity (world, m/s) + масса
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec3,
    /// Масса (кг), для Rapier sync и будущих импульсов
    pub mass: f32,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            mass: 70.0,
        }
    }
}

/// Kinematic контроллер компонент
///
/// Gravity интегрируем сами (не через Rapier forces).
/// `gravity_enabled` переключает locomotion (LedgeGrabbing).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct KinematicController {
    /// Сила гравитации (m/s²)
    pub gravity: f32,
    pub gravity_enabled: bool,
    /// Опирается ли тело на поверхность (результат последнего resolve)
    pub grounded: bool,
    /// Половина высоты AABB тела (центр → подошва)
    pub half_height: f32,
    /// Горизонтальный радиус AABB
    pub radius: f32,
}

impl Default for KinematicController {
    fn default() -> Self {
        Self {
            gravity: -9.81, // Earth gravity
            gravity_enabled: true,
            grounded: false,
            half_height: 0.9,
            radius: 0.4,
        }
    }
}

/// Система применения gravity к velocity
pub fn apply_gravity(
    mut query: Query<(&KinematicController, &mut PhysicsBody)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (controller, mut body) in query.iter_mut() {
        if controller.gravity_enabled {
            // Опора гасит отрицательную vertical в resolve, поэтому gravity всегда
            body.velocity.y += controller.gravity * delta;
        }
    }
}

/// Система интеграции velocity → Transform (headless режим)
pub fn integrate_velocity_to_transform(
    mut query: Query<(&PhysicsBody, &mut Transform), With<KinematicController>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (body, mut transform) in query.iter_mut() {
        // position += velocity * dt
        transform.translation += body.velocity * delta;
    }
}

/// Выталкивание тел из уровня + обновление grounded
pub fn resolve_level_collisions(
    level: Option<Res<LevelGeometry>>,
    mut query: Query<(&mut KinematicController, &mut PhysicsBody, &mut Transform)>,
) {
    let Some(level) = level else {
        return;
    };

    for (mut controller, mut body, mut transform) in query.iter_mut() {
        let mut center = transform.translation;
        let mut velocity = body.velocity;

        let (half_height, radius) = (controller.half_height, controller.radius);
        controller.grounded =
            level.resolve_penetration(&mut center, &mut velocity, half_height, radius);

        if center != transform.translation {
            transform.translation = center;
        }
        body.velocity = velocity;
    }
}

/// PhysicsBody.velocity → Rapier Velocity (если тело зарегистрировано в Rapier)
pub fn sync_velocity_to_rapier(
    mut query: Query<(&PhysicsBody, &mut Velocity), With<KinematicController>>,
) {
    for (body, mut rapier_velocity) in query.iter_mut() {
        rapier_velocity.linvel = body.velocity;
    }
}

/// gravity_enabled → Rapier GravityScale
pub fn sync_gravity_scale(
    mut query: Query<(&KinematicController, &mut GravityScale), Changed<KinematicController>>,
) {
    for (controller, mut scale) in query.iter_mut() {
        scale.0 = if controller.gravity_enabled { 1.0 } else { 0.0 };
    }
}

/// Plugin для kinematic слоя
///
/// Регистрирует системы в FixedUpdate после locomotion.
pub struct KinematicControllerPlugin;

impl Plugin for KinematicControllerPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PhysicsBody>()
            .register_type::<KinematicController>()
            .add_systems(
                FixedUpdate,
                (
                    apply_gravity,
                    integrate_velocity_to_transform,
                    resolve_level_collisions,
                    sync_velocity_to_rapier,
                    sync_gravity_scale,
                )
                    .chain() // Последовательное выполнение
                    .in_set(crate::SimulationSet::Physics),
            );
    }
}
