//! Spatial queries для locomotion (ground / wall / vault landing)
//!
//! `SpatialProbe` - контракт, который locomotion ожидает от физики.
//! `LevelGeometry` - headless реализация: пол + axis-aligned блоки.
//! В игре probe реализуется поверх Rapier query pipeline (вне этого крейта).

use bevy::prelude::*;

use crate::locomotion::config::LocomotionConfig;
use crate::locomotion::context::WallHit;

/// Запас для численных ошибок при касании поверхностей
pub const CONTACT_SKIN: f32 = 1e-3;

/// Контракт spatial queries (вызывается один раз за tick до machine tick)
pub trait SpatialProbe: Send + Sync {
    /// Sphere cast вниз от центра тела (`ground_probe.radius` / `ground_probe.distance`)
    fn probe_ground(&self, center: Vec3, config: &LocomotionConfig) -> bool;

    /// Луч вперёд от центра тела. Some - попали в стену.
    fn probe_wall(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<WallHit>;

    /// Верх препятствия за стеной, если он в пределах `vault_height` над центром
    fn probe_vault_landing(
        &self,
        center: Vec3,
        wall: &WallHit,
        config: &LocomotionConfig,
    ) -> Option<Vec3>;
}

/// Axis-aligned блок (стена, ящик, уступ)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Block {
    pub min: Vec3,
    pub max: Vec3,
}

impl Block {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self::new(center - half, center + half)
    }

    pub fn top(&self) -> f32 {
        self.max.y
    }

    /// Пересекается ли круг (XZ) с проекцией блока
    fn overlaps_circle_xz(&self, center: Vec3, radius: f32) -> bool {
        let closest_x = center.x.clamp(self.min.x, self.max.x);
        let closest_z = center.z.clamp(self.min.z, self.max.z);
        let dx = center.x - closest_x;
        let dz = center.z - closest_z;
        dx * dx + dz * dz <= radius * radius
    }

    fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Slab test. Возвращает (distance, outward normal) первого входа луча.
    /// Луч, стартующий внутри блока, попаданием не считается.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<(f32, Vec3)> {
        if self.contains(origin) {
            return None;
        }

        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut normal = Vec3::ZERO;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < f32::EPSILON {
                // Параллельно slab - должны быть внутри него
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let mut t0 = (lo - o) / d;
            let mut t1 = (hi - o) / d;
            let mut entry_normal = Vec3::ZERO;
            entry_normal[axis] = -d.signum();
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            if t0 > t_enter {
                t_enter = t0;
                normal = entry_normal;
            }
            t_exit = t_exit.min(t1);

            if t_enter > t_exit {
                return None;
            }
        }

        (t_enter >= 0.0 && t_enter <= max_distance).then_some((t_enter, normal))
    }
}

/// Headless уровень: опциональный пол (y) + блоки
#[derive(Resource, Debug, Clone, Default, Reflect)]
#[reflect(Resource)]
pub struct LevelGeometry {
    pub floor: Option<f32>,
    pub blocks: Vec<Block>,
}

impl LevelGeometry {
    /// Плоский пол на высоте `y`
    pub fn flat(y: f32) -> Self {
        Self {
            floor: Some(y),
            blocks: Vec::new(),
        }
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Ближайшее попадание луча во всю геометрию
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<(f32, Vec3)> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let mut best: Option<(f32, Vec3)> = None;

        if let Some(floor) = self.floor {
            if direction.y < 0.0 && origin.y >= floor {
                let distance = (origin.y - floor) / -direction.y;
                if distance <= max_distance {
                    best = Some((distance, Vec3::Y));
                }
            }
        }

        for block in &self.blocks {
            if let Some(hit) = block.raycast(origin, direction, max_distance) {
                if best.map_or(true, |(distance, _)| hit.0 < distance) {
                    best = Some(hit);
                }
            }
        }

        best
    }

    /// Выталкивает тело (AABB: radius × half_height × radius) из геометрии.
    ///
    /// Возвращает true, если тело опирается на поверхность снизу.
    /// Velocity в сторону препятствия обнуляется.
    pub fn resolve_penetration(
        &self,
        center: &mut Vec3,
        velocity: &mut Vec3,
        half_height: f32,
        radius: f32,
    ) -> bool {
        let mut supported = false;

        if let Some(floor) = self.floor {
            let feet = center.y - half_height;
            if feet <= floor + CONTACT_SKIN {
                center.y = floor + half_height;
                velocity.y = velocity.y.max(0.0);
                supported = true;
            }
        }

        let half = Vec3::new(radius, half_height, radius);
        for block in &self.blocks {
            let body_min = *center - half;
            let body_max = *center + half;

            let overlap = (body_max.min(block.max) - body_min.max(block.min)).max(Vec3::ZERO);
            if overlap.x <= 0.0 || overlap.y <= 0.0 || overlap.z <= 0.0 {
                // Стоим ровно на крышке блока
                if overlap.x > 0.0
                    && overlap.z > 0.0
                    && (body_min.y - block.max.y).abs() <= CONTACT_SKIN
                {
                    velocity.y = velocity.y.max(0.0);
                    supported = true;
                }
                continue;
            }

            // Выталкиваем по оси минимального проникновения
            let block_center = (block.min + block.max) * 0.5;
            if overlap.y <= overlap.x && overlap.y <= overlap.z {
                if center.y >= block_center.y {
                    center.y += overlap.y;
                    velocity.y = velocity.y.max(0.0);
                    supported = true;
                } else {
                    center.y -= overlap.y;
                    velocity.y = velocity.y.min(0.0);
                }
            } else if overlap.x <= overlap.z {
                if center.x >= block_center.x {
                    center.x += overlap.x;
                    velocity.x = velocity.x.max(0.0);
                } else {
                    center.x -= overlap.x;
                    velocity.x = velocity.x.min(0.0);
                }
            } else if center.z >= block_center.z {
                center.z += overlap.z;
                velocity.z = velocity.z.max(0.0);
            } else {
                center.z -= overlap.z;
                velocity.z = velocity.z.min(0.0);
            }
        }

        supported
    }
}

impl SpatialProbe for LevelGeometry {
    fn probe_ground(&self, center: Vec3, config: &LocomotionConfig) -> bool {
        let probe = config.ground_probe;
        // Нижняя точка сферы в конце cast
        let reach = probe.distance + probe.radius + CONTACT_SKIN;

        if let Some(floor) = self.floor {
            if center.y >= floor - CONTACT_SKIN && center.y - floor <= reach {
                return true;
            }
        }

        self.blocks.iter().any(|block| {
            let top = block.top();
            top <= center.y && center.y - top <= reach && block.overlaps_circle_xz(center, probe.radius)
        })
    }

    fn probe_wall(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<WallHit> {
        let direction = Vec3::new(direction.x, 0.0, direction.z);
        let (distance, normal) = self.raycast(origin, direction, max_distance)?;

        // Пол / потолок стеной не считаем
        if normal.y.abs() > 0.5 {
            return None;
        }

        Some(WallHit {
            point: origin + direction.normalize_or_zero() * distance,
            normal,
        })
    }

    fn probe_vault_landing(
        &self,
        center: Vec3,
        wall: &WallHit,
        config: &LocomotionConfig,
    ) -> Option<Vec3> {
        // Луч вниз из точки над препятствием (за плоскостью стены)
        let inside = wall.point - wall.normal * config.vault_probe_depth;
        let origin = Vec3::new(inside.x, center.y + config.vault_height, inside.z);

        let (distance, normal) = self.raycast(origin, Vec3::NEG_Y, config.vault_height)?;
        if normal.y <= 0.5 {
            return None;
        }

        let landing = origin - Vec3::Y * distance;
        // Уступ должен быть выше центра тела, иначе это не препятствие
        (landing.y > center.y).then_some(landing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LocomotionConfig {
        LocomotionConfig::default()
    }

    /// Стена 2м высотой перед актором (forward = -Z), передняя грань на z = -1
    fn wall_level(height: f32) -> LevelGeometry {
        LevelGeometry::flat(0.0).with_block(Block::new(
            Vec3::new(-2.0, 0.0, -2.0),
            Vec3::new(2.0, height, -1.0),
        ))
    }

    #[test]
    fn test_ground_probe_on_floor() {
        let level = LevelGeometry::flat(0.0);
        assert!(level.probe_ground(Vec3::new(0.0, 0.9, 0.0), &config()));
        assert!(level.probe_ground(Vec3::new(0.0, 1.0, 0.0), &config()));
        assert!(!level.probe_ground(Vec3::new(0.0, 1.2, 0.0), &config()));
    }

    #[test]
    fn test_ground_probe_on_block_top() {
        let level = LevelGeometry::default()
            .with_block(Block::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 1.0, 1.0)));

        assert!(level.probe_ground(Vec3::new(0.0, 1.9, 0.0), &config()));
        // Сфера касается края блока
        assert!(level.probe_ground(Vec3::new(1.2, 1.9, 0.0), &config()));
        assert!(!level.probe_ground(Vec3::new(1.5, 1.9, 0.0), &config()));
    }

    #[test]
    fn test_no_floor_means_airborne() {
        let level = LevelGeometry::default();
        assert!(!level.probe_ground(Vec3::new(0.0, 0.9, 0.0), &config()));
    }

    #[test]
    fn test_wall_probe_reports_point_and_normal() {
        let level = wall_level(2.0);
        let hit = level
            .probe_wall(Vec3::new(0.0, 0.9, -0.5), Vec3::NEG_Z, 0.8)
            .expect("wall in range");

        assert!((hit.point - Vec3::new(0.0, 0.9, -1.0)).length() < 1e-5);
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn test_wall_probe_out_of_range() {
        let level = wall_level(2.0);
        assert!(level
            .probe_wall(Vec3::new(0.0, 0.9, 0.5), Vec3::NEG_Z, 0.8)
            .is_none());
        // Смотрим в другую сторону
        assert!(level
            .probe_wall(Vec3::new(0.0, 0.9, -0.5), Vec3::Z, 0.8)
            .is_none());
    }

    #[test]
    fn test_vault_landing_on_low_obstacle() {
        let level = wall_level(1.5);
        let center = Vec3::new(0.0, 0.9, -0.5);
        let hit = level.probe_wall(center, Vec3::NEG_Z, 0.8).expect("wall in range");

        let landing = level
            .probe_vault_landing(center, &hit, &config())
            .expect("obstacle is vaultable");
        assert!((landing.y - 1.5).abs() < 1e-5);
        assert!((landing.z - -1.5).abs() < 1e-5);
    }

    #[test]
    fn test_vault_landing_rejects_tall_wall() {
        let level = wall_level(5.0);
        let center = Vec3::new(0.0, 0.9, -0.5);
        let hit = level.probe_wall(center, Vec3::NEG_Z, 0.8).expect("wall in range");

        assert!(level.probe_vault_landing(center, &hit, &config()).is_none());
    }

    #[test]
    fn test_resolve_penetration_floor() {
        let level = LevelGeometry::flat(0.0);
        let mut center = Vec3::new(0.0, 0.85, 0.0);
        let mut velocity = Vec3::new(1.0, -3.0, 0.0);

        let supported = level.resolve_penetration(&mut center, &mut velocity, 0.9, 0.4);

        assert!(supported);
        assert_eq!(center.y, 0.9);
        assert_eq!(velocity, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_resolve_penetration_pushes_out_of_wall() {
        let level = wall_level(2.0);
        // Тело на 0.1 вошло в переднюю грань (z = -1)
        let mut center = Vec3::new(0.0, 0.9, -0.7);
        let mut velocity = Vec3::new(0.0, 0.0, -4.0);

        level.resolve_penetration(&mut center, &mut velocity, 0.9, 0.4);

        assert!((center.z - -0.6).abs() < 1e-5, "z = {}", center.z);
        assert_eq!(velocity.z, 0.0);
    }
}
