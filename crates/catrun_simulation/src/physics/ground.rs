//! Ground Probe
//!
//! Луч вниз из точки на 0.5 выше "ног" персонажа, длина 0.6.
//! То есть земля засчитывается в диапазоне [feet − 0.1, feet + 0.5].
//!
//! Backend (rapier / headless) даёт только `RayCaster`; фильтрация
//! (только LevelGeometry, без собственного коллайдера и sensors): на стороне backend'а.

use bevy::prelude::*;

/// Высота origin луча над точкой ног
pub const PROBE_HEIGHT: f32 = 0.5;
/// Длина луча
pub const PROBE_LENGTH: f32 = 0.6;

/// Collision query: ray cast против collidable геометрии уровня
///
/// Возвращает world-space точку первого пересечения.
pub trait RayCaster {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_length: f32) -> Option<Vec3>;
}

impl<F> RayCaster for F
where
    F: Fn(Vec3, Vec3, f32) -> Option<Vec3>,
{
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_length: f32) -> Option<Vec3> {
        self(origin, direction, max_length)
    }
}

/// Результат probe за текущий frame
///
/// Явный sum type: попадание в (0, 0, 0): это валидная земля, а не "промах".
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub enum GroundHit {
    #[default]
    Miss,
    Hit { point: Vec3 },
}

impl GroundHit {
    pub fn is_grounded(&self) -> bool {
        matches!(self, GroundHit::Hit { .. })
    }

    pub fn contact_point(&self) -> Option<Vec3> {
        match self {
            GroundHit::Hit { point } => Some(*point),
            GroundHit::Miss => None,
        }
    }
}

/// Один probe из точки ног `feet`
pub fn probe_ground(caster: &impl RayCaster, feet: Vec3) -> GroundHit {
    let origin = feet + Vec3::Y * PROBE_HEIGHT;

    match caster.cast_ray(origin, Vec3::NEG_Y, PROBE_LENGTH) {
        Some(point) if point.is_finite() => GroundHit::Hit { point },
        _ => GroundHit::Miss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Бесконечная плоскость на высоте `height`
    fn flat_floor(height: f32) -> impl Fn(Vec3, Vec3, f32) -> Option<Vec3> {
        move |origin: Vec3, direction: Vec3, max_length: f32| {
            if direction.y >= 0.0 {
                return None;
            }
            let toi = (origin.y - height) / -direction.y;
            (toi >= 0.0 && toi <= max_length).then(|| origin + direction * toi)
        }
    }

    #[test]
    fn test_standing_on_floor_is_grounded() {
        let hit = probe_ground(&flat_floor(0.0), Vec3::new(3.0, 0.0, 0.0));

        assert_eq!(hit, GroundHit::Hit { point: Vec3::new(3.0, 0.0, 0.0) });
    }

    #[test]
    fn test_hit_at_world_origin_is_grounded() {
        // Ноль: не sentinel "нет попадания"
        let hit = probe_ground(&flat_floor(0.0), Vec3::ZERO);

        assert!(hit.is_grounded());
        assert_eq!(hit.contact_point(), Some(Vec3::ZERO));
    }

    #[test]
    fn test_floor_out_of_reach_is_miss() {
        // Ноги на 0.11 над полом: луч 0.5 + 0.1 не дотягивается
        let hit = probe_ground(&flat_floor(0.0), Vec3::new(0.0, 0.11, 0.0));
        assert_eq!(hit, GroundHit::Miss);

        // 0.09 над полом: дотягивается
        let hit = probe_ground(&flat_floor(0.0), Vec3::new(0.0, 0.09, 0.0));
        assert!(hit.is_grounded());
    }

    #[test]
    fn test_floor_slightly_above_feet_is_grounded() {
        // Ноги провалились на 0.3 ниже пола: origin луча ещё над полом
        let hit = probe_ground(&flat_floor(1.0), Vec3::new(0.0, 0.7, 0.0));

        let contact = hit.contact_point().expect("floor within reach");
        assert!((contact.y - 1.0).abs() < 1e-5, "contact.y = {}", contact.y);
    }

    #[test]
    fn test_no_geometry_is_miss() {
        let nothing = |_: Vec3, _: Vec3, _: f32| -> Option<Vec3> { None };

        assert_eq!(probe_ground(&nothing, Vec3::new(0.0, 5.0, 0.0)), GroundHit::Miss);
    }

    #[test]
    fn test_non_finite_point_is_miss() {
        let broken = |_: Vec3, _: Vec3, _: f32| -> Option<Vec3> { Some(Vec3::new(f32::NAN, 0.0, 0.0)) };

        assert_eq!(probe_ground(&broken, Vec3::ZERO), GroundHit::Miss);
    }
}
