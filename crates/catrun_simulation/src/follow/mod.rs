//! Smoothed Follower
//!
//! Одна формула для camera rig и companion:
//!
//! ```text
//! delta      = (T + O) − P
//! lerpFactor = (1 − d) × (1 − 1 / (|delta|² + 1))
//! P          = lerp(P, T + O, lerpFactor)   если lerpFactor > ε
//! ```
//!
//! Вдали factor → (1 − d), вблизи → 0: самозатухание без spring/mass модели.
//! Порог ε убирает бесконечный micro-jitter в покое.

use bevy::prelude::*;
use bevy_rapier3d::plugin::PhysicsSet;

use crate::components::{FollowTuning, SmoothedFollower};

/// Followers: после Rapier writeback (позиция игрока уже финальная),
/// до transform propagation (камера рендерится с новой позицией)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FollowSet;

/// lerp factor для квадрата расстояния `distance_squared`
pub fn follow_lerp_factor(distance_squared: f32, follow_delay: f32) -> f32 {
    (1.0 - follow_delay) * (1.0 - 1.0 / (distance_squared + 1.0))
}

/// Один шаг follower'а: новая позиция или `None` (остаёмся на месте)
pub fn follow_step(position: Vec3, target: Vec3, tuning: &FollowTuning) -> Option<Vec3> {
    let goal = target + tuning.offset;
    let distance_squared = (goal - position).length_squared();
    let factor = follow_lerp_factor(distance_squared, tuning.follow_delay);

    (factor > tuning.movement_threshold).then(|| position.lerp(goal, factor))
}

/// Система: все активные followers тянутся к своим целям
///
/// Target только читается. Пропавший target (despawn): follower стоит на месте.
pub fn update_followers(
    followers: Query<(Entity, &SmoothedFollower)>,
    mut transforms: Query<&mut Transform>,
) {
    for (entity, follower) in followers.iter() {
        if !follower.enabled {
            continue;
        }

        let Ok(target) = transforms.get(follower.target).map(|t| t.translation) else {
            continue;
        };
        let Ok(mut transform) = transforms.get_mut(entity) else {
            continue;
        };

        if let Some(next) = follow_step(transform.translation, target, &follower.tuning) {
            transform.translation = next;
        }
    }
}

/// Plugin: Smoothed Followers в PostUpdate
pub struct FollowPlugin;

impl Plugin for FollowPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SmoothedFollower>()
            .configure_sets(
                PostUpdate,
                FollowSet
                    .after(PhysicsSet::Writeback)
                    .before(bevy::transform::TransformSystem::TransformPropagate),
            )
            .add_systems(PostUpdate, update_followers.in_set(FollowSet));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning(offset: Vec3, follow_delay: f32) -> FollowTuning {
        FollowTuning {
            offset,
            follow_delay,
            movement_threshold: 0.005,
        }
    }

    #[test]
    fn test_at_rest_is_idempotent() {
        let tuning = tuning(Vec3::new(0.0, 1.0, 0.0), 0.9);
        let target = Vec3::new(5.0, 2.0, 0.0);
        let position = target + tuning.offset;

        assert_eq!(follow_lerp_factor(0.0, 0.9), 0.0);
        assert_eq!(follow_step(position, target, &tuning), None);
    }

    #[test]
    fn test_factor_approaches_one_minus_delay_far_away() {
        let factor = follow_lerp_factor(1.0e8, 0.9);

        assert!(factor <= 1.0 - 0.9);
        assert!((factor - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_companion_at_distance_ten() {
        let tuning = FollowTuning::COMPANION;
        let target = Vec3::ZERO;
        let goal = target + tuning.offset;
        let position = goal + Vec3::new(10.0, 0.0, 0.0);

        let factor = follow_lerp_factor(100.0, tuning.follow_delay);
        let expected = 0.1 * (1.0 - 1.0 / 101.0);
        assert!((factor - expected).abs() < 1e-6);
        assert!((factor - 0.0990).abs() < 1e-4);
        assert!(factor > tuning.movement_threshold);

        let next = follow_step(position, target, &tuning).expect("companion should move");
        assert!((next.x - 10.0 * (1.0 - factor)).abs() < 1e-4);
        assert!((next.y - goal.y).abs() < 1e-6);
    }

    #[test]
    fn test_below_threshold_stays_put() {
        let tuning = FollowTuning::CAMERA;
        let target = Vec3::ZERO;
        // distance² = 0.01 → factor = 0.1 × (1 − 1/1.01) ≈ 0.00099 < 0.005
        let position = target + tuning.offset + Vec3::new(0.1, 0.0, 0.0);

        assert_eq!(follow_step(position, target, &tuning), None);
    }

    #[test]
    fn test_converges_without_overshoot() {
        let tuning = tuning(Vec3::ZERO, 0.5);
        let target = Vec3::new(20.0, 0.0, 0.0);
        let mut position = Vec3::ZERO;

        for _ in 0..500 {
            if let Some(next) = follow_step(position, target, &tuning) {
                assert!(next.x >= position.x);
                assert!(next.x <= target.x);
                position = next;
            }
        }

        // Останавливается там, где factor падает ниже порога
        let remaining = target.x - position.x;
        assert!(remaining > 0.0 && remaining < 0.2, "remaining = {}", remaining);
    }

    #[test]
    fn test_camera_and_companion_share_formula() {
        let target = Vec3::new(3.0, 0.0, 0.0);
        let start = Vec3::new(-7.0, 0.0, 0.0);

        let camera = follow_step(start, target, &FollowTuning::CAMERA).unwrap();
        let companion = follow_step(start, target, &FollowTuning::COMPANION).unwrap();

        // Доля пройденного пути = lerp factor для своего goal (offsets разные, формула одна)
        let camera_fraction = (camera - start).length() / (target + FollowTuning::CAMERA.offset - start).length();
        let companion_fraction =
            (companion - start).length() / (target + FollowTuning::COMPANION.offset - start).length();
        let camera_expected = follow_lerp_factor((target + FollowTuning::CAMERA.offset - start).length_squared(), 0.9);
        let companion_expected =
            follow_lerp_factor((target + FollowTuning::COMPANION.offset - start).length_squared(), 0.9);

        assert!((camera_fraction - camera_expected).abs() < 1e-5);
        assert!((companion_fraction - companion_expected).abs() < 1e-5);
    }
}
