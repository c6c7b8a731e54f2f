//! Rapier backend
//!
//! - Ground Probe: `RapierContext::cast_ray` только по `LevelGeometry`,
//!   без своего коллайдера и без sensors
//! - move-with-collision: `KinematicCharacterController.translation`
//!   (Rapier сам разруливает penetration и пишет Transform в writeback)
//! - trigger volumes: `Sensor` + `ActiveEvents::COLLISION_EVENTS`

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::ground::{probe_ground, GroundHit, PROBE_HEIGHT};
use super::movement::PendingMotion;
use crate::components::{KinematicController, LevelGeometry, TriggerVolume};

/// Зазор между коллайдером персонажа и полом
///
/// Коробка поднята над точкой ног на `CHARACTER_SKIN`, и KCC держит ровно такой
/// `offset`: после ground snap пол не считается blocking contact'ом.
pub const CHARACTER_SKIN: f32 = 0.02;

/// Коллайдер персонажа: куб 1×1×1, низ на `CHARACTER_SKIN` выше точки ног
pub fn character_collider() -> Collider {
    Collider::compound(vec![(
        Vec3::Y * (PROBE_HEIGHT + CHARACTER_SKIN),
        Quat::IDENTITY,
        Collider::cuboid(0.5, 0.5, 0.5),
    )])
}

/// Система: Rapier компоненты для новых kinematic персонажей
pub fn insert_rapier_character_body(
    mut commands: Commands,
    added: Query<Entity, Added<KinematicController>>,
) {
    for entity in added.iter() {
        commands.entity(entity).insert((
            RigidBody::KinematicPositionBased,
            character_collider(),
            KinematicCharacterController {
                up: Vec3::Y,
                offset: CharacterLength::Absolute(CHARACTER_SKIN),
                // Snap к земле делает наш Ground Probe
                snap_to_ground: None,
                // Через trigger volumes проходим насквозь
                filter_flags: QueryFilterFlags::EXCLUDE_SENSORS,
                ..default()
            },
            // Kinematic vs fixed sensor: по умолчанию Rapier такие пары не проверяет
            ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC,
            ActiveEvents::COLLISION_EVENTS,
        ));
    }
}

/// Система: trigger volumes становятся sensors
///
/// Collider ставит тот, кто загрузил уровень (из mesh); здесь только флаги.
pub fn insert_rapier_trigger_sensor(
    mut commands: Commands,
    added: Query<Entity, Added<TriggerVolume>>,
) {
    for entity in added.iter() {
        commands
            .entity(entity)
            .insert((Sensor, ActiveEvents::COLLISION_EVENTS));
    }
}

/// Система: Ground Probe через Rapier ray cast
pub fn probe_ground_rapier(
    rapier: ReadRapierContext,
    level: Query<(), With<LevelGeometry>>,
    mut query: Query<(Entity, &Transform, &mut GroundHit), With<KinematicController>>,
) {
    // Context ещё не создан (первые frame'ы): все в воздухе
    let Ok(context) = rapier.single() else {
        for (_, _, mut hit) in query.iter_mut() {
            *hit = GroundHit::Miss;
        }
        return;
    };

    let is_level_geometry = |candidate: Entity| level.contains(candidate);

    for (entity, transform, mut hit) in query.iter_mut() {
        let filter = QueryFilter::default()
            .exclude_sensors()
            .exclude_collider(entity)
            .predicate(&is_level_geometry);

        let caster = |origin: Vec3, direction: Vec3, max_length: f32| -> Option<Vec3> {
            context
                .cast_ray(origin, direction, max_length, true, filter)
                .map(|(_, toi)| origin + direction * toi)
        };

        *hit = probe_ground(&caster, transform.translation);
    }
}

/// Система: PendingMotion → KinematicCharacterController
pub fn apply_motion_rapier(
    mut query: Query<(&PendingMotion, &mut KinematicCharacterController)>,
) {
    for (motion, mut controller) in query.iter_mut() {
        controller.translation = Some(motion.0);
    }
}

