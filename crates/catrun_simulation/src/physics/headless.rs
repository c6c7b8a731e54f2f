//! Headless collision backend (без Rapier)
//!
//! Для headless симуляции и интеграционных тестов:
//! - уровень = набор axis-aligned платформ (XZ прямоугольник + верхняя грань)
//! - ray cast только против верхних граней платформ
//! - move-with-collision: движение вниз останавливается на верхней грани
//! - trigger boxes: CollisionEvent::Started/Stopped на фронтах overlap'а
//!
//! CollisionEvent тот же, что шлёт Rapier: Trigger Dispatcher не знает,
//! какой backend работает.

use std::collections::HashSet;

use bevy::prelude::*;
use bevy_rapier3d::prelude::CollisionEvent;
use bevy_rapier3d::rapier::geometry::CollisionEventFlags;

use super::ground::{probe_ground, GroundHit, RayCaster};
use super::movement::PendingMotion;
use crate::components::{KinematicController, Player, TriggerVolume};

/// Half extents коробки персонажа (1 × 1 × 1, origin в точке ног)
pub const CHARACTER_HALF_EXTENTS: Vec3 = Vec3::splat(0.5);

/// Допуск "стоим на грани" для resolve_move
const SURFACE_EPSILON: f32 = 1e-4;

/// Платформа: прямоугольник в XZ + высота верхней грани
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub min: Vec2,
    pub max: Vec2,
    pub top: f32,
}

impl Platform {
    pub fn new(min: Vec2, max: Vec2, top: f32) -> Self {
        Self { min, max, top }
    }

    /// Бесконечный (практически) пол на высоте `top`
    pub fn floor(top: f32) -> Self {
        Self::new(Vec2::splat(-1.0e4), Vec2::splat(1.0e4), top)
    }

    fn covers(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.y && point.z <= self.max.y
    }
}

/// Trigger box: AABB вокруг Transform trigger entity
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TriggerBounds {
    pub half_extents: Vec3,
}

/// Headless уровень (resource)
#[derive(Resource, Debug, Clone, Default)]
pub struct HeadlessLevel {
    pub platforms: Vec<Platform>,
}

impl HeadlessLevel {
    pub fn new(platforms: Vec<Platform>) -> Self {
        Self { platforms }
    }

    /// Engine move-with-collision для headless режима
    ///
    /// Пересекли верхнюю грань платформы сверху вниз → останавливаемся на ней
    /// (берём самую высокую). Горизонталь не блокируется.
    pub fn resolve_move(&self, from: Vec3, displacement: Vec3) -> Vec3 {
        let mut target = from + displacement;

        let landing = self
            .platforms
            .iter()
            .filter(|platform| {
                from.y >= platform.top - SURFACE_EPSILON && target.y < platform.top && platform.covers(target)
            })
            .map(|platform| platform.top)
            .fold(None, |best: Option<f32>, top| Some(best.map_or(top, |b| b.max(top))));

        if let Some(top) = landing {
            target.y = top;
        }
        target
    }
}

impl RayCaster for HeadlessLevel {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_length: f32) -> Option<Vec3> {
        if direction.y.abs() <= f32::EPSILON {
            return None;
        }

        self.platforms
            .iter()
            .filter_map(|platform| {
                let toi = (platform.top - origin.y) / direction.y;
                if !(0.0..=max_length).contains(&toi) {
                    return None;
                }
                let point = origin + direction * toi;
                platform.covers(point).then_some((toi, point))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, point)| point)
    }
}

/// Пары (character, trigger), которые сейчас пересекаются
#[derive(Resource, Debug, Default)]
pub struct HeadlessContacts {
    active: HashSet<(Entity, Entity)>,
}

impl HeadlessContacts {
    pub fn is_active(&self, character: Entity, trigger: Entity) -> bool {
        self.active.contains(&(character, trigger))
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

fn boxes_overlap(a_center: Vec3, a_half: Vec3, b_center: Vec3, b_half: Vec3) -> bool {
    let gap = (a_center - b_center).abs();
    gap.x < a_half.x + b_half.x && gap.y < a_half.y + b_half.y && gap.z < a_half.z + b_half.z
}

/// Система: Ground Probe (headless)
pub fn probe_ground_headless(
    level: Option<Res<HeadlessLevel>>,
    mut query: Query<(&Transform, &mut GroundHit), With<KinematicController>>,
) {
    for (transform, mut hit) in query.iter_mut() {
        *hit = match level.as_deref() {
            Some(level) => probe_ground(level, transform.translation),
            // Нет уровня: вечный полёт, не ошибка
            None => GroundHit::Miss,
        };
    }
}

/// Система: применение PendingMotion (headless move-with-collision)
pub fn apply_motion_headless(
    level: Option<Res<HeadlessLevel>>,
    mut query: Query<(&PendingMotion, &mut Transform)>,
) {
    for (motion, mut transform) in query.iter_mut() {
        transform.translation = match level.as_deref() {
            Some(level) => level.resolve_move(transform.translation, motion.0),
            None => transform.translation + motion.0,
        };
    }
}

/// Система: overlap игрока с trigger boxes → CollisionEvent
///
/// Started только на входе, Stopped на выходе (как sensor events Rapier).
pub fn detect_trigger_overlaps_headless(
    mut contacts: ResMut<HeadlessContacts>,
    players: Query<(Entity, &Transform), With<Player>>,
    triggers: Query<(Entity, &Transform, &TriggerBounds), With<TriggerVolume>>,
    mut collision_events: EventWriter<CollisionEvent>,
) {
    for (player, player_transform) in players.iter() {
        let player_center = player_transform.translation + Vec3::Y * CHARACTER_HALF_EXTENTS.y;

        for (trigger, trigger_transform, bounds) in triggers.iter() {
            let overlapping = boxes_overlap(
                player_center,
                CHARACTER_HALF_EXTENTS,
                trigger_transform.translation,
                bounds.half_extents,
            );
            let pair = (player, trigger);

            if overlapping && contacts.active.insert(pair) {
                collision_events.write(CollisionEvent::Started(player, trigger, CollisionEventFlags::SENSOR));
            } else if !overlapping && contacts.active.remove(&pair) {
                collision_events.write(CollisionEvent::Stopped(player, trigger, CollisionEventFlags::SENSOR));
            }
        }
    }
}

/// Система: пары с despawned игроком или trigger'ом → Stopped + REMOVED
///
/// Rapier шлёт такой же Stopped, когда один из коллайдеров удалён.
pub fn forget_removed_contacts(
    mut contacts: ResMut<HeadlessContacts>,
    mut removed_triggers: RemovedComponents<TriggerVolume>,
    mut removed_players: RemovedComponents<Player>,
    mut collision_events: EventWriter<CollisionEvent>,
) {
    let removed: HashSet<Entity> = removed_triggers.read().chain(removed_players.read()).collect();
    if removed.is_empty() {
        return;
    }

    let stale: Vec<(Entity, Entity)> = contacts
        .active
        .iter()
        .filter(|(player, trigger)| removed.contains(player) || removed.contains(trigger))
        .copied()
        .collect();

    for (player, trigger) in stale {
        contacts.active.remove(&(player, trigger));
        collision_events.write(CollisionEvent::Stopped(
            player,
            trigger,
            CollisionEventFlags::SENSOR | CollisionEventFlags::REMOVED,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::TriggerKind;

    fn step_level() -> HeadlessLevel {
        HeadlessLevel::new(vec![
            Platform::new(Vec2::new(-10.0, -5.0), Vec2::new(10.0, 5.0), 0.0),
            Platform::new(Vec2::new(2.0, -5.0), Vec2::new(4.0, 5.0), 1.0),
        ])
    }

    #[test]
    fn test_ray_hits_highest_surface_first() {
        let level = step_level();

        let hit = level.cast_ray(Vec3::new(3.0, 5.0, 0.0), Vec3::NEG_Y, 10.0);
        assert_eq!(hit, Some(Vec3::new(3.0, 1.0, 0.0)));

        let hit = level.cast_ray(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y, 10.0);
        assert_eq!(hit, Some(Vec3::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_ray_respects_length_and_footprint() {
        let level = step_level();

        assert_eq!(level.cast_ray(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y, 1.0), None);
        assert_eq!(level.cast_ray(Vec3::new(50.0, 5.0, 0.0), Vec3::NEG_Y, 10.0), None);
        assert_eq!(level.cast_ray(Vec3::new(0.0, 5.0, 0.0), Vec3::X, 10.0), None);
    }

    #[test]
    fn test_empty_level_never_hits() {
        let level = HeadlessLevel::default();

        assert_eq!(probe_ground(&level, Vec3::ZERO), GroundHit::Miss);
    }

    #[test]
    fn test_resolve_move_stops_on_surface() {
        let level = step_level();

        let resolved = level.resolve_move(Vec3::new(0.0, 0.3, 0.0), Vec3::new(0.45, -0.8, 0.0));
        assert_eq!(resolved.y, 0.0);
        assert!((resolved.x - 0.45).abs() < 1e-6);
    }

    #[test]
    fn test_resolve_move_passes_below_surface_untouched() {
        let level = step_level();

        // Уже под полом: не "выталкиваем" наверх
        let resolved = level.resolve_move(Vec3::new(0.0, -3.0, 0.0), Vec3::new(0.0, -0.8, 0.0));
        assert!((resolved.y + 3.8).abs() < 1e-6);
    }

    #[test]
    fn test_resolve_move_upward_is_free() {
        let level = step_level();

        let resolved = level.resolve_move(Vec3::ZERO, Vec3::new(0.0, 0.8, 0.0));
        assert!((resolved.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_boxes_overlap() {
        let half = Vec3::splat(0.5);

        assert!(boxes_overlap(Vec3::ZERO, half, Vec3::new(0.9, 0.0, 0.0), half));
        assert!(!boxes_overlap(Vec3::ZERO, half, Vec3::new(1.1, 0.0, 0.0), half));
    }

    fn contacts_app() -> App {
        let mut app = App::new();
        app.init_resource::<HeadlessContacts>()
            .add_event::<CollisionEvent>()
            .add_systems(
                Update,
                (forget_removed_contacts, detect_trigger_overlaps_headless).chain(),
            );
        app
    }

    fn spawn_overlapping_pair(app: &mut App) -> (Entity, Entity) {
        let player = app.world_mut().spawn((Player, Transform::default())).id();
        let trigger = app
            .world_mut()
            .spawn((
                Transform::from_xyz(0.0, 0.5, 0.0),
                TriggerBounds {
                    half_extents: Vec3::splat(1.0),
                },
                TriggerVolume::new(TriggerKind::Success),
            ))
            .id();
        (player, trigger)
    }

    fn drain_events(app: &mut App) -> Vec<CollisionEvent> {
        app.world_mut()
            .resource_mut::<Events<CollisionEvent>>()
            .drain()
            .collect()
    }

    #[test]
    fn test_despawned_trigger_leaves_contacts() {
        let mut app = contacts_app();
        let (player, trigger) = spawn_overlapping_pair(&mut app);

        app.update();
        assert!(app.world().resource::<HeadlessContacts>().is_active(player, trigger));
        drain_events(&mut app);

        app.world_mut().despawn(trigger);
        app.update();

        assert!(app.world().resource::<HeadlessContacts>().is_empty());
        let events = drain_events(&mut app);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            CollisionEvent::Stopped(a, b, flags)
                if a == player && b == trigger && flags.contains(CollisionEventFlags::REMOVED)
        ));
    }

    #[test]
    fn test_despawned_player_leaves_contacts() {
        let mut app = contacts_app();
        let (player, _) = spawn_overlapping_pair(&mut app);

        app.update();
        assert_eq!(app.world().resource::<HeadlessContacts>().len(), 1);

        app.world_mut().despawn(player);
        app.update();

        assert!(app.world().resource::<HeadlessContacts>().is_empty());
    }
}
