use std::f32::consts::PI;

use bevy::prelude::*;

use catrun_simulation::CameraRig;

/// Расстояние камеры от rig'а (вдоль локальной −Z, rig развёрнут на 180°)
const CAMERA_DISTANCE: f32 = 35.0;
/// Узкий FOV: почти ортографический side-scroller
const FOV: f32 = PI / 6.0;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, attach_camera_to_rig);
    }
}

/// Camera3d: child rig'а: rig двигает Smoothed Follower, камера едет следом
fn attach_camera_to_rig(mut commands: Commands, rigs: Query<Entity, Added<CameraRig>>) {
    for rig in rigs.iter() {
        commands.entity(rig).insert(Visibility::default()).with_child((
            Camera3d::default(),
            Projection::from(PerspectiveProjection {
                fov: FOV,
                ..default()
            }),
            Transform::from_xyz(0.0, 0.0, -CAMERA_DISTANCE).looking_at(Vec3::ZERO, Vec3::Y),
        ));
    }
}
