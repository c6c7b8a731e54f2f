//! Spawn helpers для сцены: игрок, companion, camera rig
//!
//! Только simulation-компоненты. Визуал (mesh, Camera3d, glTF модель)
//! клиент вешает children'ами на возвращённые entity.

use std::f32::consts::PI;

use bevy::prelude::*;

use crate::components::{CameraRig, Companion, DespawnAfter, SmoothedFollower};
use crate::physics::spawn_kinematic_character;
use crate::settings::GameSettings;

/// Все три entity сцены
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneEntities {
    pub player: Entity,
    pub companion: Entity,
    pub camera_rig: Entity,
}

/// Companion: над игроком, уходит через `lifetime_secs`
pub fn spawn_companion(
    commands: &mut Commands,
    player: Entity,
    player_position: Vec3,
    settings: &GameSettings,
) -> Entity {
    commands
        .spawn((
            Name::new("companion"),
            Companion,
            Transform::from_translation(player_position + settings.companion.offset),
            SmoothedFollower::new(player, settings.companion),
            DespawnAfter::seconds(settings.companion_lifetime_secs),
        ))
        .id()
}

/// Camera rig: развёрнут на 180° вокруг Y (камера смотрит игроку в спину)
pub fn spawn_camera_rig(
    commands: &mut Commands,
    player: Entity,
    player_position: Vec3,
    settings: &GameSettings,
) -> Entity {
    commands
        .spawn((
            Name::new("camera_rig"),
            CameraRig,
            Transform::from_translation(player_position + settings.camera.offset)
                .with_rotation(Quat::from_rotation_y(PI)),
            SmoothedFollower::new(player, settings.camera),
        ))
        .id()
}

/// Игрок + companion + camera rig
pub fn spawn_scene(commands: &mut Commands, spawn_point: Vec3, settings: &GameSettings) -> SceneEntities {
    let player = spawn_kinematic_character(commands, spawn_point, settings.character);
    let companion = spawn_companion(commands, player, spawn_point, settings);
    let camera_rig = spawn_camera_rig(commands, player, spawn_point, settings);

    crate::log_info(&format!(
        "Scene spawned at {:?}: player {:?}, companion {:?}, camera rig {:?}",
        spawn_point, player, companion, camera_rig
    ));

    SceneEntities {
        player,
        companion,
        camera_rig,
    }
}
