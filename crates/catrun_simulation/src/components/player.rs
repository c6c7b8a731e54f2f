//! Marker components: кто есть кто в сцене

use bevy::prelude::*;

/// Marker component для player-controlled персонажа
///
/// Input Sampler пишет только в entity `With<Player>`.
/// Trigger Dispatcher считает intersection только с коллайдером игрока.
///
/// # Single-player
/// В сцене ровно один entity с этим компонентом.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Marker: companion, который бегает за игроком
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Companion;

/// Marker: корень camera rig (сама Camera3d: child этого entity в клиенте)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct CameraRig;
