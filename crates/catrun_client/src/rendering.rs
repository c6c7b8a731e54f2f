use bevy::prelude::*;

use catrun_simulation::{Companion, Player};

use crate::level::CHARACTER_PATH;

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_lights)
            .add_systems(Update, (spawn_player_visual, spawn_companion_visual));
    }
}

fn setup_lights(mut commands: Commands) {
    // Directional light (sun)
    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_4)),
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        affects_lightmapped_meshes: false,
    });
}

/// Модель кота: child игрока (Transform игрока = точка ног)
fn spawn_player_visual(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    players: Query<Entity, Added<Player>>,
) {
    for player in players.iter() {
        commands.entity(player).insert(Visibility::default()).with_child((
            Name::new("player_model"),
            SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(CHARACTER_PATH))),
        ));
    }
}

/// Companion: светящаяся сфера; уходит вместе с entity по DespawnAfter
fn spawn_companion_visual(
    mut commands: Commands,
    companions: Query<Entity, Added<Companion>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for companion in companions.iter() {
        commands.entity(companion).insert(Visibility::default()).with_child((
            Mesh3d(meshes.add(Sphere::new(0.25))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(1.0, 0.85, 0.4),
                emissive: LinearRgba::rgb(2.0, 1.6, 0.6),
                ..default()
            })),
        ));
    }
}
