//! Загрузка уровня и персонажа из glTF
//!
//! После SceneInstanceReady каждый mesh уровня классифицируется по имени
//! (своему или родительского node):
//! - collision → trimesh `Collider` + `LevelGeometry` (видит Ground Probe)
//! - trigger → trimesh `Collider` + `TriggerVolume` (sensor), невидимый
//! - остальное → только визуал

use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use bevy::scene::SceneInstanceReady;
use bevy_rapier3d::prelude::*;
use bevy_rapier3d::rapier::geometry::TriMeshFlags;

use catrun_simulation::{
    log_error, log_info, log_warning, register_level_triggers, ClassifiedLevel, LevelGeometry,
    LevelNodeRole, LevelTriggers,
};

pub const LEVEL_PATH: &str = "levels/ground.glb";
pub const CHARACTER_PATH: &str = "models/cat.glb";

/// Handles, за которыми следим до конца загрузки
#[derive(Resource)]
pub struct LoadingAssets {
    pub level: Handle<Gltf>,
    pub character: Handle<Gltf>,
    pub done: bool,
}

/// Marker: корень сцены уровня
#[derive(Component)]
pub struct LevelRoot;

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_level)
            .add_systems(Update, watch_asset_loads);
    }
}

fn spawn_level(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(LoadingAssets {
        level: asset_server.load(LEVEL_PATH),
        character: asset_server.load(CHARACTER_PATH),
        done: false,
    });

    commands
        .spawn((
            Name::new("level"),
            LevelRoot,
            SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(LEVEL_PATH))),
        ))
        .observe(classify_level_scene);

    log_info(&format!("Loading level {}", LEVEL_PATH));
}

/// Система: упавшая загрузка ассета = выход с ошибкой
fn watch_asset_loads(
    asset_server: Res<AssetServer>,
    mut loading: ResMut<LoadingAssets>,
    mut exit: EventWriter<AppExit>,
) {
    if loading.done {
        return;
    }

    let handles = [
        (LEVEL_PATH, loading.level.clone()),
        (CHARACTER_PATH, loading.character.clone()),
    ];

    let mut all_loaded = true;
    for (path, handle) in &handles {
        match asset_server.get_load_state(handle) {
            Some(LoadState::Failed(err)) => {
                log_error(&format!("Failed to load {}: {}", path, err));
                exit.write(AppExit::error());
                loading.done = true;
                return;
            }
            Some(LoadState::Loaded) => {}
            _ => all_loaded = false,
        }
    }

    if all_loaded {
        log_info("All assets loaded");
        loading.done = true;
    }
}

/// Имя для классификации: своё, или родителя если своё ничего не говорит
fn node_name_for(entity: Entity, names: &Query<&Name>, parents: &Query<&ChildOf>) -> Option<String> {
    let own = names.get(entity).ok().map(|name| name.as_str().to_string());
    if let Some(own) = &own {
        if LevelNodeRole::classify(own) != LevelNodeRole::Decoration {
            return Some(own.clone());
        }
    }

    parents
        .get(entity)
        .ok()
        .and_then(|child_of| names.get(child_of.parent()).ok())
        .map(|name| name.as_str().to_string())
        .or(own)
}

/// Observer: сцена уровня заспавнена → collider'ы и triggers
fn classify_level_scene(
    trigger: Trigger<SceneInstanceReady>,
    mut commands: Commands,
    children: Query<&Children>,
    mesh_nodes: Query<&Mesh3d>,
    names: Query<&Name>,
    parents: Query<&ChildOf>,
    meshes: Res<Assets<Mesh>>,
) {
    let root = trigger.target();

    let named_meshes: Vec<(Entity, String)> = children
        .iter_descendants(root)
        .filter(|entity| mesh_nodes.contains(*entity))
        .filter_map(|entity| node_name_for(entity, &names, &parents).map(|name| (entity, name)))
        .collect();

    let level = ClassifiedLevel::from_named_nodes(
        named_meshes.iter().map(|(entity, name)| (*entity, name.as_str())),
    );

    let trimesh = |entity: Entity| -> Option<Collider> {
        let mesh = meshes.get(&mesh_nodes.get(entity).ok()?.0)?;
        let collider = Collider::from_bevy_mesh(mesh, &ComputedColliderShape::TriMesh(TriMeshFlags::default()));
        if collider.is_none() {
            log_warning(&format!("Mesh {:?} has no usable triangles, skipped", entity));
        }
        collider
    };

    for &entity in &level.geometry {
        if let Some(collider) = trimesh(entity) {
            commands.entity(entity).insert((collider, LevelGeometry));
        }
    }

    let mut triggers = LevelTriggers::default();
    for (entity, kind) in level.triggers.iter() {
        if let Some(collider) = trimesh(entity) {
            commands.entity(entity).insert((collider, Visibility::Hidden));
            triggers.insert(entity, kind);
        }
    }
    register_level_triggers(&mut commands, &triggers);

    log_info(&format!(
        "Level ready: {} collision meshes, {} triggers, {} decoration meshes",
        level.geometry.len(),
        triggers.len(),
        level.decoration.len()
    ));
}
