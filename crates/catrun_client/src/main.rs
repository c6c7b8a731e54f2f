use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use catrun_simulation::{spawn_scene, GameSettings, PhysicsBackend, SimulationPlugin};

mod camera;
mod level;
mod logging;
mod outcome;
mod rendering;

use camera::CameraPlugin;
use level::LevelPlugin;
use outcome::OutcomePlugin;
use rendering::RenderingPlugin;

const SETTINGS_PATH: &str = "assets/settings.json";
const SPAWN_POINT: Vec3 = Vec3::new(0.0, 3.0, 0.0);

fn main() {
    catrun_simulation::set_logger(Box::new(logging::FileLogger::open(logging::LOG_FILE)));
    logging::log_session_start();

    let settings = GameSettings::load_or_default(SETTINGS_PATH);

    App::new()
        // Bevy defaults (rendering, input, time, etc.)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "CATRUN".to_string(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        // Physics: ray casts, kinematic character controller, sensors
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        // Simulation (input → probe → integrate → followers → triggers)
        .insert_resource(settings)
        .add_plugins(SimulationPlugin {
            physics: PhysicsBackend::Rapier,
        })
        .add_plugins((LevelPlugin, CameraPlugin, RenderingPlugin, OutcomePlugin))
        .add_systems(Startup, setup_scene)
        .run();
}

fn setup_scene(mut commands: Commands, settings: Res<GameSettings>) {
    spawn_scene(&mut commands, SPAWN_POINT, &settings);
}
