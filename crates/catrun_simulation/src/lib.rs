//! CATRUN Simulation Core
//!
//! ECS-симуляция 3D side-scroller'а на Bevy 0.16:
//! - Input Sampler → Ground Probe → Kinematic Integrator → move-with-collision (Update)
//! - Smoothed Followers (camera rig, companion) → Trigger Dispatcher (PostUpdate)
//!
//! Collision queries: через backend: bevy_rapier3d (клиент) или
//! headless платформы (тесты, headless бинарь).

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod autopilot;
pub mod components;
pub mod follow;
pub mod input;
pub mod level;
pub mod lifetime;
pub mod logger;
pub mod physics;
pub mod scene;
pub mod settings;
pub mod triggers;

// Re-export базовых типов для удобства
pub use autopilot::{Autopilot, AutopilotPlugin};
pub use components::*;
pub use follow::{follow_lerp_factor, follow_step, FollowPlugin, FollowSet};
pub use input::KeySnapshot;
pub use level::{ClassifiedLevel, LevelNodeRole};
pub use lifetime::LifetimePlugin;
pub use logger::{
    init_logger, log, log_error, log_info, log_level, log_warning, log_with_level, set_log_level,
    set_logger, set_logger_if_needed, ConsoleLogger, LogLevel, LogPrinter,
};
pub use physics::{
    probe_ground, step_character, CharacterSet, GroundHit, HeadlessLevel, KinematicControllerPlugin,
    PendingMotion, PhysicsBackend, Platform, RayCaster, TriggerBounds,
};
pub use scene::{spawn_camera_rig, spawn_companion, spawn_scene, SceneEntities};
pub use settings::{GameSettings, SettingsError};
pub use triggers::{register_level_triggers, LevelTriggers, Outcome, OutcomeEvent, TriggerPlugin, TriggerSet};

/// Длительность frame'а в headless прогонах (60 fps)
pub const HEADLESS_FRAME: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin {
    pub physics: PhysicsBackend,
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self {
            physics: PhysicsBackend::Rapier,
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameSettings>().add_plugins((
            KinematicControllerPlugin {
                backend: self.physics,
            },
            FollowPlugin,
            TriggerPlugin,
            LifetimePlugin,
        ));

        // PostUpdate: followers → trigger dispatcher
        app.configure_sets(PostUpdate, FollowSet.before(TriggerSet));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время frame'а фиксировано (`HEADLESS_FRAME`), поэтому прогон воспроизводим.
/// Первый `update()` даёт delta = 0 (Time ещё не стартовал).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(TimeUpdateStrategy::ManualDuration(HEADLESS_FRAME));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Debug-формат как сериализация (для сравнения байт-в-байт хватает)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
