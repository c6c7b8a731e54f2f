//! Headless симуляция CATRUN
//!
//! Без рендера и Rapier: платформы уровня + autopilot вместо клавиатуры.
//! Аргументы: `[seed] [settings.json]`.

use bevy::prelude::*;
use catrun_simulation::{
    create_headless_app, init_logger, log_info, log_warning, spawn_scene, AutopilotPlugin, CharacterState,
    GameSettings, HeadlessLevel, OutcomeEvent, PhysicsBackend, Platform, SimulationPlugin,
    TriggerBounds, TriggerKind, TriggerVolume,
};

const TICKS: usize = 3600;

/// Длинная платформа с уступом и trigger'ами по краям
fn demo_level() -> HeadlessLevel {
    HeadlessLevel::new(vec![
        Platform::new(Vec2::new(-20.0, -5.0), Vec2::new(20.0, 5.0), 0.0),
        Platform::new(Vec2::new(6.0, -5.0), Vec2::new(9.0, 5.0), 0.6),
    ])
}

fn spawn_demo_triggers(world: &mut World) {
    world.spawn((
        Name::new("trigger_success"),
        Transform::from_xyz(18.0, 0.5, 0.0),
        TriggerBounds {
            half_extents: Vec3::splat(1.0),
        },
        TriggerVolume::new(TriggerKind::Success),
    ));
    world.spawn((
        Name::new("trigger_failure"),
        Transform::from_xyz(-18.0, 0.5, 0.0),
        TriggerBounds {
            half_extents: Vec3::splat(1.0),
        },
        TriggerVolume::new(TriggerKind::Failure),
    ));
}

fn report_outcomes(mut outcomes: EventReader<OutcomeEvent>, time: Res<Time>) {
    for event in outcomes.read() {
        log_info(&format!(
            "Outcome {:?} at {:.2}s (trigger {:?})",
            event.outcome,
            time.elapsed_secs(),
            event.trigger
        ));
    }
}

fn main() {
    init_logger();
    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|raw| match raw.parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(err) => {
                log_warning(&format!("Bad seed '{}': {}, using 42", raw, err));
                None
            }
        })
        .unwrap_or(42);
    let settings = args
        .next()
        .map(GameSettings::load_or_default)
        .unwrap_or_default();

    let mut app = create_headless_app(seed);
    log_info(&format!("Starting CATRUN headless simulation (seed: {})", seed));

    app.insert_resource(settings)
        .insert_resource(demo_level())
        .add_plugins((
            SimulationPlugin {
                physics: PhysicsBackend::Headless,
            },
            AutopilotPlugin,
        ))
        .add_systems(PostUpdate, report_outcomes);

    let scene = {
        let world = app.world_mut();
        spawn_demo_triggers(world);
        let scene = {
            let mut commands = world.commands();
            spawn_scene(&mut commands, Vec3::new(0.0, 2.0, 0.0), &settings)
        };
        world.flush();
        scene
    };

    for tick in 0..TICKS {
        app.update();

        if tick % 600 == 0 {
            let world = app.world();
            if let (Some(transform), Some(state)) = (
                world.get::<Transform>(scene.player),
                world.get::<CharacterState>(scene.player),
            ) {
                log_info(&format!(
                    "Tick {}: player at {:?}, grounded {}, {} entities",
                    tick,
                    transform.translation,
                    state.grounded,
                    world.entities().len()
                ));
            }
        }
    }

    log_info("Simulation complete!");
}
