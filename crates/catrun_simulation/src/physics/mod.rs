//! Physics simulation module
//!
//! Kinematic контроллер персонажа: ground probe, интеграция, move-with-collision.
//! Collision queries: через backend (Rapier или headless).

pub mod ground;
pub mod headless;
pub mod movement;
pub mod rapier;

use bevy::prelude::*;
use bevy_rapier3d::prelude::CollisionEvent;

// Re-export основных типов
pub use ground::{probe_ground, GroundHit, RayCaster, PROBE_HEIGHT, PROBE_LENGTH};
pub use headless::{HeadlessContacts, HeadlessLevel, Platform, TriggerBounds};
pub use movement::{
    facing_rotation, horizontal_displacement, kinematic_character_bundle, spawn_kinematic_character,
    step_character, PendingMotion,
};

use crate::input::sample_player_input;
use crate::triggers::TriggerSet;

/// Кто отвечает за ray casts и move-with-collision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhysicsBackend {
    /// bevy_rapier3d (клиент добавляет RapierPhysicsPlugin сам)
    #[default]
    Rapier,
    /// HeadlessLevel resource (тесты, headless бинарь)
    Headless,
}

/// Порядок per-frame цепочки персонажа (Update)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterSet {
    Input,
    Probe,
    Integrate,
    Move,
}

/// Plugin для kinematic контроллера
///
/// Порядок выполнения (Update, строго последовательно):
/// 1. Input: sample_player_input
/// 2. Probe: ground probe (backend)
/// 3. Integrate: integrate_character_motion
/// 4. Move: PendingMotion → backend move-with-collision
pub struct KinematicControllerPlugin {
    pub backend: PhysicsBackend,
}

impl Plugin for KinematicControllerPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<crate::components::KinematicController>()
            .register_type::<crate::components::CharacterState>()
            .register_type::<crate::components::InputState>()
            .register_type::<GroundHit>()
            .register_type::<PendingMotion>()
            // Rapier plugin тоже регистрирует, повторный add_event: no-op
            .add_event::<CollisionEvent>()
            // Без InputPlugin (headless) ресурс никто не создаст
            .init_resource::<ButtonInput<KeyCode>>();

        app.configure_sets(
            Update,
            (
                CharacterSet::Input,
                CharacterSet::Probe,
                CharacterSet::Integrate,
                CharacterSet::Move,
            )
                .chain(),
        );

        app.add_systems(Update, sample_player_input.in_set(CharacterSet::Input))
            .add_systems(
                Update,
                movement::integrate_character_motion.in_set(CharacterSet::Integrate),
            );

        match self.backend {
            PhysicsBackend::Rapier => {
                app.add_systems(
                    Update,
                    (
                        (rapier::insert_rapier_character_body, rapier::insert_rapier_trigger_sensor)
                            .before(CharacterSet::Input),
                        rapier::probe_ground_rapier.in_set(CharacterSet::Probe),
                        rapier::apply_motion_rapier.in_set(CharacterSet::Move),
                    ),
                );
            }
            PhysicsBackend::Headless => {
                app.init_resource::<HeadlessContacts>()
                    .register_type::<TriggerBounds>()
                    .add_systems(
                        Update,
                        (
                            headless::probe_ground_headless.in_set(CharacterSet::Probe),
                            headless::apply_motion_headless.in_set(CharacterSet::Move),
                        ),
                    )
                    .add_systems(
                        PostUpdate,
                        (
                            headless::forget_removed_contacts,
                            headless::detect_trigger_overlaps_headless,
                        )
                            .chain()
                            .before(TriggerSet),
                    );
            }
        }
    }
}
