//! Kinematic контроллер персонажа
//!
//! Архитектура:
//! - Input Sampler → InputState
//! - Ground Probe → GroundHit
//! - `integrate_character_motion`: input + gravity + jump + ground snap → PendingMotion
//! - backend (rapier KinematicCharacterController / headless) применяет PendingMotion
//!   с collision response
//!
//! Displacement: per frame: горизонталь и vertical velocity не домножаются на dt,
//! dt участвует только в накоплении гравитации и в скорости поворота.

use std::f32::consts::PI;

use bevy::prelude::*;

use super::ground::GroundHit;
use crate::components::{CharacterState, InputState, KinematicController, MoveDirection, Player};

/// Смещение за этот frame, которое backend должен применить с коллизиями
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PendingMotion(pub Vec3);

/// Горизонтальное смещение за frame
///
/// velocity²: квадратичный easing разгона (velocity входит дважды).
pub fn horizontal_displacement(input: &InputState, move_speed: f32) -> Vec3 {
    let x = input.direction.sign() * input.velocity * input.velocity * move_speed;
    Vec3::new(x, 0.0, 0.0)
}

/// Целевой yaw для направления движения; `None`: поворот заморожен
pub fn facing_rotation(direction: MoveDirection) -> Option<Quat> {
    if !direction.is_moving() {
        return None;
    }

    // atan2(direction, 0), не atan(direction / 0)
    let angle = direction.sign().atan2(0.0) - PI;
    Some(Quat::from_rotation_y(-angle))
}

impl CharacterState {
    /// Шаг гравитации / приземления
    ///
    /// В воздухе: накапливаем gravity × dt.
    /// На земле: snap к точке контакта, запоминаем якорь, гасим vertical velocity,
    /// возвращаем один прыжок.
    pub fn land_or_fall(
        &mut self,
        ground: GroundHit,
        translation: &mut Vec3,
        gravity: f32,
        delta: f32,
    ) {
        match ground {
            GroundHit::Miss => {
                self.grounded = false;
                self.vertical_velocity += gravity * delta;
            }
            GroundHit::Hit { point } => {
                *translation = point;
                self.grounded = true;
                self.last_grounded_position = Some(point);
                self.vertical_velocity = 0.0;
                self.jump_allowance = 1;
            }
        }
    }

    /// Скорость падения не больше импульса прыжка
    pub fn clamp_fall_speed(&mut self, jump_force: f32) {
        if self.vertical_velocity < -jump_force {
            self.vertical_velocity = -jump_force;
        }
    }

    /// Прыжок, если запрошен и остался allowance. Возвращает true если прыгнули.
    pub fn try_jump(&mut self, requested: bool, jump_force: f32) -> bool {
        if requested && self.jump_allowance > 0 {
            self.vertical_velocity = jump_force;
            self.jump_allowance -= 1;
            return true;
        }
        false
    }

    /// Возврат на last-grounded якорь после падения глубже `depth`
    pub fn recover_from_fall(&mut self, translation: &mut Vec3, depth: Option<f32>) -> bool {
        let (Some(depth), Some(anchor)) = (depth, self.last_grounded_position) else {
            return false;
        };

        if translation.y >= anchor.y - depth {
            return false;
        }

        *translation = anchor;
        self.vertical_velocity = 0.0;
        true
    }
}

/// Один шаг Kinematic Integrator для одного персонажа
///
/// Мутирует state и transform (rotation + ground snap),
/// возвращает смещение для move-with-collision.
pub fn step_character(
    controller: &KinematicController,
    state: &mut CharacterState,
    transform: &mut Transform,
    input: &InputState,
    ground: GroundHit,
    delta: f32,
) -> Vec3 {
    // 1. Горизонталь
    let horizontal = horizontal_displacement(input, controller.move_speed);

    // 2. Поворот (только yaw); без input: rotation не трогаем вообще
    if let Some(target) = facing_rotation(input.direction) {
        let t = (controller.rotation_speed * delta).clamp(0.0, 1.0);
        transform.rotation = transform.rotation.slerp(target, t);
    }

    // 3. Ground
    state.land_or_fall(ground, &mut transform.translation, controller.gravity, delta);
    if !state.grounded && state.recover_from_fall(&mut transform.translation, controller.fall_recovery_depth) {
        crate::log_info(&format!(
            "Character fell below recovery depth, returned to {:?}",
            transform.translation
        ));
    }

    // 4. Clamp
    state.clamp_fall_speed(controller.jump_force);

    // 5. Jump
    state.try_jump(input.jump_requested, controller.jump_force);

    // 6. Смещение для движка
    horizontal + Vec3::Y * state.vertical_velocity
}

/// Система: Kinematic Integrator
///
/// Читает InputState + GroundHit, пишет CharacterState, Transform (rotation, snap)
/// и PendingMotion.
pub fn integrate_character_motion(
    time: Res<Time>,
    mut query: Query<(
        &KinematicController,
        &mut CharacterState,
        &InputState,
        &GroundHit,
        &mut Transform,
        &mut PendingMotion,
    )>,
) {
    let delta = time.delta_secs();

    for (controller, mut state, input, ground, mut transform, mut motion) in query.iter_mut() {
        let was_grounded = state.grounded;

        motion.0 = step_character(controller, &mut state, &mut transform, input, *ground, delta);

        if state.grounded && !was_grounded {
            crate::log(&format!("Character landed at {:?}", transform.translation));
        }
    }
}

/// Компоненты kinematic персонажа (без physics backend'а)
///
/// Rapier body/collider добавляет backend plugin на `Added<KinematicController>`.
pub fn kinematic_character_bundle(position: Vec3, controller: KinematicController) -> impl Bundle {
    (
        Transform::from_translation(position),
        controller,
        CharacterState::default(),
        InputState::default(),
        GroundHit::default(),
        PendingMotion::default(),
    )
}

/// Spawn helper для игрока
pub fn spawn_kinematic_character(
    commands: &mut Commands,
    position: Vec3,
    controller: KinematicController,
) -> Entity {
    commands
        .spawn((
            Name::new("player"),
            Player,
            kinematic_character_bundle(position, controller),
        ))
        .id()
}
