//! Character компоненты: kinematic tuning и per-frame state
//!
//! Position/orientation персонажа живут в `Transform`
//! (translation = точка "ног", rotation = yaw).
//! Всё остальное (vertical velocity, grounded, jump allowance): в `CharacterState`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Скорость горизонтального движения (units per frame при velocity = 1)
pub const PLAYER_SPEED: f32 = 0.45;
/// Гравитация (units per frame, накапливается × delta time)
pub const GRAVITY: f32 = -2.8;
/// Импульс прыжка; заодно лимит скорости падения
pub const JUMP_FORCE: f32 = 0.8;
/// Скорость поворота (slerp factor per second)
pub const ROTATION_SPEED: f32 = 10.0;
/// Насколько ниже last-grounded позиции персонаж возвращается на якорь
pub const FALL_RECOVERY_DEPTH: f32 = 30.0;

/// Kinematic контроллер компонент
///
/// Tuning персонажа. Displacement считается per frame (не × dt) -
/// движок получает готовое смещение за кадр.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct KinematicController {
    pub move_speed: f32,
    pub gravity: f32,
    pub jump_force: f32,
    pub rotation_speed: f32,
    /// `None`: recovery выключен (падаем бесконечно)
    pub fall_recovery_depth: Option<f32>,
}

impl Default for KinematicController {
    fn default() -> Self {
        Self {
            move_speed: PLAYER_SPEED,
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            rotation_speed: ROTATION_SPEED,
            fall_recovery_depth: Some(FALL_RECOVERY_DEPTH),
        }
    }
}

/// Per-frame state персонажа
///
/// Мутирует только Kinematic Integrator (один раз за frame).
/// Остальные системы (camera, companion, triggers) только читают Transform.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct CharacterState {
    /// Signed: + вверх (прыжок), − вниз (гравитация)
    pub vertical_velocity: f32,
    pub grounded: bool,
    /// Сколько прыжков осталось до следующего приземления
    pub jump_allowance: u32,
    /// Якорь для fall recovery; `None` пока ни разу не стояли на земле
    pub last_grounded_position: Option<Vec3>,
}

impl Default for CharacterState {
    fn default() -> Self {
        Self {
            vertical_velocity: 0.0,
            grounded: false,
            jump_allowance: 1,
            last_grounded_position: None,
        }
    }
}
