//! Input компоненты

use bevy::prelude::*;

/// Направление движения по оси X
///
/// Знак как в исходной сцене: Left = +1, Right = −1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum MoveDirection {
    Left,
    Right,
    #[default]
    None,
}

impl MoveDirection {
    pub fn sign(self) -> f32 {
        match self {
            MoveDirection::Left => 1.0,
            MoveDirection::Right => -1.0,
            MoveDirection::None => 0.0,
        }
    }

    pub fn is_moving(self) -> bool {
        self != MoveDirection::None
    }
}

/// Нормализованный input игрока за текущий frame
///
/// Пишет Input Sampler, читает Kinematic Integrator (read-only).
/// `jump_requested`: уровень, а не фронт: true каждый frame пока клавиша зажата.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct InputState {
    pub direction: MoveDirection,
    /// [0, 1], плавно растёт к 1 пока клавиша направления зажата
    pub velocity: f32,
    pub jump_requested: bool,
}
