//! Input Sampler
//!
//! Каждый frame читает текущее key-down состояние (`ButtonInput<KeyCode>`)
//! и пересчитывает `InputState` игрока. Никакой очереди событий и debouncing.
//!
//! Easing скорости: 0.5 за frame (frame-rate dependent:
//! на 30 fps разгон медленнее, чем на 144 fps).

use bevy::prelude::*;

use crate::components::{InputState, MoveDirection, Player};

/// Доля, на которую velocity приближается к 1 за один frame
pub const INPUT_ACCELERATION: f32 = 0.5;

pub const LEFT_KEYS: [KeyCode; 2] = [KeyCode::KeyA, KeyCode::ArrowLeft];
pub const RIGHT_KEYS: [KeyCode; 2] = [KeyCode::KeyD, KeyCode::ArrowRight];
pub const JUMP_KEYS: [KeyCode; 2] = [KeyCode::KeyW, KeyCode::Space];

/// Сырые key-down флаги за frame (уже сведённые из конкретных клавиш)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeySnapshot {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl KeySnapshot {
    pub fn from_keys(keys: &ButtonInput<KeyCode>) -> Self {
        Self {
            left: keys.any_pressed(LEFT_KEYS),
            right: keys.any_pressed(RIGHT_KEYS),
            jump: keys.any_pressed(JUMP_KEYS),
        }
    }
}

impl InputState {
    /// Один сэмпл input'а
    ///
    /// Left важнее Right (если зажаты обе: идём влево).
    /// Отпустили направление → velocity и direction сразу 0, без торможения.
    pub fn sample(&mut self, keys: KeySnapshot) {
        let direction = if keys.left {
            MoveDirection::Left
        } else if keys.right {
            MoveDirection::Right
        } else {
            MoveDirection::None
        };

        if direction.is_moving() {
            self.velocity += (1.0 - self.velocity) * INPUT_ACCELERATION;
        } else {
            self.velocity = 0.0;
        }
        self.direction = direction;
        self.jump_requested = keys.jump;
    }
}

/// Система: keyboard → InputState игрока
pub fn sample_player_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut query: Query<&mut InputState, With<Player>>,
) {
    let snapshot = KeySnapshot::from_keys(&keys);

    for mut input in query.iter_mut() {
        input.sample(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEFT: KeySnapshot = KeySnapshot { left: true, right: false, jump: false };
    const RIGHT: KeySnapshot = KeySnapshot { left: false, right: true, jump: false };
    const NOTHING: KeySnapshot = KeySnapshot { left: false, right: false, jump: false };

    #[test]
    fn test_velocity_eases_toward_one() {
        let mut input = InputState::default();

        input.sample(LEFT);
        assert_eq!(input.velocity, 0.5);
        input.sample(LEFT);
        assert_eq!(input.velocity, 0.75);
        input.sample(LEFT);
        assert_eq!(input.velocity, 0.875);

        for _ in 0..64 {
            input.sample(LEFT);
        }
        assert!(input.velocity <= 1.0);
        assert!(input.velocity > 0.999);
    }

    #[test]
    fn test_direction_signs() {
        let mut input = InputState::default();

        input.sample(LEFT);
        assert_eq!(input.direction, MoveDirection::Left);
        assert_eq!(input.direction.sign(), 1.0);

        input.sample(RIGHT);
        assert_eq!(input.direction, MoveDirection::Right);
        assert_eq!(input.direction.sign(), -1.0);
    }

    #[test]
    fn test_release_snaps_to_zero() {
        let mut input = InputState::default();
        input.sample(LEFT);
        input.sample(LEFT);

        input.sample(NOTHING);

        // Никакого residual glide
        assert_eq!(input.velocity, 0.0);
        assert_eq!(input.direction, MoveDirection::None);
    }

    #[test]
    fn test_left_wins_over_right() {
        let mut input = InputState::default();
        input.sample(KeySnapshot { left: true, right: true, jump: false });

        assert_eq!(input.direction, MoveDirection::Left);
    }

    #[test]
    fn test_switching_direction_keeps_velocity_ramp() {
        let mut input = InputState::default();
        input.sample(LEFT);
        input.sample(RIGHT);

        // Смена направления без отпускания: velocity продолжает расти
        assert_eq!(input.velocity, 0.75);
        assert_eq!(input.direction, MoveDirection::Right);
    }

    #[test]
    fn test_jump_is_level_not_edge() {
        let mut input = InputState::default();
        let held = KeySnapshot { left: false, right: false, jump: true };

        input.sample(held);
        assert!(input.jump_requested);
        input.sample(held);
        assert!(input.jump_requested);

        input.sample(NOTHING);
        assert!(!input.jump_requested);
    }

    #[test]
    fn test_key_snapshot_from_button_input() {
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::ArrowRight);
        keys.press(KeyCode::Space);

        let snapshot = KeySnapshot::from_keys(&keys);

        assert!(!snapshot.left);
        assert!(snapshot.right);
        assert!(snapshot.jump);
    }
}
