//! Autopilot: seeded "нажатия клавиш" для headless прогонов
//!
//! Пишет прямо в `ButtonInput<KeyCode>`: Input Sampler не отличает
//! autopilot от живой клавиатуры. Вся случайность из `DeterministicRng`,
//! поэтому один seed = одна и та же последовательность нажатий.

use bevy::prelude::*;
use rand::Rng;

use crate::input::{JUMP_KEYS, LEFT_KEYS, RIGHT_KEYS};
use crate::physics::CharacterSet;
use crate::DeterministicRng;

/// Минимальная / максимальная длина одного "жеста" в frames
const MIN_SEGMENT_FRAMES: u32 = 5;
const MAX_SEGMENT_FRAMES: u32 = 60;
/// Вероятность зажать jump в новом жесте
const JUMP_CHANCE: f64 = 0.25;

/// Текущий жест autopilot'а
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct Autopilot {
    pub held: Vec<KeyCode>,
    pub frames_left: u32,
}

impl Autopilot {
    /// Следующий жест: направление (left / right / стоим) + возможно jump
    fn next_segment(rng: &mut impl Rng) -> (Vec<KeyCode>, u32) {
        let mut held = Vec::new();

        match rng.gen_range(0..3) {
            0 => held.push(LEFT_KEYS[0]),
            1 => held.push(RIGHT_KEYS[0]),
            _ => {}
        }
        if rng.gen_bool(JUMP_CHANCE) {
            held.push(JUMP_KEYS[0]);
        }

        (held, rng.gen_range(MIN_SEGMENT_FRAMES..=MAX_SEGMENT_FRAMES))
    }
}

/// Система: держит текущий жест, по истечении выбирает новый
pub fn drive_autopilot(
    mut autopilot: ResMut<Autopilot>,
    mut rng: ResMut<DeterministicRng>,
    mut keys: ResMut<ButtonInput<KeyCode>>,
) {
    if autopilot.frames_left > 0 {
        autopilot.frames_left -= 1;
        return;
    }

    for key in autopilot.held.drain(..) {
        keys.release(key);
    }

    let (held, frames) = Autopilot::next_segment(&mut rng.rng);
    for key in &held {
        keys.press(*key);
    }
    autopilot.held = held;
    autopilot.frames_left = frames;
}

pub struct AutopilotPlugin;

impl Plugin for AutopilotPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Autopilot>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_systems(Update, drive_autopilot.before(CharacterSet::Input));
    }
}
