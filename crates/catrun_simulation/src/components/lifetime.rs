//! Lifetime компонент: отложенный despawn

use bevy::prelude::*;

/// Despawn entity (вместе с children) через `remaining` секунд
///
/// Companion уходит из сцены по этому таймеру.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DespawnAfter {
    pub remaining: f32,
}

impl DespawnAfter {
    pub fn seconds(seconds: f32) -> Self {
        Self { remaining: seconds }
    }

    /// Возвращает true когда время вышло
    pub fn tick(&mut self, delta: f32) -> bool {
        self.remaining -= delta;
        self.remaining <= 0.0
    }
}
