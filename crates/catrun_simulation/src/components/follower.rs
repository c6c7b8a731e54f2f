//! SmoothedFollower: общий компонент для camera rig и companion

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Tuning одного follower'а (offset + delay + threshold)
///
/// Camera rig и companion отличаются только этими числами.
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowTuning {
    /// Смещение от позиции цели (world space)
    pub offset: Vec3,
    /// [0, 1): чем ближе к 1, тем сильнее отстаёт
    pub follow_delay: f32,
    /// lerp factor ниже этого порога → не двигаемся (нет micro-jitter в покое)
    pub movement_threshold: f32,
}

impl FollowTuning {
    /// Camera rig: над игроком на 4 единицы
    pub const CAMERA: Self = Self {
        offset: Vec3::new(0.0, 4.0, 0.0),
        follow_delay: 0.9,
        movement_threshold: 0.005,
    };

    /// Companion: над игроком на 1 единицу
    pub const COMPANION: Self = Self {
        offset: Vec3::new(0.0, 1.0, 0.0),
        follow_delay: 0.9,
        movement_threshold: 0.005,
    };
}

impl Default for FollowTuning {
    fn default() -> Self {
        Self::CAMERA
    }
}

/// Follower: каждый frame тянет свой `Transform.translation` к `target + offset`
///
/// Target только читается. `enabled = false` останавливает обновление,
/// entity при этом живёт дальше.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct SmoothedFollower {
    pub target: Entity,
    pub tuning: FollowTuning,
    pub enabled: bool,
}

impl SmoothedFollower {
    pub fn new(target: Entity, tuning: FollowTuning) -> Self {
        Self {
            target,
            tuning,
            enabled: true,
        }
    }

    pub fn start(&mut self) {
        self.enabled = true;
    }

    pub fn stop(&mut self) {
        self.enabled = false;
    }
}
