//! Game settings (JSON)
//!
//! Все tunables в одном файле. Любое поле можно опустить: возьмётся default
//! (те же константы, что в компонентах).
//!
//! ```json
//! {
//!   "character": { "move_speed": 0.6, "fall_recovery_depth": null },
//!   "companion": { "follow_delay": 0.8 },
//!   "companion_lifetime_secs": 60.0
//! }
//! ```

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{FollowTuning, KinematicController};

/// Время жизни companion'а по умолчанию (секунды)
pub const COMPANION_LIFETIME_SECS: f32 = 150.0;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunables игры (resource)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub character: KinematicController,
    pub camera: FollowTuning,
    pub companion: FollowTuning,
    pub companion_lifetime_secs: f32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            character: KinematicController::default(),
            camera: FollowTuning::CAMERA,
            companion: FollowTuning::COMPANION,
            companion_lifetime_secs: COMPANION_LIFETIME_SECS,
        }
    }
}

impl GameSettings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Загрузка с fallback на defaults (ошибка → warning в лог)
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                crate::log_info(&format!("Loaded settings from {}", path.display()));
                settings
            }
            Err(err) => {
                crate::log_warning(&format!(
                    "Settings {} not applied ({}), using defaults",
                    path.display(),
                    err
                ));
                Self::default()
            }
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// follow_delay вне [0, 1) ломает формулу follower'а (factor ≤ 0 или > 1);
    /// отрицательные threshold и lifetime не имеют смысла
    fn validate(&self) -> Result<(), SettingsError> {
        for (field, tuning) in [
            ("camera.follow_delay", &self.camera),
            ("companion.follow_delay", &self.companion),
        ] {
            if !(0.0..1.0).contains(&tuning.follow_delay) {
                return Err(SettingsError::Invalid {
                    field,
                    reason: format!("{} is outside [0, 1)", tuning.follow_delay),
                });
            }
        }

        for (field, tuning) in [
            ("camera.movement_threshold", &self.camera),
            ("companion.movement_threshold", &self.companion),
        ] {
            if tuning.movement_threshold < 0.0 {
                return Err(SettingsError::Invalid {
                    field,
                    reason: "must be non-negative".to_string(),
                });
            }
        }

        if self.companion_lifetime_secs < 0.0 {
            return Err(SettingsError::Invalid {
                field: "companion_lifetime_secs",
                reason: "must be non-negative".to_string(),
            });
        }

        if self.character.jump_force < 0.0 {
            return Err(SettingsError::Invalid {
                field: "character.jump_force",
                reason: "must be non-negative".to_string(),
            });
        }

        Ok(())
    }
}
