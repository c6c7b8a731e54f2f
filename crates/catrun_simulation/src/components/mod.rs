//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - player: markers (Player, Companion, CameraRig)
//! - character: kinematic tuning + per-frame state персонажа
//! - input: InputState (сэмплируется каждый frame)
//! - follower: SmoothedFollower (camera rig + companion)
//! - level: LevelGeometry, TriggerVolume
//! - lifetime: DespawnAfter

pub mod character;
pub mod follower;
pub mod input;
pub mod level;
pub mod lifetime;
pub mod player;

// Re-exports для удобного импорта
pub use character::*;
pub use follower::*;
pub use input::*;
pub use level::*;
pub use lifetime::*;
pub use player::*;
