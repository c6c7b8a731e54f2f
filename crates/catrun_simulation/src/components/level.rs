//! Level компоненты: collidable геометрия и trigger volumes

use bevy::prelude::*;

/// Marker: pickable + enabled геометрия уровня
///
/// Ground Probe видит только entity с этим компонентом.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct LevelGeometry;

/// К какому набору принадлежит trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum TriggerKind {
    Success,
    Failure,
}

/// Trigger volume уровня
///
/// Без физического отклика (sensor). Срабатывает один раз -
/// на первый intersection-enter с коллайдером игрока.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct TriggerVolume {
    pub kind: TriggerKind,
    /// Latch: true после первого срабатывания
    pub fired: bool,
}

impl TriggerVolume {
    pub fn new(kind: TriggerKind) -> Self {
        Self { kind, fired: false }
    }
}
