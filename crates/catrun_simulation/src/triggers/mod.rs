//! Trigger Dispatcher
//!
//! Intersection-enter (игрок × trigger volume) → `OutcomeEvent`.
//!
//! Источник intersection'ов: `CollisionEvent::Started` (шлёт Rapier для sensors,
//! или headless backend). Диспетчер не знает, какой backend работает.
//!
//! Каждый trigger срабатывает максимум один раз (latch `fired`).
//! Game state не трогаем: что делать с Win/Lose, решает подписчик.

use bevy::prelude::*;
use bevy_rapier3d::plugin::PhysicsSet;
use bevy_rapier3d::prelude::CollisionEvent;

use crate::components::{Player, TriggerKind, TriggerVolume};

/// Dispatcher: после Rapier writeback (sensor events уже собраны)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerSet;

/// Исход уровня
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum Outcome {
    Win,
    Lose,
}

impl From<TriggerKind> for Outcome {
    fn from(kind: TriggerKind) -> Self {
        match kind {
            TriggerKind::Success => Outcome::Win,
            TriggerKind::Failure => Outcome::Lose,
        }
    }
}

/// Event: игрок впервые вошёл в trigger volume
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeEvent {
    pub outcome: Outcome,
    pub trigger: Entity,
    pub character: Entity,
}

/// Trigger entities уровня, два непересекающихся набора
///
/// Собирается при загрузке уровня. Entity попадает максимум в один набор:
/// повторная регистрация игнорируется.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelTriggers {
    pub success: Vec<Entity>,
    pub failure: Vec<Entity>,
}

impl LevelTriggers {
    /// Добавляет trigger; false если entity уже зарегистрирован (в любом наборе)
    pub fn insert(&mut self, entity: Entity, kind: TriggerKind) -> bool {
        if self.contains(entity) {
            return false;
        }

        match kind {
            TriggerKind::Success => self.success.push(entity),
            TriggerKind::Failure => self.failure.push(entity),
        }
        true
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.success.contains(&entity) || self.failure.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.success.len() + self.failure.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Все triggers вместе с их kind
    pub fn iter(&self) -> impl Iterator<Item = (Entity, TriggerKind)> + '_ {
        self.success
            .iter()
            .map(|&entity| (entity, TriggerKind::Success))
            .chain(self.failure.iter().map(|&entity| (entity, TriggerKind::Failure)))
    }
}

/// Вешает `TriggerVolume` на trigger entities уровня
///
/// Sensor флаги (для Rapier) добавит backend на `Added<TriggerVolume>`.
pub fn register_level_triggers(commands: &mut Commands, triggers: &LevelTriggers) {
    for (entity, kind) in triggers.iter() {
        commands.entity(entity).insert(TriggerVolume::new(kind));
    }

    crate::log_info(&format!(
        "Registered {} success / {} failure triggers",
        triggers.success.len(),
        triggers.failure.len()
    ));
}

/// Порядок пары в CollisionEvent не гарантирован: ищем, кто из двух игрок
fn player_and_trigger(
    a: Entity,
    b: Entity,
    players: &Query<(), With<Player>>,
) -> Option<(Entity, Entity)> {
    if players.contains(a) {
        Some((a, b))
    } else if players.contains(b) {
        Some((b, a))
    } else {
        None
    }
}

/// Система: CollisionEvent::Started → OutcomeEvent (один раз на trigger)
pub fn dispatch_trigger_outcomes(
    mut collision_events: EventReader<CollisionEvent>,
    players: Query<(), With<Player>>,
    mut triggers: Query<&mut TriggerVolume>,
    mut outcome_events: EventWriter<OutcomeEvent>,
) {
    for event in collision_events.read() {
        let CollisionEvent::Started(a, b, _) = event else {
            continue;
        };

        let Some((character, trigger)) = player_and_trigger(*a, *b, &players) else {
            continue;
        };

        // Не trigger (стена, пол): не наше дело
        let Ok(mut volume) = triggers.get_mut(trigger) else {
            continue;
        };

        if volume.fired {
            continue;
        }
        volume.fired = true;

        let outcome = Outcome::from(volume.kind);
        crate::log_info(&format!("Trigger {:?} fired: {:?}", trigger, outcome));

        outcome_events.write(OutcomeEvent {
            outcome,
            trigger,
            character,
        });
    }
}

/// Plugin: Trigger Dispatcher в PostUpdate
pub struct TriggerPlugin;

impl Plugin for TriggerPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<TriggerVolume>()
            .add_event::<OutcomeEvent>()
            .add_event::<CollisionEvent>()
            .configure_sets(PostUpdate, TriggerSet.after(PhysicsSet::Writeback))
            .add_systems(PostUpdate, dispatch_trigger_outcomes.in_set(TriggerSet));
    }
}
