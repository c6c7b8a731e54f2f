//! Level Classifier
//!
//! Импортированная сцена уровня: плоский набор именованных nodes.
//! Роль node определяется по подстрокам имени:
//!
//! | имя содержит                | роль              |
//! |-----------------------------|-------------------|
//! | `collision`                 | геометрия (probe + коллизии) |
//! | `trigger` + `success`       | success trigger   |
//! | `trigger` + `failure`       | failure trigger   |
//! | остальное                   | декорация         |
//!
//! Проверки идут сверху вниз, первая совпавшая побеждает.

use bevy::prelude::*;

use crate::components::TriggerKind;
use crate::triggers::LevelTriggers;

/// Роль node уровня
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelNodeRole {
    Collision,
    SuccessTrigger,
    FailureTrigger,
    Decoration,
}

impl LevelNodeRole {
    pub fn classify(name: &str) -> Self {
        if name.contains("collision") {
            return LevelNodeRole::Collision;
        }

        if name.contains("trigger") {
            if name.contains("success") {
                return LevelNodeRole::SuccessTrigger;
            }
            if name.contains("failure") {
                return LevelNodeRole::FailureTrigger;
            }
        }

        LevelNodeRole::Decoration
    }

    pub fn trigger_kind(self) -> Option<TriggerKind> {
        match self {
            LevelNodeRole::SuccessTrigger => Some(TriggerKind::Success),
            LevelNodeRole::FailureTrigger => Some(TriggerKind::Failure),
            _ => None,
        }
    }
}

/// Результат классификации всей сцены уровня
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedLevel {
    /// Pickable + collidable
    pub geometry: Vec<Entity>,
    pub triggers: LevelTriggers,
    /// Ни коллизий, ни probe
    pub decoration: Vec<Entity>,
}

impl ClassifiedLevel {
    pub fn from_named_nodes<'a>(nodes: impl IntoIterator<Item = (Entity, &'a str)>) -> Self {
        let mut level = Self::default();

        for (entity, name) in nodes {
            let role = LevelNodeRole::classify(name);
            match role.trigger_kind() {
                Some(kind) => {
                    level.triggers.insert(entity, kind);
                }
                None if role == LevelNodeRole::Collision => level.geometry.push(entity),
                None => level.decoration.push(entity),
            }
        }

        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_name() {
        assert_eq!(LevelNodeRole::classify("ground_collision"), LevelNodeRole::Collision);
        assert_eq!(LevelNodeRole::classify("trigger_success_flag"), LevelNodeRole::SuccessTrigger);
        assert_eq!(LevelNodeRole::classify("failure.trigger.001"), LevelNodeRole::FailureTrigger);
        assert_eq!(LevelNodeRole::classify("tree_04"), LevelNodeRole::Decoration);
    }

    #[test]
    fn test_trigger_word_alone_is_decoration() {
        assert_eq!(LevelNodeRole::classify("trigger_spare"), LevelNodeRole::Decoration);
        assert_eq!(LevelNodeRole::classify("success_banner"), LevelNodeRole::Decoration);
    }

    #[test]
    fn test_precedence() {
        // collision важнее trigger, success важнее failure
        assert_eq!(LevelNodeRole::classify("trigger_success_collision"), LevelNodeRole::Collision);
        assert_eq!(
            LevelNodeRole::classify("trigger_success_failure"),
            LevelNodeRole::SuccessTrigger
        );
    }

    #[test]
    fn test_classification_is_case_sensitive() {
        assert_eq!(LevelNodeRole::classify("Ground_Collision"), LevelNodeRole::Decoration);
    }

    #[test]
    fn test_classified_level_sets() {
        let mut world = World::new();
        let ground = world.spawn_empty().id();
        let flag = world.spawn_empty().id();
        let pit = world.spawn_empty().id();
        let tree = world.spawn_empty().id();

        let level = ClassifiedLevel::from_named_nodes([
            (ground, "ground_collision"),
            (flag, "trigger_success"),
            (pit, "trigger_failure_pit"),
            (tree, "tree"),
        ]);

        assert_eq!(level.geometry, vec![ground]);
        assert_eq!(level.triggers.success, vec![flag]);
        assert_eq!(level.triggers.failure, vec![pit]);
        assert_eq!(level.decoration, vec![tree]);
    }
}
