//! Lifetime: отложенный despawn по таймеру

use bevy::prelude::*;

use crate::components::DespawnAfter;

/// Система: деспавн entities с истёкшим DespawnAfter
///
/// despawn() рекурсивный: visuals (children) уходят вместе с entity.
pub fn despawn_after_timeout(
    mut commands: Commands,
    mut query: Query<(Entity, &mut DespawnAfter, Option<&Name>)>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (entity, mut lifetime, name) in query.iter_mut() {
        if lifetime.tick(delta) {
            crate::log(&format!(
                "Despawning {} {:?} (lifetime expired)",
                name.map(Name::as_str).unwrap_or("entity"),
                entity
            ));
            commands.entity(entity).despawn();
        }
    }
}

pub struct LifetimePlugin;

impl Plugin for LifetimePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<DespawnAfter>()
            .add_systems(Update, despawn_after_timeout);
    }
}
