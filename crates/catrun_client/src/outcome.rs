use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use catrun_simulation::{log_info, Outcome, OutcomeEvent, TriggerSet};

pub struct OutcomePlugin;

impl Plugin for OutcomePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostUpdate, report_outcomes.after(TriggerSet));
    }
}

/// Win / Lose → лог + заголовок окна (state machine меню нет)
fn report_outcomes(
    mut outcomes: EventReader<OutcomeEvent>,
    mut window: Query<&mut Window, With<PrimaryWindow>>,
) {
    for event in outcomes.read() {
        let banner = match event.outcome {
            Outcome::Win => "You win!",
            Outcome::Lose => "You lose!",
        };
        log_info(&format!("{} (trigger {:?})", banner, event.trigger));

        if let Ok(mut window) = window.single_mut() {
            window.title = format!("CATRUN - {}", banner);
        }
    }
}
