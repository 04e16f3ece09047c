//! Input dispatcher
//!
//! Blocks indefinitely on the board input queue; the render and indicator
//! tasks run independently, so blocking here never stalls the rest of the
//! system. Key-down events drive the menu; key-up and unknown keys are
//! ignored.

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use super::UiState;
use crate::link::LinkClient;
use crate::platform::input::{InputEvent, NavKey};

/// Payload published by the dedicated diagnostic key.
pub const DIAGNOSTIC_PAYLOAD: &str = "Debug: I require coffee!";

/// Runs the dispatcher until the input queue closes.
pub async fn run(
    mut queue: mpsc::Receiver<InputEvent>,
    ui: watch::Sender<UiState>,
    link: LinkClient,
) {
    info!("input dispatcher running");
    let mut state = UiState::default();

    while let Some(event) = queue.recv().await {
        let InputEvent::Navigation { key, pressed } = event else {
            continue;
        };
        if !pressed {
            continue;
        }

        match key {
            NavKey::Right => state.select_next(),
            NavKey::Left => state.select_prev(),
            NavKey::Return => {
                let action = state.selected_action();
                debug!(?action, "menu action fired");
                link.publish_event(action.event_payload());
            }
            NavKey::Esc => state.toggle_idle_view(),
            NavKey::F1 => link.publish_event(DIAGNOSTIC_PAYLOAD),
            _ => {}
        }

        ui.send_replace(state);
    }
    info!("input queue closed, dispatcher exiting");
}
