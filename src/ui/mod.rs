//! User interface state and tasks
//!
//! Two halves, deliberately decoupled:
//!
//! 1. [`input`] - blocking dispatcher owning [`UiState`], fed by the board
//!    input queue
//! 2. [`render`] - periodic full-frame redraw reading the latest published
//!    [`UiState`] and a status store snapshot
//!
//! The dispatcher is the only writer of UI state; it publishes copies over
//! a `watch` channel, so the render loop needs no lock and blocking on the
//! input queue never stalls a frame.

pub mod input;
pub mod render;

/// Actions bound to the three menu buttons, matched explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Nyan,
    Coffee,
    Lunch,
}

impl MenuAction {
    pub const ALL: [MenuAction; 3] = [MenuAction::Nyan, MenuAction::Coffee, MenuAction::Lunch];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Nyan => "Nyan",
            MenuAction::Coffee => "Coffee",
            MenuAction::Lunch => "Lunch",
        }
    }

    /// Fixed event string published when the action fires.
    pub fn event_payload(self) -> &'static str {
        match self {
            MenuAction::Nyan => "Event: Nyan",
            MenuAction::Coffee => "Event: Coffee",
            MenuAction::Lunch => "Event: Lunch",
        }
    }
}

/// Menu selection and view mode. Owned by the input dispatcher; everyone
/// else sees copies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    pub selected: usize,
    pub idle_view: bool,
}

impl UiState {
    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % MenuAction::ALL.len();
    }

    pub fn select_prev(&mut self) {
        let count = MenuAction::ALL.len();
        self.selected = (self.selected + count - 1) % count;
    }

    pub fn toggle_idle_view(&mut self) {
        self.idle_view = !self.idle_view;
    }

    pub fn selected_action(&self) -> MenuAction {
        MenuAction::ALL[self.selected]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_wraps_both_ways() {
        let mut state = UiState::default();
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 2);
        state.select_next();
        assert_eq!(state.selected, 0, "last + RIGHT wraps to first");

        state.select_prev();
        assert_eq!(state.selected, 2, "first + LEFT wraps to last");
    }

    #[test]
    fn selection_stays_in_range_under_any_sequence() {
        let mut state = UiState::default();
        for i in 0..100 {
            if i % 3 == 0 {
                state.select_prev();
            } else {
                state.select_next();
            }
            assert!(state.selected < MenuAction::ALL.len());
        }
    }

    #[test]
    fn idle_toggle_is_self_inverse() {
        let mut state = UiState::default();
        let before = state;
        state.toggle_idle_view();
        assert_ne!(state, before);
        state.toggle_idle_view();
        assert_eq!(state, before);
    }
}
