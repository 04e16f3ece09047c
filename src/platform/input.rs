//! Typed keypad events as delivered by the board input queue.

/// Navigation keys the dispatcher reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavKey {
    Left,
    Right,
    Return,
    Esc,
    /// Dedicated diagnostic key.
    F1,
    Up,
    Down,
}

/// One event out of the board's FIFO input queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Navigation { key: NavKey, pressed: bool },
    Keyboard { ch: char },
}
