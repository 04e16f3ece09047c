//! Shared status store
//!
//! Single point of truth for everything the render and indicator tasks need
//! to observe: the user-visible status line, the WiFi connection state and
//! the message/transmit pulses. All mutation goes through one mutex with
//! copy-only critical sections; this is the only lock in the whole core.
//!
//! Writers: network supervisor, message bridge, publisher. Readers: render
//! loop and indicator task. Readers may observe a value that is stale by one
//! tick; that is accepted.

use std::sync::{Arc, Mutex, PoisonError};

/// Status line capacity in bytes, terminator included.
pub const STATUS_LINE_CAPACITY: usize = 60;

/// Number of indicator ticks a message pulse stays active.
pub const MESSAGE_PULSE_TICKS: u8 = 10;

/// WiFi link state as shown to the user.
///
/// MQTT is only ever started once this reaches `Connected`; the supervisor
/// always passes through `Connecting` on the way there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// What the message LED should show on one indicator tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageLamp {
    Off,
    Lit,
}

/// Read-only copy of the store for one render pass.
#[derive(Clone, Debug)]
pub struct StatusSnapshot {
    pub line: String,
    pub connection: ConnectionState,
}

#[derive(Debug, Default)]
struct StatusInner {
    line: String,
    connection: ConnectionState,
    pulse_active: bool,
    pulse_count: u8,
    transmit_pending: bool,
}

/// Handle to the shared store. Cloning is cheap and shares the same state.
#[derive(Clone, Debug, Default)]
pub struct StatusStore {
    inner: Arc<Mutex<StatusInner>>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StatusInner> {
        // A poisoned lock means a writer panicked mid-copy; the stored data
        // is still plain memory, so recover and keep the UI running.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the status line. Control characters are normalized to
    /// spaces and the text is truncated to the line capacity before the
    /// lock is taken.
    pub fn set_status_line(&self, text: &str) {
        let line = sanitize_line(text);
        self.lock().line = line;
    }

    pub fn status_line(&self) -> String {
        self.lock().line.clone()
    }

    pub fn set_connection(&self, state: ConnectionState) {
        self.lock().connection = state;
    }

    pub fn connection(&self) -> ConnectionState {
        self.lock().connection
    }

    /// Starts a message pulse: active with the counter reset.
    pub fn trigger_message_pulse(&self) {
        let mut inner = self.lock();
        inner.pulse_active = true;
        inner.pulse_count = 0;
    }

    /// Flags one tick of transmit feedback on the indicator.
    pub fn mark_transmit(&self) {
        self.lock().transmit_pending = true;
    }

    /// Advances the message pulse by one indicator tick and reports what
    /// the message LED should show. Counter parity selects lit/off; after
    /// [`MESSAGE_PULSE_TICKS`] ticks the pulse expires.
    pub fn advance_pulse(&self) -> MessageLamp {
        let mut inner = self.lock();
        if !inner.pulse_active {
            return MessageLamp::Off;
        }
        let lamp = if inner.pulse_count % 2 == 0 {
            MessageLamp::Lit
        } else {
            MessageLamp::Off
        };
        inner.pulse_count += 1;
        if inner.pulse_count >= MESSAGE_PULSE_TICKS {
            inner.pulse_count = 0;
            inner.pulse_active = false;
        }
        lamp
    }

    /// Consumes the transmit flag; true for exactly one tick per publish.
    pub fn take_transmit(&self) -> bool {
        let mut inner = self.lock();
        std::mem::take(&mut inner.transmit_pending)
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let inner = self.lock();
        StatusSnapshot {
            line: inner.line.clone(),
            connection: inner.connection,
        }
    }
}

/// Normalizes `\r`/`\n` to spaces and truncates to the visible capacity,
/// respecting UTF-8 boundaries.
fn sanitize_line(text: &str) -> String {
    let mut line: String = text
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect();
    let max = STATUS_LINE_CAPACITY - 1;
    if line.len() > max {
        let mut cut = max;
        while !line.is_char_boundary(cut) {
            cut -= 1;
        }
        line.truncate(cut);
    }
    line
}
