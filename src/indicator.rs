//! Indicator task
//!
//! Recomputes the full six-LED vector from scratch every tick and writes it
//! to the strip as a total overwrite. Slot assignment:
//!
//! - 0: power (green on charger, else red/yellow/blue by remaining charge)
//! - 1: WiFi link (green/yellow/red by connection state)
//! - 2: message pulse (alternating while a received message is fresh)
//! - 4: transmit (one blue tick after a publish)
//! - 3, 5: reserved, off
//!
//! The unconditional recompute is deliberate; the tick is cheap and keeps
//! the derivation stateless.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::platform::led::{LedFrame, LedStrip, Rgb};
use crate::platform::power::{BatteryReport, PowerMonitor};
use crate::status::{ConnectionState, MessageLamp, StatusStore};

pub const INDICATOR_PERIOD: Duration = Duration::from_millis(500);

const SLOT_POWER: usize = 0;
const SLOT_LINK: usize = 1;
const SLOT_MESSAGE: usize = 2;
const SLOT_TRANSMIT: usize = 4;

/// Derives one LED frame from the current readings. Pure; no prior frame
/// state is consulted.
pub fn derive_frame(
    battery: Option<&BatteryReport>,
    connection: ConnectionState,
    message: MessageLamp,
    transmit: bool,
) -> LedFrame {
    let mut frame = LedFrame::default();

    if let Some(report) = battery {
        frame.slots[SLOT_POWER] = if report.external_power {
            Rgb::GREEN
        } else if report.remaining_percent < 15.0 {
            Rgb::RED
        } else if report.remaining_percent < 50.0 {
            Rgb::YELLOW
        } else {
            Rgb::BLUE
        };
    }

    frame.slots[SLOT_LINK] = match connection {
        ConnectionState::Connected => Rgb::GREEN,
        ConnectionState::Connecting => Rgb::YELLOW,
        ConnectionState::Disconnected => Rgb::RED,
    };

    frame.slots[SLOT_MESSAGE] = match message {
        MessageLamp::Lit => Rgb::YELLOW,
        MessageLamp::Off => Rgb::OFF,
    };

    if transmit {
        frame.slots[SLOT_TRANSMIT] = Rgb::BLUE;
    }

    frame
}

/// Runs one tick: read battery, advance pulses, write the strip.
pub fn tick<P: PowerMonitor, L: LedStrip>(store: &StatusStore, power: &mut P, strip: &mut L) {
    let battery = match power.battery() {
        Ok(report) => Some(report),
        Err(e) => {
            debug!(error = %e, "battery read failed, power slot off this tick");
            None
        }
    };

    let frame = derive_frame(
        battery.as_ref(),
        store.connection(),
        store.advance_pulse(),
        store.take_transmit(),
    );

    if let Err(e) = strip.write(&frame.encode()) {
        warn!(error = %e, "led strip write failed");
    }
}

/// Spawns the periodic indicator task. Never terminates in normal operation.
pub fn spawn<P, L>(store: StatusStore, mut power: P, mut strip: L) -> JoinHandle<()>
where
    P: PowerMonitor + Send + 'static,
    L: LedStrip + Send + 'static,
{
    info!("starting indicator task");
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(INDICATOR_PERIOD);
        loop {
            interval.tick().await;
            tick(&store, &mut power, &mut strip);
        }
    })
}
