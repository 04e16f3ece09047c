//! # Platform Collaborators
//!
//! Narrow interfaces to everything the core does not own: the LCD panel and
//! its frame buffer, the keypad event queue, the LED strip, the battery
//! gauge and the WiFi radio. The core never touches a driver directly; each
//! task is generic over the trait it needs, which is also what makes the
//! whole core testable on a desktop.
//!
//! ```text
//! platform/
//! ├── display.rs  - DisplayPanel + Canvas (frame buffer drawing)
//! ├── input.rs    - typed keypad events
//! ├── led.rs      - LED strip + RGB color model
//! ├── power.rs    - battery/charger readings
//! ├── wifi.rs     - radio bring-up and association
//! └── headless.rs - tracing-backed stand-ins for running off-device
//! ```
//!
//! Board support crates implement these traits out of tree; the in-tree
//! [`headless`] module is enough to run and debug the core anywhere.

pub mod display;
pub mod headless;
pub mod input;
pub mod led;
pub mod power;
pub mod wifi;

use thiserror::Error;

/// Errors surfaced by display, LED and power collaborators.
///
/// None of these are fatal to the core: the loops log the failure and carry
/// on with the next tick.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("display error: {0}")]
    Display(String),

    #[error("led strip error: {0}")]
    Led(String),

    #[error("power monitor error: {0}")]
    Power(String),
}
