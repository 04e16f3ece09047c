//! Battery and charger readings.

use super::PlatformError;

/// Snapshot from the battery gauge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BatteryReport {
    /// True while running from external power (charger/USB).
    pub external_power: bool,
    /// Remaining charge in percent, 0.0..=100.0.
    pub remaining_percent: f32,
}

/// Battery gauge collaborator. A failed read is per-tick, not fatal.
pub trait PowerMonitor {
    fn battery(&mut self) -> Result<BatteryReport, PlatformError>;
}
