//! LED strip interface and the RGB color model for the six status LEDs.

use super::PlatformError;

/// Number of addressable LEDs on the device.
pub const LED_COUNT: usize = 6;

/// One LED color. Values are raw channel intensities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const GREEN: Rgb = Rgb { r: 0x03, g: 0xFC, b: 0x03 };
    pub const YELLOW: Rgb = Rgb { r: 0xF4, g: 0xFC, b: 0x03 };
    pub const RED: Rgb = Rgb { r: 0xFC, g: 0x03, b: 0x03 };
    pub const BLUE: Rgb = Rgb { r: 0x03, g: 0x03, b: 0xFC };
}

/// Full state of the strip for one indicator tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedFrame {
    pub slots: [Rgb; LED_COUNT],
}

impl LedFrame {
    /// Encodes the frame in strip wire order: G, R, B per LED.
    pub fn encode(&self) -> [u8; LED_COUNT * 3] {
        let mut bytes = [0u8; LED_COUNT * 3];
        for (i, led) in self.slots.iter().enumerate() {
            bytes[i * 3] = led.g;
            bytes[i * 3 + 1] = led.r;
            bytes[i * 3 + 2] = led.b;
        }
        bytes
    }
}

/// The strip itself. Writes are fire-and-forget total overwrites.
pub trait LedStrip {
    fn write(&mut self, bytes: &[u8]) -> Result<(), PlatformError>;
}
