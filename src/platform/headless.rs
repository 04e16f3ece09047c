//! Tracing-backed collaborator stand-ins.
//!
//! Lets the full task set run on a development machine with no board
//! attached: frames and LED writes go to the log, battery readings are
//! synthetic, the radio reports itself absent (exercising the degraded
//! UI-only path) and keypad input is fed from stdin.

use std::io::BufRead;
use std::net::Ipv4Addr;

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use super::display::{Canvas, Color, DisplayPanel};
use super::input::{InputEvent, NavKey};
use super::led::LedStrip;
use super::power::{BatteryReport, PowerMonitor};
use super::wifi::{NetworkCredentials, RadioError, WifiRadio};
use super::PlatformError;

const HEADLESS_WIDTH: u32 = 480;
const HEADLESS_HEIGHT: u32 = 800;

/// Frame buffer that only counts draw calls.
#[derive(Debug, Default)]
pub struct TraceCanvas {
    ops: usize,
}

impl Canvas for TraceCanvas {
    fn dimensions(&self) -> (u32, u32) {
        (HEADLESS_WIDTH, HEADLESS_HEIGHT)
    }

    fn clear(&mut self, _color: Color) {
        self.ops = 1;
    }

    fn draw_wallpaper(&mut self) {
        self.ops += 1;
    }

    fn draw_text(&mut self, _color: Color, _size: f32, _x: f32, _y: f32, text: &str) {
        self.ops += 1;
        trace!(text, "draw_text");
    }

    fn draw_line(&mut self, _color: Color, _x0: f32, _y0: f32, _x1: f32, _y1: f32) {
        self.ops += 1;
    }

    fn fill_rect(&mut self, _color: Color, _x: f32, _y: f32, _w: f32, _h: f32) {
        self.ops += 1;
    }

    fn outline_rect(&mut self, _color: Color, _x: f32, _y: f32, _w: f32, _h: f32) {
        self.ops += 1;
    }
}

#[derive(Debug, Default)]
pub struct TraceDisplay;

impl DisplayPanel<TraceCanvas> for TraceDisplay {
    fn dimensions(&self) -> (u32, u32) {
        (HEADLESS_WIDTH, HEADLESS_HEIGHT)
    }

    fn blit(&mut self, frame: &TraceCanvas) -> Result<(), PlatformError> {
        trace!(ops = frame.ops, "frame blitted");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct TraceLedStrip;

impl LedStrip for TraceLedStrip {
    fn write(&mut self, bytes: &[u8]) -> Result<(), PlatformError> {
        trace!(?bytes, "led write");
        Ok(())
    }
}

/// Pretends to run from external power.
#[derive(Debug, Default)]
pub struct SyntheticPower;

impl PowerMonitor for SyntheticPower {
    fn battery(&mut self) -> Result<BatteryReport, PlatformError> {
        Ok(BatteryReport {
            external_power: true,
            remaining_percent: 100.0,
        })
    }
}

/// Radio that never becomes ready; headless runs stay UI-only.
#[derive(Debug, Default)]
pub struct AbsentRadio;

impl WifiRadio for AbsentRadio {
    fn bring_up(&mut self) -> Result<(), RadioError> {
        Err(RadioError::HardwareAbsent("running headless".into()))
    }

    fn join(&mut self, _network: &NetworkCredentials) -> Result<(), RadioError> {
        Err(RadioError::AssociationFailed("running headless".into()))
    }

    fn is_connected(&self) -> bool {
        false
    }

    fn address(&self) -> Option<Ipv4Addr> {
        None
    }
}

/// Feeds keypad events from stdin lines: `l`/`r` navigate, empty line is
/// RETURN, `esc` toggles the idle view, `f1` fires the diagnostic publish.
pub fn spawn_stdin_feed(queue: mpsc::Sender<InputEvent>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let key = match line.trim() {
                "l" => NavKey::Left,
                "r" => NavKey::Right,
                "" => NavKey::Return,
                "esc" => NavKey::Esc,
                "f1" => NavKey::F1,
                other => {
                    debug!(input = other, "unmapped stdin input");
                    continue;
                }
            };
            for pressed in [true, false] {
                if queue
                    .blocking_send(InputEvent::Navigation { key, pressed })
                    .is_err()
                {
                    warn!("input queue closed, stopping stdin feed");
                    return;
                }
            }
        }
    });
}
