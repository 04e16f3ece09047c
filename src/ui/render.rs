//! Render loop
//!
//! Periodic full-frame redraw. Either the idle view (wallpaper plus clock)
//! or the menu view: header, button row, footer, status line. Every pass
//! repaints the whole frame and ends in a single blit; there is no partial
//! invalidation.

use std::time::Duration;

use chrono::{FixedOffset, Local, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{MenuAction, UiState};
use crate::platform::display::{Canvas, Color, DisplayPanel};
use crate::status::{ConnectionState, StatusSnapshot, StatusStore};

pub const RENDER_PERIOD: Duration = Duration::from_millis(100);

pub const MENU_TITLE: &str = "Event Notifier";
const FOOTER_TEXT: &str = "Use left/right to navigate. Press return to select.";

const HEADER_HEIGHT: f32 = 30.0;
const FOOTER_HEIGHT: f32 = 30.0;
const BUTTON_WIDTH: f32 = 100.0;
const BUTTON_HEIGHT: f32 = 100.0;
const BUTTON_GAP: f32 = 20.0;
const TEXT_FIELD_HEIGHT: f32 = 24.0;

const INK: Color = Color::rgb(0x2B, 0x2C, 0x3A);
const BACKDROP: Color = Color::rgb(220, 220, 220);
const BUTTON_FRAME: Color = Color::rgb(100, 100, 100);
const BUTTON_HIGHLIGHT: Color = Color::rgb(150, 150, 150);
const WHITE: Color = Color::rgb(255, 255, 255);
const BLACK: Color = Color::rgb(0, 0, 0);

fn connection_label(state: ConnectionState) -> &'static str {
    match state {
        ConnectionState::Connected => "Wi-Fi: Connected",
        ConnectionState::Connecting => "Wi-Fi: Connecting",
        ConnectionState::Disconnected => "Wi-Fi: Offline",
    }
}

/// Wall-clock time for the idle view, shifted by the configured offset
/// when there is one.
pub fn clock_text(offset: Option<FixedOffset>) -> String {
    format_clock(Utc::now(), offset)
}

fn format_clock(now: chrono::DateTime<Utc>, offset: Option<FixedOffset>) -> String {
    match offset {
        Some(offset) => now.with_timezone(&offset).format("%H:%M:%S").to_string(),
        None => now.with_timezone(&Local).format("%H:%M:%S").to_string(),
    }
}

/// Composes one complete frame. Pure with respect to the canvas: the same
/// inputs produce the same draw sequence.
pub fn draw_frame<C: Canvas>(frame: &mut C, ui: UiState, status: &StatusSnapshot, clock: &str) {
    if ui.idle_view {
        draw_idle_view(frame, clock);
    } else {
        draw_menu_view(frame, ui, status);
    }
}

fn draw_idle_view<C: Canvas>(frame: &mut C, clock: &str) {
    frame.draw_wallpaper();
    frame.draw_text(WHITE, 40.0, 180.0, 380.0, MENU_TITLE);
    frame.draw_text(WHITE, 100.0, 100.0, 140.0, clock);
}

fn draw_menu_view<C: Canvas>(frame: &mut C, ui: UiState, status: &StatusSnapshot) {
    let (w, h) = frame.dimensions();
    let (w, h) = (w as f32, h as f32);

    frame.clear(BACKDROP);

    // Header: separator, title, connection label.
    frame.draw_line(INK, 10.0, HEADER_HEIGHT, w - 20.0, HEADER_HEIGHT);
    frame.draw_text(INK, 18.0, 5.0, 5.0, MENU_TITLE);
    frame.draw_text(
        INK,
        18.0,
        w - 220.0,
        5.0,
        connection_label(status.connection),
    );

    // Button row, selected entry filled.
    let count = MenuAction::ALL.len() as f32;
    let start_x = (w - (count * BUTTON_WIDTH + (count - 1.0) * BUTTON_GAP)) / 2.0;
    let y = HEADER_HEIGHT + 40.0;
    for (i, action) in MenuAction::ALL.iter().enumerate() {
        let x = start_x + i as f32 * (BUTTON_WIDTH + BUTTON_GAP);
        frame.outline_rect(BUTTON_FRAME, x, y, BUTTON_WIDTH, BUTTON_HEIGHT);
        if i == ui.selected {
            frame.fill_rect(BUTTON_HIGHLIGHT, x, y, BUTTON_WIDTH, BUTTON_HEIGHT);
        }
        frame.draw_text(BLACK, 16.0, x + 10.0, y + 42.0, action.label());
    }

    // Footer help text.
    frame.draw_line(INK, 10.0, h - FOOTER_HEIGHT, w - 20.0, h - FOOTER_HEIGHT);
    frame.draw_text(WHITE, 16.0, 5.0, h - FOOTER_HEIGHT + 7.0, FOOTER_TEXT);

    // Current status line above the footer.
    frame.draw_text(
        INK,
        18.0,
        5.0,
        h - FOOTER_HEIGHT - TEXT_FIELD_HEIGHT,
        &status.line,
    );
}

/// Spawns the periodic render task. Never terminates in normal operation;
/// blit failures are logged and the next tick repaints from scratch.
pub fn spawn<C, P>(
    store: StatusStore,
    ui: watch::Receiver<UiState>,
    mut panel: P,
    mut frame: C,
    clock_offset: Option<FixedOffset>,
) -> JoinHandle<()>
where
    C: Canvas + Send + 'static,
    P: DisplayPanel<C> + Send + 'static,
{
    info!("starting render loop");
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RENDER_PERIOD);
        loop {
            interval.tick().await;
            let state = *ui.borrow();
            let status = store.snapshot();
            let clock = clock_text(clock_offset);
            draw_frame(&mut frame, state, &status, &clock);
            if let Err(e) = panel.blit(&frame) {
                warn!(error = %e, "frame blit failed");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum DrawOp {
        Clear,
        Wallpaper,
        Text(String),
        Line,
        FillRect,
        OutlineRect,
    }

    struct RecordingCanvas {
        ops: Vec<DrawOp>,
    }

    impl RecordingCanvas {
        fn new() -> Self {
            Self { ops: Vec::new() }
        }

        fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Text(t) => Some(t.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Canvas for RecordingCanvas {
        fn dimensions(&self) -> (u32, u32) {
            (480, 800)
        }

        fn clear(&mut self, _color: Color) {
            self.ops.push(DrawOp::Clear);
        }

        fn draw_wallpaper(&mut self) {
            self.ops.push(DrawOp::Wallpaper);
        }

        fn draw_text(&mut self, _color: Color, _size: f32, _x: f32, _y: f32, text: &str) {
            self.ops.push(DrawOp::Text(text.to_string()));
        }

        fn draw_line(&mut self, _color: Color, _x0: f32, _y0: f32, _x1: f32, _y1: f32) {
            self.ops.push(DrawOp::Line);
        }

        fn fill_rect(&mut self, _color: Color, _x: f32, _y: f32, _w: f32, _h: f32) {
            self.ops.push(DrawOp::FillRect);
        }

        fn outline_rect(&mut self, _color: Color, _x: f32, _y: f32, _w: f32, _h: f32) {
            self.ops.push(DrawOp::OutlineRect);
        }
    }

    fn snapshot(line: &str, connection: ConnectionState) -> StatusSnapshot {
        StatusSnapshot {
            line: line.to_string(),
            connection,
        }
    }

    #[test]
    fn menu_view_starts_with_a_full_clear_and_shows_the_status_line() {
        let mut frame = RecordingCanvas::new();
        draw_frame(
            &mut frame,
            UiState::default(),
            &snapshot("data: hi", ConnectionState::Connected),
            "12:00:00",
        );

        assert_eq!(frame.ops[0], DrawOp::Clear);
        let texts = frame.texts();
        assert!(texts.contains(&"Event Notifier"));
        assert!(texts.contains(&"Wi-Fi: Connected"));
        assert_eq!(*texts.last().unwrap(), "data: hi");
    }

    #[test]
    fn exactly_the_selected_button_is_highlighted() {
        let mut frame = RecordingCanvas::new();
        let ui = UiState {
            selected: 1,
            idle_view: false,
        };
        draw_frame(
            &mut frame,
            ui,
            &snapshot("", ConnectionState::Disconnected),
            "",
        );

        let fills = frame.ops.iter().filter(|op| **op == DrawOp::FillRect).count();
        let outlines = frame
            .ops
            .iter()
            .filter(|op| **op == DrawOp::OutlineRect)
            .count();
        assert_eq!(fills, 1);
        assert_eq!(outlines, MenuAction::ALL.len());
        // The highlight comes right after the selected button's outline.
        let texts = frame.texts();
        assert!(texts.contains(&"Coffee"));
    }

    #[test]
    fn connection_label_tracks_the_link_state() {
        for (state, label) in [
            (ConnectionState::Connecting, "Wi-Fi: Connecting"),
            (ConnectionState::Disconnected, "Wi-Fi: Offline"),
        ] {
            let mut frame = RecordingCanvas::new();
            draw_frame(&mut frame, UiState::default(), &snapshot("", state), "");
            assert!(frame.texts().contains(&label));
        }
    }

    #[test]
    fn idle_view_is_wallpaper_and_clock_only() {
        let mut frame = RecordingCanvas::new();
        let ui = UiState {
            selected: 0,
            idle_view: true,
        };
        draw_frame(
            &mut frame,
            ui,
            &snapshot("data: hidden", ConnectionState::Connected),
            "23:59:07",
        );

        assert_eq!(frame.ops[0], DrawOp::Wallpaper);
        let texts = frame.texts();
        assert!(texts.contains(&"23:59:07"));
        // No menu, no status line in the idle view.
        assert!(!texts.contains(&"data: hidden"));
        assert!(!frame.ops.contains(&DrawOp::OutlineRect));
    }

    #[test]
    fn clock_text_is_hh_mm_ss() {
        let clock = clock_text(None);
        assert_eq!(clock.len(), 8);
        assert_eq!(clock.as_bytes()[2], b':');
        assert_eq!(clock.as_bytes()[5], b':');
    }

    #[test]
    fn clock_offset_shifts_the_hour() {
        use chrono::TimeZone;

        let now = Utc.with_ymd_and_hms(2026, 8, 25, 12, 34, 56).unwrap();
        assert_eq!(format_clock(now, FixedOffset::east_opt(0)), "12:34:56");
        assert_eq!(format_clock(now, FixedOffset::east_opt(2 * 3600)), "14:34:56");
        assert_eq!(
            format_clock(now, FixedOffset::east_opt(-(5 * 3600 + 1800))),
            "07:04:56"
        );
    }
}
