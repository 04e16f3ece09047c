//! Display panel and frame buffer drawing interfaces.
//!
//! The render loop composes a full frame through [`Canvas`] primitives and
//! hands the finished buffer to [`DisplayPanel::blit`] in one piece. How the
//! primitives rasterize (fonts, encodings, pixel formats) is the backend's
//! business.

use super::PlatformError;

/// Opaque RGB color as passed to the drawing backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Drawing surface for one frame. Coordinates are pixels, origin top-left.
pub trait Canvas {
    fn dimensions(&self) -> (u32, u32);

    fn clear(&mut self, color: Color);

    /// Paints the built-in wallpaper image over the whole frame.
    fn draw_wallpaper(&mut self);

    fn draw_text(&mut self, color: Color, size: f32, x: f32, y: f32, text: &str);

    fn draw_line(&mut self, color: Color, x0: f32, y0: f32, x1: f32, y1: f32);

    fn fill_rect(&mut self, color: Color, x: f32, y: f32, w: f32, h: f32);

    fn outline_rect(&mut self, color: Color, x: f32, y: f32, w: f32, h: f32);
}

/// The physical panel. Accepts only complete frames; there is no partial
/// invalidation in this design.
pub trait DisplayPanel<C: Canvas> {
    fn dimensions(&self) -> (u32, u32);

    fn blit(&mut self, frame: &C) -> Result<(), PlatformError>;
}
