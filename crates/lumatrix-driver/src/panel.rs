#![forbid(unsafe_code)]

//! The output surface the render worker draws into.

use lumatrix_color::Rgb565;

use crate::font::PixelFont;

/// A pixel sink the driver owns for the lifetime of its worker thread.
///
/// Double-buffered sinks display one buffer while the driver writes the
/// other; [`PanelSink::swap_buffers`] publishes the written buffer. Single
/// buffered sinks ignore swaps and draw in place. All drawing operations
/// are bounds-tolerant: out-of-range pixels are dropped, never a fault.
pub trait PanelSink: Send {
    /// Blank the write buffer.
    fn clear(&mut self);

    /// Write one pixel into the write buffer.
    fn draw_pixel(&mut self, x: i32, y: i32, color: Rgb565);

    /// Set the output brightness, 0–255.
    fn set_brightness(&mut self, brightness: u8);

    /// The brightness last applied.
    fn brightness(&self) -> u8;

    /// Whether the sink displays one buffer while the other is written.
    fn is_double_buffered(&self) -> bool;

    /// Publish the write buffer and expose the other one for writing.
    /// No-op for single-buffered sinks.
    fn swap_buffers(&mut self);

    /// The physical refresh rate: the fastest the sink can usefully
    /// accept buffer flips.
    fn refresh_rate_hz(&self) -> u32;

    /// Font used by [`PanelSink::print_text`].
    fn font(&self) -> &'static PixelFont;

    /// Replace the text font.
    fn set_font(&mut self, font: &'static PixelFont);

    /// Advance width of `text` in the current font.
    fn text_width(&self, text: &str) -> u32 {
        self.font().text_width(text)
    }

    /// Pixel height of `text` in the current font.
    fn text_height(&self, text: &str) -> u32 {
        self.font().text_height(text)
    }

    /// Draw `text` with its baseline cursor at `(x, y)`.
    fn print_text(&mut self, text: &str, x: i32, y: i32, color: Rgb565) {
        let font = self.font();
        font.rasterize(text, x, y, |px, py| self.draw_pixel(px, py, color));
    }
}
