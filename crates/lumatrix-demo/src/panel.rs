#![forbid(unsafe_code)]

//! Terminal panel sink: renders the 64×32 grid with half-block glyphs,
//! two grid rows per terminal row.

use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{execute, queue};
use tracing::warn;

use lumatrix::{FONT_LED_5X3, GridSize, PanelSink, PixelFont, Rgb565};

/// Simulated refresh limit of the terminal "hardware".
const REFRESH_RATE_HZ: u32 = 60;

/// Double-buffered terminal sink. A buffer swap presents the buffer the
/// driver just finished writing.
pub struct TermPanel {
    size: GridSize,
    buffers: [Vec<Rgb565>; 2],
    write_index: usize,
    brightness: u8,
    font: &'static PixelFont,
    out: Stdout,
}

impl TermPanel {
    /// Take over the terminal (raw mode, alternate screen). Restored on
    /// drop.
    pub fn new() -> io::Result<Self> {
        let mut out = io::stdout();
        enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, Hide)?;
        let size = GridSize::PANEL;
        Ok(Self {
            size,
            buffers: [vec![Rgb565::BLACK; size.cells()], vec![Rgb565::BLACK; size.cells()]],
            write_index: 0,
            brightness: 255,
            font: &FONT_LED_5X3,
            out,
        })
    }

    fn term_color(&self, color: Rgb565) -> Color {
        let rgb = color.to_rgb().scaled(self.brightness);
        Color::Rgb { r: rgb.r, g: rgb.g, b: rgb.b }
    }

    fn present(&mut self) -> io::Result<()> {
        let front = 1 - self.write_index;
        for row in 0..self.size.height / 2 {
            queue!(self.out, MoveTo(0, row as u16))?;
            for x in 0..self.size.width {
                let top = self.term_color(self.buffers[front][(row * 2) * self.size.width + x]);
                let bottom =
                    self.term_color(self.buffers[front][(row * 2 + 1) * self.size.width + x]);
                queue!(
                    self.out,
                    SetForegroundColor(top),
                    SetBackgroundColor(bottom),
                    Print('▀')
                )?;
            }
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }
}

impl PanelSink for TermPanel {
    fn clear(&mut self) {
        self.buffers[self.write_index].fill(Rgb565::BLACK);
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Rgb565) {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return;
        };
        if self.size.contains(x, y) {
            self.buffers[self.write_index][y * self.size.width + x] = color;
        }
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
        // brightness changes show immediately, like a PWM control would
        if let Err(err) = self.present() {
            warn!(%err, "panel present failed");
        }
    }

    fn brightness(&self) -> u8 {
        self.brightness
    }

    fn is_double_buffered(&self) -> bool {
        true
    }

    fn swap_buffers(&mut self) {
        self.write_index = 1 - self.write_index;
        if let Err(err) = self.present() {
            warn!(%err, "panel present failed");
        }
    }

    fn refresh_rate_hz(&self) -> u32 {
        REFRESH_RATE_HZ
    }

    fn font(&self) -> &'static PixelFont {
        self.font
    }

    fn set_font(&mut self, font: &'static PixelFont) {
        self.font = font;
    }
}

impl Drop for TermPanel {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.out, LeaveAlternateScreen, Show);
    }
}
