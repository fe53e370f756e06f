#![forbid(unsafe_code)]

//! Tiny bitmap fonts for the panel overlay.
//!
//! Glyph bitmaps are packed row-major, most significant bit first, in one
//! shared byte array per font, each glyph starting at a byte boundary. A
//! glyph draws relative to a baseline cursor: `x_offset`/`y_offset` place
//! its top-left corner, `x_advance` moves the cursor for the next glyph.

/// One character's metrics and bitmap location within its font.
#[derive(Debug, Clone, Copy)]
pub struct Glyph {
    ch: char,
    bitmap_offset: usize,
    /// Bitmap width in pixels.
    pub width: u8,
    /// Bitmap height in pixels.
    pub height: u8,
    /// Cursor advance after drawing.
    pub x_advance: u8,
    /// Horizontal bitmap placement relative to the cursor.
    pub x_offset: i8,
    /// Vertical bitmap placement relative to the baseline (negative: up).
    pub y_offset: i8,
}

/// A fixed set of glyphs over one packed bitmap.
#[derive(Debug)]
pub struct PixelFont {
    bitmap: &'static [u8],
    glyphs: &'static [Glyph],
    /// Baseline-to-baseline line height.
    pub line_height: u8,
}

impl PixelFont {
    /// Look up the glyph for `ch`, if the font covers it.
    #[must_use]
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.iter().find(|g| g.ch == ch)
    }

    /// Whether the glyph's bitmap is set at `(gx, gy)`.
    #[must_use]
    pub fn glyph_pixel(&self, glyph: &Glyph, gx: u8, gy: u8) -> bool {
        if gx >= glyph.width || gy >= glyph.height {
            return false;
        }
        let bit = usize::from(gy) * usize::from(glyph.width) + usize::from(gx);
        let byte = self.bitmap[glyph.bitmap_offset + bit / 8];
        byte >> (7 - bit % 8) & 1 != 0
    }

    /// Advance width of `text`. Characters without a glyph take no space.
    #[must_use]
    pub fn text_width(&self, text: &str) -> u32 {
        text.chars().filter_map(|c| self.glyph(c)).map(|g| u32::from(g.x_advance)).sum()
    }

    /// Height of the tallest glyph in `text`.
    #[must_use]
    pub fn text_height(&self, text: &str) -> u32 {
        text.chars()
            .filter_map(|c| self.glyph(c))
            .map(|g| u32::from(g.height))
            .max()
            .unwrap_or(0)
    }

    /// Rasterize `text` with its baseline cursor at `(x, y)`, calling
    /// `plot` for every set pixel. Characters without a glyph are skipped.
    pub fn rasterize(&self, text: &str, x: i32, y: i32, mut plot: impl FnMut(i32, i32)) {
        let mut cursor = x;
        for ch in text.chars() {
            let Some(glyph) = self.glyph(ch) else { continue };
            for gy in 0..glyph.height {
                for gx in 0..glyph.width {
                    if self.glyph_pixel(glyph, gx, gy) {
                        plot(
                            cursor + i32::from(glyph.x_offset) + i32::from(gx),
                            y + i32::from(glyph.y_offset) + i32::from(gy),
                        );
                    }
                }
            }
            cursor += i32::from(glyph.x_advance);
        }
    }
}

const fn glyph(
    ch: char,
    bitmap_offset: usize,
    width: u8,
    height: u8,
    x_advance: u8,
    x_offset: i8,
    y_offset: i8,
) -> Glyph {
    Glyph { ch, bitmap_offset, width, height, x_advance, x_offset, y_offset }
}

// Digits plus the two readout symbols. The '/' slot draws percent-sign
// artwork and '°' is a small raised square, so "21.5°" and "55/" render as
// a temperature and a humidity readout.
const LED_5X3_BITMAP: &[u8] = &[
    0xCC, 0x88, 0x99, 0x80, // '/'
    0x74, 0x63, 0x17, 0x00, // '0'
    0x4C, 0x44, 0xE0, // '1'
    0xF0, 0x5D, 0x0F, 0x80, // '2'
    0xF8, 0x5E, 0x1F, 0x80, // '3'
    0x94, 0xBE, 0x21, 0x00, // '4'
    0xFC, 0x3C, 0x1F, 0x80, // '5'
    0x74, 0x3D, 0x17, 0x00, // '6'
    0xF8, 0x44, 0x44, 0x00, // '7'
    0x74, 0x5D, 0x17, 0x00, // '8'
    0x74, 0x5E, 0x17, 0x00, // '9'
    0xF0, // '°'
    0xC0, // '.'
];

const LED_5X3_GLYPHS: &[Glyph] = &[
    glyph('/', 0, 5, 5, 6, 0, -5),
    glyph('0', 4, 5, 5, 6, 0, -5),
    glyph('1', 8, 4, 5, 4, 0, -5),
    glyph('2', 11, 5, 5, 6, 0, -5),
    glyph('3', 15, 5, 5, 6, 0, -5),
    glyph('4', 19, 5, 5, 6, 0, -5),
    glyph('5', 23, 5, 5, 6, 0, -5),
    glyph('6', 27, 5, 5, 6, 0, -5),
    glyph('7', 31, 5, 5, 6, 0, -5),
    glyph('8', 35, 5, 5, 6, 0, -5),
    glyph('9', 39, 5, 5, 6, 0, -5),
    glyph('°', 43, 2, 2, 3, 0, -5),
    glyph('.', 44, 1, 2, 2, 0, -2),
];

/// 5×3-class LED readout font: `/ 0-9 ° .`
pub const FONT_LED_5X3: PixelFont =
    PixelFont { bitmap: LED_5X3_BITMAP, glyphs: LED_5X3_GLYPHS, line_height: 6 };

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_one_bitmap_shape() {
        let g = FONT_LED_5X3.glyph('1').unwrap();
        assert_eq!((g.width, g.height), (4, 5));
        // bottom row is the serif bar: ###.
        assert!(FONT_LED_5X3.glyph_pixel(g, 0, 4));
        assert!(FONT_LED_5X3.glyph_pixel(g, 1, 4));
        assert!(FONT_LED_5X3.glyph_pixel(g, 2, 4));
        assert!(!FONT_LED_5X3.glyph_pixel(g, 3, 4));
        // stem
        assert!(FONT_LED_5X3.glyph_pixel(g, 1, 0));
        assert!(FONT_LED_5X3.glyph_pixel(g, 1, 2));
    }

    #[test]
    fn zero_has_hollow_center() {
        let g = FONT_LED_5X3.glyph('0').unwrap();
        assert!(!FONT_LED_5X3.glyph_pixel(g, 2, 2));
        assert!(FONT_LED_5X3.glyph_pixel(g, 0, 2));
        assert!(FONT_LED_5X3.glyph_pixel(g, 4, 2));
    }

    #[test]
    fn text_metrics_sum_advances() {
        assert_eq!(FONT_LED_5X3.text_width("55/"), 6 + 6 + 6);
        assert_eq!(FONT_LED_5X3.text_width("1"), 4);
        assert_eq!(FONT_LED_5X3.text_height("55/"), 5);
        // unknown characters take no space
        assert_eq!(FONT_LED_5X3.text_width("a b"), 0);
        assert_eq!(FONT_LED_5X3.text_height(""), 0);
    }

    #[test]
    fn rasterize_places_pixels_above_baseline() {
        let mut pixels = Vec::new();
        FONT_LED_5X3.rasterize("1", 10, 20, |x, y| pixels.push((x, y)));
        assert!(!pixels.is_empty());
        // glyphs sit on the baseline: all rows within 5 px above it
        assert!(pixels.iter().all(|&(_, y)| (15..20).contains(&y)));
        assert!(pixels.iter().all(|&(x, _)| (10..14).contains(&x)));
    }

    #[test]
    fn rasterize_advances_the_cursor() {
        let mut first = Vec::new();
        FONT_LED_5X3.rasterize("0", 0, 0, |x, _| first.push(x));
        let mut second = Vec::new();
        FONT_LED_5X3.rasterize("00", 0, 0, |x, _| second.push(x));
        let max_first = first.iter().copied().max().unwrap();
        let max_second = second.iter().copied().max().unwrap();
        assert_eq!(max_second, max_first + 6);
    }

    #[test]
    fn glyph_pixel_out_of_bounds_is_unset() {
        let g = FONT_LED_5X3.glyph('0').unwrap();
        assert!(!FONT_LED_5X3.glyph_pixel(g, 5, 0));
        assert!(!FONT_LED_5X3.glyph_pixel(g, 0, 5));
    }
}
