#![forbid(unsafe_code)]

//! Overlay text fields and the collaborator that feeds them.

use lumatrix_color::Rgb565;
use lumatrix_pattern::GridSize;

use crate::font::PixelFont;

/// Longest string a text field stores; extra characters are dropped.
pub const MAX_TEXT_LEN: usize = 15;

/// Widest string the upper readout is expected to show; used to center it.
pub const UPPER_READOUT_REFERENCE: &str = "99.9°";

/// Widest string the lower readout is expected to show; used to place it.
pub const LOWER_READOUT_REFERENCE: &str = "55/";

/// Supplier of the two overlay strings, polled by the render worker.
pub trait TextSource: Send {
    /// Whether either field changed since the last call. Consuming: the
    /// flag resets on read.
    fn take_changed(&mut self) -> bool;

    /// Current upper-readout string (temperature-style).
    fn field_a(&self) -> String;

    /// Current lower-readout string (humidity-style).
    fn field_b(&self) -> String;
}

/// One overlay field: content plus placement, font, and color.
///
/// `x`/`y` is the baseline cursor; the offsets are small visual-centering
/// adjustments applied at draw time.
#[derive(Debug)]
pub struct TextField {
    content: String,
    /// Baseline cursor column.
    pub x: i32,
    /// Baseline cursor row.
    pub y: i32,
    /// Visual-centering adjustment, applied at draw time.
    pub x_offset: i32,
    /// Visual-centering adjustment, applied at draw time.
    pub y_offset: i32,
    /// Font the field draws with.
    pub font: &'static PixelFont,
    /// Text color.
    pub color: Rgb565,
}

impl TextField {
    /// Field centered in the middle of the panel, sized for `reference`.
    #[must_use]
    pub fn centered_middle(font: &'static PixelFont, reference: &str, color: Rgb565) -> Self {
        let panel = GridSize::PANEL;
        let x = (panel.width as i32 - font.text_width(reference) as i32) / 2;
        let y = (panel.height as i32 + font.text_height(reference) as i32) / 2;
        Self { content: String::new(), x, y, x_offset: 0, y_offset: 0, font, color }
    }

    /// Field centered along the bottom edge, sized for `reference`.
    #[must_use]
    pub fn centered_bottom(font: &'static PixelFont, reference: &str, color: Rgb565) -> Self {
        let panel = GridSize::PANEL;
        let x = (panel.width as i32 - font.text_width(reference) as i32) / 2;
        let y = panel.height as i32 - font.text_height(reference) as i32;
        Self { content: String::new(), x, y, x_offset: 0, y_offset: 0, font, color }
    }

    /// Replace the content, truncating to [`MAX_TEXT_LEN`] characters.
    pub fn set_content(&mut self, text: &str) {
        self.content.clear();
        self.content.extend(text.chars().take(MAX_TEXT_LEN));
    }

    /// The stored string.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Recompute the default placement for a new font.
    pub fn set_font_centered_middle(&mut self, font: &'static PixelFont, reference: &str) {
        *self = Self {
            content: std::mem::take(&mut self.content),
            x_offset: self.x_offset,
            y_offset: self.y_offset,
            color: self.color,
            ..Self::centered_middle(font, reference, self.color)
        };
    }

    /// Recompute the default bottom placement for a new font.
    pub fn set_font_centered_bottom(&mut self, font: &'static PixelFont, reference: &str) {
        *self = Self {
            content: std::mem::take(&mut self.content),
            x_offset: self.x_offset,
            y_offset: self.y_offset,
            color: self.color,
            ..Self::centered_bottom(font, reference, self.color)
        };
    }

    /// Drawing position with offsets applied.
    #[must_use]
    pub const fn draw_position(&self) -> (i32, i32) {
        (self.x + self.x_offset, self.y + self.y_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FONT_LED_5X3;

    #[test]
    fn middle_placement_centers_the_reference() {
        let field =
            TextField::centered_middle(&FONT_LED_5X3, UPPER_READOUT_REFERENCE, Rgb565::WHITE);
        let width = FONT_LED_5X3.text_width(UPPER_READOUT_REFERENCE) as i32;
        assert_eq!(field.x, (64 - width) / 2);
        assert_eq!(field.y, (32 + 5) / 2);
    }

    #[test]
    fn bottom_placement_rests_on_the_lower_edge() {
        let field =
            TextField::centered_bottom(&FONT_LED_5X3, LOWER_READOUT_REFERENCE, Rgb565::WHITE);
        assert_eq!(field.y, 32 - 5);
        assert_eq!(field.x, (64 - 18) / 2);
    }

    #[test]
    fn content_is_bounded() {
        let mut field =
            TextField::centered_middle(&FONT_LED_5X3, UPPER_READOUT_REFERENCE, Rgb565::WHITE);
        field.set_content("0123456789012345678");
        assert_eq!(field.content().chars().count(), MAX_TEXT_LEN);
        field.set_content("21.5°");
        assert_eq!(field.content(), "21.5°");
    }

    #[test]
    fn offsets_shift_the_draw_position() {
        let mut field =
            TextField::centered_middle(&FONT_LED_5X3, UPPER_READOUT_REFERENCE, Rgb565::WHITE);
        let (x0, y0) = field.draw_position();
        field.x_offset = -1;
        field.y_offset = 12;
        assert_eq!(field.draw_position(), (x0 - 1, y0 + 12));
    }
}
