#![forbid(unsafe_code)]

//! Paced rendering of pattern generators onto an LED-matrix-style sink.
//!
//! The [`RenderDriver`] owns a worker thread that steps the active
//! pattern once per frame, copies its cells into a [`PanelSink`], and
//! overlays two independently guarded text readouts fed by a
//! [`TextSource`]. Frame pacing respects both the requested rate and the
//! sink's physical refresh limit.

pub mod driver;
pub mod font;
pub mod panel;
pub mod text;

pub use driver::{MAX_FPS, RenderDriver, TextSlot, effective_period, wait_until};
pub use font::{FONT_LED_5X3, Glyph, PixelFont};
pub use panel::PanelSink;
pub use text::{
    LOWER_READOUT_REFERENCE, MAX_TEXT_LEN, TextField, TextSource, UPPER_READOUT_REFERENCE,
};
