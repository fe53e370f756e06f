#![forbid(unsafe_code)]

//! Lumatrix public facade crate.
//!
//! Re-exports the common types from the internal crates: color packing and
//! palettes, the pattern generators, and the paced render driver. Most
//! applications only need this crate plus a [`PanelSink`] implementation
//! for their output device.

// --- Color re-exports ------------------------------------------------------

pub use lumatrix_color::{BlendMode, Palette16, PaletteId, Rgb, Rgb565, palette_color};

// --- Pattern re-exports ----------------------------------------------------

pub use lumatrix_pattern::{
    DoubleGrid, Grid, GridSize, LifePattern, LifeRules, PaletteLifePattern, PatternHandle,
    PatternSource, PatternState, PlasmaPattern,
};

// --- Driver re-exports -----------------------------------------------------

pub use lumatrix_driver::{
    FONT_LED_5X3, MAX_FPS, PanelSink, PixelFont, RenderDriver, TextField, TextSlot, TextSource,
};

/// Convenience imports for application code.
pub mod prelude {
    pub use crate::{
        GridSize, LifePattern, LifeRules, PaletteLifePattern, PanelSink, PatternHandle,
        PlasmaPattern, RenderDriver, Rgb, Rgb565, TextSlot, TextSource,
    };
}
