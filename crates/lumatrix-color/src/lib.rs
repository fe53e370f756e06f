#![forbid(unsafe_code)]

//! Color model for the LED panel: RGB565 packing, integer HSV conversion,
//! palette ramps, and temporal blending.

pub mod color;
pub mod palette;

pub use color::{Rgb, Rgb565};
pub use palette::{BlendMode, Palette16, PaletteId, palette_color};
