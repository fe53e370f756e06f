#![forbid(unsafe_code)]

//! Pattern generators for the LED panel.
//!
//! A pattern owns two generations of a fixed-size color grid and advances
//! one generation per [`PatternSource::step`] call. The render driver only
//! ever sees the trait; the concrete generators are two cellular-automaton
//! variants (hue-cycling and palette-cycling colors) and a procedural
//! plasma field.

pub mod grid;
pub mod hue_life;
pub mod life;
pub mod palette_life;
pub mod plasma;
pub mod source;
pub mod wave;

pub use grid::{DoubleGrid, Grid, GridSize};
pub use hue_life::LifePattern;
pub use life::LifeRules;
pub use palette_life::PaletteLifePattern;
pub use plasma::PlasmaPattern;
pub use source::{PatternHandle, PatternSource, PatternState};
