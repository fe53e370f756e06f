#![forbid(unsafe_code)]

//! Continuous procedural noise field ("plasma").
//!
//! No alive/dead grid and no generation blending: every cell's scalar field
//! value is recomputed each generation from a sum of sine terms over the
//! cell coordinates and a time counter, then mapped through the active
//! palette ramp. After a fixed number of generations the counter resets and
//! a random ramp from the rotation subset takes over.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use lumatrix_color::{BlendMode, PaletteId, Rgb565};

use crate::grid::{Grid, GridSize};
use crate::source::{PatternSource, PatternState};
use crate::wave::{cos8, cos16, sin8, sin16};

/// Generations between palette changes.
pub const PALETTE_HOLD_GENERATIONS: u16 = 1024;

const BACKGROUND_BRIGHTNESS: f32 = 0.6;
const FOREGROUND_BRIGHTNESS: f32 = 1.0;

/// Procedural plasma field over a rotating palette subset.
#[derive(Debug)]
pub struct PlasmaPattern {
    state: Arc<PatternState>,
    cells: Grid<Rgb565>,
    palette: PaletteId,
    time_counter: u16,
    cycles: u16,
    rng: StdRng,
}

impl PlasmaPattern {
    /// Create a panel-sized field.
    #[must_use]
    pub fn new() -> Self {
        Self::with_size(GridSize::PANEL, None)
    }

    /// Create with explicit dimensions and an optional RNG seed.
    #[must_use]
    pub fn with_size(size: GridSize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut pattern = Self {
            state: Arc::new(PatternState::new(BACKGROUND_BRIGHTNESS, FOREGROUND_BRIGHTNESS)),
            cells: Grid::new(size, Rgb565::BLACK),
            palette: PaletteId::Rainbow,
            time_counter: 0,
            cycles: 0,
            rng,
        };
        pattern.initialise();
        pattern
    }

    /// The ramp currently mapped over the field.
    #[must_use]
    pub const fn palette(&self) -> PaletteId {
        self.palette
    }

    /// Field value at `(x, y)` for the given time counter. Intermediate
    /// sums wrap in 16 bits, which is part of the visual character.
    fn field_value(x: i32, y: i32, time_counter: u16) -> u8 {
        let t = i32::from(time_counter);
        let wibble = i32::from(sin8(time_counter as u8));
        let mut v: i16 = 128;
        v = v.wrapping_add(sin16(x * wibble * 3 + t));
        v = v.wrapping_add(cos16(y * (128 - wibble) + t));
        v = v.wrapping_add(sin16(y * x * i32::from(cos8((time_counter as u8).wrapping_neg())) / 8));
        (v >> 8) as u8
    }
}

impl Default for PlasmaPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternSource for PlasmaPattern {
    fn initialise(&mut self) {
        self.palette = PaletteId::Rainbow;
        self.time_counter = 0;
        self.cycles = 0;
    }

    fn step(&mut self) {
        let brightness = (self.state.relative_brightness() * 255.0) as u8;
        let ramp = self.palette.ramp();
        let size = self.cells.size();
        for y in 0..size.height {
            for x in 0..size.width {
                let pos = Self::field_value(x as i32, y as i32, self.time_counter);
                let color = ramp.sample(pos, brightness, BlendMode::Linear);
                self.cells.set(x, y, color.into());
            }
        }

        self.time_counter = self.time_counter.wrapping_add(1);
        self.cycles += 1;
        if self.cycles >= PALETTE_HOLD_GENERATIONS {
            self.time_counter = 0;
            self.cycles = 0;
            let rotation = PaletteId::PLASMA_ROTATION;
            self.palette = rotation[self.rng.gen_range(0..rotation.len())];
            debug!(palette = self.palette.name(), "plasma palette change");
        }
    }

    fn size(&self) -> GridSize {
        self.cells.size()
    }

    fn cell_color(&self, x: i32, y: i32) -> Rgb565 {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return Rgb565::BLACK;
        };
        self.cells.get(x, y).unwrap_or(Rgb565::BLACK)
    }

    /// The field keeps no history; the previous generation reads as black.
    fn prev_cell_color(&self, _x: i32, _y: i32) -> Rgb565 {
        Rgb565::BLACK
    }

    fn shared_state(&self) -> Arc<PatternState> {
        Arc::clone(&self.state)
    }
}
