#![forbid(unsafe_code)]

//! The shared cellular-automaton engine: rule table, neighbor counting,
//! and the paired boolean/color generation buffers.
//!
//! The rule table is Conway's with two twists: deaths by under- and
//! overpopulation each carry a small configurable survival chance, and
//! dead cells also reproduce at six neighbors. The surviving/reproducing
//! branches are strictly deterministic — they never consult the random
//! source — so they can be asserted exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lumatrix_color::Rgb565;

use crate::grid::{DoubleGrid, GridSize};

/// Default underpopulation death chance, percent.
pub const UNDERPOPULATION_DEATH_PCT: u16 = 99;

/// Default overpopulation death chance, percent.
pub const OVERPOPULATION_DEATH_PCT: u16 = 95;

/// Automaton rule configuration.
///
/// Death thresholds are per-mille: a doomed cell survives when a uniform
/// draw from `[0, 1000)` exceeds the threshold, so 990 means a 1% reprieve.
/// A threshold of 1000 or more makes the death certain (the draw still
/// happens, the outcome cannot pass it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifeRules {
    /// Probability (percent) that a cell starts alive when seeding.
    pub seed_density_pct: u8,
    /// Toroidal neighbor addressing when true; clamped to the edge
    /// otherwise.
    pub edge_wrap: bool,
    /// Per-mille death threshold for live cells with fewer than two
    /// neighbors.
    pub underpop_death_per_mille: u16,
    /// Per-mille death threshold for live cells with more than three
    /// neighbors.
    pub overpop_death_per_mille: u16,
}

impl Default for LifeRules {
    fn default() -> Self {
        Self::new(45, true)
    }
}

impl LifeRules {
    /// Rules with the default death chances.
    #[must_use]
    pub const fn new(seed_density_pct: u8, edge_wrap: bool) -> Self {
        Self {
            seed_density_pct,
            edge_wrap,
            underpop_death_per_mille: UNDERPOPULATION_DEATH_PCT * 10,
            overpop_death_per_mille: OVERPOPULATION_DEATH_PCT * 10,
        }
    }

    /// Apply the rule table to one cell.
    ///
    /// `roll` supplies uniform draws from `[0, 1000)` and is only invoked
    /// on the two probabilistic branches.
    pub fn next_state(&self, alive: bool, neighbors: u8, roll: &mut dyn FnMut() -> u16) -> bool {
        if alive {
            if neighbors < 2 {
                roll() > self.underpop_death_per_mille
            } else if neighbors <= 3 {
                true
            } else {
                roll() > self.overpop_death_per_mille
            }
        } else {
            neighbors == 3 || neighbors == 6
        }
    }
}

/// Count live cells among the 8 neighbors of `(x, y)`.
pub(crate) fn live_neighbors(cells: &DoubleGrid<bool>, wrap: bool, x: usize, y: usize) -> u8 {
    let w = cells.size().width as isize;
    let h = cells.size().height as isize;
    let mut count = 0;
    for dy in -1isize..=1 {
        for dx in -1isize..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let mut nx = x as isize + dx;
            let mut ny = y as isize + dy;
            if wrap {
                nx = nx.rem_euclid(w);
                ny = ny.rem_euclid(h);
            } else if nx < 0 || nx >= w || ny < 0 || ny >= h {
                continue;
            }
            if cells.current(nx as usize, ny as usize) == Some(true) {
                count += 1;
            }
        }
    }
    count
}

/// Boolean and color generation buffers plus the random source, shared by
/// both automaton variants. The variants differ only in how they produce
/// the per-cell color.
#[derive(Debug)]
pub(crate) struct LifeEngine {
    pub(crate) rules: LifeRules,
    cells: DoubleGrid<bool>,
    colors: DoubleGrid<Rgb565>,
    rng: StdRng,
}

impl LifeEngine {
    pub(crate) fn new(size: GridSize, rules: LifeRules, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rules,
            cells: DoubleGrid::new(size, false),
            colors: DoubleGrid::new(size, Rgb565::BLACK),
            rng,
        }
    }

    pub(crate) fn size(&self) -> GridSize {
        self.cells.size()
    }

    pub(crate) fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Randomly seed the alive grid at the configured density and paint
    /// every cell with the matching base color.
    pub(crate) fn seed(&mut self, alive_color: Rgb565, dead_color: Rgb565) {
        let size = self.size();
        let density = u32::from(self.rules.seed_density_pct.min(100));
        self.cells.fill(false, false);
        self.colors.fill(dead_color, dead_color);
        for y in 0..size.height {
            for x in 0..size.width {
                if self.rng.gen_range(0..100u32) < density {
                    self.cells.set_current(x, y, true);
                    self.colors.set_current(x, y, alive_color);
                }
            }
        }
    }

    /// Advance one generation. `color_for(new_alive, was_alive, prev_color)`
    /// decides each cell's next color.
    pub(crate) fn advance(&mut self, mut color_for: impl FnMut(bool, bool, Rgb565) -> Rgb565) {
        let Self { rules, cells, colors, rng } = self;
        let size = cells.size();
        let mut roll = move || rng.gen_range(0..1000u16);
        for y in 0..size.height {
            for x in 0..size.width {
                let neighbors = live_neighbors(cells, rules.edge_wrap, x, y);
                let was_alive = cells.current(x, y) == Some(true);
                let next = rules.next_state(was_alive, neighbors, &mut roll);
                cells.set_next(x, y, next);
                let prev_color = colors.current(x, y).unwrap_or(Rgb565::BLACK);
                colors.set_next(x, y, color_for(next, was_alive, prev_color));
            }
        }
        cells.flip();
        colors.flip();
    }

    pub(crate) fn is_alive(&self, x: usize, y: usize) -> bool {
        self.cells.current(x, y) == Some(true)
    }

    pub(crate) fn set_alive(&mut self, x: usize, y: usize, alive: bool) {
        self.cells.set_current(x, y, alive);
    }

    pub(crate) fn cell_color(&self, x: i32, y: i32) -> Rgb565 {
        coord(x, y)
            .and_then(|(x, y)| self.colors.current(x, y))
            .unwrap_or(Rgb565::BLACK)
    }

    pub(crate) fn prev_cell_color(&self, x: i32, y: i32) -> Rgb565 {
        coord(x, y)
            .and_then(|(x, y)| self.colors.previous(x, y))
            .unwrap_or(Rgb565::BLACK)
    }
}

/// Negative coordinates are out of bounds, not an error.
fn coord(x: i32, y: i32) -> Option<(usize, usize)> {
    Some((usize::try_from(x).ok()?, usize::try_from(y).ok()?))
}
