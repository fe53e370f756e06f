#![forbid(unsafe_code)]

//! Automaton variant with palette-indexed colors.
//!
//! Instead of a hue wheel, the four role colors come from a 16-entry
//! gradient ramp: a shared base index walks the ramp one step per
//! generation, and each role samples at a fixed offset from it with its own
//! brightness fraction. The active ramp rotates through all eight built-in
//! palettes.

use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use lumatrix_color::{BlendMode, PaletteId, Rgb, Rgb565};

use crate::grid::GridSize;
use crate::life::{LifeEngine, LifeRules};
use crate::source::{PatternSource, PatternState};

/// Ramp offset of the "dead" role, half the palette away from alive.
pub const DEAD_RAMP_OFFSET: i16 = 128;

const BORN_RAMP_OFFSET: i16 = 20;
const DIED_RAMP_OFFSET: i16 = -20;

const BACKGROUND_BRIGHTNESS: f32 = 0.621;
const FOREGROUND_BRIGHTNESS: f32 = 1.0;

const ALIVE_FRACTION: f32 = 1.0;
const JUST_BORN_FRACTION: f32 = 1.0;
const JUST_DIED_FRACTION: f32 = 0.7;
const DEAD_FRACTION: f32 = 0.3;

/// How often the generation counter is reported.
const LOG_EVERY_GENERATIONS: u64 = 50;

#[derive(Debug, Clone, Copy, Default)]
struct FrameColors {
    alive: Rgb,
    just_born: Rgb,
    just_died: Rgb,
    dead: Rgb,
}

impl FrameColors {
    fn for_roles(self, new_alive: bool, was_alive: bool) -> Rgb {
        match (new_alive, was_alive) {
            (true, true) => self.alive,
            (true, false) => self.just_born,
            (false, true) => self.just_died,
            (false, false) => self.dead,
        }
    }
}

/// Cellular automaton painting from a rotating palette ramp.
#[derive(Debug)]
pub struct PaletteLifePattern {
    state: Arc<PatternState>,
    engine: LifeEngine,
    base_index: u8,
    /// Weight of the previous cell color in the new one (0–255).
    influence: u8,
    generation: u64,
    frame: FrameColors,
}

impl PaletteLifePattern {
    /// Create and seed a panel-sized pattern.
    #[must_use]
    pub fn new(rules: LifeRules) -> Self {
        Self::with_size(GridSize::PANEL, rules, None)
    }

    /// Create and seed with explicit dimensions and an optional RNG seed.
    #[must_use]
    pub fn with_size(size: GridSize, rules: LifeRules, seed: Option<u64>) -> Self {
        let mut pattern = Self {
            state: Arc::new(PatternState::with_palettes(
                BACKGROUND_BRIGHTNESS,
                FOREGROUND_BRIGHTNESS,
                PaletteId::ALL.len(),
            )),
            engine: LifeEngine::new(size, rules, seed),
            base_index: 0,
            influence: 200,
            generation: 0,
            frame: FrameColors::default(),
        };
        pattern.initialise();
        pattern
    }

    /// The ramp currently being sampled.
    #[must_use]
    pub fn palette(&self) -> PaletteId {
        PaletteId::ALL[self.state.palette_slot() % PaletteId::ALL.len()]
    }

    fn refresh_frame_colors(&mut self) {
        let rel = self.state.relative_brightness();
        let bright = |fraction: f32| (255.0 * rel * fraction) as u8;
        let ramp = self.palette().ramp();
        let at = |offset: i16, fraction: f32| {
            let pos = (self.base_index as i16).wrapping_add(offset) as u8;
            ramp.sample(pos, bright(fraction), BlendMode::Linear)
        };
        self.frame = FrameColors {
            alive: at(0, ALIVE_FRACTION),
            just_born: at(BORN_RAMP_OFFSET, JUST_BORN_FRACTION),
            just_died: at(DIED_RAMP_OFFSET, JUST_DIED_FRACTION),
            dead: at(DEAD_RAMP_OFFSET, DEAD_FRACTION),
        };
    }
}

impl PatternSource for PaletteLifePattern {
    fn initialise(&mut self) {
        self.base_index = self.engine.rng().r#gen();
        self.generation = 0;
        self.refresh_frame_colors();
        self.engine.seed(self.frame.alive.into(), self.frame.dead.into());
    }

    fn step(&mut self) {
        let frame = self.frame;
        let influence = self.influence;
        self.engine.advance(|new_alive, was_alive, prev_color| {
            let base = frame.for_roles(new_alive, was_alive);
            if influence == 0 {
                base.into()
            } else {
                Rgb::blend(base, prev_color.to_rgb(), influence).into()
            }
        });

        if self.state.cycling() {
            self.base_index = self.base_index.wrapping_add(1);
        }
        self.refresh_frame_colors();

        self.generation += 1;
        if self.generation % LOG_EVERY_GENERATIONS == 0 {
            debug!(
                generation = self.generation,
                palette = self.palette().name(),
                base_index = self.base_index,
                "automaton progress"
            );
        }
    }

    fn size(&self) -> GridSize {
        self.engine.size()
    }

    fn cell_color(&self, x: i32, y: i32) -> Rgb565 {
        self.engine.cell_color(x, y)
    }

    fn prev_cell_color(&self, x: i32, y: i32) -> Rgb565 {
        self.engine.prev_cell_color(x, y)
    }

    fn shared_state(&self) -> Arc<PatternState> {
        Arc::clone(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(seed: u64) -> PaletteLifePattern {
        PaletteLifePattern::with_size(GridSize::new(8, 8), LifeRules::default(), Some(seed))
    }

    #[test]
    fn starts_on_the_first_ramp() {
        let pattern = small(1);
        assert_eq!(pattern.palette(), PaletteId::Heat);
    }

    #[test]
    fn next_palette_walks_all_eight() {
        let pattern = small(2);
        let mut seen = Vec::new();
        for _ in 0..PaletteId::ALL.len() {
            seen.push(pattern.palette());
            pattern.state.next_palette();
        }
        assert_eq!(seen, PaletteId::ALL.to_vec());
        // full cycle wraps back to the start
        assert_eq!(pattern.palette(), PaletteId::Heat);
    }

    #[test]
    fn base_index_advances_only_while_cycling() {
        let mut pattern = small(3);
        let start = pattern.base_index;
        pattern.step();
        assert_eq!(pattern.base_index, start.wrapping_add(1));

        pattern.state.toggle_cycling();
        let frozen = pattern.base_index;
        pattern.step();
        assert_eq!(pattern.base_index, frozen);
    }

    #[test]
    fn dead_role_samples_half_a_ramp_away() {
        let mut pattern = small(4);
        pattern.base_index = 0;
        pattern.state.set_background_mode(false);
        pattern.refresh_frame_colors();
        let ramp = pattern.palette().ramp();
        assert_eq!(pattern.frame.alive, ramp.sample(0, 255, BlendMode::Linear));
        assert_eq!(
            pattern.frame.dead,
            ramp.sample(128, (255.0 * DEAD_FRACTION) as u8, BlendMode::Linear)
        );
    }

    #[test]
    fn background_mode_dims_frame_colors() {
        let mut pattern = small(5);
        // park the base index on the white end of the heat ramp
        pattern.base_index = 0xF0;
        pattern.state.set_background_mode(false);
        pattern.refresh_frame_colors();
        let bright = pattern.frame.alive;
        pattern.state.set_background_mode(true);
        pattern.refresh_frame_colors();
        let dim = pattern.frame.alive;
        let sum = |c: Rgb| u32::from(c.r) + u32::from(c.g) + u32::from(c.b);
        assert!(sum(dim) < sum(bright));
    }

    #[test]
    fn reseeding_resets_the_generation_counter() {
        let mut pattern = small(6);
        pattern.step();
        pattern.step();
        assert_eq!(pattern.generation, 2);
        pattern.initialise();
        assert_eq!(pattern.generation, 0);
    }

    #[test]
    fn seeded_cells_hold_role_colors() {
        let pattern = small(7);
        let alive = Rgb565::from(pattern.frame.alive);
        let dead = Rgb565::from(pattern.frame.dead);
        for y in 0..8 {
            for x in 0..8 {
                let c = pattern.cell_color(x, y);
                assert!(c == alive || c == dead, "unexpected color at ({x},{y})");
            }
        }
    }
}
