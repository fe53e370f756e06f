#![forbid(unsafe_code)]

//! Automaton variant with hue-cycling colors.
//!
//! Four role colors (alive, just-born, just-died, dead) are evaluated in
//! HSV at a shared hue angle plus fixed per-role offsets, with per-role
//! value levels scaled by the mode-relative brightness. The hue advances a
//! fixed step each generation while cycling is on.

use std::sync::Arc;

use lumatrix_color::{Rgb, Rgb565};

use crate::grid::GridSize;
use crate::life::{LifeEngine, LifeRules};
use crate::source::{PatternSource, PatternState};

/// Hue offset applied to the "dead" role color.
pub const DEAD_HUE_OFFSET: u16 = 16384;

/// Alternate dead-role offset observed in a sibling tuning of the same
/// formula. Kept selectable until the drift is confirmed intentional.
pub const DEAD_HUE_OFFSET_DRIFTED: u16 = 16000;

const BACKGROUND_BRIGHTNESS: f32 = 0.6;
const FOREGROUND_BRIGHTNESS: f32 = 1.0;

/// The four per-role colors recomputed once per generation.
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

/// Cellular automaton painting with a rotating hue.
#[derive(Debug)]
pub struct LifePattern {
    state: Arc<PatternState>,
    engine: LifeEngine,
    hue: u16,
    saturation: u8,
    value_alive: u8,
    value_just_born: u8,
    value_just_died: u8,
    value_dead: u8,
    died_hue_offset: u16,
    born_hue_offset: u16,
    dead_hue_offset: u16,
    hue_step: u16,
    /// Weight of the previous cell color in the new one (0–255).
    influence: u8,
    frame: FrameColors,
}

impl LifePattern {
    /// Create and seed a panel-sized pattern.
    #[must_use]
    pub fn new(rules: LifeRules) -> Self {
        Self::with_size(GridSize::PANEL, rules, None)
    }

    /// Create and seed with explicit dimensions and an optional RNG seed.
    #[must_use]
    pub fn with_size(size: GridSize, rules: LifeRules, seed: Option<u64>) -> Self {
        let mut pattern = Self {
            state: Arc::new(PatternState::new(BACKGROUND_BRIGHTNESS, FOREGROUND_BRIGHTNESS)),
            engine: LifeEngine::new(size, rules, seed),
            hue: 0,
            saturation: 220,
            value_alive: 225,
            value_just_born: 255,
            value_just_died: 150,
            value_dead: 125,
            died_hue_offset: 5000,
            born_hue_offset: 5000,
            dead_hue_offset: DEAD_HUE_OFFSET,
            hue_step: 128,
            influence: 20,
            frame: FrameColors::default(),
        };
        pattern.initialise();
        pattern
    }

    /// Use the drifted dead-hue tuning instead of the default.
    #[must_use]
    pub fn with_drifted_dead_offset(mut self) -> Self {
        self.dead_hue_offset = DEAD_HUE_OFFSET_DRIFTED;
        self.refresh_frame_colors();
        self
    }

    fn refresh_frame_colors(&mut self) {
        let rel = self.state.relative_brightness();
        let level = |value: u8| (rel * f32::from(value)) as u8;
        self.frame = FrameColors {
            alive: Rgb::from_hsv(self.hue, self.saturation, level(self.value_alive)),
            just_born: Rgb::from_hsv(
                self.hue.wrapping_sub(self.born_hue_offset),
                self.saturation,
                level(self.value_just_born),
            ),
            just_died: Rgb::from_hsv(
                self.hue.wrapping_add(self.died_hue_offset),
                self.saturation,
                level(self.value_just_died),
            ),
            dead: Rgb::from_hsv(
                self.hue.wrapping_add(self.dead_hue_offset),
                self.saturation,
                level(self.value_dead),
            ),
        };
    }
}

impl PatternSource for LifePattern {
    fn initialise(&mut self) {
        self.refresh_frame_colors();
        self.engine.seed(self.frame.alive.into(), self.frame.dead.into());
    }

    fn step(&mut self) {
        if let Some(hue) = self.state.take_hue_request() {
            self.hue = hue;
        }
        if self.state.cycling() {
            self.hue = self.hue.wrapping_add(self.hue_step);
        }
        self.refresh_frame_colors();

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

    fn small(seed: u64) -> LifePattern {
        LifePattern::with_size(GridSize::new(8, 8), LifeRules::default(), Some(seed))
    }

    #[test]
    fn seeds_with_role_colors() {
        let pattern = small(3);
        let mut saw_alive = false;
        let mut saw_dead = false;
        for y in 0..8 {
            for x in 0..8 {
                let c = pattern.cell_color(x, y);
                if c == Rgb565::from(pattern.frame.alive) {
                    saw_alive = true;
                } else if c == Rgb565::from(pattern.frame.dead) {
                    saw_dead = true;
                }
            }
        }
        assert!(saw_alive && saw_dead);
    }

    #[test]
    fn hue_advances_only_while_cycling() {
        let mut pattern = small(5);
        let start = pattern.hue;
        pattern.step();
        assert_eq!(pattern.hue, start.wrapping_add(128));

        pattern.state.toggle_cycling();
        let frozen = pattern.hue;
        pattern.step();
        assert_eq!(pattern.hue, frozen);
    }

    #[test]
    fn hue_override_applies_before_the_step() {
        let mut pattern = small(5);
        pattern.state.set_hue(40_000);
        pattern.step();
        // override lands first, then the cycling step
        assert_eq!(pattern.hue, 40_000u16.wrapping_add(128));
    }

    #[test]
    fn background_mode_dims_frame_colors() {
        let mut pattern = small(9);
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
    fn out_of_bounds_returns_black() {
        let pattern = small(1);
        assert_eq!(pattern.cell_color(-1, -1), Rgb565::BLACK);
        assert_eq!(pattern.cell_color(8, 0), Rgb565::BLACK);
        assert_eq!(pattern.prev_cell_color(0, 8), Rgb565::BLACK);
    }

    #[test]
    fn initialise_is_recallable() {
        let mut pattern = small(2);
        pattern.step();
        pattern.step();
        pattern.initialise();
        // after reseeding every cell holds one of the two seed colors
        for y in 0..8 {
            for x in 0..8 {
                let c = pattern.cell_color(x, y);
                assert!(
                    c == Rgb565::from(pattern.frame.alive) || c == Rgb565::from(pattern.frame.dead),
                    "unexpected color at ({x},{y})"
                );
            }
        }
    }
}
