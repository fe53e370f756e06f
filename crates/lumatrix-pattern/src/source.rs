#![forbid(unsafe_code)]

//! The pattern abstraction consumed by the render driver.
//!
//! [`PatternSource`] is the generation contract: seed, advance, read colors.
//! [`PatternState`] is the lock-free control surface shared with other
//! threads — brightness mode, cycling, palette rotation, and the hue
//! mailbox all live in atomics so a control thread never blocks the render
//! worker for more than a pointer copy.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lumatrix_color::Rgb565;
use tracing::debug;

use crate::grid::GridSize;

/// A pattern generator: one step per paced frame, two readable generations.
pub trait PatternSource: Send {
    /// Seed the starting state. Idempotent, callable at any time.
    fn initialise(&mut self);

    /// Advance exactly one generation.
    fn step(&mut self);

    /// Grid dimensions.
    fn size(&self) -> GridSize;

    /// Color of the displayed generation at `(x, y)`; black when out of
    /// bounds.
    fn cell_color(&self, x: i32, y: i32) -> Rgb565;

    /// Color of the previous generation at `(x, y)`; black when out of
    /// bounds.
    fn prev_cell_color(&self, x: i32, y: i32) -> Rgb565;

    /// Handle to the shared control state.
    fn shared_state(&self) -> Arc<PatternState>;
}

/// Hue-override mailbox flag bit (bit 16; hue occupies bits 0–15).
const HUE_SET: u32 = 1 << 16;

/// Control state shared between a pattern and its controllers.
///
/// Everything here is a plain atomic: writers are control threads reacting
/// to user input, the reader is the pattern inside the render worker, once
/// per generation.
#[derive(Debug)]
pub struct PatternState {
    background_mode: AtomicBool,
    /// f32 bits; recomputed only when the mode changes.
    relative_brightness: AtomicU32,
    background_brightness: f32,
    foreground_brightness: f32,
    cycling: AtomicBool,
    palette_slot: AtomicUsize,
    palette_count: usize,
    hue_request: AtomicU32,
}

impl PatternState {
    /// Create state with the pattern's two brightness presets. Starts in
    /// background mode with cycling enabled.
    #[must_use]
    pub fn new(background_brightness: f32, foreground_brightness: f32) -> Self {
        Self {
            background_mode: AtomicBool::new(true),
            relative_brightness: AtomicU32::new(background_brightness.to_bits()),
            background_brightness,
            foreground_brightness,
            cycling: AtomicBool::new(true),
            palette_slot: AtomicUsize::new(0),
            palette_count: 0,
            hue_request: AtomicU32::new(0),
        }
    }

    /// Same, for a pattern that rotates through `palette_count` ramps.
    #[must_use]
    pub fn with_palettes(
        background_brightness: f32,
        foreground_brightness: f32,
        palette_count: usize,
    ) -> Self {
        Self { palette_count, ..Self::new(background_brightness, foreground_brightness) }
    }

    /// Switch between the background and foreground brightness presets.
    pub fn set_background_mode(&self, background: bool) {
        self.background_mode.store(background, Ordering::Relaxed);
        let brightness =
            if background { self.background_brightness } else { self.foreground_brightness };
        self.relative_brightness.store(brightness.to_bits(), Ordering::Relaxed);
    }

    /// Whether the pattern is currently a background layer.
    #[must_use]
    pub fn is_background_mode(&self) -> bool {
        self.background_mode.load(Ordering::Relaxed)
    }

    /// Current mode-relative brightness scalar in `[0, 1]`.
    #[must_use]
    pub fn relative_brightness(&self) -> f32 {
        f32::from_bits(self.relative_brightness.load(Ordering::Relaxed))
    }

    /// Whether the color cursor advances each generation.
    #[must_use]
    pub fn cycling(&self) -> bool {
        self.cycling.load(Ordering::Relaxed)
    }

    /// Flip the cycling flag; returns the new value.
    pub fn toggle_cycling(&self) -> bool {
        !self.cycling.fetch_xor(true, Ordering::Relaxed)
    }

    /// Advance to the next palette ramp. No-op for patterns without one.
    pub fn next_palette(&self) {
        if self.palette_count == 0 {
            return;
        }
        let slot = self
            .palette_slot
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| {
                Some((s + 1) % self.palette_count)
            })
            .unwrap_or(0);
        debug!(slot = (slot + 1) % self.palette_count, "switched palette");
    }

    /// Index of the active palette ramp.
    #[must_use]
    pub fn palette_slot(&self) -> usize {
        self.palette_slot.load(Ordering::Relaxed)
    }

    /// Request a hue override; applied at the start of the next generation.
    /// Patterns without a hue cursor leave the mailbox unread.
    pub fn set_hue(&self, hue: u16) {
        self.hue_request.store(u32::from(hue) | HUE_SET, Ordering::Relaxed);
    }

    /// Consume a pending hue override, if any.
    #[must_use]
    pub fn take_hue_request(&self) -> Option<u16> {
        let raw = self.hue_request.swap(0, Ordering::Relaxed);
        (raw & HUE_SET != 0).then_some(raw as u16)
    }
}

/// Cloneable handle pairing a boxed pattern with its shared control state.
///
/// The driver keeps one of these in its active-pattern slot; control code
/// keeps clones. Locking the source is only needed to step or reseed —
/// every control operation goes through [`PatternState`] without touching
/// the mutex.
#[derive(Clone)]
pub struct PatternHandle {
    source: Arc<Mutex<dyn PatternSource>>,
    state: Arc<PatternState>,
}

impl PatternHandle {
    /// Wrap a concrete pattern.
    #[must_use]
    pub fn new<P: PatternSource + 'static>(pattern: P) -> Self {
        let state = pattern.shared_state();
        Self { source: Arc::new(Mutex::new(pattern)), state }
    }

    /// Lock the pattern for stepping or reseeding.
    ///
    /// A poisoned lock is recovered rather than propagated: grid state is
    /// always internally consistent between statements, the worst case is a
    /// visually stale generation.
    pub fn lock(&self) -> MutexGuard<'_, dyn PatternSource + 'static> {
        self.source.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The shared control state.
    #[must_use]
    pub fn state(&self) -> &PatternState {
        &self.state
    }
}

impl std::fmt::Debug for PatternHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternHandle").field("state", &self.state).finish_non_exhaustive()
    }
}
