#![forbid(unsafe_code)]

//! The paced render worker and its control surface.
//!
//! [`RenderDriver::spawn`] moves the panel and text source into a worker
//! thread that produces one frame per effective period. Controllers talk
//! to the worker exclusively through atomics and short mutex-guarded
//! sections; no lock is ever held across a blocking wait, and a mode
//! switch costs the render loop one pointer copy.
//!
//! Steady-state frame order: swap buffers first (publishing the frame
//! drawn last iteration), pace, clear the back buffer, apply pending
//! brightness, poll the text source, step and draw the pattern, draw the
//! overlay. Swapping before the paced wait guarantees the sink has
//! refreshed the published buffer at least once before it is overwritten.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use lumatrix_color::Rgb565;
use lumatrix_pattern::PatternHandle;

use crate::font::{FONT_LED_5X3, PixelFont};
use crate::panel::PanelSink;
use crate::text::{
    LOWER_READOUT_REFERENCE, TextField, TextSource, UPPER_READOUT_REFERENCE,
};

/// Fastest accepted frame rate.
pub const MAX_FPS: u32 = 120;

/// Coarse poll interval while paused.
const PAUSED_POLL: Duration = Duration::from_millis(150);

/// Read-side lock budget for text fields.
const LOCK_TIMEOUT: Duration = Duration::from_millis(100);

/// Frames between timing diagnostics.
const STATS_EVERY_FRAMES: u32 = 60;

/// Which overlay field a text operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSlot {
    /// Upper readout, centered mid-panel.
    A,
    /// Lower readout, centered on the bottom edge.
    B,
}

/// The larger of the requested frame period and the sink's physical
/// flip minimum: never flip faster than the sink can display, never
/// slower than requested.
#[must_use]
pub fn effective_period(requested: Duration, sink_minimum: Duration) -> Duration {
    requested.max(sink_minimum)
}

/// Sleep until one `period` past `last_wake` and return the new baseline.
///
/// When compute has already overrun the deadline the wait is skipped and
/// the baseline resets to now, so a slow frame sags the rate instead of
/// triggering a catch-up burst.
#[must_use]
pub fn wait_until(last_wake: Instant, period: Duration) -> Instant {
    let target = last_wake + period;
    match target.checked_duration_since(Instant::now()) {
        Some(remaining) => {
            thread::sleep(remaining);
            target
        }
        None => Instant::now(),
    }
}

fn frame_period_ms(fps: u32) -> u32 {
    1000 / fps.clamp(1, MAX_FPS)
}

fn lock_unbounded<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Bounded lock acquisition: try-lock with short sleeps until `timeout`.
/// A poisoned mutex is recovered; text fields are consistent between
/// statements and the worst case is one stale draw.
fn lock_timeout<T: ?Sized>(mutex: &Mutex<T>, timeout: Duration) -> Option<MutexGuard<'_, T>> {
    let deadline = Instant::now() + timeout;
    loop {
        match mutex.try_lock() {
            Ok(guard) => return Some(guard),
            Err(TryLockError::Poisoned(poisoned)) => return Some(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) if Instant::now() >= deadline => return None,
            Err(TryLockError::WouldBlock) => thread::sleep(Duration::from_micros(200)),
        }
    }
}

struct DriverShared {
    enabled: AtomicBool,
    text_enabled: AtomicBool,
    background_enabled: AtomicBool,
    panel_brightness: AtomicU8,
    frame_period_ms: AtomicU32,
    period_changed: AtomicBool,
    shutdown: AtomicBool,
    pattern: Mutex<Option<PatternHandle>>,
    upper: Mutex<TextField>,
    lower: Mutex<TextField>,
}

impl DriverShared {
    fn field(&self, slot: TextSlot) -> &Mutex<TextField> {
        match slot {
            TextSlot::A => &self.upper,
            TextSlot::B => &self.lower,
        }
    }
}

/// Owns the render worker thread; dropping pauses and joins it.
pub struct RenderDriver {
    shared: Arc<DriverShared>,
    worker: Option<JoinHandle<()>>,
}

impl RenderDriver {
    /// Start the worker, paused, with `panel` and `text` moved into it.
    /// Call [`RenderDriver::resume`] to begin producing frames.
    pub fn spawn<P, T>(fps: u32, panel: P, pattern: Option<PatternHandle>, text: T) -> Self
    where
        P: PanelSink + 'static,
        T: TextSource + 'static,
    {
        let shared = Arc::new(DriverShared {
            enabled: AtomicBool::new(false),
            text_enabled: AtomicBool::new(true),
            background_enabled: AtomicBool::new(true),
            panel_brightness: AtomicU8::new(255),
            frame_period_ms: AtomicU32::new(frame_period_ms(fps)),
            period_changed: AtomicBool::new(true),
            shutdown: AtomicBool::new(false),
            pattern: Mutex::new(pattern),
            upper: Mutex::new(TextField::centered_middle(
                &FONT_LED_5X3,
                UPPER_READOUT_REFERENCE,
                Rgb565::WHITE,
            )),
            lower: Mutex::new(TextField::centered_bottom(
                &FONT_LED_5X3,
                LOWER_READOUT_REFERENCE,
                Rgb565::WHITE,
            )),
        });
        let worker = Worker { shared: Arc::clone(&shared), panel, text };
        let handle = thread::Builder::new()
            .name("lumatrix-render".into())
            .spawn(move || worker.run())
            .ok();
        if handle.is_none() {
            warn!("failed to spawn render worker");
        }
        Self { shared, worker: handle }
    }

    /// Begin (or continue) producing frames.
    pub fn resume(&self) {
        self.shared.enabled.store(true, Ordering::Relaxed);
    }

    /// Stop producing frames; the worker blanks the panel and idles.
    /// Cooperative, with a latency bound of one frame period.
    pub fn pause(&self) {
        self.shared.enabled.store(false, Ordering::Relaxed);
    }

    /// Swap in a new active pattern. The render loop picks it up on its
    /// next iteration.
    pub fn set_pattern(&self, pattern: PatternHandle) {
        *lock_unbounded(&self.shared.pattern) = Some(pattern);
    }

    /// Clone of the active pattern handle, if one is set.
    #[must_use]
    pub fn pattern(&self) -> Option<PatternHandle> {
        lock_unbounded(&self.shared.pattern).clone()
    }

    /// Request a new frame rate, clamped to `1..=MAX_FPS`. Timing is
    /// recomputed by the worker on its next iteration.
    pub fn set_fps(&self, fps: u32) {
        let period = frame_period_ms(fps);
        self.shared.frame_period_ms.store(period, Ordering::Relaxed);
        self.shared.period_changed.store(true, Ordering::Relaxed);
        debug!(period_ms = period, "frame period requested");
    }

    /// Set panel brightness, 0–255; applied by the worker next frame.
    pub fn set_panel_brightness(&self, brightness: u8) {
        self.shared.panel_brightness.store(brightness, Ordering::Relaxed);
    }

    /// Enable or disable the overlay text layer.
    pub fn enable_text_drawing(&self, enable: bool) {
        self.shared.text_enabled.store(enable, Ordering::Relaxed);
    }

    /// Enable or disable the pattern layer; when disabled frames stay
    /// black apart from the overlay.
    pub fn enable_background_drawing(&self, enable: bool) {
        self.shared.background_enabled.store(enable, Ordering::Relaxed);
    }

    /// Switch the active pattern between background and foreground
    /// brightness presets.
    pub fn set_background_mode(&self, background: bool) {
        if let Some(pattern) = self.pattern() {
            pattern.state().set_background_mode(background);
        }
    }

    /// Toggle color cycling on the active pattern; returns the new state.
    pub fn toggle_cycling(&self) -> Option<bool> {
        self.pattern().map(|p| p.state().toggle_cycling())
    }

    /// Advance the active pattern to its next palette ramp.
    pub fn next_palette(&self) {
        if let Some(pattern) = self.pattern() {
            pattern.state().next_palette();
        }
    }

    /// Override the active pattern's hue cursor.
    pub fn set_hue(&self, hue: u16) {
        if let Some(pattern) = self.pattern() {
            pattern.state().set_hue(hue);
        }
    }

    /// Replace one overlay field's content.
    pub fn set_text(&self, slot: TextSlot, text: &str) {
        match lock_timeout(self.shared.field(slot), LOCK_TIMEOUT) {
            Some(mut field) => field.set_content(text),
            None => warn!(?slot, "text update dropped, lock timed out"),
        }
    }

    /// Move one overlay field's baseline cursor.
    pub fn set_text_position(&self, slot: TextSlot, x: i32, y: i32) {
        if let Some(mut field) = lock_timeout(self.shared.field(slot), LOCK_TIMEOUT) {
            field.x = x;
            field.y = y;
        }
    }

    /// Set one overlay field's visual-centering offsets.
    pub fn set_text_offset(&self, slot: TextSlot, x_offset: i32, y_offset: i32) {
        if let Some(mut field) = lock_timeout(self.shared.field(slot), LOCK_TIMEOUT) {
            field.x_offset = x_offset;
            field.y_offset = y_offset;
        }
    }

    /// Set one overlay field's color.
    pub fn set_text_color(&self, slot: TextSlot, color: Rgb565) {
        if let Some(mut field) = lock_timeout(self.shared.field(slot), LOCK_TIMEOUT) {
            field.color = color;
        }
    }

    /// Replace one overlay field's font and recompute its default
    /// placement from the slot's reference string.
    pub fn set_text_font(&self, slot: TextSlot, font: &'static PixelFont) {
        if let Some(mut field) = lock_timeout(self.shared.field(slot), LOCK_TIMEOUT) {
            match slot {
                TextSlot::A => field.set_font_centered_middle(font, UPPER_READOUT_REFERENCE),
                TextSlot::B => field.set_font_centered_bottom(font, LOWER_READOUT_REFERENCE),
            }
        }
    }
}

impl Drop for RenderDriver {
    fn drop(&mut self) {
        self.shared.enabled.store(false, Ordering::Relaxed);
        self.shared.shutdown.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl std::fmt::Debug for RenderDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderDriver")
            .field("enabled", &self.shared.enabled.load(Ordering::Relaxed))
            .field("frame_period_ms", &self.shared.frame_period_ms.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

struct Worker<P: PanelSink, T: TextSource> {
    shared: Arc<DriverShared>,
    panel: P,
    text: T,
}

impl<P: PanelSink, T: TextSource> Worker<P, T> {
    fn run(mut self) {
        let mut was_enabled = false;
        let mut last_wake = Instant::now();
        let mut effective =
            Duration::from_millis(u64::from(self.shared.frame_period_ms.load(Ordering::Relaxed)));
        let mut stats = FrameStats::default();

        self.panel.set_brightness(self.shared.panel_brightness.load(Ordering::Relaxed));

        while !self.shared.shutdown.load(Ordering::Relaxed) {
            if self.shared.period_changed.swap(false, Ordering::Relaxed) {
                let requested = Duration::from_millis(u64::from(
                    self.shared.frame_period_ms.load(Ordering::Relaxed),
                ));
                let min_swap =
                    Duration::from_secs(1) / self.panel.refresh_rate_hz().max(1);
                effective = effective_period(requested, min_swap);
                debug!(effective_ms = effective.as_millis() as u64, "frame timing recomputed");
            }

            if !self.shared.enabled.load(Ordering::Relaxed) {
                if was_enabled {
                    info!("render worker paused, blanking panel");
                    self.panel.set_brightness(0);
                    if self.panel.is_double_buffered() {
                        // blank both buffers; the wait lets the first
                        // flip take visible effect before the second clear
                        self.panel.clear();
                        self.panel.swap_buffers();
                        last_wake = wait_until(last_wake, effective);
                        self.panel.clear();
                    } else {
                        self.panel.clear();
                    }
                }
                was_enabled = false;
                thread::sleep(PAUSED_POLL);
                last_wake = Instant::now();
                continue;
            }

            if !was_enabled {
                info!("render worker resumed");
                self.panel
                    .set_brightness(self.shared.panel_brightness.load(Ordering::Relaxed));
                // schedule relative to now, no catch-up burst
                last_wake = Instant::now();
                was_enabled = true;
            }

            // copy the handle out under the lock, render without it
            let pattern = lock_unbounded(&self.shared.pattern).clone();
            let Some(pattern) = pattern else {
                thread::sleep(Duration::from_millis(1));
                continue;
            };

            if self.panel.is_double_buffered() {
                self.panel.swap_buffers();
            }

            last_wake = wait_until(last_wake, effective);

            let t_start = Instant::now();
            self.panel.clear();

            let brightness = self.shared.panel_brightness.load(Ordering::Relaxed);
            if self.panel.brightness() != brightness {
                self.panel.set_brightness(brightness);
            }

            if self.text.take_changed() {
                let a = self.text.field_a();
                let b = self.text.field_b();
                store_text(&self.shared.upper, &a, "upper");
                store_text(&self.shared.lower, &b, "lower");
            }
            let t_read = Instant::now();

            let (t_calc, t_draw);
            if self.shared.background_enabled.load(Ordering::Relaxed) {
                let mut source = pattern.lock();
                source.step();
                t_calc = Instant::now();
                let size = source.size();
                for y in 0..size.height as i32 {
                    for x in 0..size.width as i32 {
                        self.panel.draw_pixel(x, y, source.cell_color(x, y));
                    }
                }
                t_draw = Instant::now();
            } else {
                // background stays cleared
                t_calc = Instant::now();
                t_draw = t_calc;
            }

            if self.shared.text_enabled.load(Ordering::Relaxed) {
                draw_field(&mut self.panel, &self.shared.upper, "upper");
                draw_field(&mut self.panel, &self.shared.lower, "lower");
            }
            let t_text = Instant::now();

            stats.record(t_start, t_read, t_calc, t_draw, t_text);
        }
    }
}

fn store_text(field: &Mutex<TextField>, text: &str, label: &str) {
    match lock_timeout(field, LOCK_TIMEOUT) {
        Some(mut field) => field.set_content(text),
        None => warn!(field = label, "text update dropped, lock timed out"),
    }
}

fn draw_field(panel: &mut impl PanelSink, field: &Mutex<TextField>, label: &str) {
    match lock_timeout(field, LOCK_TIMEOUT) {
        Some(field) => {
            panel.set_font(field.font);
            let (x, y) = field.draw_position();
            panel.print_text(field.content(), x, y, field.color);
        }
        None => warn!(field = label, "overlay draw skipped, lock timed out"),
    }
}

/// Rolling frame-timing diagnostics, reported every N frames.
/// Observational only; never feeds back into pacing.
#[derive(Default)]
struct FrameStats {
    frames: u32,
    last_start: Option<Instant>,
}

impl FrameStats {
    fn record(
        &mut self,
        start: Instant,
        read: Instant,
        calc: Instant,
        draw: Instant,
        done: Instant,
    ) {
        self.frames += 1;
        if self.frames >= STATS_EVERY_FRAMES {
            self.frames = 0;
            let work = done.duration_since(start);
            if let Some(prev) = self.last_start {
                let total = start.duration_since(prev);
                let idle = total.saturating_sub(work);
                let fps = if total.is_zero() { 0.0 } else { 1.0 / total.as_secs_f64() };
                debug!(
                    calc_us = calc.duration_since(read).as_micros() as u64,
                    draw_us = draw.duration_since(calc).as_micros() as u64,
                    text_us = done.duration_since(draw).as_micros() as u64,
                    work_us = work.as_micros() as u64,
                    idle_us = idle.as_micros() as u64,
                    fps = format_args!("{fps:.1}"),
                    "frame timing"
                );
            }
        }
        self.last_start = Some(start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_period_takes_the_larger() {
        let ten = Duration::from_millis(10);
        let twenty_five = Duration::from_millis(25);
        assert_eq!(effective_period(ten, twenty_five), twenty_five);
        assert_eq!(effective_period(Duration::from_millis(50), twenty_five), ten * 5);
        assert_eq!(effective_period(ten, ten), ten);
    }

    #[test]
    fn frame_period_clamps_fps() {
        assert_eq!(frame_period_ms(0), 1000);
        assert_eq!(frame_period_ms(1), 1000);
        assert_eq!(frame_period_ms(40), 25);
        assert_eq!(frame_period_ms(500), 1000 / MAX_FPS);
    }

    #[test]
    fn wait_until_advances_by_whole_periods() {
        let period = Duration::from_millis(5);
        let start = Instant::now();
        let next = wait_until(start, period);
        assert_eq!(next, start + period);
        assert!(Instant::now() >= next);
    }

    #[test]
    fn wait_until_resets_after_overrun() {
        let period = Duration::from_millis(1);
        let stale = Instant::now() - Duration::from_secs(1);
        let before = Instant::now();
        let next = wait_until(stale, period);
        // overrun: no sleep, baseline snaps to now
        assert!(next >= before);
        assert!(next.duration_since(before) < Duration::from_millis(50));
    }

    #[test]
    fn lock_timeout_gives_up_on_contention() {
        let mutex = Mutex::new(0u8);
        let guard = mutex.lock().unwrap();
        assert!(lock_timeout(&mutex, Duration::from_millis(5)).is_none());
        drop(guard);
        assert!(lock_timeout(&mutex, Duration::from_millis(5)).is_some());
    }
}
