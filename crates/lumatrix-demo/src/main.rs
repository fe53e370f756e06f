#![forbid(unsafe_code)]

//! Terminal demo: runs the pattern generators through the render driver
//! onto a half-block terminal panel, with simulated sensor readouts.
//!
//! Keys: `m`/space next mode, `p` pause, `c` toggle cycling, `n` next
//! palette, `h` bump hue, `+`/`-` brightness, `q` quit.

mod modes;
mod panel;
mod sensor;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lumatrix::prelude::*;

use crate::modes::{DisplayMode, PatternChoice};
use crate::panel::TermPanel;
use crate::sensor::SimSensor;

struct Patterns {
    life: PatternHandle,
    palette_life: PatternHandle,
    plasma: PatternHandle,
}

impl Patterns {
    fn get(&self, choice: PatternChoice) -> &PatternHandle {
        match choice {
            PatternChoice::Life => &self.life,
            PatternChoice::PaletteLife => &self.palette_life,
            PatternChoice::Plasma => &self.plasma,
        }
    }
}

fn apply_mode(driver: &RenderDriver, patterns: &Patterns, mode: DisplayMode) {
    let cfg = mode.config();
    let pattern = patterns.get(cfg.pattern);
    pattern.state().set_background_mode(cfg.background_mode);
    driver.set_pattern(pattern.clone());
    driver.set_fps(cfg.fps);
    driver.enable_background_drawing(cfg.background_drawing);
    driver.enable_text_drawing(cfg.text_drawing);
    info!(mode = mode.name(), fps = cfg.fps, "display mode applied");
}

fn run() -> io::Result<()> {
    let patterns = Patterns {
        life: PatternHandle::new(LifePattern::new(LifeRules::default())),
        palette_life: PatternHandle::new(PaletteLifePattern::new(LifeRules::default())),
        plasma: PatternHandle::new(PlasmaPattern::new()),
    };

    let sensor = SimSensor::spawn();
    let term_panel = TermPanel::new()?;
    let driver = RenderDriver::spawn(
        modes::LIFE_FPS,
        term_panel,
        Some(patterns.life.clone()),
        sensor.readout(),
    );

    let mut mode = DisplayMode::LifeAndText;
    apply_mode(&driver, &patterns, mode);
    driver.resume();

    let mut paused = false;
    let mut brightness: u8 = 255;
    let mut hue: u16 = 0;

    loop {
        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Char('m') | KeyCode::Char(' ') => {
                mode = mode.next();
                apply_mode(&driver, &patterns, mode);
            }
            KeyCode::Char('p') => {
                paused = !paused;
                if paused {
                    driver.pause();
                } else {
                    driver.resume();
                }
            }
            KeyCode::Char('c') => {
                if let Some(cycling) = driver.toggle_cycling() {
                    info!(cycling, "cycling toggled");
                }
            }
            KeyCode::Char('n') => driver.next_palette(),
            KeyCode::Char('h') => {
                hue = hue.wrapping_add(4096);
                driver.set_hue(hue);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                brightness = brightness.saturating_add(16);
                driver.set_panel_brightness(brightness);
            }
            KeyCode::Char('-') => {
                brightness = brightness.saturating_sub(16);
                driver.set_panel_brightness(brightness);
            }
            _ => {}
        }
    }

    // joins the worker, which drops the panel and restores the terminal
    drop(driver);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
