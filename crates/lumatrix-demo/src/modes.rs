#![forbid(unsafe_code)]

//! The display mode table: which pattern runs, at what rate, with which
//! layers enabled.

/// Frame rate for the text-only readout.
pub const TEXT_ONLY_FPS: u32 = 10;

/// Frame rate for the automaton patterns.
pub const LIFE_FPS: u32 = 15;

/// Frame rate for the plasma field.
pub const PLASMA_FPS: u32 = 40;

/// Which generator a mode runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternChoice {
    /// Hue-cycling automaton.
    Life,
    /// Palette-cycling automaton.
    PaletteLife,
    /// Procedural plasma field.
    Plasma,
}

/// Everything a mode switch applies to the driver.
#[derive(Debug, Clone, Copy)]
pub struct ModeConfig {
    /// Requested frame rate.
    pub fps: u32,
    /// Whether the pattern layer draws.
    pub background_drawing: bool,
    /// Whether the overlay draws.
    pub text_drawing: bool,
    /// Pattern brightness preset: background (dimmed, behind text) or
    /// foreground (full, standalone).
    pub background_mode: bool,
    /// The generator to run.
    pub pattern: PatternChoice,
}

/// One of the seven display modes, cycled by the mode key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    TextOnly,
    LifeAndText,
    PaletteLifeAndText,
    PlasmaAndText,
    LifeOnly,
    PaletteLifeOnly,
    PlasmaOnly,
}

impl DisplayMode {
    /// Modes in cycle order.
    pub const ALL: [Self; 7] = [
        Self::TextOnly,
        Self::LifeAndText,
        Self::PaletteLifeAndText,
        Self::PlasmaAndText,
        Self::LifeOnly,
        Self::PaletteLifeOnly,
        Self::PlasmaOnly,
    ];

    /// The mode after this one, wrapping.
    #[must_use]
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Driver settings for this mode.
    #[must_use]
    pub const fn config(self) -> ModeConfig {
        match self {
            Self::TextOnly => ModeConfig {
                fps: TEXT_ONLY_FPS,
                background_drawing: false,
                text_drawing: true,
                background_mode: true,
                pattern: PatternChoice::Life,
            },
            Self::LifeAndText => ModeConfig {
                fps: LIFE_FPS,
                background_drawing: true,
                text_drawing: true,
                background_mode: true,
                pattern: PatternChoice::Life,
            },
            Self::PaletteLifeAndText => ModeConfig {
                fps: LIFE_FPS,
                background_drawing: true,
                text_drawing: true,
                background_mode: true,
                pattern: PatternChoice::PaletteLife,
            },
            Self::PlasmaAndText => ModeConfig {
                fps: PLASMA_FPS,
                background_drawing: true,
                text_drawing: true,
                background_mode: true,
                pattern: PatternChoice::Plasma,
            },
            Self::LifeOnly => ModeConfig {
                fps: LIFE_FPS,
                background_drawing: true,
                text_drawing: false,
                background_mode: false,
                pattern: PatternChoice::Life,
            },
            Self::PaletteLifeOnly => ModeConfig {
                fps: LIFE_FPS,
                background_drawing: true,
                text_drawing: false,
                background_mode: false,
                pattern: PatternChoice::PaletteLife,
            },
            Self::PlasmaOnly => ModeConfig {
                fps: PLASMA_FPS,
                background_drawing: true,
                text_drawing: false,
                background_mode: false,
                pattern: PatternChoice::Plasma,
            },
        }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TextOnly => "text-only",
            Self::LifeAndText => "life+text",
            Self::PaletteLifeAndText => "palette-life+text",
            Self::PlasmaAndText => "plasma+text",
            Self::LifeOnly => "life",
            Self::PaletteLifeOnly => "palette-life",
            Self::PlasmaOnly => "plasma",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_visits_every_mode_and_wraps() {
        let mut mode = DisplayMode::TextOnly;
        let mut seen = Vec::new();
        for _ in 0..DisplayMode::ALL.len() {
            seen.push(mode);
            mode = mode.next();
        }
        assert_eq!(seen, DisplayMode::ALL.to_vec());
        assert_eq!(mode, DisplayMode::TextOnly);
    }

    #[test]
    fn standalone_modes_run_foreground_without_text() {
        for mode in
            [DisplayMode::LifeOnly, DisplayMode::PaletteLifeOnly, DisplayMode::PlasmaOnly]
        {
            let cfg = mode.config();
            assert!(cfg.background_drawing);
            assert!(!cfg.text_drawing);
            assert!(!cfg.background_mode);
        }
    }

    #[test]
    fn overlay_modes_dim_the_pattern() {
        for mode in [
            DisplayMode::LifeAndText,
            DisplayMode::PaletteLifeAndText,
            DisplayMode::PlasmaAndText,
        ] {
            let cfg = mode.config();
            assert!(cfg.background_drawing && cfg.text_drawing && cfg.background_mode);
        }
    }

    #[test]
    fn plasma_modes_run_faster() {
        assert_eq!(DisplayMode::PlasmaAndText.config().fps, PLASMA_FPS);
        assert_eq!(DisplayMode::PlasmaOnly.config().fps, PLASMA_FPS);
        assert_eq!(DisplayMode::TextOnly.config().fps, TEXT_ONLY_FPS);
    }
}
