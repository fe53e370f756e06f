#![forbid(unsafe_code)]

//! Named 16-entry gradient ramps and indexed lookup.
//!
//! A palette position is a `u8`: the high nibble selects one of the sixteen
//! entries, the low nibble linearly interpolates toward the next entry
//! (wrapping), so the ramp reads as a continuous 256-step gradient. The
//! automaton and plasma generators walk these positions with per-role
//! offsets.

use crate::color::Rgb;

/// Interpolation mode for [`Palette16::sample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Nearest entry, no interpolation.
    None,
    /// Linear interpolation between adjacent entries.
    #[default]
    Linear,
}

/// A 16-entry color ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette16(pub [Rgb; 16]);

impl Palette16 {
    /// Look up a color at `pos`, scaled by `brightness`.
    ///
    /// The low nibble of `pos` interpolates toward the following entry
    /// (wrapping past the last), brightness is applied multiplicatively
    /// after the lookup.
    #[must_use]
    pub fn sample(&self, pos: u8, brightness: u8, blend: BlendMode) -> Rgb {
        let hi = (pos >> 4) as usize;
        let lo = pos & 0x0F;
        let entry = self.0[hi];
        let color = match blend {
            BlendMode::None => entry,
            BlendMode::Linear if lo == 0 => entry,
            BlendMode::Linear => {
                let next = self.0[(hi + 1) % 16];
                let f = u16::from(lo) * 16; // 16..=240
                let lerp = |a: u8, b: u8| {
                    ((u16::from(a) * (256 - f) + u16::from(b) * f) >> 8) as u8
                };
                Rgb::new(
                    lerp(entry.r, next.r),
                    lerp(entry.g, next.g),
                    lerp(entry.b, next.b),
                )
            }
        };
        color.scaled(brightness)
    }
}

/// Identifier for one of the built-in ramps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteId {
    /// Black body radiation: black through red and yellow to white.
    Heat,
    /// Molten rock: black, maroon, red, a white-hot spike.
    Lava,
    /// Forest greens.
    Forest,
    /// Blues and whites.
    Cloud,
    /// Deep blues into aquamarine.
    Ocean,
    /// Saturated purples, reds, and ambers.
    Party,
    /// Full hue wheel in sixteen steps.
    Rainbow,
    /// Hue wheel with black gaps between the stripes.
    RainbowStripe,
}

impl PaletteId {
    /// Every ramp, in rotation order.
    pub const ALL: [Self; 8] = [
        Self::Heat,
        Self::Lava,
        Self::Forest,
        Self::Cloud,
        Self::Ocean,
        Self::Party,
        Self::Rainbow,
        Self::RainbowStripe,
    ];

    /// The subset the plasma generator rotates through.
    pub const PLASMA_ROTATION: [Self; 5] = [
        Self::Heat,
        Self::Lava,
        Self::Rainbow,
        Self::RainbowStripe,
        Self::Cloud,
    ];

    /// The ramp data for this identifier.
    #[must_use]
    pub const fn ramp(self) -> &'static Palette16 {
        match self {
            Self::Heat => &HEAT,
            Self::Lava => &LAVA,
            Self::Forest => &FOREST,
            Self::Cloud => &CLOUD,
            Self::Ocean => &OCEAN,
            Self::Party => &PARTY,
            Self::Rainbow => &RAINBOW,
            Self::RainbowStripe => &RAINBOW_STRIPE,
        }
    }

    /// Short name for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Heat => "heat",
            Self::Lava => "lava",
            Self::Forest => "forest",
            Self::Cloud => "cloud",
            Self::Ocean => "ocean",
            Self::Party => "party",
            Self::Rainbow => "rainbow",
            Self::RainbowStripe => "rainbow-stripe",
        }
    }
}

/// Convenience: sample a named ramp directly.
#[must_use]
pub fn palette_color(id: PaletteId, pos: u8, brightness: u8, blend: BlendMode) -> Rgb {
    id.ramp().sample(pos, brightness, blend)
}

const fn hex(c: u32) -> Rgb {
    Rgb::new((c >> 16) as u8, (c >> 8) as u8, c as u8)
}

const fn ramp(colors: [u32; 16]) -> Palette16 {
    let mut out = [Rgb::BLACK; 16];
    let mut i = 0;
    while i < 16 {
        out[i] = hex(colors[i]);
        i += 1;
    }
    Palette16(out)
}

/// Black body heat ramp.
pub const HEAT: Palette16 = ramp([
    0x000000, 0x330000, 0x660000, 0x990000, 0xCC0000, 0xFF0000, 0xFF3300, 0xFF6600, 0xFF9900,
    0xFFCC00, 0xFFFF00, 0xFFFF33, 0xFFFF66, 0xFFFF99, 0xFFFFCC, 0xFFFFFF,
]);

/// Lava ramp.
pub const LAVA: Palette16 = ramp([
    0x000000, 0x800000, 0x000000, 0x800000, 0x8B0000, 0x800000, 0x8B0000, 0x8B0000, 0x8B0000,
    0xFF0000, 0xFFA500, 0xFFFFFF, 0xFFA500, 0xFF0000, 0x8B0000, 0x000000,
]);

/// Forest ramp.
pub const FOREST: Palette16 = ramp([
    0x006400, 0x006400, 0x556B2F, 0x006400, 0x008000, 0x228B22, 0x6B8E23, 0x008000, 0x2E8B57,
    0x66CDAA, 0x32CD32, 0x9ACD32, 0x90EE90, 0x7CFC00, 0x66CDAA, 0x228B22,
]);

/// Cloud ramp.
pub const CLOUD: Palette16 = ramp([
    0x0000FF, 0x00008B, 0x00008B, 0x00008B, 0x00008B, 0x00008B, 0x00008B, 0x00008B, 0x0000FF,
    0x00008B, 0x87CEEB, 0x87CEEB, 0xADD8E6, 0xFFFFFF, 0xADD8E6, 0x87CEEB,
]);

/// Ocean ramp.
pub const OCEAN: Palette16 = ramp([
    0x191970, 0x00008B, 0x191970, 0x000080, 0x00008B, 0x0000CD, 0x2E8B57, 0x008080, 0x5F9EA0,
    0x0000FF, 0x008B8B, 0x6495ED, 0x7FFFD4, 0x2E8B57, 0x00FFFF, 0x87CEFA,
]);

/// Party ramp.
pub const PARTY: Palette16 = ramp([
    0x5500AB, 0x84007C, 0xB5004B, 0xE5001B, 0xE81700, 0xB84700, 0xAB7700, 0xABAB00, 0xAB5500,
    0xDD2200, 0xF2000E, 0xC2003E, 0x8F0071, 0x5F00A1, 0x2F00D0, 0x0007F9,
]);

/// Sixteen-step hue wheel.
pub const RAINBOW: Palette16 = ramp([
    0xFF0000, 0xD52A00, 0xAB5500, 0xAB7F00, 0xABAB00, 0x56D500, 0x00FF00, 0x00D52A, 0x00AB55,
    0x0056AA, 0x0000FF, 0x2A00D5, 0x5500AB, 0x7F0081, 0xAB0055, 0xD5002B,
]);

/// Hue wheel with black stripes.
pub const RAINBOW_STRIPE: Palette16 = ramp([
    0xFF0000, 0x000000, 0xAB5500, 0x000000, 0xABAB00, 0x000000, 0x00FF00, 0x000000, 0x00AB55,
    0x000000, 0x0000FF, 0x000000, 0x5500AB, 0x000000, 0xAB0055, 0x000000,
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_entry_at_nibble_boundary() {
        for i in 0u8..16 {
            let got = RAINBOW.sample(i << 4, 255, BlendMode::Linear);
            assert_eq!(got, RAINBOW.0[i as usize], "entry {i}");
        }
    }

    #[test]
    fn midpoint_interpolates() {
        let a = HEAT.0[0];
        let b = HEAT.0[1];
        let mid = HEAT.sample(0x08, 255, BlendMode::Linear);
        // halfway between 0x000000 and 0x330000
        assert!(mid.r > a.r && mid.r < b.r, "got {mid:?}");
        assert_eq!(mid.g, 0);
        assert_eq!(mid.b, 0);
    }

    #[test]
    fn last_entry_wraps_to_first() {
        // position 0xF8 sits between entry 15 (white) and entry 0 (black)
        let c = HEAT.sample(0xF8, 255, BlendMode::Linear);
        assert!(c.r < 255 && c.r > 0);
    }

    #[test]
    fn no_blend_snaps_to_entry() {
        assert_eq!(HEAT.sample(0x0F, 255, BlendMode::None), HEAT.0[0]);
    }

    #[test]
    fn brightness_scales_output() {
        let full = RAINBOW.sample(0, 255, BlendMode::Linear);
        let half = RAINBOW.sample(0, 128, BlendMode::Linear);
        assert!(half.r < full.r);
        assert_eq!(RAINBOW.sample(0, 0, BlendMode::Linear), Rgb::BLACK);
    }

    #[test]
    fn rotation_orders_are_distinct_ramps() {
        for id in PaletteId::ALL {
            // name and ramp resolve for every id
            assert!(!id.name().is_empty());
            let _ = id.ramp();
        }
        assert_eq!(PaletteId::PLASMA_ROTATION.len(), 5);
    }
}
