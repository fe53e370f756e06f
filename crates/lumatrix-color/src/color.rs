#![forbid(unsafe_code)]

//! RGB color types and conversions.
//!
//! The panel hardware consumes 16-bit RGB565 (5 bits red, 6 bits green,
//! 5 bits blue, most-significant-first). All blending and palette math runs
//! in 8-bit-per-channel space and re-packs on write.
//!
//! Packing is lossy and deterministic (truncation, no rounding). Unpacking
//! bit-replicates the high bits into the low bits so a round trip lands
//! within one quantization step of the original intensity instead of always
//! producing multiples of 8 or 4.

/// 8-bit-per-channel RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel (0–255).
    pub r: u8,
    /// Green channel (0–255).
    pub g: u8,
    /// Blue channel (0–255).
    pub b: u8,
}

impl Rgb {
    /// Black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a new RGB color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale all channels by `brightness / 255`.
    #[must_use]
    pub const fn scaled(self, brightness: u8) -> Self {
        let b16 = brightness as u16;
        Self {
            r: ((self.r as u16 * b16) / 255) as u8,
            g: ((self.g as u16 * b16) / 255) as u8,
            b: ((self.b as u16 * b16) / 255) as u8,
        }
    }

    /// Blend `base` toward `prev` by `influence`.
    ///
    /// Per channel: `(base * (255 - influence) + prev * influence) / 256`,
    /// integer truncation. The weights sum to 255 but the divisor is 256,
    /// so even the endpoints land up to one truncation step low; callers
    /// that need an exact pass-through skip the blend at influence 0.
    #[must_use]
    pub const fn blend(base: Self, prev: Self, influence: u8) -> Self {
        let keep = (255 - influence) as u16;
        let take = influence as u16;
        Self {
            r: ((base.r as u16 * keep + prev.r as u16 * take) >> 8) as u8,
            g: ((base.g as u16 * keep + prev.g as u16 * take) >> 8) as u8,
            b: ((base.b as u16 * keep + prev.b as u16 * take) >> 8) as u8,
        }
    }

    /// Convert from HSV. Hue spans the full `u16` range (wrapping), sat and
    /// val are 0–255.
    ///
    /// Integer piecewise-linear conversion: hue is mapped onto a 0–1529
    /// six-sextant ramp, then saturation and value are applied with the
    /// `(x * (n + 1)) >> 8` fixed-point idiom so 255 means "full".
    #[must_use]
    pub fn from_hsv(hue: u16, sat: u8, val: u8) -> Self {
        let h = (u32::from(hue) * 1530 + 32768) >> 16; // 0..=1529

        let (r, g, b): (u32, u32, u32) = if h < 510 {
            // red -> yellow -> green
            if h < 255 { (255, h, 0) } else { (510 - h, 255, 0) }
        } else if h < 1020 {
            // green -> cyan -> blue
            if h < 765 { (0, 255, h - 510) } else { (0, 1020 - h, 255) }
        } else if h < 1530 {
            // blue -> magenta -> red
            if h < 1275 { (h - 1020, 0, 255) } else { (255, 0, 1530 - h) }
        } else {
            (255, 0, 0)
        };

        let v1 = u32::from(val) + 1;
        let s1 = u32::from(sat) + 1;
        let s2 = 255 - u32::from(sat);
        let apply = |c: u32| (((((c * s1) >> 8) + s2) * v1) >> 8) as u8;
        Self { r: apply(r), g: apply(g), b: apply(b) }
    }
}

/// Packed 16-bit RGB565 color, the panel's native pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Rgb565(pub u16);

impl Rgb565 {
    /// Black, also the out-of-bounds sentinel.
    pub const BLACK: Self = Self(0x0000);

    /// White.
    pub const WHITE: Self = Self(0xFFFF);

    /// Pack 8-bit channels into 565. Low bits are truncated.
    #[must_use]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self((((r & 0xF8) as u16) << 8) | (((g & 0xFC) as u16) << 3) | ((b >> 3) as u16))
    }

    /// Unpack into 8-bit channels, bit-replicating the truncated high bits.
    #[must_use]
    pub const fn to_rgb(self) -> Rgb {
        let r5 = ((self.0 >> 11) & 0x1F) as u8;
        let g6 = ((self.0 >> 5) & 0x3F) as u8;
        let b5 = (self.0 & 0x1F) as u8;
        Rgb {
            r: (r5 << 3) | (r5 >> 2),
            g: (g6 << 2) | (g6 >> 4),
            b: (b5 << 3) | (b5 >> 2),
        }
    }

    /// HSV straight to the packed format.
    #[must_use]
    pub fn from_hsv(hue: u16, sat: u8, val: u8) -> Self {
        Rgb::from_hsv(hue, sat, val).into()
    }

    /// Raw packed value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl From<Rgb> for Rgb565 {
    fn from(c: Rgb) -> Self {
        Self::from_rgb(c.r, c.g, c.b)
    }
}

impl From<Rgb565> for Rgb {
    fn from(c: Rgb565) -> Self {
        c.to_rgb()
    }
}
