#![forbid(unsafe_code)]

//! Fixed-point sine helpers for the plasma field.
//!
//! Angles are fractions of a full turn: the 8-bit forms treat 256 as one
//! revolution, the 16-bit forms treat 65536 as one revolution. Out-of-range
//! inputs wrap, matching the unsigned arithmetic the field formula relies
//! on.

use std::f32::consts::TAU;

/// Sine over a 256-step turn, biased to `0..=255` (128 = zero crossing).
#[must_use]
pub fn sin8(theta: u8) -> u8 {
    let t = f32::from(theta) / 256.0 * TAU;
    t.sin().mul_add(127.5, 127.5) as u8
}

/// Cosine counterpart of [`sin8`].
#[must_use]
pub fn cos8(theta: u8) -> u8 {
    let t = f32::from(theta) / 256.0 * TAU;
    t.cos().mul_add(127.5, 127.5) as u8
}

/// Sine over a 65536-step turn, scaled to `-32767..=32767`. The argument
/// wraps modulo one turn.
#[must_use]
pub fn sin16(theta: i32) -> i16 {
    let t = f32::from(theta as u16) / 65536.0 * TAU;
    (t.sin() * 32767.0) as i16
}

/// Cosine counterpart of [`sin16`].
#[must_use]
pub fn cos16(theta: i32) -> i16 {
    let t = f32::from(theta as u16) / 65536.0 * TAU;
    (t.cos() * 32767.0) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sin16_quarter_points() {
        assert_eq!(sin16(0), 0);
        assert!(sin16(16384) > 32_700);
        assert!(sin16(49152) < -32_700);
        // half turn is a zero crossing (within rounding)
        assert!(sin16(32768).abs() < 16);
    }

    #[test]
    fn sin16_wraps_negative_angles() {
        assert_eq!(sin16(-16384), sin16(49152));
        assert_eq!(sin16(-1), sin16(65535));
        assert_eq!(sin16(70000), sin16(70000 - 65536));
    }

    #[test]
    fn sin8_range_and_bias() {
        assert!(sin8(0).abs_diff(128) <= 1);
        assert_eq!(sin8(64), 255);
        assert_eq!(sin8(192), 0);
        for theta in 0..=255u8 {
            let _ = sin8(theta); // no panic across the whole turn
        }
    }

    #[test]
    fn cos_leads_sin_by_quarter_turn() {
        for theta in [0u8, 13, 64, 100, 200] {
            assert_eq!(cos8(theta), sin8(theta.wrapping_add(64)));
        }
        assert_eq!(cos16(0), 32767);
    }
}
