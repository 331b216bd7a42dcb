// Copyright 2026 the Vismid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! RGBA colors and hue helpers.

/// Fractional part of the golden ratio, used to space ring hues.
pub const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_895;

/// An 8-bit-per-channel RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha (255 is opaque).
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Converts hue/saturation/brightness to an opaque color.
    ///
    /// `hue` wraps: only its fractional part is used, so `1.25` and `0.25`
    /// are the same hue. Saturation and brightness are clamped to `0..=1`.
    /// Non-finite input yields black.
    #[must_use]
    pub fn from_hsb(hue: f64, saturation: f64, brightness: f64) -> Self {
        if !(hue.is_finite() && saturation.is_finite() && brightness.is_finite()) {
            return Self::BLACK;
        }
        let s = saturation.clamp(0.0, 1.0);
        let v = brightness.clamp(0.0, 1.0);
        let h6 = (hue - hue.floor()) * 6.0;
        let f = h6 - h6.floor();
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        #[expect(
            clippy::cast_possible_truncation,
            reason = "sector index is floor of a value in 0.0..6.0"
        )]
        let (r, g, b) = match h6.floor() as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Self::rgb(channel(r), channel(g), channel(b))
    }

    /// Returns the fully saturated, fully bright hue for ring `index`, spaced
    /// by the golden ratio so neighboring rings never share a hue.
    #[must_use]
    pub fn ring_hue(index: usize) -> Self {
        Self::from_hsb(index as f64 * GOLDEN_RATIO_CONJUGATE, 1.0, 1.0)
    }
}

/// Maps `0.0..=1.0` to `0..=255` with rounding.
#[expect(
    clippy::cast_possible_truncation,
    reason = "value is clamped to 0.0..=255.0 before the cast"
)]
fn channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_hues() {
        assert_eq!(Color::from_hsb(0.0, 1.0, 1.0), Color::rgb(255, 0, 0));
        assert_eq!(Color::from_hsb(1.0 / 3.0, 1.0, 1.0), Color::rgb(0, 255, 0));
        assert_eq!(Color::from_hsb(2.0 / 3.0, 1.0, 1.0), Color::rgb(0, 0, 255));
    }

    #[test]
    fn hue_wraps() {
        assert_eq!(Color::from_hsb(1.5, 1.0, 1.0), Color::from_hsb(0.5, 1.0, 1.0));
        assert_eq!(Color::from_hsb(-0.5, 1.0, 1.0), Color::from_hsb(0.5, 1.0, 1.0));
    }

    #[test]
    fn zero_saturation_is_gray() {
        assert_eq!(Color::from_hsb(0.7, 0.0, 1.0), Color::WHITE);
        assert_eq!(Color::from_hsb(0.7, 0.0, 0.0), Color::BLACK);
    }

    #[test]
    fn non_finite_is_black() {
        assert_eq!(Color::from_hsb(f64::INFINITY, 1.0, 1.0), Color::BLACK);
        assert_eq!(Color::from_hsb(0.2, f64::NAN, 1.0), Color::BLACK);
    }

    #[test]
    fn ring_hues_are_distinct_and_defined_for_ring_zero() {
        assert_eq!(Color::ring_hue(0), Color::rgb(255, 0, 0));
        for i in 0..16 {
            assert_ne!(Color::ring_hue(i), Color::ring_hue(i + 1), "rings {i} and {}", i + 1);
        }
    }
}
