//! Color representations and conversions.
//!
//! Hex strings are the only exchange format at the crate boundary. They are
//! parsed into [`Rgb`] and converted one way into [`Lab`] for distance
//! computation. There is no Lab to RGB path.

mod distance;
mod hex;
mod lab;

pub use distance::{MatchBand, delta_e76};
pub use hex::{hex_to_rgb, rgb_to_hex};
pub use lab::{Lab, rgb_to_lab};

use std::fmt;
use std::str::FromStr;

use crate::error::MatchError;

/// An 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from 8-bit channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from channels that may have drifted outside `[0, 255]`
    /// through floating-point arithmetic. Each channel is rounded and clamped.
    pub fn from_unclamped(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
        }
    }

    /// Channels as an array, in `[r, g, b]` order.
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        rgb_to_hex(self)
    }

    /// CIE L*a*b* value of this color (D65).
    pub fn to_lab(self) -> Lab {
        rgb_to_lab(self)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(rgb: Rgb) -> Self {
        rgb.to_array()
    }
}

impl FromStr for Rgb {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex_to_rgb(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn clamp_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    // Clamped into u8 range first, so the cast cannot truncate.
    value.round().clamp(0.0, f64::from(u8::MAX)) as u8
}
