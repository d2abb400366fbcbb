//! `#RRGGBB` parsing and formatting.

use super::Rgb;
use crate::error::{MatchError, Result};

/// Parse `#` followed by exactly six hex digits (either case).
///
/// Anything else, including 3-digit shorthand, an alpha channel, surrounding
/// whitespace, or a missing `#`, is rejected with
/// [`MatchError::InvalidColorFormat`].
pub fn hex_to_rgb(hex: &str) -> Result<Rgb> {
    let digits = hex
        .strip_prefix('#')
        .filter(|d| d.len() == 6 && d.bytes().all(|b| b.is_ascii_hexdigit()))
        .ok_or_else(|| MatchError::invalid_color(hex))?;

    let channel = |at: usize| {
        u8::from_str_radix(&digits[at..at + 2], 16).map_err(|_| MatchError::invalid_color(hex))
    };
    Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Format a color as lowercase `#rrggbb`.
///
/// Total over [`Rgb`]; callers holding floating-point channels clamp through
/// [`Rgb::from_unclamped`] first.
pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}
