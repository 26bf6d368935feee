//! Validated 24-bit RGB embed color.

use std::str::FromStr;

use serde::Serialize;

use super::EmbedError;

/// A 24-bit RGB color, validated on construction.
///
/// Accepts a decimal integer or a hexadecimal string (with optional
/// `0x` or `#` prefix). Out-of-range values are rejected rather than
/// truncated, since the remote API refuses them anyway.
///
/// # Example
///
/// ```
/// use hookline::embed::Color;
///
/// let red = Color::new(0xFF0000).unwrap();
/// assert_eq!(red, "ff0000".parse().unwrap());
/// assert_eq!(red, "#FF0000".parse().unwrap());
/// assert!(Color::new(16_777_216).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Color(u32);

impl Color {
    /// Largest representable color (`0xFFFFFF`).
    pub const MAX: u32 = 0xFF_FF_FF;

    /// Creates a color from its decimal value.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::ColorNotInRange`] if `value` exceeds [`Self::MAX`].
    pub const fn new(value: u32) -> Result<Self, EmbedError> {
        if value > Self::MAX {
            Err(EmbedError::ColorNotInRange(value))
        } else {
            Ok(Self(value))
        }
    }

    /// Returns the decimal color value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Color {
    type Error = EmbedError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Color {
    type Err = EmbedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .or_else(|| s.strip_prefix('#'))
            .unwrap_or(s);
        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| EmbedError::InvalidColor(s.to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<&str> for Color {
    type Error = EmbedError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}
