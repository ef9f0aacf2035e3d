//! The canonical color parsed from a HEX literal.
//!
//! Supports the four CSS hex notations:
//!
//! - `#rgb` and `#rgba` (each digit doubled)
//! - `#rrggbb` and `#rrggbbaa`
//!
//! ```rust
//! use constellation_core::ColorValue;
//!
//! let c = ColorValue::parse_hex("#1A1A1A").unwrap();
//! assert_eq!(c.rgb(), (26, 26, 26));
//! assert_eq!(c.to_hex(), "#1a1a1a");
//!
//! let translucent = ColorValue::parse_hex("#f808").unwrap();
//! assert_eq!(translucent.to_hex(), "#ff880088");
//! ```

use std::fmt;

use crate::colorspace::Rgb;
use crate::error::TransformError;

/// An immutable sRGB color with optional alpha.
///
/// Alpha is kept as the exact byte from the literal so that
/// [`to_hex`](ColorValue::to_hex) always reproduces the parsed channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorValue {
    r: u8,
    g: u8,
    b: u8,
    alpha: Option<u8>,
}

impl ColorValue {
    /// Parses a HEX literal including its leading `#`.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidColorFormat`] when the `#` is missing,
    /// the digit count is not 3, 4, 6 or 8, or a digit is not hexadecimal.
    pub fn parse_hex(text: &str) -> Result<Self, TransformError> {
        let text = text.trim();
        let digits = text
            .strip_prefix('#')
            .ok_or_else(|| TransformError::invalid_color(text, "missing leading '#'"))?;

        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(TransformError::invalid_color(
                text,
                format!("'{}' is not a hex digit", bad),
            ));
        }

        // All digits are ASCII from here on, so byte slicing is safe.
        let short = |i: usize| nibble(digits, i) * 17;
        let long = |i: usize| nibble(digits, i) * 16 + nibble(digits, i + 1);

        let color = match digits.len() {
            3 => Self::rgb_channels(short(0), short(1), short(2), None),
            4 => Self::rgb_channels(short(0), short(1), short(2), Some(short(3))),
            6 => Self::rgb_channels(long(0), long(2), long(4), None),
            8 => Self::rgb_channels(long(0), long(2), long(4), Some(long(6))),
            n => {
                return Err(TransformError::invalid_color(
                    text,
                    format!("expected 3, 4, 6 or 8 hex digits, found {}", n),
                ))
            }
        };
        Ok(color)
    }

    fn rgb_channels(r: u8, g: u8, b: u8, alpha: Option<u8>) -> Self {
        Self { r, g, b, alpha }
    }

    /// The color channels as a tuple.
    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Alpha in `0.0..=1.0`, or `None` for an opaque literal without alpha digits.
    pub fn alpha(&self) -> Option<f64> {
        self.alpha.map(|a| a as f64 / 255.0)
    }

    /// The raw alpha byte, if the literal carried one.
    pub fn alpha_byte(&self) -> Option<u8> {
        self.alpha
    }

    /// Returns a copy with the color channels replaced and alpha preserved.
    pub fn with_rgb(&self, rgb: Rgb) -> Self {
        Self {
            r: rgb.0,
            g: rgb.1,
            b: rgb.2,
            alpha: self.alpha,
        }
    }

    pub(crate) fn as_rgb(&self) -> Rgb {
        Rgb(self.r, self.g, self.b)
    }

    /// Normalized lowercase HEX: `#rrggbb`, or `#rrggbbaa` when alpha is present.
    pub fn to_hex(&self) -> String {
        match self.alpha {
            Some(a) => format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, a),
            None => format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b),
        }
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for ColorValue {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

fn nibble(digits: &str, index: usize) -> u8 {
    match digits.as_bytes()[index] {
        b @ b'0'..=b'9' => b - b'0',
        b @ b'a'..=b'f' => b - b'a' + 10,
        b @ b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}
