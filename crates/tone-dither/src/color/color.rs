//! 8-bit RGBA color type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::palette::ParseColorError;

/// An 8-bit RGBA color.
///
/// Serializes as a hex string: `#rrggbb` when fully opaque, `#rrggbbaa`
/// otherwise.
///
/// # Example
///
/// ```
/// use tone_dither::Color;
///
/// let orange: Color = "#ff8000".parse().unwrap();
/// assert_eq!(orange, Color::rgb(255, 128, 0));
/// assert_eq!(orange.to_hex(), "#ff8000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
    /// Alpha channel (0..=255, 255 = opaque)
    pub a: u8,
}

impl Color {
    /// Pure black, opaque.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Pure white, opaque.
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Create a color from all four channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create an opaque grey.
    #[inline]
    pub const fn grey(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    /// Rec. 601 luma on the 0.0..=255.0 scale.
    ///
    /// This is the "luminance" used by the mono/tonal color modes and the
    /// greyscale ordered-dither path.
    #[inline]
    pub fn luminance(self) -> f32 {
        luminance(self.r as f32, self.g as f32, self.b as f32)
    }

    /// `true` when all three color channels are equal.
    #[inline]
    pub fn is_grey(self) -> bool {
        self.r == self.g && self.g == self.b
    }

    /// Squared Euclidean distance over `(r, g, b)`.
    #[inline]
    pub fn distance_sq(self, other: Color) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Channels as floats, ignoring alpha.
    #[inline]
    pub fn to_f32(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }

    /// Build an opaque color from float channels, rounding and clamping to 0..=255.
    #[inline]
    pub fn from_f32(rgb: [f32; 3]) -> Self {
        Self::rgb(clamp_u8(rgb[0]), clamp_u8(rgb[1]), clamp_u8(rgb[2]))
    }

    /// Format as a lowercase hex string.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Rec. 601 luma of float channels.
#[inline]
pub(crate) fn luminance(r: f32, g: f32, b: f32) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}

/// Round and clamp a float channel into a byte.
#[inline]
pub(crate) fn clamp_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parse a color from a hex string.
    ///
    /// Supports `#RRGGBB`, `#RRGGBBAA` and the shorthand `#RGB`, each with
    /// or without the leading hash. Parsing is case-insensitive and
    /// surrounding whitespace is trimmed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        if !hex.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16)?;
                let g = u8::from_str_radix(&hex[1..2], 16)?;
                let b = u8::from_str_radix(&hex[2..3], 16)?;
                // Expand shorthand: F -> FF
                Ok(Color::rgb(r * 17, g * 17, b * 17))
            }
            6 | 8 => {
                let r = u8::from_str_radix(&hex[0..2], 16)?;
                let g = u8::from_str_radix(&hex[2..4], 16)?;
                let b = u8::from_str_radix(&hex[4..6], 16)?;
                let a = if hex.len() == 8 {
                    u8::from_str_radix(&hex[6..8], 16)?
                } else {
                    255
                };
                Ok(Color::new(r, g, b, a))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digit() {
        let c: Color = "#1a2B3c".parse().unwrap();
        assert_eq!(c, Color::rgb(0x1a, 0x2b, 0x3c));
    }

    #[test]
    fn test_parse_shorthand() {
        let c: Color = "F00".parse().unwrap();
        assert_eq!(c, Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_parse_with_alpha() {
        let c: Color = "#00000080".parse().unwrap();
        assert_eq!(c.a, 0x80);
        assert_eq!(c.to_hex(), "#00000080");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "#12345".parse::<Color>().unwrap_err(),
            ParseColorError::InvalidLength
        );
        assert!(matches!(
            "#gggggg".parse::<Color>().unwrap_err(),
            ParseColorError::InvalidHex(_)
        ));
        assert_eq!(
            "#ééé".parse::<Color>().unwrap_err(),
            ParseColorError::InvalidLength
        );
    }

    #[test]
    fn test_luminance_extremes() {
        assert!(Color::BLACK.luminance().abs() < 1e-3);
        assert!((Color::WHITE.luminance() - 255.0).abs() < 1e-3);
        assert!((Color::grey(128).luminance() - 128.0).abs() < 1e-3);
    }

    #[test]
    fn test_distance_sq() {
        assert_eq!(Color::BLACK.distance_sq(Color::rgb(3, 4, 0)), 25);
        assert_eq!(Color::WHITE.distance_sq(Color::WHITE), 0);
    }

    #[test]
    fn test_from_f32_clamps() {
        assert_eq!(Color::from_f32([-20.0, 127.6, 300.0]), Color::rgb(0, 128, 255));
    }

    #[test]
    fn test_serde_hex_string() {
        let json = serde_json::to_string(&Color::rgb(255, 128, 0)).unwrap();
        assert_eq!(json, "\"#ff8000\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::rgb(255, 128, 0));
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }
}
