//! Error type for hex color parsing.

use std::num::ParseIntError;

use thiserror::Error;

/// Error type for parsing hex color strings.
///
/// Returned when parsing a hex color string fails, either due to
/// invalid length or invalid hexadecimal characters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3, 6 or 8 characters after stripping '#')
    #[error("invalid hex color length (expected 3, 6 or 8 characters)")]
    InvalidLength,
    /// Invalid hexadecimal character encountered
    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] ParseIntError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_length_display() {
        assert_eq!(
            ParseColorError::InvalidLength.to_string(),
            "invalid hex color length (expected 3, 6 or 8 characters)"
        );
    }

    #[test]
    fn test_invalid_hex_has_source() {
        use std::error::Error;
        let inner = u8::from_str_radix("zz", 16).unwrap_err();
        let err = ParseColorError::from(inner);
        assert!(err.source().is_some());
    }
}
