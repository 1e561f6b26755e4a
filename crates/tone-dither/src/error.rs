//! Unified error type for the tone-dither public API.
//!
//! Every fallible operation in the crate reports one of three kinds of
//! failure: a bad setting, a bad palette, or two buffers that were expected
//! to share dimensions but do not. Failures are detected synchronously at
//! the offending call; no operation leaves its input half-modified.

use thiserror::Error;

use crate::palette::ParseColorError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DitherError>;

/// Unified error type for the tone-dither public API.
///
/// # Example
///
/// ```
/// use tone_dither::{DitherAlgorithm, DitherError};
///
/// let err = "floyd-steinberg-turbo".parse::<DitherAlgorithm>().unwrap_err();
/// assert!(matches!(err, DitherError::Configuration(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DitherError {
    /// Unknown algorithm/mode identifier, or a scalar outside its declared range.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Empty palette where one is required, shade count or extraction
    /// target outside its range.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// Two buffers expected to share dimensions do not.
    #[error("dimension mismatch: expected {}x{}, got {}x{}", expected.0, expected.1, actual.0, actual.1)]
    DimensionMismatch {
        /// Dimensions the operation required.
        expected: (u32, u32),
        /// Dimensions it was given.
        actual: (u32, u32),
    },

    /// Invalid hex color string.
    #[error("color parse error: {0}")]
    ParseColor(#[from] ParseColorError),
}

impl DitherError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        DitherError::Configuration(msg.into())
    }

    pub(crate) fn palette(msg: impl Into<String>) -> Self {
        DitherError::InvalidPalette(msg.into())
    }
}

/// Reject NaN/infinite values and values outside `min..=max`.
///
/// Used by every settings record's `validate()`.
pub(crate) fn check_range(field: &str, value: f32, min: f32, max: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(DitherError::config(format!("{field} must be a finite number")));
    }
    if value < min || value > max {
        return Err(DitherError::config(format!(
            "{field} = {value} is outside {min}..={max}"
        )));
    }
    Ok(())
}
