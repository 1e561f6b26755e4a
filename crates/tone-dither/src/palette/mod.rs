//! Palette types and utilities
//!
//! This module provides the [`Palette`] type, its built-in presets, and
//! the hex parsing error type.

mod error;
mod palette;
mod presets;

pub use error::ParseColorError;
pub use palette::Palette;
pub use presets::PRESET_NAMES;
