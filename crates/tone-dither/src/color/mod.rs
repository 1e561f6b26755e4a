//! Color value types and conversions.
//!
//! - [`Color`]: an 8-bit RGBA color, the unit of every palette
//! - [`hsl`]: RGB ↔ HSL conversion used by the hue/saturation/vibrance
//!   adjustments

mod color;
pub mod hsl;

pub use color::Color;
pub(crate) use color::{clamp_u8, luminance};
