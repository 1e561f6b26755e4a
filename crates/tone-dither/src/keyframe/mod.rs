//! Keyframe interpolation engine.
//!
//! An [`AnimatedSettings<T>`] holds sparse per-frame snapshots of one
//! settings group; [`resolve`] materializes the group for any frame. Each
//! group (adjustments, color mode, dithering) is animated independently.

mod animated;
mod easing;
mod interpolate;

pub use animated::{resolve, AnimatedSettings, Keyframe};
pub use easing::{Easing, TransitionMode};
pub use interpolate::Interpolate;
