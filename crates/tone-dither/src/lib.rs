#![allow(clippy::needless_range_loop, clippy::module_inception)]

//! tone-dither: adjustment, color reduction and dithering for indexed-color
//! images, with keyframe animation of every setting.
//!
//! # Pipeline
//!
//! ```text
//! PixelBuffer (RGBA8)
//!     |
//!     v
//! adjust::apply          exposure ... vignette, fixed order
//!     |
//!     v
//! color_mode::reduce     mono | tonal | indexed | rgb
//!     |
//!     v
//! dither::dither         error diffusion | ordered | noise | halftone
//!     |
//!     v
//! PixelBuffer (palette colors only)
//! ```
//!
//! [`extract`] derives a [`Palette`] from an image for the last two stages.
//! For video, [`resolve`] turns an [`AnimatedSettings`] track into the
//! settings of one frame.
//!
//! # Quick Start
//!
//! ```
//! use tone_dither::{
//!     adjust, dither, reduce, AdjustmentSettings, Color, ColorModeSettings, DitherAlgorithm,
//!     DitheringSettings, Palette, PixelBuffer,
//! };
//!
//! let image = PixelBuffer::from_fn(16, 16, |x, y| Color::rgb((x * 16) as u8, (y * 16) as u8, 128)).unwrap();
//! let palette = Palette::preset("gameboy").unwrap();
//!
//! let adjusted = adjust(&image, &AdjustmentSettings::new().contrast(20.0)).unwrap();
//! let reduced = reduce(&adjusted, &ColorModeSettings::default(), &palette).unwrap();
//! let out = dither(&reduced, &palette, &DitheringSettings::new(DitherAlgorithm::Bayer4x4)).unwrap();
//!
//! // Every output pixel is a palette color
//! assert_eq!(palette.quantize(&out), out);
//! ```
//!
//! # Color distance
//!
//! Nearest-color search is plain Euclidean distance over 8-bit RGB, with
//! exact ties going to the lowest palette index. Alpha is carried through
//! every stage untouched and does not take part in matching.

pub mod adjust;
pub mod buffer;
pub mod color;
pub mod color_mode;
pub mod dither;
pub mod error;
pub mod extract;
pub mod keyframe;
pub mod palette;


pub use adjust::{apply as adjust, AdjustmentSettings};
pub use buffer::PixelBuffer;
pub use color::Color;
pub use color_mode::{reduce, ColorMode, ColorModeSettings};
pub use dither::{dither, DitherAlgorithm, DitherFamily, DitheringSettings, HalftoneSettings, HalftoneShape};
pub use error::{DitherError, Result};
pub use extract::{extract, ExtractAlgorithm};
pub use keyframe::{resolve, AnimatedSettings, Easing, Interpolate, Keyframe, TransitionMode};
pub use palette::{Palette, ParseColorError, PRESET_NAMES};
