//! Color-mode reducer: the tonal regime applied before dithering.
//!
//! | Mode | Effect |
//! |------|--------|
//! | `mono` | luminance thresholded at 128 to pure black/white |
//! | `tonal` | luminance posterized into `shades` equal grey bins |
//! | `indexed` | every pixel replaced by its nearest palette entry |
//! | `rgb` | pass-through; the dithering engine reduces per channel |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::color::luminance;
use crate::error::{DitherError, Result};
use crate::palette::Palette;

/// Tonal regime selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorMode {
    Mono,
    Tonal,
    Indexed,
    #[default]
    Rgb,
}

impl ColorMode {
    /// Every mode, in declaration order.
    pub const ALL: [ColorMode; 4] = [ColorMode::Mono, ColorMode::Tonal, ColorMode::Indexed, ColorMode::Rgb];

    /// Kebab-case identifier, as used in project files.
    pub fn name(self) -> &'static str {
        match self {
            ColorMode::Mono => "mono",
            ColorMode::Tonal => "tonal",
            ColorMode::Indexed => "indexed",
            ColorMode::Rgb => "rgb",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorMode {
    type Err = DitherError;

    fn from_str(s: &str) -> Result<Self> {
        ColorMode::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| DitherError::config(format!("unknown color mode '{s}'")))
    }
}

/// Color-mode settings group.
///
/// `shades` only matters for [`ColorMode::Tonal`]; when absent, the shade
/// count is taken from the palette length.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorModeSettings {
    pub mode: ColorMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shades: Option<u16>,
}

impl ColorModeSettings {
    pub fn new(mode: ColorMode) -> Self {
        Self { mode, shades: None }
    }

    pub fn tonal(shades: u16) -> Self {
        Self {
            mode: ColorMode::Tonal,
            shades: Some(shades),
        }
    }

    /// Reject an explicit shade count outside 2..=256.
    pub fn validate(&self) -> Result<()> {
        match self.shades {
            Some(n) => check_shades(n as usize),
            None => Ok(()),
        }
    }
}

fn check_shades(n: usize) -> Result<()> {
    if (2..=256).contains(&n) {
        Ok(())
    } else {
        Err(DitherError::palette(format!("shade count {n} is outside 2..=256")))
    }
}

/// Reduce `buffer` to the regime selected by `settings`.
///
/// Returns a new buffer of the same dimensions with alpha preserved.
///
/// # Errors
///
/// [`DitherError::InvalidPalette`] if the tonal shade count (explicit, or
/// taken from `palette`) is outside 2..=256.
pub fn reduce(buffer: &PixelBuffer, settings: &ColorModeSettings, palette: &Palette) -> Result<PixelBuffer> {
    settings.validate()?;
    match settings.mode {
        ColorMode::Rgb => Ok(buffer.clone()),
        ColorMode::Indexed => Ok(palette.quantize(buffer)),
        ColorMode::Mono => Ok(map_luminance(buffer, |lum| if lum < 128.0 { 0 } else { 255 })),
        ColorMode::Tonal => {
            let shades = settings.shades.map_or(palette.len(), usize::from);
            check_shades(shades)?;
            let steps = shades as f32;
            let top = (shades - 1) as f32;
            Ok(map_luminance(buffer, |lum| {
                let level = (lum * steps / 256.0).floor().min(top);
                (level * 255.0 / top).round() as u8
            }))
        }
    }
}

fn map_luminance(buffer: &PixelBuffer, f: impl Fn(f32) -> u8) -> PixelBuffer {
    let mut out = buffer.clone();
    for px in out.data_mut().chunks_exact_mut(4) {
        // Rounded so that grey input maps onto its own value exactly
        let v = f(luminance(px[0] as f32, px[1] as f32, px[2] as f32).round());
        px[0] = v;
        px[1] = v;
        px[2] = v;
    }
    out
}
