//! Threshold quantization shared by the ordered and noise families.
//!
//! For a pixel value `v` the two palette levels bracketing it, `lo <= v <=
//! hi`, are found and the position `f = (v - lo) / (hi - lo)` is compared
//! with a threshold in `[0, 1)`: `hi` wins when `f > threshold`. A value
//! that sits exactly on a level always maps to that level.
//!
//! In `mono` and `tonal` mode the palette is ordered by luminance and each
//! pixel is bracketed on its luminance, whatever the palette's hues. In
//! `indexed` and `rgb` mode each channel is bracketed against the distinct
//! values that channel takes in the palette, and the resulting triple is
//! snapped to the nearest palette entry, so output pixels are always
//! palette colors.

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::color_mode::ColorMode;
use crate::palette::Palette;

/// Position of `v` between its bracketing levels: `(lo, hi, fraction)`.
///
/// `levels` must be sorted ascending with no duplicates. Values outside the
/// level range clamp to the end level with fraction 0.
pub(crate) fn bracket(levels: &[f32], v: f32) -> (usize, usize, f32) {
    let i = levels.partition_point(|&l| l <= v);
    if i == 0 {
        return (0, 0, 0.0);
    }
    if i == levels.len() {
        return (i - 1, i - 1, 0.0);
    }
    let (lo, hi) = (levels[i - 1], levels[i]);
    (i - 1, i, (v - lo) / (hi - lo))
}

/// Pick between the bracketing levels of `v` with `threshold`.
#[inline]
fn select(levels: &[f32], v: f32, threshold: f32) -> usize {
    let (lo, hi, frac) = bracket(levels, v);
    if frac > threshold {
        hi
    } else {
        lo
    }
}

/// Palette-dependent lookup tables, built once per call.
enum Levels {
    /// Distinct luminances (ascending) and the first palette index of each.
    Luminance { levels: Vec<f32>, indices: Vec<usize> },
    /// Distinct values of each channel, ascending.
    PerChannel([Vec<f32>; 3]),
}

impl Levels {
    fn new(palette: &Palette, mode: ColorMode) -> Self {
        if matches!(mode, ColorMode::Mono | ColorMode::Tonal) {
            let mut levels = Vec::new();
            let mut indices = Vec::new();
            for (lum, idx) in palette.luminance_ramp() {
                if levels.last() != Some(&lum) {
                    levels.push(lum);
                    indices.push(idx);
                }
            }
            Levels::Luminance { levels, indices }
        } else {
            let channel = |f: fn(&Color) -> u8| {
                let mut v: Vec<f32> = palette.colors().iter().map(|c| f(c) as f32).collect();
                v.sort_by(|a, b| a.total_cmp(b));
                v.dedup();
                v
            };
            Levels::PerChannel([channel(|c| c.r), channel(|c| c.g), channel(|c| c.b)])
        }
    }

    fn pick(&self, palette: &Palette, px: Color, threshold: f32) -> usize {
        match self {
            Levels::Luminance { levels, indices } => indices[select(levels, px.luminance(), threshold)],
            Levels::PerChannel(channels) => {
                let values = [px.r, px.g, px.b];
                let mut target = [0.0f32; 3];
                for c in 0..3 {
                    let levels = &channels[c];
                    target[c] = levels[select(levels, values[c] as f32, threshold)];
                }
                palette.find_nearest_f32(target)
            }
        }
    }
}

/// Quantize every pixel against `palette` with thresholds drawn from
/// `threshold(x, y)`, called once per pixel in row-major order.
pub(crate) fn threshold_dither(
    buffer: &PixelBuffer,
    palette: &Palette,
    mode: ColorMode,
    mut threshold: impl FnMut(u32, u32) -> f32,
) -> PixelBuffer {
    let levels = Levels::new(palette, mode);
    let mut out = buffer.clone();
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            let px = buffer.pixel(x, y);
            let idx = levels.pick(palette, px, threshold(x, y));
            let chosen = palette.color(idx);
            out.set_pixel(x, y, Color::new(chosen.r, chosen.g, chosen.b, px.a));
        }
    }
    out
}
