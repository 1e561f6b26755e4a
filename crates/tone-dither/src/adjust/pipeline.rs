//! The fixed-order adjustment pipeline.

use crate::buffer::PixelBuffer;
use crate::color::hsl::{hsl_to_rgb, rgb_to_hsl, wrap_hue};
use crate::color::{clamp_u8, luminance};
use crate::error::Result;

use super::filters;
use super::settings::AdjustmentSettings;

/// Offset applied at full highlights/shadows strength for a pixel fully
/// inside the masked half of the tonal range.
const TONE_RANGE: f32 = 96.0;

/// Hue band (degrees) that receives half the vibrance boost.
const SKIN_HUE_DEGREES: std::ops::RangeInclusive<f32> = 0.0..=50.0;

/// Apply every adjustment in `settings` to a copy of `buffer`.
///
/// Order is fixed: exposure, brightness, contrast, hue, saturation,
/// vibrance, temperature, tint, highlights, shadows, gamma, blur, sharpen,
/// denoise, vignette. Neutral knobs are skipped, so default settings return
/// an identical buffer. Alpha is never touched.
///
/// # Errors
///
/// [`DitherError::Configuration`](crate::DitherError::Configuration) if
/// `settings` fails [`AdjustmentSettings::validate`]; `buffer` is untouched.
pub fn apply(buffer: &PixelBuffer, settings: &AdjustmentSettings) -> Result<PixelBuffer> {
    settings.validate()?;
    if settings.is_neutral() {
        return Ok(buffer.clone());
    }

    let width = buffer.width() as usize;
    let height = buffer.height() as usize;
    let mut plane: Vec<[f32; 3]> = buffer
        .data()
        .chunks_exact(4)
        .map(|px| [px[0] as f32, px[1] as f32, px[2] as f32])
        .collect();

    let ops = PointOps::from_settings(settings);
    if ops.any() {
        for px in plane.iter_mut() {
            ops.apply(px);
        }
    }

    let blur_radius = settings.blur.round() as usize;
    if blur_radius > 0 {
        plane = filters::box_blur(&plane, width, height, blur_radius);
    }
    let sharpen = settings.sharpen.clamp(0.0, 100.0) / 100.0;
    if sharpen > 0.0 {
        plane = filters::unsharp_mask(&plane, width, height, sharpen);
    }
    let denoise = settings.denoise.clamp(0.0, 100.0) / 100.0;
    if denoise > 0.0 {
        plane = filters::bilateral(&plane, width, height, denoise);
    }
    let vignette = settings.vignette.clamp(0.0, 100.0) / 100.0;
    if vignette > 0.0 {
        filters::vignette(&mut plane, width, height, vignette);
    }

    let mut out = buffer.clone();
    for (dst, src) in out.data_mut().chunks_exact_mut(4).zip(&plane) {
        dst[0] = clamp_u8(src[0]);
        dst[1] = clamp_u8(src[1]);
        dst[2] = clamp_u8(src[2]);
    }
    Ok(out)
}

/// Per-pixel operations, pre-scaled from the settings record.
struct PointOps {
    gain: f32,
    brightness: f32,
    contrast: f32,
    hue_shift: f32,
    saturation: f32,
    vibrance: f32,
    temperature: f32,
    tint: f32,
    highlights: f32,
    shadows: f32,
    inv_gamma: f32,
}

impl PointOps {
    fn from_settings(s: &AdjustmentSettings) -> Self {
        Self {
            gain: 2f32.powf(s.exposure),
            brightness: s.brightness * 2.55,
            contrast: (100.0 + s.contrast) / 100.0,
            hue_shift: s.hue / 360.0,
            saturation: 1.0 + s.saturation / 100.0,
            vibrance: s.vibrance / 100.0,
            temperature: s.temperature * 0.6,
            tint: s.tint * 0.6,
            highlights: s.highlights / 100.0 * TONE_RANGE,
            shadows: s.shadows / 100.0 * TONE_RANGE,
            inv_gamma: 1.0 / s.gamma,
        }
    }

    fn any(&self) -> bool {
        self.gain != 1.0
            || self.brightness != 0.0
            || self.contrast != 1.0
            || self.hsl_active()
            || self.temperature != 0.0
            || self.tint != 0.0
            || self.highlights != 0.0
            || self.shadows != 0.0
            || self.inv_gamma != 1.0
    }

    fn hsl_active(&self) -> bool {
        self.hue_shift != 0.0 || self.saturation != 1.0 || self.vibrance != 0.0
    }

    fn apply(&self, px: &mut [f32; 3]) {
        if self.gain != 1.0 {
            map(px, |c| c * self.gain);
        }
        if self.brightness != 0.0 {
            map(px, |c| c + self.brightness);
        }
        if self.contrast != 1.0 {
            map(px, |c| (c - 128.0) * self.contrast + 128.0);
        }
        if self.hsl_active() {
            self.apply_hsl(px);
        }
        if self.temperature != 0.0 {
            let t = self.temperature;
            px[0] = (px[0] + t).clamp(0.0, 255.0);
            px[1] = (px[1] + t * 0.4).clamp(0.0, 255.0);
            px[2] = (px[2] - t).clamp(0.0, 255.0);
        }
        if self.tint != 0.0 {
            let t = self.tint;
            px[0] = (px[0] + t * 0.5).clamp(0.0, 255.0);
            px[1] = (px[1] - t).clamp(0.0, 255.0);
            px[2] = (px[2] + t * 0.5).clamp(0.0, 255.0);
        }
        if self.highlights != 0.0 {
            let lum = luminance(px[0], px[1], px[2]) / 255.0;
            let weight = ((lum - 0.5) * 2.0).max(0.0);
            let offset = weight * self.highlights;
            map(px, |c| c + offset);
        }
        if self.shadows != 0.0 {
            let lum = luminance(px[0], px[1], px[2]) / 255.0;
            let weight = ((0.5 - lum) * 2.0).max(0.0);
            let offset = weight * self.shadows;
            map(px, |c| c + offset);
        }
        if self.inv_gamma != 1.0 {
            map(px, |c| 255.0 * (c / 255.0).powf(self.inv_gamma));
        }
    }

    /// Hue rotation, saturation scale and vibrance in one HSL round trip.
    fn apply_hsl(&self, px: &mut [f32; 3]) {
        let (mut h, mut s, l) = rgb_to_hsl(px[0] / 255.0, px[1] / 255.0, px[2] / 255.0);
        if self.hue_shift != 0.0 {
            h = wrap_hue(h + self.hue_shift);
        }
        if self.saturation != 1.0 {
            s = (s * self.saturation).clamp(0.0, 1.0);
        }
        if self.vibrance != 0.0 {
            let scale = if self.vibrance > 0.0 {
                // Muted pixels gain the most, saturated ones almost nothing
                let mut boost = self.vibrance * (1.0 - s) * (1.0 - s);
                if SKIN_HUE_DEGREES.contains(&(h * 360.0)) {
                    boost *= 0.5;
                }
                1.0 + boost
            } else {
                1.0 + self.vibrance * s * s
            };
            s = (s * scale).clamp(0.0, 1.0);
        }
        let (r, g, b) = hsl_to_rgb(h, s, l);
        px[0] = (r * 255.0).clamp(0.0, 255.0);
        px[1] = (g * 255.0).clamp(0.0, 255.0);
        px[2] = (b * 255.0).clamp(0.0, 255.0);
    }
}

#[inline]
fn map(px: &mut [f32; 3], f: impl Fn(f32) -> f32) {
    for c in px.iter_mut() {
        *c = f(*c).clamp(0.0, 255.0);
    }
}
