//! Per-field interpolation for the settings groups.
//!
//! Each settings record states explicitly which of its fields are numeric
//! (linearly interpolated, integers rounded) and which are discrete (held
//! at the earlier value until `t >= 1`).

use crate::adjust::AdjustmentSettings;
use crate::color_mode::ColorModeSettings;
use crate::dither::{DitheringSettings, HalftoneSettings};

/// Interpolation between two snapshots of a settings group.
///
/// `lerp(a, b, 0.0)` must equal `a` and `lerp(a, b, 1.0)` must equal `b`.
pub trait Interpolate: Clone {
    fn lerp(&self, to: &Self, t: f32) -> Self;
}

#[inline]
fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    if t <= 0.0 {
        a
    } else if t >= 1.0 {
        b
    } else {
        a + (b - a) * t
    }
}

#[inline]
fn lerp_round(a: u32, b: u32, t: f32) -> u32 {
    lerp_f32(a as f32, b as f32, t).round() as u32
}

#[inline]
fn hold<T: Clone>(a: &T, b: &T, t: f32) -> T {
    if t >= 1.0 {
        b.clone()
    } else {
        a.clone()
    }
}

impl Interpolate for AdjustmentSettings {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        let f = |a: f32, b: f32| lerp_f32(a, b, t);
        Self {
            exposure: f(self.exposure, to.exposure),
            brightness: f(self.brightness, to.brightness),
            contrast: f(self.contrast, to.contrast),
            hue: f(self.hue, to.hue),
            saturation: f(self.saturation, to.saturation),
            vibrance: f(self.vibrance, to.vibrance),
            temperature: f(self.temperature, to.temperature),
            tint: f(self.tint, to.tint),
            highlights: f(self.highlights, to.highlights),
            shadows: f(self.shadows, to.shadows),
            gamma: f(self.gamma, to.gamma),
            blur: f(self.blur, to.blur),
            sharpen: f(self.sharpen, to.sharpen),
            denoise: f(self.denoise, to.denoise),
            vignette: f(self.vignette, to.vignette),
        }
    }
}

impl Interpolate for ColorModeSettings {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        let shades = match (self.shades, to.shades) {
            (Some(a), Some(b)) => Some(lerp_round(a as u32, b as u32, t) as u16),
            (a, b) => hold(&a, &b, t),
        };
        Self {
            mode: hold(&self.mode, &to.mode, t),
            shades,
        }
    }
}

impl Interpolate for HalftoneSettings {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        Self {
            cell_size: lerp_round(self.cell_size, to.cell_size, t),
            angle: lerp_f32(self.angle, to.angle, t),
            shape: hold(&self.shape, &to.shape, t),
        }
    }
}

impl Interpolate for DitheringSettings {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        Self {
            algorithm: hold(&self.algorithm, &to.algorithm, t),
            serpentine: hold(&self.serpentine, &to.serpentine, t),
            error_attenuation: lerp_f32(self.error_attenuation, to.error_attenuation, t),
            random_noise: lerp_f32(self.random_noise, to.random_noise, t),
            seed: hold(&self.seed, &to.seed, t),
            halftone: self.halftone.lerp(&to.halftone, t),
            color_mode: hold(&self.color_mode, &to.color_mode, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_mode::ColorMode;
    use crate::dither::DitherAlgorithm;

    #[test]
    fn test_adjustments_lerp_numeric() {
        let a = AdjustmentSettings::new().exposure(-1.0).gamma(1.0);
        let b = AdjustmentSettings::new().exposure(1.0).gamma(2.0);
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid.exposure, 0.0);
        assert_eq!(mid.gamma, 1.5);
    }

    #[test]
    fn test_endpoints_exact() {
        let a = DitheringSettings::new(DitherAlgorithm::Atkinson).error_attenuation(0.3);
        let b = DitheringSettings::new(DitherAlgorithm::Bayer8x8).error_attenuation(0.7);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
    }

    #[test]
    fn test_discrete_fields_hold() {
        let a = DitheringSettings::new(DitherAlgorithm::Atkinson);
        let b = DitheringSettings::new(DitherAlgorithm::Halftone).serpentine(false);
        let mid = a.lerp(&b, 0.99);
        assert_eq!(mid.algorithm, DitherAlgorithm::Atkinson);
        assert!(mid.serpentine);
    }

    #[test]
    fn test_shades_round() {
        let a = ColorModeSettings::tonal(2);
        let b = ColorModeSettings::tonal(5);
        assert_eq!(a.lerp(&b, 0.5).shades, Some(4)); // 3.5 rounds away from zero
        assert_eq!(a.lerp(&b, 0.4).shades, Some(3));
        assert_eq!(a.lerp(&b, 0.4).mode, ColorMode::Tonal);
    }
}
