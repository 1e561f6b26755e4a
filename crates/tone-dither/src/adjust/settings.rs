//! Adjustment settings and validation.

use serde::{Deserialize, Serialize};

use crate::error::{check_range, DitherError, Result};

/// Tone and color corrections applied before any quantization.
///
/// Every field has a neutral default (0, except `gamma` = 1.0); a
/// default-constructed record leaves the image untouched.
///
/// | Field | Range | Unit |
/// |-------|-------|------|
/// | `exposure` | -2..=2 | stops |
/// | `brightness`, `contrast` | -100..=100 | |
/// | `hue` | -180..=180 | degrees |
/// | `saturation`, `vibrance` | -100..=100 | |
/// | `temperature`, `tint` | -100..=100 | |
/// | `highlights`, `shadows` | -100..=100 | |
/// | `gamma` | 0.5..=2.0 | |
/// | `blur` | 0..=20 | px radius |
/// | `sharpen`, `denoise`, `vignette` | 0..=100 | % (clamped, not rejected) |
///
/// # Example
///
/// ```
/// use tone_dither::AdjustmentSettings;
///
/// let settings = AdjustmentSettings::new().exposure(0.5).contrast(20.0);
/// assert!(settings.validate().is_ok());
///
/// let broken = AdjustmentSettings::new().gamma(3.0);
/// assert!(broken.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentSettings {
    pub exposure: f32,
    pub brightness: f32,
    pub contrast: f32,
    pub hue: f32,
    pub saturation: f32,
    pub vibrance: f32,
    pub temperature: f32,
    pub tint: f32,
    pub highlights: f32,
    pub shadows: f32,
    pub gamma: f32,
    pub blur: f32,
    pub sharpen: f32,
    pub denoise: f32,
    pub vignette: f32,
}

impl Default for AdjustmentSettings {
    fn default() -> Self {
        Self {
            exposure: 0.0,
            brightness: 0.0,
            contrast: 0.0,
            hue: 0.0,
            saturation: 0.0,
            vibrance: 0.0,
            temperature: 0.0,
            tint: 0.0,
            highlights: 0.0,
            shadows: 0.0,
            gamma: 1.0,
            blur: 0.0,
            sharpen: 0.0,
            denoise: 0.0,
            vignette: 0.0,
        }
    }
}

macro_rules! setter {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc = concat!("Set `", stringify!($name), "`.")]
            #[inline]
            pub fn $name(mut self, value: f32) -> Self {
                self.$name = value;
                self
            }
        )*
    };
}

impl AdjustmentSettings {
    /// Neutral settings; equivalent to `AdjustmentSettings::default()`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    setter!(
        exposure,
        brightness,
        contrast,
        hue,
        saturation,
        vibrance,
        temperature,
        tint,
        highlights,
        shadows,
        gamma,
        blur,
        sharpen,
        denoise,
        vignette,
    );

    /// `true` if applying these settings would leave any image unchanged.
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    /// Check every field against its declared range.
    ///
    /// Percentage fields (`sharpen`, `denoise`, `vignette`) only have to be
    /// finite; the pipeline clamps them into 0..=100.
    ///
    /// # Errors
    ///
    /// [`DitherError::Configuration`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        check_range("exposure", self.exposure, -2.0, 2.0)?;
        check_range("brightness", self.brightness, -100.0, 100.0)?;
        check_range("contrast", self.contrast, -100.0, 100.0)?;
        check_range("hue", self.hue, -180.0, 180.0)?;
        check_range("saturation", self.saturation, -100.0, 100.0)?;
        check_range("vibrance", self.vibrance, -100.0, 100.0)?;
        check_range("temperature", self.temperature, -100.0, 100.0)?;
        check_range("tint", self.tint, -100.0, 100.0)?;
        check_range("highlights", self.highlights, -100.0, 100.0)?;
        check_range("shadows", self.shadows, -100.0, 100.0)?;
        check_range("gamma", self.gamma, 0.5, 2.0)?;
        check_range("blur", self.blur, 0.0, 20.0)?;
        for (field, value) in [
            ("sharpen", self.sharpen),
            ("denoise", self.denoise),
            ("vignette", self.vignette),
        ] {
            if !value.is_finite() {
                return Err(DitherError::config(format!("{field} must be a finite number")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_neutral() {
        let s = AdjustmentSettings::default();
        assert!(s.is_neutral());
        assert_eq!(s.gamma, 1.0);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_builder_chaining() {
        let s = AdjustmentSettings::new().hue(90.0).blur(2.0).vignette(40.0);
        assert_eq!(s.hue, 90.0);
        assert_eq!(s.blur, 2.0);
        assert_eq!(s.vignette, 40.0);
        assert!(!s.is_neutral());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let cases = [
            AdjustmentSettings::new().exposure(2.5),
            AdjustmentSettings::new().brightness(-101.0),
            AdjustmentSettings::new().hue(181.0),
            AdjustmentSettings::new().gamma(0.4),
            AdjustmentSettings::new().blur(21.0),
            AdjustmentSettings::new().shadows(f32::NAN),
        ];
        for s in cases {
            assert!(
                matches!(s.validate(), Err(DitherError::Configuration(_))),
                "{s:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_percentages_clamped_not_rejected() {
        assert!(AdjustmentSettings::new().sharpen(150.0).validate().is_ok());
        assert!(AdjustmentSettings::new().vignette(-5.0).validate().is_ok());
        assert!(AdjustmentSettings::new().denoise(f32::NAN).validate().is_err());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let s: AdjustmentSettings = serde_yaml::from_str("exposure: 1.0\ngamma: 1.2\n").unwrap();
        assert_eq!(s.exposure, 1.0);
        assert_eq!(s.gamma, 1.2);
        assert_eq!(s.contrast, 0.0);
    }
}
