//! Dithering settings.

use serde::{Deserialize, Serialize};

use super::DitherAlgorithm;
use crate::color_mode::ColorMode;
use crate::error::{check_range, DitherError, Result};

/// Dot shape drawn in each halftone cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HalftoneShape {
    #[default]
    Circle,
    Diamond,
}

/// Screen geometry for the `halftone` algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HalftoneSettings {
    /// Cell edge length in pixels (2..=64).
    pub cell_size: u32,
    /// Screen rotation in degrees (-360..=360).
    pub angle: f32,
    pub shape: HalftoneShape,
}

impl Default for HalftoneSettings {
    fn default() -> Self {
        Self {
            cell_size: 6,
            angle: 45.0,
            shape: HalftoneShape::Circle,
        }
    }
}

impl HalftoneSettings {
    pub fn validate(&self) -> Result<()> {
        if !(2..=64).contains(&self.cell_size) {
            return Err(DitherError::config(format!(
                "halftone cell_size = {} is outside 2..=64",
                self.cell_size
            )));
        }
        check_range("halftone angle", self.angle, -360.0, 360.0)
    }
}

/// Configuration for [`dither`](super::dither).
///
/// `error_attenuation` and `random_noise` only affect the error-diffusion
/// family; `halftone` only affects [`DitherAlgorithm::Halftone`].
///
/// # Defaults
///
/// - algorithm: Floyd-Steinberg
/// - serpentine: `true`
/// - error_attenuation: `1.0` (full error propagated)
/// - random_noise: `0.0`
/// - seed: `None` (noise drawn from OS entropy)
///
/// # Example
///
/// ```
/// use tone_dither::{DitherAlgorithm, DitheringSettings};
///
/// let settings = DitheringSettings::new(DitherAlgorithm::Atkinson)
///     .serpentine(false)
///     .random_noise(0.1)
///     .seed(7);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DitheringSettings {
    pub algorithm: DitherAlgorithm,
    pub serpentine: bool,
    pub error_attenuation: f32,
    pub random_noise: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub halftone: HalftoneSettings,
    /// Color mode the input was reduced with. Ordered, noise and halftone
    /// dithering bracket on luminance for `mono`/`tonal` and per channel
    /// otherwise. Not persisted; callers set it from their color-mode
    /// settings for each call.
    #[serde(skip)]
    pub color_mode: ColorMode,
}

impl Default for DitheringSettings {
    fn default() -> Self {
        Self {
            algorithm: DitherAlgorithm::default(),
            serpentine: true,
            error_attenuation: 1.0,
            random_noise: 0.0,
            seed: None,
            halftone: HalftoneSettings::default(),
            color_mode: ColorMode::default(),
        }
    }
}

impl DitheringSettings {
    /// Default settings with the given algorithm.
    pub fn new(algorithm: DitherAlgorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.serpentine = enabled;
        self
    }

    #[inline]
    pub fn error_attenuation(mut self, attenuation: f32) -> Self {
        self.error_attenuation = attenuation;
        self
    }

    #[inline]
    pub fn random_noise(mut self, amount: f32) -> Self {
        self.random_noise = amount;
        self
    }

    /// Fix the noise seed so `random-threshold` and diffusion noise repeat.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[inline]
    pub fn halftone(mut self, halftone: HalftoneSettings) -> Self {
        self.halftone = halftone;
        self
    }

    #[inline]
    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    /// # Errors
    ///
    /// [`DitherError::Configuration`] if `error_attenuation` or
    /// `random_noise` leave 0..=1, or the halftone geometry is invalid.
    pub fn validate(&self) -> Result<()> {
        check_range("error_attenuation", self.error_attenuation, 0.0, 1.0)?;
        check_range("random_noise", self.random_noise, 0.0, 1.0)?;
        self.halftone.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let s = DitheringSettings::default();
        assert_eq!(s.algorithm, DitherAlgorithm::FloydSteinberg);
        assert!(s.serpentine, "serpentine should default to true");
        assert_eq!(s.error_attenuation, 1.0);
        assert_eq!(s.random_noise, 0.0);
        assert_eq!(s.seed, None);
        assert_eq!(s.halftone.cell_size, 6);
    }

    #[test]
    fn test_validate_ranges() {
        assert!(DitheringSettings::default().error_attenuation(1.1).validate().is_err());
        assert!(DitheringSettings::default().random_noise(-0.1).validate().is_err());
        assert!(DitheringSettings::default().random_noise(f32::NAN).validate().is_err());
        let tiny = HalftoneSettings {
            cell_size: 1,
            ..HalftoneSettings::default()
        };
        assert!(DitheringSettings::default().halftone(tiny).validate().is_err());
    }

    #[test]
    fn test_yaml_kebab_identifiers() {
        let yaml = "algorithm: sierra-2-row\nserpentine: false\nhalftone:\n  shape: diamond\n";
        let s: DitheringSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(s.algorithm, DitherAlgorithm::SierraTwoRow);
        assert!(!s.serpentine);
        assert_eq!(s.halftone.shape, HalftoneShape::Diamond);
        assert_eq!(s.halftone.cell_size, 6);
    }

    #[test]
    fn test_color_mode_is_not_persisted() {
        let s = DitheringSettings::new(DitherAlgorithm::Bayer4x4).color_mode(ColorMode::Tonal);
        let json = serde_json::to_string(&s).unwrap();
        assert!(!json.contains("color_mode"), "{json}");
        let back: DitheringSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.color_mode, ColorMode::Rgb);
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let err = serde_yaml::from_str::<DitheringSettings>("algorithm: dizzy\n").unwrap_err();
        assert!(err.to_string().contains("unknown dithering algorithm"));
    }
}
