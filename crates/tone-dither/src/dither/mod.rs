//! Dithering engine.
//!
//! One entry point, [`dither`], dispatches over four families:
//!
//! - **Error diffusion**: eleven fixed kernels (Floyd-Steinberg, Atkinson,
//!   Jarvis-Judice-Ninke, Stucki, Burkes, the Sierra family, False
//!   Floyd-Steinberg, Fan, Shiau-Fan)
//! - **Ordered**: Bayer 2x2 through 16x16, a 3x3 dispersed matrix and a
//!   2x2 checkerboard
//! - **Noise**: uniform random, hashed white noise and a tiled blue noise
//!   threshold field
//! - **Halftone**: rotated clustered-dot screen
//!
//! Every family writes only palette colors, so quantizing the result
//! again with [`Palette::quantize`] is a no-op.

mod diffusion;
mod halftone;
mod kernel;
mod noise;
mod ordered;
mod settings;
mod threshold;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::error::{DitherError, Result};
use crate::palette::Palette;

pub use kernel::*;
pub use noise::BLUE_NOISE_SIZE;
pub use ordered::ThresholdMatrix;
pub use settings::{DitheringSettings, HalftoneSettings, HalftoneShape};

/// Algorithm family, as listed by the CLI and used for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DitherFamily {
    ErrorDiffusion,
    Ordered,
    Noise,
    Halftone,
}

impl DitherFamily {
    pub const ALL: [DitherFamily; 4] = [
        DitherFamily::ErrorDiffusion,
        DitherFamily::Ordered,
        DitherFamily::Noise,
        DitherFamily::Halftone,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DitherFamily::ErrorDiffusion => "error-diffusion",
            DitherFamily::Ordered => "ordered",
            DitherFamily::Noise => "noise",
            DitherFamily::Halftone => "halftone",
        }
    }
}

impl fmt::Display for DitherFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dithering algorithm identifier.
///
/// Serialized as its kebab-case [`name`](Self::name); parsing an unknown
/// name fails with [`DitherError::Configuration`].
///
/// # Example
///
/// ```
/// use tone_dither::{DitherAlgorithm, DitherFamily};
///
/// let algo: DitherAlgorithm = "bayer-8x8".parse().unwrap();
/// assert_eq!(algo.family(), DitherFamily::Ordered);
/// assert!(algo.is_deterministic());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DitherAlgorithm {
    #[default]
    FloydSteinberg,
    Atkinson,
    JarvisJudiceNinke,
    Stucki,
    Burkes,
    Sierra,
    SierraTwoRow,
    SierraLite,
    FalseFloydSteinberg,
    Fan,
    ShiauFan,
    Bayer2x2,
    Bayer4x4,
    Bayer8x8,
    Bayer16x16,
    Ordered3x3,
    Simple2x2,
    RandomThreshold,
    BlueNoise,
    WhiteNoise,
    Halftone,
}

/// What a dispatch resolves to: the family plus its fixed data.
enum Method {
    Diffusion(&'static Kernel),
    Ordered(ThresholdMatrix),
    RandomThreshold,
    WhiteNoise,
    BlueNoise,
    Halftone,
}

impl DitherAlgorithm {
    /// Every algorithm, grouped by family.
    pub const ALL: [DitherAlgorithm; 21] = [
        DitherAlgorithm::FloydSteinberg,
        DitherAlgorithm::Atkinson,
        DitherAlgorithm::JarvisJudiceNinke,
        DitherAlgorithm::Stucki,
        DitherAlgorithm::Burkes,
        DitherAlgorithm::Sierra,
        DitherAlgorithm::SierraTwoRow,
        DitherAlgorithm::SierraLite,
        DitherAlgorithm::FalseFloydSteinberg,
        DitherAlgorithm::Fan,
        DitherAlgorithm::ShiauFan,
        DitherAlgorithm::Bayer2x2,
        DitherAlgorithm::Bayer4x4,
        DitherAlgorithm::Bayer8x8,
        DitherAlgorithm::Bayer16x16,
        DitherAlgorithm::Ordered3x3,
        DitherAlgorithm::Simple2x2,
        DitherAlgorithm::RandomThreshold,
        DitherAlgorithm::BlueNoise,
        DitherAlgorithm::WhiteNoise,
        DitherAlgorithm::Halftone,
    ];

    /// Kebab-case identifier.
    pub fn name(self) -> &'static str {
        use DitherAlgorithm::*;
        match self {
            FloydSteinberg => "floyd-steinberg",
            Atkinson => "atkinson",
            JarvisJudiceNinke => "jarvis-judice-ninke",
            Stucki => "stucki",
            Burkes => "burkes",
            Sierra => "sierra",
            SierraTwoRow => "sierra-2-row",
            SierraLite => "sierra-lite",
            FalseFloydSteinberg => "false-floyd-steinberg",
            Fan => "fan",
            ShiauFan => "shiau-fan",
            Bayer2x2 => "bayer-2x2",
            Bayer4x4 => "bayer-4x4",
            Bayer8x8 => "bayer-8x8",
            Bayer16x16 => "bayer-16x16",
            Ordered3x3 => "ordered-3x3",
            Simple2x2 => "simple-2x2",
            RandomThreshold => "random-threshold",
            BlueNoise => "blue-noise",
            WhiteNoise => "white-noise",
            Halftone => "halftone",
        }
    }

    pub fn family(self) -> DitherFamily {
        use DitherAlgorithm::*;
        match self {
            FloydSteinberg | Atkinson | JarvisJudiceNinke | Stucki | Burkes | Sierra | SierraTwoRow | SierraLite
            | FalseFloydSteinberg | Fan | ShiauFan => DitherFamily::ErrorDiffusion,
            Bayer2x2 | Bayer4x4 | Bayer8x8 | Bayer16x16 | Ordered3x3 | Simple2x2 => DitherFamily::Ordered,
            RandomThreshold | WhiteNoise | BlueNoise => DitherFamily::Noise,
            Halftone => DitherFamily::Halftone,
        }
    }

    /// `false` only for `random-threshold`, whose thresholds are drawn
    /// fresh each run unless a seed is set. Error diffusion is also
    /// non-deterministic when `random_noise > 0` without a seed.
    pub fn is_deterministic(self) -> bool {
        self != DitherAlgorithm::RandomThreshold
    }

    /// Diffusion kernel, for error-diffusion algorithms.
    pub fn kernel(self) -> Option<&'static Kernel> {
        use DitherAlgorithm::*;
        let kernel = match self {
            FloydSteinberg => &FLOYD_STEINBERG,
            Atkinson => &ATKINSON,
            JarvisJudiceNinke => &JARVIS_JUDICE_NINKE,
            Stucki => &STUCKI,
            Burkes => &BURKES,
            Sierra => &SIERRA,
            SierraTwoRow => &SIERRA_TWO_ROW,
            SierraLite => &SIERRA_LITE,
            FalseFloydSteinberg => &FALSE_FLOYD_STEINBERG,
            Fan => &FAN,
            ShiauFan => &SHIAU_FAN,
            _ => return None,
        };
        Some(kernel)
    }

    /// Resolve the rendering method. Threshold matrices are built here, so
    /// only [`dither`] calls this.
    fn method(self) -> Method {
        use DitherAlgorithm::*;
        match self {
            FloydSteinberg => Method::Diffusion(&FLOYD_STEINBERG),
            Atkinson => Method::Diffusion(&ATKINSON),
            JarvisJudiceNinke => Method::Diffusion(&JARVIS_JUDICE_NINKE),
            Stucki => Method::Diffusion(&STUCKI),
            Burkes => Method::Diffusion(&BURKES),
            Sierra => Method::Diffusion(&SIERRA),
            SierraTwoRow => Method::Diffusion(&SIERRA_TWO_ROW),
            SierraLite => Method::Diffusion(&SIERRA_LITE),
            FalseFloydSteinberg => Method::Diffusion(&FALSE_FLOYD_STEINBERG),
            Fan => Method::Diffusion(&FAN),
            ShiauFan => Method::Diffusion(&SHIAU_FAN),
            Bayer2x2 => Method::Ordered(ThresholdMatrix::bayer(2)),
            Bayer4x4 => Method::Ordered(ThresholdMatrix::bayer(4)),
            Bayer8x8 => Method::Ordered(ThresholdMatrix::bayer(8)),
            Bayer16x16 => Method::Ordered(ThresholdMatrix::bayer(16)),
            Ordered3x3 => Method::Ordered(ThresholdMatrix::ordered_3x3()),
            Simple2x2 => Method::Ordered(ThresholdMatrix::simple_2x2()),
            RandomThreshold => Method::RandomThreshold,
            WhiteNoise => Method::WhiteNoise,
            BlueNoise => Method::BlueNoise,
            Halftone => Method::Halftone,
        }
    }
}

impl fmt::Display for DitherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DitherAlgorithm {
    type Err = DitherError;

    fn from_str(s: &str) -> Result<Self> {
        DitherAlgorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| DitherError::config(format!("unknown dithering algorithm '{s}'")))
    }
}

impl TryFrom<String> for DitherAlgorithm {
    type Error = DitherError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DitherAlgorithm> for String {
    fn from(algorithm: DitherAlgorithm) -> Self {
        algorithm.name().to_string()
    }
}

/// Dither `buffer` onto `palette` with the algorithm in `settings`.
///
/// Returns a new buffer of the same dimensions whose pixels are all
/// palette colors; alpha is copied through unchanged.
///
/// # Errors
///
/// [`DitherError::Configuration`] if `settings` fails validation.
pub fn dither(buffer: &PixelBuffer, palette: &Palette, settings: &DitheringSettings) -> Result<PixelBuffer> {
    settings.validate()?;
    tracing::debug!(
        algorithm = %settings.algorithm,
        width = buffer.width(),
        height = buffer.height(),
        palette_size = palette.len(),
        "dithering"
    );

    let mode = settings.color_mode;
    let out = match settings.algorithm.method() {
        Method::Diffusion(kernel) => diffusion::diffuse(buffer, palette, kernel, settings),
        Method::Ordered(matrix) => threshold::threshold_dither(buffer, palette, mode, |x, y| matrix.at(x, y)),
        Method::RandomThreshold => {
            let mut rng = noise::rng(settings.seed);
            threshold::threshold_dither(buffer, palette, mode, |_, _| noise::random_threshold(&mut rng))
        }
        Method::WhiteNoise => threshold::threshold_dither(buffer, palette, mode, noise::white_noise),
        Method::BlueNoise => threshold::threshold_dither(buffer, palette, mode, noise::blue_noise),
        Method::Halftone => halftone::halftone(buffer, palette, &settings.halftone),
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn gradient() -> PixelBuffer {
        PixelBuffer::from_fn(32, 16, |x, y| Color::rgb((x * 8) as u8, (y * 16) as u8, 128)).unwrap()
    }

    #[test]
    fn test_names_round_trip_and_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for algo in DitherAlgorithm::ALL {
            assert!(seen.insert(algo.name()), "duplicate name {}", algo.name());
            assert_eq!(algo.name().parse::<DitherAlgorithm>().unwrap(), algo);
        }
    }

    #[test]
    fn test_unknown_name_is_configuration_error() {
        let err = "floyd".parse::<DitherAlgorithm>().unwrap_err();
        assert_eq!(err, DitherError::Configuration("unknown dithering algorithm 'floyd'".into()));
    }

    #[test]
    fn test_family_counts() {
        let count = |f| DitherAlgorithm::ALL.iter().filter(|a| a.family() == f).count();
        assert_eq!(count(DitherFamily::ErrorDiffusion), 11);
        assert_eq!(count(DitherFamily::Ordered), 6);
        assert_eq!(count(DitherFamily::Noise), 3);
        assert_eq!(count(DitherFamily::Halftone), 1);
    }

    #[test]
    fn test_kernel_lookup() {
        assert_eq!(DitherAlgorithm::Atkinson.kernel(), Some(&ATKINSON));
        assert_eq!(DitherAlgorithm::Bayer4x4.kernel(), None);
    }

    #[test]
    fn test_family_and_kernel_agree_with_method() {
        for algo in DitherAlgorithm::ALL {
            let family = match algo.method() {
                Method::Diffusion(kernel) => {
                    assert_eq!(algo.kernel(), Some(kernel), "{algo}");
                    DitherFamily::ErrorDiffusion
                }
                Method::Ordered(_) => DitherFamily::Ordered,
                Method::RandomThreshold | Method::WhiteNoise | Method::BlueNoise => DitherFamily::Noise,
                Method::Halftone => DitherFamily::Halftone,
            };
            assert_eq!(algo.family(), family, "{algo}");
            assert_eq!(algo.kernel().is_some(), family == DitherFamily::ErrorDiffusion, "{algo}");
        }
    }

    #[test]
    fn test_every_algorithm_keeps_dimensions_and_alpha() {
        let src = PixelBuffer::from_fn(20, 12, |x, y| Color::new((x * 12) as u8, (y * 20) as u8, 60, 128)).unwrap();
        let palette = Palette::preset("gameboy").unwrap();
        for algo in DitherAlgorithm::ALL {
            let out = dither(&src, &palette, &DitheringSettings::new(algo).seed(1)).unwrap();
            assert_eq!(out.dimensions(), src.dimensions(), "{algo}");
            assert!(out.pixels().all(|c| c.a == 128), "{algo} changed alpha");
        }
    }

    #[test]
    fn test_seeded_random_threshold_is_reproducible() {
        let settings = DitheringSettings::new(DitherAlgorithm::RandomThreshold).seed(5);
        let palette = Palette::black_white();
        assert_eq!(
            dither(&gradient(), &palette, &settings).unwrap(),
            dither(&gradient(), &palette, &settings).unwrap()
        );
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = DitheringSettings::default().error_attenuation(2.0);
        let err = dither(&gradient(), &Palette::black_white(), &settings).unwrap_err();
        assert!(matches!(err, DitherError::Configuration(_)));
    }

    #[test]
    fn test_serde_uses_kebab_names() {
        let json = serde_json::to_string(&DitherAlgorithm::SierraTwoRow).unwrap();
        assert_eq!(json, "\"sierra-2-row\"");
        let back: DitherAlgorithm = serde_json::from_str("\"bayer-16x16\"").unwrap();
        assert_eq!(back, DitherAlgorithm::Bayer16x16);
    }
}
