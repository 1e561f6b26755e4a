//! Palette struct with nearest-color matching.
//!
//! A [`Palette`] is an ordered, non-empty list of colors with a name and a
//! category tag. Order matters only for display and for tie-breaking: the
//! nearest-color search returns the lowest index among equally close
//! entries.

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::error::{DitherError, Result};

/// An ordered, non-empty set of colors.
///
/// Duplicate entries are allowed (palette extraction can legitimately
/// produce them); the first occurrence always wins nearest-color ties.
///
/// # Example
///
/// ```
/// use tone_dither::{Color, Palette};
///
/// let palette = Palette::from_hex("duo", &["#000000", "#ffffff"]).unwrap();
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.find_nearest(Color::grey(200)), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PaletteRepr")]
pub struct Palette {
    pub(super) name: String,
    pub(super) category: String,
    pub(super) colors: Vec<Color>,
}

/// Unvalidated wire form of [`Palette`].
#[derive(Deserialize)]
struct PaletteRepr {
    #[serde(default)]
    name: String,
    #[serde(default)]
    category: String,
    colors: Vec<Color>,
}

impl TryFrom<PaletteRepr> for Palette {
    type Error = DitherError;

    fn try_from(repr: PaletteRepr) -> Result<Self> {
        Palette::new(repr.name, repr.colors).map(|p| p.with_category(repr.category))
    }
}

impl Palette {
    /// Create a palette from a list of colors.
    ///
    /// # Errors
    ///
    /// Returns [`DitherError::InvalidPalette`] if `colors` is empty or holds
    /// more than 256 entries.
    pub fn new(name: impl Into<String>, colors: Vec<Color>) -> Result<Self> {
        if colors.is_empty() {
            return Err(DitherError::palette("palette cannot be empty"));
        }
        if colors.len() > 256 {
            return Err(DitherError::palette(format!(
                "palette has {} colors, at most 256 are supported",
                colors.len()
            )));
        }
        Ok(Self {
            name: name.into(),
            category: String::new(),
            colors,
        })
    }

    /// Create a palette from hex strings.
    ///
    /// # Errors
    ///
    /// Returns [`DitherError::ParseColor`] for an unparseable entry, or
    /// [`DitherError::InvalidPalette`] if the list is empty.
    pub fn from_hex(name: impl Into<String>, hex: &[&str]) -> Result<Self> {
        let colors = hex
            .iter()
            .map(|s| s.parse::<Color>())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::new(name, colors)
    }

    /// Evenly spaced greys from black to white.
    ///
    /// # Errors
    ///
    /// Returns [`DitherError::InvalidPalette`] unless `shades` is in `2..=256`.
    pub fn grayscale(shades: u16) -> Result<Self> {
        if !(2..=256).contains(&shades) {
            return Err(DitherError::palette(format!(
                "shade count {shades} is outside 2..=256"
            )));
        }
        let max = (shades - 1) as f32;
        let colors = (0..shades)
            .map(|i| Color::grey((i as f32 * 255.0 / max).round() as u8))
            .collect();
        Ok(Self::new(format!("grayscale-{shades}"), colors)?.with_category("grayscale"))
    }

    /// Two-entry black/white palette.
    pub fn black_white() -> Self {
        Self {
            name: "black-white".to_string(),
            category: "monochrome".to_string(),
            colors: vec![Color::BLACK, Color::WHITE],
        }
    }

    /// Set the category tag.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Palette name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Palette category tag (may be empty).
    #[inline]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the number of colors in the palette.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`: empty palettes are rejected at construction time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// All entries in order.
    #[inline]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Entry at `idx`.
    #[inline]
    pub fn color(&self, idx: usize) -> Color {
        self.colors[idx]
    }

    /// `true` if every entry has equal R, G and B.
    ///
    /// Greyscale palettes are dithered on luminance by the ordered and
    /// noise families; chromatic palettes are dithered per channel.
    pub fn is_greyscale(&self) -> bool {
        self.colors.iter().all(|c| c.is_grey())
    }

    /// Index of the entry nearest to `color` by Euclidean RGB distance.
    ///
    /// Exact ties resolve to the lowest index.
    pub fn find_nearest(&self, color: Color) -> usize {
        let mut best_idx = 0;
        let mut best_dist = u32::MAX;
        for (i, &entry) in self.colors.iter().enumerate() {
            let dist = entry.distance_sq(color);
            // Strict comparison keeps the first of equally distant entries
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
                if dist == 0 {
                    break;
                }
            }
        }
        best_idx
    }

    /// Nearest entry to float channels (used inside error diffusion, where
    /// values may leave the 0..=255 range).
    pub fn find_nearest_f32(&self, rgb: [f32; 3]) -> usize {
        let mut best_idx = 0;
        let mut best_dist = f32::INFINITY;
        for (i, entry) in self.colors.iter().enumerate() {
            let [r, g, b] = entry.to_f32();
            let dr = rgb[0] - r;
            let dg = rgb[1] - g;
            let db = rgb[2] - b;
            let dist = dr * dr + dg * dg + db * db;
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }
        best_idx
    }

    /// Replace every pixel by its nearest entry, keeping the pixel's alpha.
    ///
    /// This is the quantization primitive shared by all dithering families.
    /// It is idempotent: quantizing an already-quantized buffer against the
    /// same palette returns it unchanged.
    pub fn quantize(&self, buffer: &PixelBuffer) -> PixelBuffer {
        let mut out = buffer.clone();
        for px in out.data_mut().chunks_exact_mut(4) {
            let nearest = self.colors[self.find_nearest(Color::rgb(px[0], px[1], px[2]))];
            px[0] = nearest.r;
            px[1] = nearest.g;
            px[2] = nearest.b;
        }
        out
    }

    /// Entry indices sorted by ascending luminance, with their luminance.
    ///
    /// Ties keep palette order.
    pub(crate) fn luminance_ramp(&self) -> Vec<(f32, usize)> {
        let mut ramp: Vec<(f32, usize)> = self
            .colors
            .iter()
            .enumerate()
            .map(|(i, c)| (c.luminance(), i))
            .collect();
        ramp.sort_by(|a, b| a.0.total_cmp(&b.0));
        ramp
    }

    /// Index of the darkest entry (first on ties).
    pub(crate) fn darkest(&self) -> usize {
        self.luminance_ramp()[0].1
    }

    /// Index of the lightest entry (first on ties).
    pub(crate) fn lightest(&self) -> usize {
        let ramp = self.luminance_ramp();
        let max = ramp[ramp.len() - 1].0;
        ramp.iter()
            .find(|(l, _)| *l == max)
            .map(|&(_, i)| i)
            .unwrap_or(0)
    }
}
