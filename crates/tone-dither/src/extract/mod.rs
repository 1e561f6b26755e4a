//! Palette extraction: derive a color set from an image.
//!
//! Three clustering algorithms are available; all return between 1 and
//! `target_count` colors:
//!
//! - [`ExtractAlgorithm::MedianCut`]: recursive median splits of the
//!   color cuboid, longest side first
//! - [`ExtractAlgorithm::Octree`]: an 8-way RGB tree reduced by merging
//!   the cheapest sibling leaves
//! - [`ExtractAlgorithm::KMeans`]: Lloyd iterations from deterministic
//!   quantile seeds

mod kmeans;
mod median_cut;
mod octree;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::error::{DitherError, Result};
use crate::palette::Palette;

/// Palette extraction algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractAlgorithm {
    #[default]
    MedianCut,
    Octree,
    KMeans,
}

impl ExtractAlgorithm {
    pub const ALL: [ExtractAlgorithm; 3] = [ExtractAlgorithm::MedianCut, ExtractAlgorithm::Octree, ExtractAlgorithm::KMeans];

    pub fn name(self) -> &'static str {
        match self {
            ExtractAlgorithm::MedianCut => "median-cut",
            ExtractAlgorithm::Octree => "octree",
            ExtractAlgorithm::KMeans => "k-means",
        }
    }
}

impl fmt::Display for ExtractAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExtractAlgorithm {
    type Err = DitherError;

    fn from_str(s: &str) -> Result<Self> {
        ExtractAlgorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| DitherError::config(format!("unknown extraction algorithm '{s}'")))
    }
}

/// Extract at most `target_count` colors from `buffer`.
///
/// Fully transparent pixels are ignored unless the whole image is
/// transparent. The palette is named `"<algorithm>-<count>"` with category
/// `"extracted"`.
///
/// # Errors
///
/// [`DitherError::InvalidPalette`] if `target_count` is outside 1..=256.
///
/// # Example
///
/// ```
/// use tone_dither::{extract, Color, ExtractAlgorithm, PixelBuffer};
///
/// let image = PixelBuffer::from_fn(4, 4, |x, _| if x < 2 { Color::rgb(255, 0, 0) } else { Color::rgb(0, 0, 255) }).unwrap();
/// let palette = extract(&image, 2, ExtractAlgorithm::MedianCut).unwrap();
/// assert_eq!(palette.len(), 2);
/// ```
pub fn extract(buffer: &PixelBuffer, target_count: usize, algorithm: ExtractAlgorithm) -> Result<Palette> {
    if !(1..=256).contains(&target_count) {
        return Err(DitherError::palette(format!(
            "extraction target {target_count} is outside 1..=256"
        )));
    }

    let samples = samples(buffer);
    let colors: Vec<Color> = match algorithm {
        ExtractAlgorithm::MedianCut => median_cut::median_cut(samples, target_count),
        ExtractAlgorithm::Octree => octree::octree(&samples, target_count),
        ExtractAlgorithm::KMeans => kmeans::kmeans(&samples, target_count),
    }
    .into_iter()
    .map(|[r, g, b]| Color::rgb(r, g, b))
    .collect();

    tracing::debug!(
        algorithm = %algorithm,
        requested = target_count,
        returned = colors.len(),
        "extracted palette"
    );
    Ok(Palette::new(format!("{algorithm}-{}", colors.len()), colors)?.with_category("extracted"))
}

/// Opaque-ish pixels of `buffer` as RGB triples.
fn samples(buffer: &PixelBuffer) -> Vec<[u8; 3]> {
    let visible: Vec<[u8; 3]> = buffer
        .data()
        .chunks_exact(4)
        .filter(|px| px[3] > 0)
        .map(|px| [px[0], px[1], px[2]])
        .collect();
    if !visible.is_empty() {
        return visible;
    }
    buffer.data().chunks_exact(4).map(|px| [px[0], px[1], px[2]]).collect()
}

/// Rounded mean of RGB sums.
pub(crate) fn mean_color(sum: [u64; 3], count: u64) -> [u8; 3] {
    let avg = |s: u64| ((s as f64 / count as f64).round()).clamp(0.0, 255.0) as u8;
    [avg(sum[0]), avg(sum[1]), avg(sum[2])]
}
