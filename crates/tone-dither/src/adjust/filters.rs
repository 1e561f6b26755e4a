//! Spatial filters over float RGB planes.
//!
//! Every filter takes a row-major `[f32; 3]` plane and returns a new one of
//! the same size. Edge pixels are handled by clamping sample coordinates.

/// Separable box blur of the given radius (horizontal pass, then vertical).
pub(crate) fn box_blur(src: &[[f32; 3]], width: usize, height: usize, radius: usize) -> Vec<[f32; 3]> {
    if radius == 0 {
        return src.to_vec();
    }
    let horizontal = box_pass(src, width, height, radius, Axis::Horizontal);
    box_pass(&horizontal, width, height, radius, Axis::Vertical)
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

/// One running-sum box pass along `axis`.
fn box_pass(src: &[[f32; 3]], width: usize, height: usize, radius: usize, axis: Axis) -> Vec<[f32; 3]> {
    let (lines, len) = match axis {
        Axis::Horizontal => (height, width),
        Axis::Vertical => (width, height),
    };
    let at = |line: usize, i: usize| match axis {
        Axis::Horizontal => line * width + i,
        Axis::Vertical => i * width + line,
    };
    let r = radius as isize;
    let last = len as isize - 1;
    let norm = 1.0 / (2 * radius + 1) as f32;

    let mut out = vec![[0.0; 3]; src.len()];
    for line in 0..lines {
        let sample = |i: isize| src[at(line, i.clamp(0, last) as usize)];

        let mut sum = [0.0f32; 3];
        for i in -r..=r {
            let s = sample(i);
            for c in 0..3 {
                sum[c] += s[c];
            }
        }
        for i in 0..len as isize {
            let dst = &mut out[at(line, i as usize)];
            for c in 0..3 {
                dst[c] = sum[c] * norm;
            }
            let incoming = sample(i + r + 1);
            let outgoing = sample(i - r);
            for c in 0..3 {
                sum[c] += incoming[c] - outgoing[c];
            }
        }
    }
    out
}

/// Unsharp mask: `original + amount * (original - blurred)`, radius 1.
pub(crate) fn unsharp_mask(src: &[[f32; 3]], width: usize, height: usize, amount: f32) -> Vec<[f32; 3]> {
    let blurred = box_blur(src, width, height, 1);
    src.iter()
        .zip(&blurred)
        .map(|(o, b)| {
            [
                (o[0] + amount * (o[0] - b[0])).clamp(0.0, 255.0),
                (o[1] + amount * (o[1] - b[1])).clamp(0.0, 255.0),
                (o[2] + amount * (o[2] - b[2])).clamp(0.0, 255.0),
            ]
        })
        .collect()
}

const DENOISE_RADIUS: isize = 2;
const DENOISE_SIGMA_SPACE: f32 = 1.5;

/// Bilateral smoothing blended with the original by `strength` (0..=1).
///
/// The range sigma grows with strength so that higher settings smooth
/// across stronger edges.
pub(crate) fn bilateral(src: &[[f32; 3]], width: usize, height: usize, strength: f32) -> Vec<[f32; 3]> {
    let sigma_range = 12.0 + 38.0 * strength;
    let inv_space = -1.0 / (2.0 * DENOISE_SIGMA_SPACE * DENOISE_SIGMA_SPACE);
    let inv_range = -1.0 / (2.0 * sigma_range * sigma_range);
    let (w, h) = (width as isize, height as isize);

    let mut out = Vec::with_capacity(src.len());
    for y in 0..h {
        for x in 0..w {
            let center = src[(y * w + x) as usize];
            let mut acc = [0.0f32; 3];
            let mut total = 0.0f32;
            for dy in -DENOISE_RADIUS..=DENOISE_RADIUS {
                for dx in -DENOISE_RADIUS..=DENOISE_RADIUS {
                    let sx = (x + dx).clamp(0, w - 1);
                    let sy = (y + dy).clamp(0, h - 1);
                    let s = src[(sy * w + sx) as usize];
                    let d0 = s[0] - center[0];
                    let d1 = s[1] - center[1];
                    let d2 = s[2] - center[2];
                    let spatial = ((dx * dx + dy * dy) as f32) * inv_space;
                    let range = (d0 * d0 + d1 * d1 + d2 * d2) * inv_range;
                    let weight = (spatial + range).exp();
                    for c in 0..3 {
                        acc[c] += s[c] * weight;
                    }
                    total += weight;
                }
            }
            // total >= 1 because the center sample always has weight exp(0)
            let mut px = [0.0; 3];
            for c in 0..3 {
                let filtered = acc[c] / total;
                px[c] = center[c] + strength * (filtered - center[c]);
            }
            out.push(px);
        }
    }
    out
}

/// Radial darkening: `1 - strength * (d / d_max)^2` from the image center.
pub(crate) fn vignette(src: &mut [[f32; 3]], width: usize, height: usize, strength: f32) {
    let cx = (width as f32 - 1.0) / 2.0;
    let cy = (height as f32 - 1.0) / 2.0;
    let max_sq = (cx * cx + cy * cy).max(f32::EPSILON);
    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let factor = 1.0 - strength * (dx * dx + dy * dy) / max_sq;
            let px = &mut src[y * width + x];
            for c in px.iter_mut() {
                *c = (*c * factor).clamp(0.0, 255.0);
            }
        }
    }
}
