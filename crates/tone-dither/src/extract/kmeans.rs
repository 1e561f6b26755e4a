//! K-means extraction seeded from luminance quantiles.

use crate::color::luminance;

const MAX_SAMPLES: usize = 65_536;
const MAX_ITERATIONS: usize = 32;
/// Stop once no centroid moves farther than this (RGB units).
const EPSILON: f32 = 0.5;

pub(super) fn kmeans(pixels: &[[u8; 3]], k: usize) -> Vec<[u8; 3]> {
    let stride = pixels.len().div_ceil(MAX_SAMPLES).max(1);
    let samples: Vec<[f32; 3]> = pixels
        .iter()
        .step_by(stride)
        .map(|p| [p[0] as f32, p[1] as f32, p[2] as f32])
        .collect();

    let mut centroids = initial_centroids(&samples, k);
    let mut assignments = vec![0usize; samples.len()];

    for _ in 0..MAX_ITERATIONS {
        assign(&samples, &centroids, &mut assignments);
        let (sums, counts) = accumulate(&samples, &assignments, k);
        let mut movement = 0.0f32;
        for (i, centroid) in centroids.iter_mut().enumerate() {
            if counts[i] == 0 {
                continue;
            }
            let n = counts[i] as f32;
            let next = [sums[i][0] / n, sums[i][1] / n, sums[i][2] / n];
            movement = movement.max(distance_sq(*centroid, next).sqrt());
            *centroid = next;
        }
        if movement < EPSILON {
            break;
        }
    }

    assign(&samples, &centroids, &mut assignments);
    let (_, counts) = accumulate(&samples, &assignments, k);
    centroids
        .into_iter()
        .zip(counts)
        .filter(|&(_, n)| n > 0)
        .map(|(c, _)| [to_u8(c[0]), to_u8(c[1]), to_u8(c[2])])
        .collect()
}

/// `k` samples at evenly spaced quantiles of the luminance-sorted samples.
fn initial_centroids(samples: &[[f32; 3]], k: usize) -> Vec<[f32; 3]> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| luminance(a[0], a[1], a[2]).total_cmp(&luminance(b[0], b[1], b[2])));
    let n = sorted.len();
    (0..k).map(|i| sorted[((2 * i + 1) * n / (2 * k)).min(n - 1)]).collect()
}

/// Nearest centroid per sample; ties go to the lowest centroid index.
fn assign(samples: &[[f32; 3]], centroids: &[[f32; 3]], assignments: &mut [usize]) {
    for (sample, slot) in samples.iter().zip(assignments.iter_mut()) {
        let mut best = (f32::INFINITY, 0);
        for (i, &c) in centroids.iter().enumerate() {
            let d = distance_sq(*sample, c);
            if d < best.0 {
                best = (d, i);
            }
        }
        *slot = best.1;
    }
}

fn accumulate(samples: &[[f32; 3]], assignments: &[usize], k: usize) -> (Vec<[f32; 3]>, Vec<usize>) {
    let mut sums = vec![[0.0f32; 3]; k];
    let mut counts = vec![0usize; k];
    for (sample, &cluster) in samples.iter().zip(assignments) {
        for c in 0..3 {
            sums[cluster][c] += sample[c];
        }
        counts[cluster] += 1;
    }
    (sums, counts)
}

#[inline]
fn distance_sq(a: [f32; 3], b: [f32; 3]) -> f32 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_seeds_span_luminance() {
        let samples: Vec<[f32; 3]> = (0..100).map(|v| [v as f32; 3]).collect();
        let seeds = initial_centroids(&samples, 4);
        assert_eq!(seeds, vec![[12.0; 3], [37.0; 3], [62.0; 3], [87.0; 3]]);
    }

    #[test]
    fn test_two_clusters() {
        let mut pixels = vec![[10, 10, 10]; 30];
        pixels.extend(vec![[240, 200, 10]; 30]);
        let mut colors = kmeans(&pixels, 2);
        colors.sort();
        assert_eq!(colors, vec![[10, 10, 10], [240, 200, 10]]);
    }

    #[test]
    fn test_duplicate_seeds_collapse() {
        // One distinct color but k = 5: duplicate centroids get no members
        assert_eq!(kmeans(&[[77, 66, 55]; 20], 5), vec![[77, 66, 55]]);
    }

    #[test]
    fn test_deterministic() {
        let pixels: Vec<[u8; 3]> = (0..500u32).map(|i| [(i * 7 % 256) as u8, (i * 13 % 256) as u8, (i % 256) as u8]).collect();
        assert_eq!(kmeans(&pixels, 8), kmeans(&pixels, 8));
    }
}
