//! Threshold noise sources: uniform random, hashed white noise and a
//! void-and-cluster blue noise tile.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded generator, or one drawn from OS entropy when `seed` is `None`.
pub(crate) fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Uniform threshold in `[0, 1)` drawn from `rng`.
#[inline]
pub(crate) fn random_threshold(rng: &mut StdRng) -> f32 {
    rng.gen::<f32>()
}

/// Deterministic per-coordinate white noise in `[0, 1)`.
#[inline]
pub(crate) fn white_noise(x: u32, y: u32) -> f32 {
    let mut hash = x.wrapping_mul(0x85eb_ca6b) ^ y.wrapping_mul(0xc2b2_ae35);
    hash ^= hash >> 13;
    hash = hash.wrapping_mul(0x27d4_eb2d);
    hash ^= hash >> 15;
    hash = hash.wrapping_mul(0x45d9_f3b);
    hash ^= hash >> 16;
    (hash >> 8) as f32 / (1u32 << 24) as f32
}

/// Edge length of the blue noise tile.
pub const BLUE_NOISE_SIZE: usize = 64;

const SIGMA: f32 = 1.5;
const INITIAL_DENSITY: usize = 10;
const TILE_SEED: u64 = 0x5eed_b10e;

/// Blue noise threshold at `(x, y)`, tiling a 64x64 void-and-cluster
/// rank map. Values are `rank / 4096`.
#[inline]
pub(crate) fn blue_noise(x: u32, y: u32) -> f32 {
    let tile = blue_noise_tile();
    let idx = (y as usize % BLUE_NOISE_SIZE) * BLUE_NOISE_SIZE + x as usize % BLUE_NOISE_SIZE;
    tile[idx] as f32 / (BLUE_NOISE_SIZE * BLUE_NOISE_SIZE) as f32
}

/// Rank map, generated on first use and shared afterwards.
pub(crate) fn blue_noise_tile() -> &'static [u16] {
    static TILE: OnceLock<Vec<u16>> = OnceLock::new();
    TILE.get_or_init(|| void_and_cluster(BLUE_NOISE_SIZE))
}

/// Ulichney's void-and-cluster rank map on a toroidal `size x size` grid.
///
/// 1. Seed a sparse random pattern and relax it by moving the point in
///    the tightest cluster into the largest void until stable.
/// 2. Rank the seed points by repeatedly removing the tightest cluster.
/// 3. Rank every remaining cell by repeatedly filling the largest void.
///
/// Filling voids by minimum minority energy past the half-way point is
/// equivalent to removing majority clusters, so step 3 needs no inversion.
fn void_and_cluster(size: usize) -> Vec<u16> {
    let total = size * size;
    let kernel = gaussian_table(size);
    let mut field = EnergyField::new(size, &kernel);

    let mut rng = StdRng::seed_from_u64(TILE_SEED);
    let initial = total / INITIAL_DENSITY;
    while field.count < initial {
        let idx = rng.gen_range(0..total);
        if !field.on[idx] {
            field.toggle(idx);
        }
    }

    // Relax the initial pattern
    for _ in 0..total {
        let cluster = field.tightest_cluster();
        field.toggle(cluster);
        let void = field.largest_void();
        field.toggle(void);
        if void == cluster {
            break;
        }
    }
    let seed_pattern = field.clone();

    let mut rank = vec![0u16; total];
    while field.count > 0 {
        let cluster = field.tightest_cluster();
        field.toggle(cluster);
        rank[cluster] = field.count as u16;
    }

    let mut field = seed_pattern;
    while field.count < total {
        let void = field.largest_void();
        rank[void] = field.count as u16;
        field.toggle(void);
    }
    rank
}

/// Toroidal Gaussian weights indexed by `dy * size + dx`.
fn gaussian_table(size: usize) -> Vec<f32> {
    let mut table = vec![0.0; size * size];
    let denom = 2.0 * SIGMA * SIGMA;
    for dy in 0..size {
        for dx in 0..size {
            let wx = dx.min(size - dx) as f32;
            let wy = dy.min(size - dy) as f32;
            table[dy * size + dx] = (-(wx * wx + wy * wy) / denom).exp();
        }
    }
    table
}

#[derive(Clone)]
struct EnergyField<'a> {
    size: usize,
    kernel: &'a [f32],
    on: Vec<bool>,
    energy: Vec<f32>,
    count: usize,
}

impl<'a> EnergyField<'a> {
    fn new(size: usize, kernel: &'a [f32]) -> Self {
        Self {
            size,
            kernel,
            on: vec![false; size * size],
            energy: vec![0.0; size * size],
            count: 0,
        }
    }

    fn toggle(&mut self, idx: usize) {
        let sign = if self.on[idx] { -1.0 } else { 1.0 };
        self.on[idx] = !self.on[idx];
        if self.on[idx] {
            self.count += 1;
        } else {
            self.count -= 1;
        }
        let (px, py) = (idx % self.size, idx / self.size);
        for y in 0..self.size {
            let dy = (y + self.size - py) % self.size;
            for x in 0..self.size {
                let dx = (x + self.size - px) % self.size;
                self.energy[y * self.size + x] += sign * self.kernel[dy * self.size + dx];
            }
        }
    }

    /// Set cell with the highest energy (first on ties).
    fn tightest_cluster(&self) -> usize {
        let mut best = (f32::NEG_INFINITY, 0);
        for (i, &e) in self.energy.iter().enumerate() {
            if self.on[i] && e > best.0 {
                best = (e, i);
            }
        }
        best.1
    }

    /// Unset cell with the lowest energy (first on ties).
    fn largest_void(&self) -> usize {
        let mut best = (f32::INFINITY, 0);
        for (i, &e) in self.energy.iter().enumerate() {
            if !self.on[i] && e < best.0 {
                best = (e, i);
            }
        }
        best.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blue_noise_tile_is_permutation() {
        let mut ranks = blue_noise_tile().to_vec();
        ranks.sort_unstable();
        let expected: Vec<u16> = (0..(BLUE_NOISE_SIZE * BLUE_NOISE_SIZE) as u16).collect();
        assert_eq!(ranks, expected);
    }

    #[test]
    fn test_blue_noise_low_ranks_are_spread_out() {
        // The first 1/16 of the ranks should not touch each other: blue noise
        // spaces minority points roughly evenly
        let tile = blue_noise_tile();
        let limit = (BLUE_NOISE_SIZE * BLUE_NOISE_SIZE / 16) as u16;
        let mut adjacent = 0;
        for y in 0..BLUE_NOISE_SIZE {
            for x in 0..BLUE_NOISE_SIZE {
                if tile[y * BLUE_NOISE_SIZE + x] >= limit {
                    continue;
                }
                let right = tile[y * BLUE_NOISE_SIZE + (x + 1) % BLUE_NOISE_SIZE];
                let below = tile[((y + 1) % BLUE_NOISE_SIZE) * BLUE_NOISE_SIZE + x];
                if right < limit || below < limit {
                    adjacent += 1;
                }
            }
        }
        assert_eq!(adjacent, 0, "{adjacent} adjacent low-rank pairs");
    }

    #[test]
    fn test_white_noise_is_deterministic_and_bounded() {
        for (x, y) in [(0, 0), (17, 3), (4095, 9999)] {
            let v = white_noise(x, y);
            assert_eq!(v, white_noise(x, y));
            assert!((0.0..1.0).contains(&v));
        }
        assert_ne!(white_noise(1, 0), white_noise(0, 1));
    }

    #[test]
    fn test_seeded_rng_repeats() {
        let mut a = rng(Some(42));
        let mut b = rng(Some(42));
        for _ in 0..8 {
            assert_eq!(random_threshold(&mut a), random_threshold(&mut b));
        }
    }
}
