//! Threshold matrices for ordered dithering.

/// An `N x N` threshold matrix with values in `[0, 1)`, tiled over the image.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdMatrix {
    size: usize,
    values: Vec<f32>,
}

impl ThresholdMatrix {
    /// Recursive Bayer index matrix of the given size (a power of two),
    /// normalized as `index / size²`.
    ///
    /// ```text
    /// M(2n) = | 4M     4M + 2 |
    ///         | 4M + 3 4M + 1 |
    /// ```
    pub fn bayer(size: usize) -> Self {
        debug_assert!(size.is_power_of_two());
        let mut m = vec![0u32];
        let mut n = 1;
        while n < size {
            let next_n = n * 2;
            let mut next = vec![0u32; next_n * next_n];
            for y in 0..n {
                for x in 0..n {
                    let v = 4 * m[y * n + x];
                    next[y * next_n + x] = v;
                    next[y * next_n + x + n] = v + 2;
                    next[(y + n) * next_n + x] = v + 3;
                    next[(y + n) * next_n + x + n] = v + 1;
                }
            }
            m = next;
            n = next_n;
        }
        let scale = (size * size) as f32;
        Self {
            size,
            values: m.into_iter().map(|v| v as f32 / scale).collect(),
        }
    }

    /// The classic dispersed 3x3 ordering.
    pub fn ordered_3x3() -> Self {
        const INDEX: [u32; 9] = [0, 7, 3, 6, 5, 2, 4, 1, 8];
        Self {
            size: 3,
            values: INDEX.iter().map(|&v| v as f32 / 9.0).collect(),
        }
    }

    /// Two-level checkerboard.
    pub fn simple_2x2() -> Self {
        Self {
            size: 2,
            values: vec![0.25, 0.75, 0.75, 0.25],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Threshold at image coordinate `(x, y)`, tiling the matrix.
    #[inline]
    pub fn at(&self, x: u32, y: u32) -> f32 {
        let col = x as usize % self.size;
        let row = y as usize % self.size;
        self.values[row * self.size + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bayer_2x2() {
        let m = ThresholdMatrix::bayer(2);
        assert_eq!(m.values, vec![0.0, 0.5, 0.75, 0.25]);
    }

    #[test]
    fn test_bayer_is_permutation() {
        for size in [2usize, 4, 8, 16] {
            let m = ThresholdMatrix::bayer(size);
            let mut idx: Vec<u32> = m.values.iter().map(|v| (v * (size * size) as f32).round() as u32).collect();
            idx.sort_unstable();
            let expected: Vec<u32> = (0..(size * size) as u32).collect();
            assert_eq!(idx, expected, "bayer {size}");
        }
    }

    #[test]
    fn test_values_in_unit_interval() {
        for m in [ThresholdMatrix::bayer(16), ThresholdMatrix::ordered_3x3(), ThresholdMatrix::simple_2x2()] {
            assert!(m.values.iter().all(|&v| (0.0..1.0).contains(&v)));
        }
    }

    #[test]
    fn test_at_tiles() {
        let m = ThresholdMatrix::ordered_3x3();
        assert_eq!(m.at(0, 0), m.at(3, 6));
        assert_eq!(m.at(1, 0), 7.0 / 9.0);
    }
}
