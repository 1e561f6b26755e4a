//! Median-cut extraction.

use super::mean_color;

struct Bucket {
    pixels: Vec<[u8; 3]>,
    /// Channel with the widest range and that range.
    channel: usize,
    range: u8,
}

impl Bucket {
    fn new(pixels: Vec<[u8; 3]>) -> Self {
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];
        for px in &pixels {
            for c in 0..3 {
                min[c] = min[c].min(px[c]);
                max[c] = max[c].max(px[c]);
            }
        }
        let (channel, range) = (0..3)
            .map(|c| (c, max[c].saturating_sub(min[c])))
            .fold((0, 0), |best, cur| if cur.1 > best.1 { cur } else { best });
        Self { pixels, channel, range }
    }

    /// Split at the median of the widest channel.
    fn split(mut self) -> (Bucket, Bucket) {
        let channel = self.channel;
        self.pixels.sort_by_key(|px| px[channel]);
        let upper = self.pixels.split_off(self.pixels.len() / 2);
        (Bucket::new(self.pixels), Bucket::new(upper))
    }

    fn mean(&self) -> [u8; 3] {
        let mut sum = [0u64; 3];
        for px in &self.pixels {
            for c in 0..3 {
                sum[c] += px[c] as u64;
            }
        }
        mean_color(sum, self.pixels.len() as u64)
    }
}

/// Split the widest bucket (ties: most populous, then earliest) until
/// `target` buckets exist or no bucket holds two pixels.
pub(super) fn median_cut(pixels: Vec<[u8; 3]>, target: usize) -> Vec<[u8; 3]> {
    let mut buckets = vec![Bucket::new(pixels)];
    while buckets.len() < target {
        let pick = buckets
            .iter()
            .enumerate()
            .filter(|(_, b)| b.pixels.len() >= 2)
            .fold(None::<(usize, &Bucket)>, |best, (i, b)| match best {
                Some((_, cur)) if (cur.range, cur.pixels.len()) >= (b.range, b.pixels.len()) => best,
                _ => Some((i, b)),
            })
            .map(|(i, _)| i);
        let Some(idx) = pick else { break };
        let (lower, upper) = buckets.swap_remove(idx).split();
        buckets.push(lower);
        buckets.push(upper);
    }
    buckets.iter().map(Bucket::mean).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_splits_into_identical_buckets() {
        let colors = median_cut(vec![[128, 128, 128]; 64], 4);
        assert_eq!(colors, vec![[128, 128, 128]; 4]);
    }

    #[test]
    fn test_non_power_of_two_target() {
        let pixels: Vec<[u8; 3]> = (0..=255).map(|v| [v as u8, 0, 0]).collect();
        assert_eq!(median_cut(pixels, 3).len(), 3);
    }

    #[test]
    fn test_stops_when_pixels_run_out() {
        let colors = median_cut(vec![[1, 2, 3], [200, 100, 0]], 16);
        assert_eq!(colors.len(), 2);
    }

    #[test]
    fn test_splits_widest_channel() {
        // Blue spans 0..=200, red only 0..=10
        let pixels = vec![[0, 0, 0], [10, 0, 0], [0, 0, 200], [10, 0, 200]];
        let mut colors = median_cut(pixels, 2);
        colors.sort();
        assert_eq!(colors, vec![[5, 0, 0], [5, 0, 200]]);
    }
}
