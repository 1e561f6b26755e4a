//! Kernel-driven error diffusion.

use super::kernel::Kernel;
use super::noise;
use super::settings::DitheringSettings;
use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::palette::Palette;

/// How far accumulated error may push a channel outside 0..=255.
const HEADROOM: f32 = 128.0;

/// Sliding window of error rows.
///
/// Only the rows the kernel can reach (`max_dy + 1`) are stored; the
/// window advances one row at a time, so the accumulator lives only as
/// long as a single [`diffuse`] call.
#[derive(Debug)]
pub(crate) struct ErrorBuffer {
    /// `rows[0]` is the current row, `rows[1]` the next, and so on.
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    pub(crate) fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    #[inline]
    pub(crate) fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error to a pixel `row_offset` rows below the current one.
    /// Out-of-bounds targets are ignored.
    #[inline]
    pub(crate) fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            for c in 0..3 {
                self.rows[row_offset][x][c] += error[c];
            }
        }
    }

    /// Drop the current row and append a zeroed one.
    pub(crate) fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}

/// Error-diffuse `buffer` onto `palette` with `kernel`.
///
/// Per pixel: add accumulated error, find the nearest palette entry (after
/// adding signed noise of amplitude `random_noise * 255` when enabled),
/// then spread `(value - chosen) * error_attenuation` to the kernel's
/// neighbours. On reversed serpentine rows the kernel is mirrored.
/// Contributions that fall outside the image are dropped.
pub(crate) fn diffuse(buffer: &PixelBuffer, palette: &Palette, kernel: &Kernel, settings: &DitheringSettings) -> PixelBuffer {
    let width = buffer.width() as usize;
    let height = buffer.height() as usize;
    let src = buffer.data();
    let mut out = buffer.clone();

    let mut rng = (settings.random_noise > 0.0).then(|| noise::rng(settings.seed));
    let noise_amp = settings.random_noise * 255.0;
    let divisor = kernel.divisor as f32;

    let mut error_buf = ErrorBuffer::new(width, kernel.max_dy + 1);

    for y in 0..height {
        let reverse = settings.serpentine && y % 2 == 1;

        for i in 0..width {
            let x = if reverse { width - 1 - i } else { i };
            let offset = (y * width + x) * 4;

            let accumulated = error_buf.get_accumulated(x);
            let mut value = [0.0f32; 3];
            for c in 0..3 {
                value[c] = (src[offset + c] as f32 + accumulated[c]).clamp(-HEADROOM, 255.0 + HEADROOM);
            }

            let nearest_idx = match rng.as_mut() {
                Some(rng) => {
                    let n = (noise::random_threshold(rng) - 0.5) * noise_amp;
                    palette.find_nearest_f32([value[0] + n, value[1] + n, value[2] + n])
                }
                None => palette.find_nearest_f32(value),
            };
            let chosen = palette.color(nearest_idx);
            out.set_pixel(x as u32, y as u32, Color::new(chosen.r, chosen.g, chosen.b, src[offset + 3]));

            let chosen = chosen.to_f32();
            let mut error = [0.0f32; 3];
            for c in 0..3 {
                error[c] = (value[c] - chosen[c]) * settings.error_attenuation;
            }
            if error == [0.0; 3] {
                continue;
            }

            for &(dx, dy, weight) in kernel.entries {
                let effective_dx = if reverse { -dx } else { dx };
                let nx = x as i32 + effective_dx;
                if nx < 0 || nx as usize >= width || y + dy as usize >= height {
                    continue;
                }
                let w = weight as f32 / divisor;
                error_buf.add_error(nx as usize, dy as usize, [error[0] * w, error[1] * w, error[2] * w]);
            }
        }

        error_buf.advance_row();
    }

    out
}
