//! Clustered-dot halftone screen.
//!
//! The image plane is rotated by the screen angle and cut into square
//! cells. Each cell's mean luminance sets the dot size so that the dot's
//! area fraction equals the cell's darkness; pixels inside the dot take the
//! darkest palette entry and the rest the lightest.

use std::collections::HashMap;

use super::settings::{HalftoneSettings, HalftoneShape};
use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::palette::Palette;

/// Darkness below this is drawn without a dot, above `1 - EPS` as solid.
const EPS: f32 = 1e-4;

struct Screen {
    cell: f32,
    cos: f32,
    sin: f32,
}

impl Screen {
    fn new(settings: &HalftoneSettings) -> Self {
        let theta = settings.angle.to_radians();
        Self {
            cell: settings.cell_size as f32,
            cos: theta.cos(),
            sin: theta.sin(),
        }
    }

    /// Cell coordinates and offset from the cell center, in screen space.
    fn locate(&self, x: u32, y: u32) -> ((i64, i64), f32, f32) {
        let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
        let u = px * self.cos + py * self.sin;
        let v = -px * self.sin + py * self.cos;
        let cu = (u / self.cell).floor();
        let cv = (v / self.cell).floor();
        let du = u - (cu + 0.5) * self.cell;
        let dv = v - (cv + 0.5) * self.cell;
        ((cu as i64, cv as i64), du, dv)
    }
}

pub(crate) fn halftone(buffer: &PixelBuffer, palette: &Palette, settings: &HalftoneSettings) -> PixelBuffer {
    let screen = Screen::new(settings);
    let (width, height) = buffer.dimensions();

    let mut cells: HashMap<(i64, i64), (f32, u32)> = HashMap::new();
    for y in 0..height {
        for x in 0..width {
            let (cell, _, _) = screen.locate(x, y);
            let entry = cells.entry(cell).or_insert((0.0, 0));
            entry.0 += buffer.pixel(x, y).luminance() / 255.0;
            entry.1 += 1;
        }
    }

    let dark = palette.color(palette.darkest());
    let light = palette.color(palette.lightest());
    let mut out = buffer.clone();
    for y in 0..height {
        for x in 0..width {
            let (cell, du, dv) = screen.locate(x, y);
            let darkness = cells.get(&cell).map_or(0.0, |&(sum, n)| 1.0 - sum / n as f32);
            let inside = if darkness <= EPS {
                false
            } else if darkness >= 1.0 - EPS {
                true
            } else {
                match settings.shape {
                    HalftoneShape::Circle => {
                        let r = screen.cell * (darkness / std::f32::consts::PI).sqrt();
                        du * du + dv * dv <= r * r
                    }
                    HalftoneShape::Diamond => du.abs() + dv.abs() <= screen.cell * (darkness / 2.0).sqrt(),
                }
            };
            let c = if inside { dark } else { light };
            let a = buffer.pixel(x, y).a;
            out.set_pixel(x, y, Color::new(c.r, c.g, c.b, a));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(cell_size: u32, angle: f32, shape: HalftoneShape) -> HalftoneSettings {
        HalftoneSettings { cell_size, angle, shape }
    }

    fn dark_fraction(out: &PixelBuffer) -> f32 {
        out.pixels().filter(|c| *c == Color::BLACK).count() as f32 / out.pixel_count() as f32
    }

    #[test]
    fn test_extremes_are_solid() {
        let palette = Palette::black_white();
        for shape in [HalftoneShape::Circle, HalftoneShape::Diamond] {
            let black = PixelBuffer::filled(12, 12, Color::BLACK).unwrap();
            let white = PixelBuffer::filled(12, 12, Color::WHITE).unwrap();
            assert_eq!(halftone(&black, &palette, &settings(6, 30.0, shape)), black);
            assert_eq!(halftone(&white, &palette, &settings(6, 30.0, shape)), white);
        }
    }

    #[test]
    fn test_mid_grey_covers_about_half() {
        let palette = Palette::black_white();
        let grey = PixelBuffer::filled(64, 64, Color::grey(128)).unwrap();
        for shape in [HalftoneShape::Circle, HalftoneShape::Diamond] {
            let out = halftone(&grey, &palette, &settings(8, 0.0, shape));
            let f = dark_fraction(&out);
            assert!((f - 0.5).abs() < 0.15, "{shape:?}: dark fraction {f}");
        }
    }

    #[test]
    fn test_dot_grows_with_darkness() {
        let palette = Palette::black_white();
        let light = PixelBuffer::filled(48, 48, Color::grey(200)).unwrap();
        let dark = PixelBuffer::filled(48, 48, Color::grey(60)).unwrap();
        let s = settings(8, 45.0, HalftoneShape::Circle);
        assert!(dark_fraction(&halftone(&dark, &palette, &s)) > dark_fraction(&halftone(&light, &palette, &s)));
    }

    #[test]
    fn test_unrotated_dot_is_centered_in_cell() {
        let palette = Palette::black_white();
        let grey = PixelBuffer::filled(8, 8, Color::grey(128)).unwrap();
        let out = halftone(&grey, &palette, &settings(8, 0.0, HalftoneShape::Circle));
        assert_eq!(out.pixel(3, 4), Color::BLACK);
        assert_eq!(out.pixel(0, 0), Color::WHITE);
    }
}
