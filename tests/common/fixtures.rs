//! Test fixtures: images and project files written into temp directories.

use std::path::{Path, PathBuf};

use ditherdeck::rendering::write_png;
use tone_dither::{Color, PixelBuffer};

/// Horizontal grey ramp, black to white.
pub fn grey_ramp(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, _| Color::grey((x * 255 / (width - 1)) as u8)).unwrap()
}

/// Four solid quadrants: red, green, blue, white.
pub fn quadrants(size: u32) -> PixelBuffer {
    let half = size / 2;
    PixelBuffer::from_fn(size, size, |x, y| match (x < half, y < half) {
        (true, true) => Color::rgb(220, 20, 20),
        (false, true) => Color::rgb(20, 200, 40),
        (true, false) => Color::rgb(30, 40, 210),
        (false, false) => Color::WHITE,
    })
    .unwrap()
}

pub fn write_image(dir: &Path, name: &str, buffer: &PixelBuffer) -> PathBuf {
    let path = dir.join(name);
    write_png(&path, buffer).unwrap();
    path
}

pub fn write_project(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Switches from ordered to error-diffusion dithering at frame 2 and
/// brightens over frames 0..=3.
pub const ANIMATED_PROJECT: &str = r#"
palette: grayscale-4
color_mode:
  mode: indexed
dithering:
  algorithm: bayer-4x4
animated_dithering:
  keyframes:
    - frame: 0
      settings:
        algorithm: bayer-4x4
    - frame: 2
      settings:
        algorithm: floyd-steinberg
      transition_mode: step
animated_adjustments:
  keyframes:
    - frame: 0
      settings:
        brightness: -40
    - frame: 3
      settings:
        brightness: 40
      easing: ease-in-out
"#;
