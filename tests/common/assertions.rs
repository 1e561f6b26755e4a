//! Assertion helpers for tests.

use tone_dither::{Palette, PixelBuffer};

/// Assert every pixel of `buffer` is a color of `palette`.
pub fn assert_palette_only(buffer: &PixelBuffer, palette: &Palette) {
    for (i, color) in buffer.pixels().enumerate() {
        assert!(
            palette.colors().iter().any(|c| c.r == color.r && c.g == color.g && c.b == color.b),
            "Pixel {i} ({color}) is not in palette {}",
            palette.name()
        );
    }
}

/// Assert `bytes` start with the PNG signature.
pub fn assert_png(bytes: &[u8]) {
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "Expected PNG, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}
