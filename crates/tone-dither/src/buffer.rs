//! Interleaved RGBA pixel buffer.
//!
//! [`PixelBuffer`] is the unit every stage of the pipeline consumes and
//! produces. Its byte length is always `width * height * 4`; no stage in
//! this crate changes a buffer's dimensions.

use crate::color::Color;
use crate::error::{DitherError, Result};

/// An RGBA image with interleaved 8-bit channels, row-major.
///
/// # Example
///
/// ```
/// use tone_dither::{Color, PixelBuffer};
///
/// let mut buf = PixelBuffer::filled(2, 2, Color::BLACK).unwrap();
/// buf.set_pixel(1, 0, Color::WHITE);
///
/// assert_eq!(buf.pixel(1, 0), Color::WHITE);
/// assert_eq!(buf.data().len(), 2 * 2 * 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap existing RGBA bytes.
    ///
    /// # Errors
    ///
    /// [`DitherError::Configuration`] if either dimension is zero or
    /// `data.len() != width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(DitherError::config(format!(
                "{width}x{height} RGBA buffer needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a buffer with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self> {
        check_dimensions(width, height)?;
        let data = [color.r, color.g, color.b, color.a].repeat(width as usize * height as usize);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Color) -> Result<Self> {
        check_dimensions(width, height)?;
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                let c = f(x, y);
                data.extend_from_slice(&[c.r, c.g, c.b, c.a]);
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw RGBA bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw RGBA bytes. The length cannot be changed through this slice.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer, returning its bytes.
    #[inline]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Read the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let i = self.offset(x, y);
        Color::new(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        )
    }

    /// Write the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
    }

    /// Iterate over pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Color> + '_ {
        self.data
            .chunks_exact(4)
            .map(|p| Color::new(p[0], p[1], p[2], p[3]))
    }

    /// Fail with [`DitherError::DimensionMismatch`] unless `other` has the
    /// same dimensions as `self`.
    pub fn ensure_same_dimensions(&self, other: &PixelBuffer) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(DitherError::DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            });
        }
        Ok(())
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{}",
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * 4
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(DitherError::config(format!(
            "buffer dimensions must be positive, got {width}x{height}"
        )));
    }
    Ok(())
}
