//! PNG decode/encode for pixel buffers.
//!
//! Every supported PNG layout is expanded to 8-bit RGBA on decode. Output is
//! always 8-bit RGBA.

use std::io::Cursor;
use std::path::Path;

use tone_dither::PixelBuffer;

use crate::error::RenderError;

/// Decode PNG bytes into an RGBA buffer.
pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, RenderError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    // Palette -> RGB, low bit depths -> 8 bit, tRNS -> alpha; 16 bit -> 8 bit
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| RenderError::PngDecode(e.to_string()))?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| RenderError::PngDecode(e.to_string()))?;
    let data = &buf[..info.buffer_size()];

    if info.bit_depth != png::BitDepth::Eight {
        return Err(RenderError::UnsupportedLayout(format!(
            "bit depth {:?}",
            info.bit_depth
        )));
    }

    let rgba: Vec<u8> = match info.color_type {
        png::ColorType::Rgba => data.to_vec(),
        png::ColorType::Rgb => data
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Grayscale => data.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(RenderError::UnsupportedLayout(
                "indexed color without palette expansion".to_string(),
            ))
        }
    };

    PixelBuffer::new(info.width, info.height, rgba).map_err(RenderError::from)
}

/// Encode a buffer as an 8-bit RGBA PNG.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, RenderError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, buffer.width(), buffer.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(buffer.data())
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

pub fn read_png(path: &Path) -> Result<PixelBuffer, RenderError> {
    let bytes = std::fs::read(path)?;
    let buffer = decode_png(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        width = buffer.width(),
        height = buffer.height(),
        "Decoded PNG"
    );
    Ok(buffer)
}

/// Encode and write, returning the encoded size in bytes.
pub fn write_png(path: &Path, buffer: &PixelBuffer) -> Result<usize, RenderError> {
    let bytes = encode_png(buffer)?;
    std::fs::write(path, &bytes)?;
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tone_dither::Color;

    fn encode_raw(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn test_rgba_survives_encode_decode() {
        let buffer = PixelBuffer::from_fn(5, 3, |x, y| Color::new(x as u8 * 40, y as u8 * 80, 7, 200)).unwrap();
        let bytes = encode_png(&buffer).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(decode_png(&bytes).unwrap(), buffer);
    }

    #[test]
    fn test_rgb_decodes_opaque() {
        let bytes = encode_raw(2, 1, png::ColorType::Rgb, &[10, 20, 30, 40, 50, 60]);
        let buffer = decode_png(&bytes).unwrap();
        assert_eq!(buffer.pixel(0, 0), Color::new(10, 20, 30, 255));
        assert_eq!(buffer.pixel(1, 0), Color::new(40, 50, 60, 255));
    }

    #[test]
    fn test_grayscale_expands() {
        let bytes = encode_raw(2, 1, png::ColorType::Grayscale, &[0, 200]);
        let buffer = decode_png(&bytes).unwrap();
        assert_eq!(buffer.pixel(1, 0), Color::grey(200));

        let bytes = encode_raw(1, 1, png::ColorType::GrayscaleAlpha, &[90, 10]);
        assert_eq!(decode_png(&bytes).unwrap().pixel(0, 0), Color::new(90, 90, 90, 10));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(decode_png(b"not a png"), Err(RenderError::PngDecode(_))));
    }
}
