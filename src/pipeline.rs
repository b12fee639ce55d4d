//! # Image rendering pipeline
//!
//! Moves RGBA pixel buffers in and out of encoded images. The codec uses a
//! [`PixelPipeline`] to render a buffer after hiding and to decode the result
//! again, so that any pixel change made by the encoder is caught before the
//! image is handed out.

use std::io::Cursor;
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};

use crate::constants::CHANNELS_PER_PIXEL;
use crate::error::{Error, Result};

/// An RGBA8 pixel buffer with its dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbaFrame {
    /// Wraps a row-major RGBA buffer, checking it matches the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS_PER_PIXEL;
        if pixels.len() != expected {
            return Err(Error::Image(format!(
                "{width}x{height} frame needs {expected} channels, got {}",
                pixels.len()
            )));
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Loads any supported image file and converts it to RGBA8.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(image::open(path)?.to_rgba8().into())
    }
}

impl From<RgbaImage> for RgbaFrame {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.into_raw(),
        }
    }
}

/// Encodes pixel buffers into images and decodes them back.
pub trait PixelPipeline {
    fn render(&self, frame: &RgbaFrame) -> Result<Vec<u8>>;

    fn decode(&self, encoded: &[u8]) -> Result<RgbaFrame>;
}

/// Lossless PNG rendering.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngPipeline;

impl PixelPipeline for PngPipeline {
    fn render(&self, frame: &RgbaFrame) -> Result<Vec<u8>> {
        let mut encoded = Vec::new();
        PngEncoder::new(&mut encoded).write_image(
            &frame.pixels,
            frame.width,
            frame.height,
            ExtendedColorType::Rgba8,
        )?;

        Ok(encoded)
    }

    fn decode(&self, encoded: &[u8]) -> Result<RgbaFrame> {
        let image = image::load(Cursor::new(encoded), ImageFormat::Png)?;
        Ok(image.to_rgba8().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_roundtrip_is_exact() {
        let pixels: Vec<u8> = (0..5 * 3 * 4).map(|i| (i * 53 % 256) as u8).collect();
        let frame = RgbaFrame::new(5, 3, pixels).unwrap();

        let encoded = PngPipeline.render(&frame).unwrap();
        assert_eq!(PngPipeline.decode(&encoded).unwrap(), frame);
    }

    #[test]
    fn test_frame_size_checked() {
        assert!(matches!(
            RgbaFrame::new(2, 2, vec![0; 15]),
            Err(Error::Image(_))
        ));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            PngPipeline.decode(b"not a png"),
            Err(Error::Image(_))
        ));
    }
}
