//! Raster decoding collaborator.
//!
//! The engine never parses image bytes itself; it goes through an
//! [`ImageDecoder`], so tests can substitute fixed pixel grids and the codec
//! set stays swappable. The default [`RasterDecoder`] wraps the `image`
//! crate and forces three-channel RGB output, so every source layout
//! reaches the HSV converter in the same shape.

use thiserror::Error;

/// Errors produced while turning raw bytes into a pixel grid.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("bytes are not a decodable raster image: {0}")]
    Undecodable(String),
    #[error("decoded image has zero pixels")]
    EmptyImage,
}

/// A decoded pixel grid in its source channel layout, interleaved row-major.
///
/// `data.len()` is always `width * height * channels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub data: Vec<u8>,
}

impl PixelGrid {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Decodes raw image bytes into a [`PixelGrid`].
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<PixelGrid, DecodeError>;
}

/// Default decoder backed by the `image` crate (png/jpeg/webp).
///
/// Always yields a three-channel RGB grid; alpha is dropped and grayscale
/// is expanded.
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterDecoder;

impl ImageDecoder for RasterDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<PixelGrid, DecodeError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| DecodeError::Undecodable(e.to_string()))?;
        let rgb = img.to_rgb8();
        if rgb.width() == 0 || rgb.height() == 0 {
            return Err(DecodeError::EmptyImage);
        }
        Ok(PixelGrid {
            width: rgb.width(),
            height: rgb.height(),
            channels: 3,
            data: rgb.into_raw(),
        })
    }
}
