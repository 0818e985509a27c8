//! Color space conversion: RGB pixel grids to 8-bit HSV.
//!
//! HSV channels are stable axes for distribution comparison: hue survives
//! brightness shifts, value survives recoloring. Ranges follow the common
//! 8-bit convention: H in `[0, 180)`, S and V in `[0, 256)`.

use thiserror::Error;

use crate::decode::PixelGrid;

/// Errors produced by the RGB-to-HSV transform.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("expected a 3-channel pixel grid, got {0} channels")]
    ChannelCount(u8),
    #[error("pixel buffer of {len} bytes does not match {width}x{height}x{channels}")]
    BufferShape {
        len: usize,
        width: u32,
        height: u32,
        channels: u8,
    },
}

/// A pixel grid converted to 8-bit HSV, interleaved row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HsvImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl HsvImage {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Interleaved `[h, s, v]` triples.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Convert a decoded RGB grid into HSV. Pure transform, no side effects.
pub fn to_hsv(src: &PixelGrid) -> Result<HsvImage, ConvertError> {
    if src.channels != 3 {
        return Err(ConvertError::ChannelCount(src.channels));
    }
    let expected = src.pixel_count() * 3;
    if src.data.len() != expected {
        return Err(ConvertError::BufferShape {
            len: src.data.len(),
            width: src.width,
            height: src.height,
            channels: src.channels,
        });
    }

    let mut data = Vec::with_capacity(expected);
    for rgb in src.data.chunks_exact(3) {
        let [h, s, v] = rgb_to_hsv8(rgb[0], rgb[1], rgb[2]);
        data.extend_from_slice(&[h, s, v]);
    }

    Ok(HsvImage {
        width: src.width,
        height: src.height,
        data,
    })
}

/// One RGB pixel to 8-bit HSV: H in `[0, 180)` (degrees halved), S and V in
/// `[0, 256)`. Achromatic pixels get hue 0.
fn rgb_to_hsv8(r: u8, g: u8, b: u8) -> [u8; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let v = max;
    let delta = (max - min) as f32;

    let s = if max == 0 {
        0
    } else {
        (255.0 * delta / max as f32).round() as u8
    };

    let h = if delta == 0.0 {
        0u8
    } else {
        let (rf, gf, bf) = (r as f32, g as f32, b as f32);
        let mut deg = if max == r {
            60.0 * (gf - bf) / delta
        } else if max == g {
            120.0 + 60.0 * (bf - rf) / delta
        } else {
            240.0 + 60.0 * (rf - gf) / delta
        };
        if deg < 0.0 {
            deg += 360.0;
        }
        // Halved to fit 8 bits; 360 wraps back to 0.
        (deg / 2.0).round() as u16 as u8 % 180
    };

    [h, s, v]
}
