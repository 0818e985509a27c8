//! Shared fixtures: synthesized PNGs with controllable color content.

// Not every test binary uses every fixture.
#![allow(dead_code)]

use image::{Rgb, RgbImage};
use std::io::Cursor;

/// Encode an RGB image produced by `f(x, y)` as PNG bytes.
pub fn png_from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb(f(x, y)));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("encode test png");
    buf
}

/// A solid-color PNG.
pub fn solid_png(width: u32, height: u32, px: [u8; 3]) -> Vec<u8> {
    png_from_fn(width, height, |_, _| px)
}

/// A two-tone PNG: the first `split` columns are `left`, the rest `right`.
pub fn two_tone_png(width: u32, height: u32, split: u32, left: [u8; 3], right: [u8; 3]) -> Vec<u8> {
    png_from_fn(width, height, |x, _| if x < split { left } else { right })
}
