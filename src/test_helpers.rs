//! Shared test utilities for the imgpipe test suite.
//!
//! Builds synthetic pixel buffers and encoded images in memory, so no test
//! depends on fixture files.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let img = dark_corner(6, 4);              // white, black pixel at (0, 0)
//! let jpeg = jpeg_with_orientation(6, 4, 6); // JPEG tagged "rotate 90° cw"
//! ```

use crate::imaging::{Codec, Format, RustCodec, SaveOptions};
use image::{Rgba, RgbaImage};

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

// =========================================================================
// Pixel buffers
// =========================================================================

pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

/// White image with a single black pixel in the top-left corner.
pub fn dark_corner(width: u32, height: u32) -> RgbaImage {
    let mut img = solid(width, height, WHITE);
    img.put_pixel(0, 0, BLACK);
    img
}

/// Alternating black and white pixels, white at (0, 0).
pub fn checkerboard(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 { WHITE } else { BLACK }
    })
}

// =========================================================================
// Encoded buffers
// =========================================================================

fn encoded(pixels: &RgbaImage, format: Format) -> Vec<u8> {
    RustCodec::new()
        .encode(pixels, format, &SaveOptions::default())
        .unwrap()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encoded(&checkerboard(width, height), Format::Png)
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encoded(&solid(width, height, WHITE), Format::Jpeg)
}

/// A JPEG carrying an EXIF APP1 segment with the given Orientation tag.
pub fn jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    let plain = jpeg_bytes(width, height);
    let app1 = exif_orientation_segment(orientation);

    // Insert right after SOI (FF D8)
    let mut out = Vec::with_capacity(plain.len() + app1.len());
    out.extend_from_slice(&plain[..2]);
    out.extend_from_slice(&app1);
    out.extend_from_slice(&plain[2..]);
    out
}

/// APP1 segment: "Exif\0\0" + big-endian TIFF header + one-entry IFD0.
fn exif_orientation_segment(orientation: u16) -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM");
    tiff.extend_from_slice(&42u16.to_be_bytes());
    tiff.extend_from_slice(&8u32.to_be_bytes()); // IFD0 offset
    tiff.extend_from_slice(&1u16.to_be_bytes()); // entry count
    tiff.extend_from_slice(&0x0112u16.to_be_bytes()); // Orientation
    tiff.extend_from_slice(&3u16.to_be_bytes()); // SHORT
    tiff.extend_from_slice(&1u32.to_be_bytes()); // count
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]); // value padding
    tiff.extend_from_slice(&0u32.to_be_bytes()); // no next IFD

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);

    let mut segment = vec![0xFF, 0xE1];
    segment.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    segment.extend_from_slice(&payload);
    segment
}
