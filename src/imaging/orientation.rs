//! Orientation correction from the EXIF Orientation tag.
//!
//! | Tag | Meaning | Correction |
//! |---|---|---|
//! | 1 | upright | none |
//! | 3 | upside down | rotate 180° |
//! | 6 | rotated 90° counter-clockwise | rotate 90° clockwise |
//! | 8 | rotated 90° clockwise | rotate 270° clockwise |
//! | 2, 4, 5, 7 | mirrored variants | [`Error::UnsupportedOrientation`] |
//!
//! Mirrored orientations would need a flip on top of the rotation. They are
//! rejected rather than half-corrected.

use crate::error::{Error, Result};
use image::{RgbaImage, imageops};

/// Clockwise rotation needed to bring an image upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    /// Map an orientation tag value to the rotation that corrects it.
    pub fn for_tag(tag: u16) -> Result<Rotation> {
        match tag {
            1 => Ok(Rotation::None),
            3 => Ok(Rotation::Cw180),
            6 => Ok(Rotation::Cw90),
            8 => Ok(Rotation::Cw270),
            other => Err(Error::UnsupportedOrientation(other)),
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Cw90 => 90,
            Rotation::Cw180 => 180,
            Rotation::Cw270 => 270,
        }
    }

    /// Whether the output has width and height swapped.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Cw90 | Rotation::Cw270)
    }
}

/// Rotate `pixels` into a newly allocated buffer. The source is untouched.
pub fn rotate(pixels: &RgbaImage, rotation: Rotation) -> RgbaImage {
    match rotation {
        Rotation::None => pixels.clone(),
        Rotation::Cw90 => imageops::rotate90(pixels),
        Rotation::Cw180 => imageops::rotate180(pixels),
        Rotation::Cw270 => imageops::rotate270(pixels),
    }
}
