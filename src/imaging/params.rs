//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. Each public
//! operation takes exactly one of them, so the set of accepted options is part
//! of the operation's signature rather than an open-ended dictionary.
//!
//! ## Types
//!
//! - [`OpenOptions`]: Decode-time behaviour (auto-orientation).
//! - [`ResizeOptions`]: Bounds, [`Method`] and resampling for resize/crop.
//! - [`Point`] / [`Placement`]: Where a watermark goes.
//! - [`Quality`]: JPEG quality (0–100). Clamped on construction.
//! - [`Compression`]: PNG compression level (0–9). Clamped on construction.
//! - [`SaveOptions`]: Target format plus the per-format encoder knobs.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Options for opening (decoding) an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    /// Apply orientation correction right after decode. Failures here are
    /// ignored and the un-rotated image is returned.
    pub auto_orient: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self { auto_orient: true }
    }
}

/// How a resize treats a request whose aspect ratio differs from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Keep the whole source; output fits inside the requested bounds.
    #[default]
    Fit,
    /// Output matches the requested bounds; source is centre-cropped first.
    Crop,
}

impl FromStr for Method {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fit" => Ok(Method::Fit),
            "crop" => Ok(Method::Crop),
            other => Err(format!("unknown resize method '{other}', expected fit or crop")),
        }
    }
}

/// Options for resize and crop.
///
/// A bound of `0` is treated as absent. At least one bound must remain or the
/// operation fails with [`Error::DimensionsRequired`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub method: Method,
    /// Interpolated resampling (`true`) or a nearest-neighbour copy.
    pub resample: bool,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            method: Method::Fit,
            resample: true,
        }
    }
}

impl ResizeOptions {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }

    pub fn height(height: u32) -> Self {
        Self {
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn with_method(self, method: Method) -> Self {
        Self { method, ..self }
    }

    pub fn with_resample(self, resample: bool) -> Self {
        Self { resample, ..self }
    }

    /// Bounds with zeros dropped, or `DimensionsRequired` if none is left.
    pub fn bounds(&self) -> Result<(Option<u32>, Option<u32>)> {
        let width = self.width.filter(|&w| w > 0);
        let height = self.height.filter(|&h| h > 0);
        if width.is_none() && height.is_none() {
            return Err(Error::DimensionsRequired);
        }
        Ok((width, height))
    }
}

/// Parses `WxH`, `Wx` or `xH` (e.g. `800x600`, `800x`, `x600`).
impl FromStr for ResizeOptions {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let (w, h) = value
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WxH, got '{value}'"))?;
        let parse = |s: &str| -> std::result::Result<Option<u32>, String> {
            if s.is_empty() {
                Ok(None)
            } else {
                s.parse()
                    .map(Some)
                    .map_err(|_| format!("invalid dimension '{s}' in '{value}'"))
            }
        };
        let options = ResizeOptions {
            width: parse(w)?,
            height: parse(h)?,
            ..ResizeOptions::default()
        };
        options.bounds().map_err(|e| e.to_string())?;
        Ok(options)
    }
}

/// A fractional position on the free area of the base image.
///
/// `x = 0` puts the watermark flush left, `x = 1` flush right; same for `y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Default for Point {
    fn default() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Parses `x,y`.
impl FromStr for Point {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let (x, y) = value
            .split_once(',')
            .ok_or_else(|| format!("expected x,y, got '{value}'"))?;
        let parse = |s: &str| {
            s.trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid coordinate '{s}' in '{value}'"))
        };
        Ok(Point::new(parse(x)?, parse(y)?))
    }
}

/// Where a watermark is placed.
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    /// A fixed point.
    At(Point),
    /// The candidate whose covered region contrasts most with the watermark.
    /// Ties go to the earliest candidate; an empty list means the centre.
    BestOf(Vec<Point>),
}

impl Default for Placement {
    fn default() -> Self {
        Placement::At(Point::default())
    }
}

impl From<Point> for Placement {
    fn from(point: Point) -> Self {
        Placement::At(point)
    }
}

impl From<Vec<Point>> for Placement {
    fn from(points: Vec<Point>) -> Self {
        Placement::BestOf(points)
    }
}

/// Parses `x,y` as a fixed point and `x,y;x,y;...` as a candidate list.
impl FromStr for Placement {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        if value.contains(';') {
            let points = value
                .split(';')
                .filter(|s| !s.trim().is_empty())
                .map(str::parse)
                .collect::<std::result::Result<Vec<Point>, _>>()?;
            Ok(Placement::BestOf(points))
        } else {
            Ok(Placement::At(value.parse()?))
        }
    }
}

/// JPEG quality (1–100). Higher is larger and less compressed; `0` leaves
/// it to the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// PNG compression level (1–9). Higher costs more CPU for smaller output;
/// `0` leaves it to the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compression(pub u8);

impl Compression {
    pub fn new(value: u8) -> Self {
        Self(value.min(9))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Options for saving (encoding) an image.
///
/// `format` is a case-insensitive label; it is resolved against the format
/// registry at save time. Unset encoder knobs, and a quality or compression
/// of `0`, mean "codec default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOptions {
    pub format: Option<String>,
    pub quality: Option<Quality>,
    pub compression: Option<Compression>,
}

impl SaveOptions {
    pub fn format(label: impl Into<String>) -> Self {
        Self {
            format: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn with_quality(self, quality: u8) -> Self {
        Self {
            quality: Some(Quality::new(quality)),
            ..self
        }
    }

    pub fn with_compression(self, compression: u8) -> Self {
        Self {
            compression: Some(Compression::new(compression)),
            ..self
        }
    }

    /// Overlay the fields set in `other` on top of `self`.
    pub fn merge(&mut self, other: SaveOptions) {
        if other.format.is_some() {
            self.format = other.format;
        }
        if other.quality.is_some() {
            self.quality = other.quality;
        }
        if other.compression.is_some() {
            self.compression = other.compression;
        }
    }
}
