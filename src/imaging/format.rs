//! Format registry: signatures, labels and extensions for every format the
//! crate can decode and encode.
//!
//! | Format | Signature | Label | Extensions |
//! |---|---|---|---|
//! | JPEG | `FF D8 FF` | `jpeg` | `.jpg`, `.jpeg` |
//! | PNG | `89 50 4E 47 0D 0A 1A 0A` | `png` | `.png` |
//! | GIF | `GIF` | `gif` | `.gif` |
//!
//! Detection walks [`Format::ALL`] in order and the first matching prefix
//! wins. Adding a format means adding a variant; every `match` below is
//! exhaustive so the compiler points at each table that needs an entry.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Jpeg,
    Png,
    Gif,
}

impl Format {
    /// Registered formats in detection order.
    pub const ALL: [Format; 3] = [Format::Jpeg, Format::Png, Format::Gif];

    /// Leading bytes that identify an encoded buffer of this format.
    pub fn signature(self) -> &'static [u8] {
        match self {
            Format::Jpeg => &[0xFF, 0xD8, 0xFF],
            Format::Png => &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
            Format::Gif => b"GIF",
        }
    }

    /// Canonical lowercase identifier.
    pub fn label(self) -> &'static str {
        match self {
            Format::Jpeg => "jpeg",
            Format::Png => "png",
            Format::Gif => "gif",
        }
    }

    /// Canonical file extension (no dot), substituted for `{ext}` in targets.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Jpeg => "jpg",
            Format::Png => "png",
            Format::Gif => "gif",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Format::Jpeg => "image/jpeg",
            Format::Png => "image/png",
            Format::Gif => "image/gif",
        }
    }

    /// Look up a format by its (case-insensitive) file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Format::Jpeg),
            "png" => Some(Format::Png),
            "gif" => Some(Format::Gif),
            _ => None,
        }
    }

    /// Look up a format by its (case-insensitive) label.
    pub fn from_label(label: &str) -> Option<Format> {
        Format::ALL
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Format::from_label(s).ok_or_else(|| Error::UnknownImageFormat(Some(s.to_string())))
    }
}

/// Identify the format of an encoded buffer from its leading bytes.
pub fn detect(bytes: &[u8]) -> Result<Format> {
    Format::ALL
        .into_iter()
        .find(|f| bytes.starts_with(f.signature()))
        .ok_or(Error::UnknownImageFormat(None))
}

/// Pick the format to encode with.
///
/// First present wins: the explicit `format` option, then the extension of
/// `filename`, then the format the image carries. An explicit label that is
/// not registered is an error even if a later source would have resolved;
/// an unrecognised extension just falls through.
pub fn resolve_target(
    explicit: Option<&str>,
    filename: Option<&Path>,
    carried: Option<Format>,
) -> Result<Format> {
    if let Some(label) = explicit {
        return label.parse();
    }

    let by_extension = filename
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .and_then(Format::from_extension);
    if let Some(format) = by_extension {
        return Ok(format);
    }

    carried.ok_or(Error::DestinationFormatRequired)
}
