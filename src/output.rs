//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Info
//!
//! ```text
//! photo.jpg
//!     Format: jpeg (image/jpeg)
//!     Size: 4032x3024
//!     Brightness: 118.4
//!     Orientation: 6
//!     GPS: GPSLatitude = 52 deg 22 min 8.4 sec
//! ```
//!
//! ## Convert
//!
//! ```text
//! photo.jpg → thumb.png (jpeg 4032x3024 → png 400x300)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::imaging::{Format, Image, Metadata};
use crate::io::Saved;
use serde::Serialize;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn format_label(format: Option<Format>) -> String {
    match format {
        Some(f) => f.label().to_string(),
        None => "unknown".to_string(),
    }
}

// ============================================================================
// Info
// ============================================================================

/// Machine-readable summary printed by `info --json`.
#[derive(Debug, Clone, Serialize)]
pub struct ImageInfo {
    pub source: String,
    pub format: Option<Format>,
    pub width: u32,
    pub height: u32,
    pub brightness: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl ImageInfo {
    pub fn new(source: impl Into<String>, image: &Image) -> Self {
        Self {
            source: source.into(),
            format: image.format(),
            width: image.width(),
            height: image.height(),
            brightness: image.brightness(),
            metadata: image.metadata().cloned(),
        }
    }
}

pub fn format_info(info: &ImageInfo) -> Vec<String> {
    let mut lines = vec![info.source.clone()];
    let format = match info.format {
        Some(f) => format!("{} ({})", f.label(), f.mime_type()),
        None => format_label(None),
    };
    lines.push(format!("{}Format: {}", indent(1), format));
    lines.push(format!("{}Size: {}x{}", indent(1), info.width, info.height));
    lines.push(format!("{}Brightness: {:.1}", indent(1), info.brightness));

    if let Some(meta) = &info.metadata {
        if let Some(orientation) = meta.orientation {
            lines.push(format!("{}Orientation: {}", indent(1), orientation));
        }
        for (tag, value) in &meta.gps {
            lines.push(format!("{}GPS: {} = {}", indent(1), tag, value));
        }
    }
    lines
}

pub fn print_info(info: &ImageInfo) {
    for line in format_info(info) {
        println!("{}", line);
    }
}

// ============================================================================
// Convert
// ============================================================================

/// Format and size of an image at one point in a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub format: Option<Format>,
    pub width: u32,
    pub height: u32,
}

impl Summary {
    pub fn of(image: &Image) -> Self {
        Self {
            format: image.format(),
            width: image.width(),
            height: image.height(),
        }
    }
}

/// One-line summary of a conversion. The output format comes from `target`,
/// not from `after`.
pub fn format_convert(
    source: &str,
    before: Summary,
    after: Summary,
    target: Format,
    saved: &Saved,
) -> String {
    let destination = match saved {
        Saved::File(path) => path.display().to_string(),
        Saved::Buffer(bytes) => format!("{} bytes", bytes.len()),
        Saved::Sink => "stdout".to_string(),
    };
    format!(
        "{} → {} ({} {}x{} → {} {}x{})",
        source,
        destination,
        format_label(before.format),
        before.width,
        before.height,
        target.label(),
        after.width,
        after.height,
    )
}
