//! Embedded EXIF metadata: orientation and GPS tags.
//!
//! Only JPEG sources carry metadata in practice. Parsing is best effort: a
//! missing or corrupt EXIF block yields `None`, never an error, so a damaged
//! APP1 segment cannot stop an otherwise valid image from opening.
//!
//! Metadata is a plain value. Every derived image gets its own clone, so
//! normalising the orientation of a rotated copy leaves the source untouched.

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Cursor;

/// The orientation tag value meaning "already upright".
pub const UPRIGHT: u16 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// EXIF Orientation (0x0112), 1–8.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<u16>,
    /// GPS IFD fields keyed by tag name, values in EXIF display form.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub gps: BTreeMap<String, String>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.orientation.is_none() && self.gps.is_empty()
    }

    /// Copy with the orientation reset to upright.
    pub fn upright(&self) -> Self {
        Self {
            orientation: Some(UPRIGHT),
            ..self.clone()
        }
    }
}

/// Read EXIF orientation and GPS fields from an encoded JPEG.
///
/// Returns `None` if there is no EXIF block, it fails to parse, or it holds
/// none of the fields we keep.
pub fn read_exif(bytes: &[u8]) -> Option<Metadata> {
    let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => exif,
        Err(err) => {
            tracing::debug!(error = %err, "no usable EXIF block");
            return None;
        }
    };

    let orientation = exif
        .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        .and_then(|v| u16::try_from(v).ok());

    let gps = exif
        .fields()
        .filter(|f| f.ifd_num == exif::In::PRIMARY && f.tag.context() == exif::Context::Gps)
        .map(|f| (f.tag.to_string(), f.display_value().to_string()))
        .collect();

    let metadata = Metadata { orientation, gps };
    (!metadata.is_empty()).then_some(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{jpeg_bytes, jpeg_with_orientation};

    #[test]
    fn reads_orientation_tag() {
        let bytes = jpeg_with_orientation(8, 6, 6);
        let meta = read_exif(&bytes).unwrap();
        assert_eq!(meta.orientation, Some(6));
        assert!(meta.gps.is_empty());
    }

    #[test]
    fn plain_jpeg_has_no_metadata() {
        assert_eq!(read_exif(&jpeg_bytes(8, 8)), None);
    }

    #[test]
    fn garbage_is_not_an_error() {
        assert_eq!(read_exif(b"\xFF\xD8\xFFnot really a jpeg"), None);
        assert_eq!(read_exif(&[]), None);
    }

    #[test]
    fn upright_resets_orientation_only() {
        let mut meta = Metadata {
            orientation: Some(3),
            ..Metadata::default()
        };
        meta.gps
            .insert("GPSLatitudeRef".to_string(), "N".to_string());

        let upright = meta.upright();
        assert_eq!(upright.orientation, Some(UPRIGHT));
        assert_eq!(upright.gps, meta.gps);
        assert_eq!(meta.orientation, Some(3));
    }
}
