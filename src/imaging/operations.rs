//! Open and save orchestration.
//!
//! These functions sit between the I/O adapters and the codec: they detect
//! the format, decode through the [`Codec`], attach metadata, and on the way
//! out resolve the target format and encode. Each has a synchronous and an
//! `_async` form that fail with the same [`ErrorKind`](crate::ErrorKind) for
//! the same input; only the reading and writing differ.
//!
//! The `Image::open` / `Image::save` conveniences at the bottom use
//! [`RustCodec`].

use super::codec::{Codec, CodecError};
use super::format::{Format, detect, resolve_target};
use super::image::Image;
use super::params::{OpenOptions, Placement, SaveOptions};
use super::rust_codec::RustCodec;
use crate::error::{Error, Result};
use crate::io::{Saved, Source, Target};
use std::borrow::Cow;
use std::path::Path;

/// Decode an in-memory buffer.
///
/// An empty buffer fails with `EmptySource`, an unrecognised signature with
/// `UnknownImageFormat`, and a recognised but undecodable one with
/// `IncompleteImage`. With `auto_orient` on, orientation correction runs
/// right away; if it fails the un-rotated image is returned.
pub fn decode(codec: &impl Codec, bytes: &[u8], options: &OpenOptions) -> Result<Image> {
    if bytes.is_empty() {
        return Err(Error::EmptySource);
    }
    let format = detect(bytes)?;
    let pixels = codec.decode(format, bytes).map_err(|e| match e {
        CodecError::Empty => Error::EmptySource,
        other => Error::IncompleteImage(other),
    })?;
    let metadata = codec.extract_metadata(format, bytes);

    let image = Image::from_pixels(pixels)?
        .with_format(format)
        .with_metadata(metadata);
    tracing::debug!(
        %format,
        width = image.width(),
        height = image.height(),
        metadata = image.metadata().is_some(),
        "decoded"
    );

    if options.auto_orient {
        return Ok(orient_quietly(image));
    }
    Ok(image)
}

fn orient_quietly(image: Image) -> Image {
    let rotated = match image.auto_orient() {
        Ok(Cow::Owned(rotated)) => Some(rotated),
        Ok(Cow::Borrowed(_)) => None,
        Err(err) => {
            tracing::debug!(error = %err, "ignoring orientation on open");
            None
        }
    };
    rotated.unwrap_or(image)
}

pub fn open(codec: &impl Codec, source: impl Into<Source>, options: &OpenOptions) -> Result<Image> {
    let bytes = source.into().read()?;
    decode(codec, &bytes, options)
}

pub async fn open_async(
    codec: &impl Codec,
    source: impl Into<Source>,
    options: &OpenOptions,
) -> Result<Image> {
    let bytes = source.into().read_async().await?;
    decode(codec, &bytes, options)
}

/// The format `image` would be written as: the `format` option, then the
/// extension of `filename`, then the image's own format.
pub fn resolve_format(
    image: &Image,
    filename: Option<&Path>,
    options: &SaveOptions,
) -> Result<Format> {
    resolve_target(options.format.as_deref(), filename, image.format())
}

/// Encode `image` in the format picked by [`resolve_format`].
pub fn encode(
    codec: &impl Codec,
    image: &Image,
    filename: Option<&Path>,
    options: &SaveOptions,
) -> Result<(Format, Vec<u8>)> {
    let format = resolve_format(image, filename, options)?;
    let bytes = codec
        .encode(image.pixels(), format, options)
        .map_err(Error::Encode)?;
    tracing::debug!(%format, bytes = bytes.len(), "encoded");
    Ok((format, bytes))
}

pub fn save(
    codec: &impl Codec,
    image: &Image,
    target: impl Into<Target>,
    options: &SaveOptions,
) -> Result<Saved> {
    let target = target.into();
    if target.is_stream() {
        return Err(Error::SynchronousStreamAccess);
    }
    let (format, bytes) = encode(codec, image, target.file_name(), options)?;
    let saved = target.write(format, bytes)?;
    tracing::debug!(path = ?saved.path(), "saved");
    Ok(saved)
}

pub async fn save_async(
    codec: &impl Codec,
    image: &Image,
    target: impl Into<Target>,
    options: &SaveOptions,
) -> Result<Saved> {
    let target = target.into();
    let (format, bytes) = encode(codec, image, target.file_name(), options)?;
    let saved = target.write_async(format, bytes).await?;
    tracing::debug!(path = ?saved.path(), "saved");
    Ok(saved)
}

/// Open `mark` with default options and composite it onto a copy of `image`.
pub fn watermark_from(
    codec: &impl Codec,
    image: &Image,
    mark: impl Into<Source>,
    placement: &Placement,
) -> Result<Image> {
    let mark = open(codec, mark, &OpenOptions::default())?;
    Ok(image.watermark(&mark, placement))
}

pub async fn watermark_from_async(
    codec: &impl Codec,
    image: &Image,
    mark: impl Into<Source>,
    placement: &Placement,
) -> Result<Image> {
    let mark = open_async(codec, mark, &OpenOptions::default()).await?;
    Ok(image.watermark(&mark, placement))
}

impl Image {
    /// Open with [`RustCodec`] and default options.
    pub fn open(source: impl Into<Source>) -> Result<Image> {
        open(&RustCodec::new(), source, &OpenOptions::default())
    }

    pub async fn open_async(source: impl Into<Source>) -> Result<Image> {
        open_async(&RustCodec::new(), source, &OpenOptions::default()).await
    }

    /// Decode a buffer with [`RustCodec`] and default options.
    pub fn decode(bytes: &[u8]) -> Result<Image> {
        decode(&RustCodec::new(), bytes, &OpenOptions::default())
    }

    /// Save with [`RustCodec`].
    pub fn save(&self, target: impl Into<Target>, options: &SaveOptions) -> Result<Saved> {
        save(&RustCodec::new(), self, target, options)
    }

    pub async fn save_async(
        &self,
        target: impl Into<Target>,
        options: &SaveOptions,
    ) -> Result<Saved> {
        save_async(&RustCodec::new(), self, target, options).await
    }

    /// Encode to a buffer with [`RustCodec`].
    pub fn to_bytes(&self, options: &SaveOptions) -> Result<Vec<u8>> {
        encode(&RustCodec::new(), self, None, options).map(|(_, bytes)| bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::imaging::codec::tests::{MockCodec, RecordedOp};
    use crate::imaging::metadata::Metadata;
    use crate::imaging::params::Point;
    use crate::test_helpers::{BLACK, WHITE, dark_corner, jpeg_with_orientation, png_bytes, solid};
    use tempfile::TempDir;

    const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];

    fn tagged(tag: u16) -> Metadata {
        Metadata {
            orientation: Some(tag),
            ..Metadata::default()
        }
    }

    // =========================================================================
    // decode
    // =========================================================================

    #[test]
    fn decode_detects_format_and_calls_codec() {
        let codec = MockCodec::with_pixels(vec![solid(4, 3, BLACK)]);
        let image = decode(&codec, PNG_SIGNATURE, &OpenOptions::default()).unwrap();
        assert_eq!(image.format(), Some(Format::Png));
        assert_eq!(image.dimensions(), (4, 3));
        assert_eq!(
            codec.get_operations(),
            vec![
                RecordedOp::Decode {
                    format: Format::Png,
                    len: PNG_SIGNATURE.len()
                },
                RecordedOp::ExtractMetadata(Format::Png),
            ]
        );
    }

    #[test]
    fn decode_empty_buffer() {
        let codec = MockCodec::new();
        let err = decode(&codec, &[], &OpenOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptySource);
        assert!(codec.get_operations().is_empty());
    }

    #[test]
    fn decode_unknown_signature() {
        let codec = MockCodec::new();
        let err = decode(&codec, b"BM not supported", &OpenOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownImageFormat);
    }

    #[test]
    fn decode_truncated_jpeg_is_incomplete() {
        let err = decode(&RustCodec::new(), &[0xFF, 0xD8, 0xFF], &OpenOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompleteImage);
    }

    #[test]
    fn decode_auto_orients_by_default() {
        let codec = MockCodec::with_metadata(vec![dark_corner(6, 4)], tagged(6));
        let image = decode(&codec, PNG_SIGNATURE, &OpenOptions::default()).unwrap();
        assert_eq!(image.dimensions(), (4, 6));
        assert_eq!(image.orientation(), Some(1));
    }

    #[test]
    fn decode_without_auto_orient_keeps_layout() {
        let codec = MockCodec::with_metadata(vec![dark_corner(6, 4)], tagged(6));
        let options = OpenOptions { auto_orient: false };
        let image = decode(&codec, PNG_SIGNATURE, &options).unwrap();
        assert_eq!(image.dimensions(), (6, 4));
        assert_eq!(image.orientation(), Some(6));
    }

    #[test]
    fn decode_swallows_unsupported_orientation() {
        let codec = MockCodec::with_metadata(vec![dark_corner(6, 4)], tagged(5));
        let image = decode(&codec, PNG_SIGNATURE, &OpenOptions::default()).unwrap();
        assert_eq!(image.dimensions(), (6, 4));
        // Explicit call still surfaces it
        assert_eq!(
            image.auto_orient().unwrap_err().kind(),
            ErrorKind::UnsupportedOrientation
        );
    }

    #[test]
    fn decode_real_exif_jpeg() {
        let bytes = jpeg_with_orientation(8, 4, 8);
        let image = decode(&RustCodec::new(), &bytes, &OpenOptions::default()).unwrap();
        assert_eq!(image.dimensions(), (4, 8));
        assert_eq!(image.orientation(), Some(1));
    }

    // =========================================================================
    // encode / save
    // =========================================================================

    #[test]
    fn encode_prefers_explicit_format() {
        let codec = MockCodec::new();
        let image = Image::from_pixels(solid(2, 2, WHITE))
            .unwrap()
            .with_format(Format::Png);
        let options = SaveOptions::format("JPEG").with_quality(80);
        let (format, bytes) = encode(&codec, &image, Some(Path::new("x.gif")), &options).unwrap();
        assert_eq!(format, Format::Jpeg);
        assert!(bytes.starts_with(Format::Jpeg.signature()));
        assert!(matches!(
            codec.get_operations()[0],
            RecordedOp::Encode {
                quality: Some(80),
                ..
            }
        ));
    }

    #[test]
    fn encode_falls_back_to_extension_then_carried() {
        let codec = MockCodec::new();
        let image = Image::from_pixels(solid(2, 2, WHITE))
            .unwrap()
            .with_format(Format::Png);
        let none = SaveOptions::default();
        let by_ext = encode(&codec, &image, Some(Path::new("x.gif")), &none).unwrap();
        assert_eq!(by_ext.0, Format::Gif);
        let carried = encode(&codec, &image, Some(Path::new("x.{ext}")), &none).unwrap();
        assert_eq!(carried.0, Format::Png);
    }

    #[test]
    fn encode_without_any_format_fails() {
        let image = Image::from_pixels(solid(2, 2, WHITE)).unwrap();
        let err = encode(&MockCodec::new(), &image, None, &SaveOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DestinationFormatRequired);
    }

    #[test]
    fn encode_unknown_explicit_format_fails() {
        let image = Image::from_pixels(solid(2, 2, WHITE)).unwrap();
        let err = encode(&MockCodec::new(), &image, None, &SaveOptions::format("tiff"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownImageFormat);
    }

    #[test]
    fn save_to_path_with_placeholder() {
        let tmp = TempDir::new().unwrap();
        let image = Image::decode(&png_bytes(5, 5)).unwrap();
        let saved = image
            .save(tmp.path().join("copy.{ext}"), &SaveOptions::default())
            .unwrap();
        let written = tmp.path().join("copy.png");
        assert_eq!(saved, Saved::File(written.clone()));
        assert_eq!(Image::open(written).unwrap().dimensions(), (5, 5));
    }

    #[test]
    fn sync_save_to_sink_is_refused() {
        let image = Image::from_pixels(solid(2, 2, WHITE))
            .unwrap()
            .with_format(Format::Png);
        let err = save(
            &MockCodec::new(),
            &image,
            Target::Sink(Box::new(Vec::<u8>::new())),
            &SaveOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SynchronousStreamAccess);
    }

    #[tokio::test]
    async fn async_save_to_sink() {
        let image = Image::from_pixels(solid(2, 2, WHITE))
            .unwrap()
            .with_format(Format::Png);
        let saved = save_async(
            &MockCodec::new(),
            &image,
            Target::Sink(Box::new(Vec::<u8>::new())),
            &SaveOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(saved, Saved::Sink);
    }

    // =========================================================================
    // watermark_from
    // =========================================================================

    #[test]
    fn watermark_from_buffer() {
        let base = Image::from_pixels(solid(10, 10, BLACK)).unwrap();
        let mark = png_bytes(2, 2);
        let out = watermark_from(
            &RustCodec::new(),
            &base,
            mark,
            &Placement::At(Point::new(0.0, 0.0)),
        )
        .unwrap();
        assert_ne!(*out.pixels().get_pixel(0, 0), BLACK);
        assert_eq!(*out.pixels().get_pixel(9, 9), BLACK);
    }

    #[tokio::test]
    async fn watermark_from_missing_file_matches_sync() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("mark.png");
        let base = Image::from_pixels(solid(10, 10, BLACK)).unwrap();
        let codec = RustCodec::new();

        let sync = watermark_from(&codec, &base, missing.clone(), &Placement::default())
            .unwrap_err();
        let async_ = watermark_from_async(&codec, &base, missing, &Placement::default())
            .await
            .unwrap_err();
        assert_eq!(sync.kind(), ErrorKind::FileDoesNotExist);
        assert_eq!(sync.kind(), async_.kind());
    }
}
