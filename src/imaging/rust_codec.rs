//! Pure Rust codec on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF) | `image::load_from_memory_with_format` → RGBA8 |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (alpha dropped) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Encode → GIF | `image::codecs::gif::GifEncoder` (first frame only) |
//! | EXIF metadata | `kamadak-exif` via [`read_exif`](super::metadata::read_exif) |

use super::codec::{Codec, CodecError};
use super::format::Format;
use super::metadata::{Metadata, read_exif};
use super::params::{Compression, Quality, SaveOptions};
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};

/// JPEG quality used when none is requested.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Codec backed by the `image` crate's pure Rust decoders and encoders.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn image_format(format: Format) -> ImageFormat {
    match format {
        Format::Jpeg => ImageFormat::Jpeg,
        Format::Png => ImageFormat::Png,
        Format::Gif => ImageFormat::Gif,
    }
}

/// Quality `0` means "no preference", like an absent one.
fn jpeg_quality(quality: Option<Quality>) -> u8 {
    match quality.map(Quality::value) {
        None | Some(0) => DEFAULT_JPEG_QUALITY,
        Some(q) => q,
    }
}

/// The `image` crate exposes three PNG effort levels; spread 1–9 over them.
/// Level `0` means "no preference", like an absent one.
fn png_compression(level: Option<Compression>) -> CompressionType {
    match level.map(Compression::value) {
        None | Some(0) => CompressionType::Default,
        Some(1..=3) => CompressionType::Fast,
        Some(4..=6) => CompressionType::Default,
        Some(_) => CompressionType::Best,
    }
}

fn encode_failed(err: image::ImageError) -> CodecError {
    CodecError::Encode(err.to_string())
}

impl Codec for RustCodec {
    fn decode(&self, format: Format, bytes: &[u8]) -> Result<RgbaImage, CodecError> {
        if bytes.is_empty() {
            return Err(CodecError::Empty);
        }
        let decoded = image::load_from_memory_with_format(bytes, image_format(format))
            .map_err(|e| CodecError::Corrupt(e.to_string()))?;
        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(CodecError::Corrupt("image has no pixels".to_string()));
        }
        Ok(decoded.into_rgba8())
    }

    fn encode(
        &self,
        pixels: &RgbaImage,
        format: Format,
        options: &SaveOptions,
    ) -> Result<Vec<u8>, CodecError> {
        let mut buffer = Vec::new();
        let (width, height) = pixels.dimensions();

        match format {
            Format::Jpeg => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgba8(pixels.clone()).into_rgb8();
                JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(options.quality))
                    .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                    .map_err(encode_failed)?;
            }
            Format::Png => {
                PngEncoder::new_with_quality(
                    &mut buffer,
                    png_compression(options.compression),
                    PngFilter::Adaptive,
                )
                .write_image(pixels.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(encode_failed)?;
            }
            Format::Gif => {
                GifEncoder::new(&mut buffer)
                    .encode(pixels.as_raw(), width, height, ExtendedColorType::Rgba8)
                    .map_err(encode_failed)?;
            }
        }

        Ok(buffer)
    }

    fn extract_metadata(&self, format: Format, bytes: &[u8]) -> Option<Metadata> {
        match format {
            Format::Jpeg => read_exif(bytes),
            Format::Png | Format::Gif => None,
        }
    }
}
