//! Codec boundary.
//!
//! The [`Codec`] trait is the only place pixel encoding and decoding happens.
//! Everything else in the crate (geometry, orientation, compositing, the
//! open/save orchestration) is codec-agnostic and works on decoded
//! [`RgbaImage`] buffers.
//!
//! The production implementation is
//! [`RustCodec`](super::rust_codec::RustCodec), built on the `image` crate.

use super::format::Format;
use super::metadata::Metadata;
use super::params::SaveOptions;
use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("no data to decode")]
    Empty,
    #[error("corrupt or truncated data: {0}")]
    Corrupt(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Decode, encode and metadata extraction for the registered formats.
///
/// Implementations must report a zero-length buffer as [`CodecError::Empty`]
/// and anything else that fails to decode as [`CodecError::Corrupt`].
pub trait Codec: Sync {
    /// Decode `bytes`, already identified as `format`, into RGBA pixels.
    fn decode(&self, format: Format, bytes: &[u8]) -> Result<RgbaImage, CodecError>;

    /// Encode `pixels` as `format`. Only the options relevant to the format
    /// are read (`quality` for JPEG, `compression` for PNG).
    fn encode(
        &self,
        pixels: &RgbaImage,
        format: Format,
        options: &SaveOptions,
    ) -> Result<Vec<u8>, CodecError>;

    /// Embedded metadata, if any. Never fails: unreadable metadata is `None`.
    fn extract_metadata(&self, format: Format, bytes: &[u8]) -> Option<Metadata>;
}
