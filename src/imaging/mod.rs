//! Image processing on decoded RGBA buffers.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Detect format** | signature table in [`format`] |
//! | **Decode / encode** | `image` crate behind the [`Codec`] trait |
//! | **EXIF metadata** | `kamadak-exif` |
//! | **Resize / crop** | `imageops::resize` (Lanczos3 or nearest) onto a transparent canvas |
//! | **Auto-orient** | `imageops::rotate90/180/270` |
//! | **Watermark** | `imageops::overlay`, placement by luma contrast |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Typed options for every operation
//! - **Codec**: [`Codec`] trait + [`RustCodec`]
//! - **Image**: the decoded [`Image`] value and its transforms
//! - **Operations**: open/save orchestration combining the codec, format
//!   resolution and I/O adapters

mod calculations;
pub mod codec;
pub mod format;
pub mod image;
pub mod metadata;
pub mod operations;
pub mod orientation;
mod params;
pub mod rust_codec;
pub mod watermark;

pub use calculations::{
    Dimensions, Rect, ResizePlan, covered_rect, crop_rect, plan_resize, watermark_offset,
};
pub use codec::{Codec, CodecError};
pub use format::Format;
pub use self::image::Image;
pub use metadata::Metadata;
pub use operations::resolve_format;
pub use params::{
    Compression, Method, OpenOptions, Placement, Point, Quality, ResizeOptions, SaveOptions,
};
pub use rust_codec::RustCodec;
