//! # imgpipe
//!
//! Decode JPEG/PNG/GIF images, resize, crop, watermark and auto-orient them,
//! and encode the result to any of the three formats.
//!
//! # Architecture
//!
//! ```text
//! bytes → detect format → Codec::decode → Image → transforms → Codec::encode → bytes
//! ```
//!
//! Everything between decode and encode works on an owned, fully decoded RGBA
//! buffer. Transforms borrow their input and return a new [`Image`], so the
//! source of a transform is never changed behind the caller's back.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Format registry, geometry, orientation, watermarking, the [`Image`] value, codec boundary |
//! | [`io`] | Sources and targets: buffers, paths, async streams, `{ext}` substitution |
//! | [`transform`] | Describe-then-execute pipelines over an [`Operation`] list |
//! | [`config`] | `imgpipe.toml` loading, merging and validation |
//! | [`error`] | Crate-wide [`Error`] and its comparable [`ErrorKind`] |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Codec Boundary
//!
//! All pixel encoding and decoding goes through the [`Codec`] trait. The
//! geometry, orientation and compositing code never sees encoded bytes, which
//! keeps it testable with synthetic buffers and a recording mock codec. The
//! production [`RustCodec`] is pure Rust (`image` + `kamadak-exif`): no
//! system libraries to install.
//!
//! ## Sync and Async, Same Errors
//!
//! Every entry point that reads or writes has a synchronous and an `_async`
//! form. They share the decoding, transform and encoding code and differ only
//! in how bytes move, so the same input fails with the same [`ErrorKind`]
//! either way. Streams are async-only; a synchronous call against one fails
//! with [`ErrorKind::SynchronousStreamAccess`] instead of blocking.
//!
//! ## Never Upscale
//!
//! Resize and crop cap the output at the source size. Asking for a larger
//! image returns the source dimensions, not an interpolated blow-up.

pub mod config;
pub mod error;
pub mod imaging;
pub mod io;
pub mod output;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use error::{Error, ErrorKind, Result};
pub use imaging::{Codec, Format, Image, RustCodec};
pub use io::{Saved, Source, Target};
pub use transform::{Mark, Operation, Transform};
