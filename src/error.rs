//! Crate-wide error type.
//!
//! Every public operation returns [`Error`]. Synchronous and asynchronous
//! entry points produce the same variant for the same failure, which is what
//! [`Error::kind`] exists to check: it strips the payload (paths, io errors)
//! and leaves a comparable [`ErrorKind`].

use crate::config::ConfigError;
use crate::imaging::codec::CodecError;
use thiserror::Error;

/// Result type for imgpipe operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown source type: {0}")]
    UnknownSourceType(String),
    #[error("File does not exist: {0}")]
    FileDoesNotExist(String),
    #[error("File open error: {name}: {source}")]
    FileOpen {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Empty source file or buffer")]
    EmptySource,
    #[error("{}", unknown_format_message(.0))]
    UnknownImageFormat(Option<String>),
    #[error("Corrupted or incomplete image: {0}")]
    IncompleteImage(#[source] CodecError),
    #[error("Unsupported image Exif orientation tag value: {0}")]
    UnsupportedOrientation(u16),
    #[error("Destination image format required")]
    DestinationFormatRequired,
    #[error("Unknown destination type: {0}")]
    UnknownDestinationType(String),
    #[error("File writing error: {name}: {source}")]
    FileWrite {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("A stream cannot be read or written synchronously")]
    SynchronousStreamAccess,
    #[error("Resize requires a width or a height")]
    DimensionsRequired,
    #[error("Image dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Encoding failed: {0}")]
    Encode(#[source] CodecError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn unknown_format_message(label: &Option<String>) -> String {
    match label {
        Some(label) => format!("Unknown format {label}"),
        None => "Unknown image format (or not an image at all)".to_string(),
    }
}

/// Payload-free discriminant of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownSourceType,
    FileDoesNotExist,
    FileOpen,
    EmptySource,
    UnknownImageFormat,
    IncompleteImage,
    UnsupportedOrientation,
    DestinationFormatRequired,
    UnknownDestinationType,
    FileWrite,
    SynchronousStreamAccess,
    DimensionsRequired,
    InvalidDimensions,
    Encode,
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownSourceType(_) => ErrorKind::UnknownSourceType,
            Error::FileDoesNotExist(_) => ErrorKind::FileDoesNotExist,
            Error::FileOpen { .. } => ErrorKind::FileOpen,
            Error::EmptySource => ErrorKind::EmptySource,
            Error::UnknownImageFormat(_) => ErrorKind::UnknownImageFormat,
            Error::IncompleteImage(_) => ErrorKind::IncompleteImage,
            Error::UnsupportedOrientation(_) => ErrorKind::UnsupportedOrientation,
            Error::DestinationFormatRequired => ErrorKind::DestinationFormatRequired,
            Error::UnknownDestinationType(_) => ErrorKind::UnknownDestinationType,
            Error::FileWrite { .. } => ErrorKind::FileWrite,
            Error::SynchronousStreamAccess => ErrorKind::SynchronousStreamAccess,
            Error::DimensionsRequired => ErrorKind::DimensionsRequired,
            Error::InvalidDimensions { .. } => ErrorKind::InvalidDimensions,
            Error::Encode(_) => ErrorKind::Encode,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    /// Map a failed read of `name` to `FileDoesNotExist` or `FileOpen`.
    pub(crate) fn from_read(name: impl Into<String>, err: std::io::Error) -> Self {
        let name = name.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            Error::FileDoesNotExist(name)
        } else {
            Error::FileOpen { name, source: err }
        }
    }

    pub(crate) fn from_write(name: impl Into<String>, err: std::io::Error) -> Self {
        Error::FileWrite {
            name: name.into(),
            source: err,
        }
    }
}
