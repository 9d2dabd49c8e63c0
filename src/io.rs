//! Where encoded bytes come from and where they go.
//!
//! A [`Source`] is an in-memory buffer, a filesystem path, or an async
//! reader. A [`Target`] is "give me the bytes back", a filesystem path, or an
//! async writer. Streams are async-only: touching one from a synchronous
//! entry point fails with [`Error::SynchronousStreamAccess`] instead of
//! blocking.
//!
//! Target paths may contain `{ext}`, replaced with the canonical extension of
//! the format actually written:
//!
//! ```text
//! out/photo.{ext}  + jpeg  →  out/photo.jpg
//! ```
//!
//! Both types parse from text for the CLI: `-` is stdin/stdout, `file://x`
//! and bare strings are paths, and any other `scheme://` is rejected.

use crate::error::{Error, Result};
use crate::imaging::Format;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Placeholder substituted with the written format's extension.
pub const EXT_PLACEHOLDER: &str = "{ext}";

pub enum Source {
    Bytes(Vec<u8>),
    Path(PathBuf),
    Stream(Box<dyn AsyncRead + Send + Unpin>),
}

impl Source {
    pub fn stdin() -> Source {
        Source::Stream(Box::new(tokio::io::stdin()))
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Source::Stream(_))
    }

    /// Read the whole source into memory.
    pub fn read(self) -> Result<Vec<u8>> {
        match self {
            Source::Bytes(bytes) => Ok(bytes),
            Source::Path(path) => {
                std::fs::read(&path).map_err(|e| Error::from_read(path.display().to_string(), e))
            }
            Source::Stream(_) => Err(Error::SynchronousStreamAccess),
        }
    }

    /// Read the whole source into memory without blocking the runtime.
    pub async fn read_async(self) -> Result<Vec<u8>> {
        match self {
            Source::Bytes(bytes) => Ok(bytes),
            Source::Path(path) => tokio::fs::read(&path)
                .await
                .map_err(|e| Error::from_read(path.display().to_string(), e)),
            Source::Stream(mut reader) => {
                let mut bytes = Vec::new();
                reader
                    .read_to_end(&mut bytes)
                    .await
                    .map_err(|e| Error::from_read("stream", e))?;
                Ok(bytes)
            }
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            Source::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Source::Stream(_) => f.write_str("Stream"),
        }
    }
}

impl From<Vec<u8>> for Source {
    fn from(bytes: Vec<u8>) -> Self {
        Source::Bytes(bytes)
    }
}

impl From<&[u8]> for Source {
    fn from(bytes: &[u8]) -> Self {
        Source::Bytes(bytes.to_vec())
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

impl From<&str> for Source {
    fn from(path: &str) -> Self {
        Source::Path(PathBuf::from(path))
    }
}

impl FromStr for Source {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match parse_descriptor(s) {
            Descriptor::Stdio => Ok(Source::stdin()),
            Descriptor::Path(path) => Ok(Source::Path(path)),
            Descriptor::Unknown => Err(Error::UnknownSourceType(s.to_string())),
        }
    }
}

pub enum Target {
    /// Return the encoded bytes to the caller.
    Buffer,
    Path(PathBuf),
    Sink(Box<dyn AsyncWrite + Send + Unpin>),
}

impl Target {
    pub fn stdout() -> Target {
        Target::Sink(Box::new(tokio::io::stdout()))
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Target::Sink(_))
    }

    /// The path to take a format hint from, if any.
    pub fn file_name(&self) -> Option<&Path> {
        match self {
            Target::Path(path) => Some(path),
            Target::Buffer | Target::Sink(_) => None,
        }
    }

    pub(crate) fn write(self, format: Format, bytes: Vec<u8>) -> Result<Saved> {
        match self {
            Target::Buffer => Ok(Saved::Buffer(bytes)),
            Target::Path(path) => {
                let path = expand_ext(&path, format);
                std::fs::write(&path, &bytes)
                    .map_err(|e| Error::from_write(path.display().to_string(), e))?;
                Ok(Saved::File(path))
            }
            Target::Sink(_) => Err(Error::SynchronousStreamAccess),
        }
    }

    pub(crate) async fn write_async(self, format: Format, bytes: Vec<u8>) -> Result<Saved> {
        match self {
            Target::Buffer => Ok(Saved::Buffer(bytes)),
            Target::Path(path) => {
                let path = expand_ext(&path, format);
                tokio::fs::write(&path, &bytes)
                    .await
                    .map_err(|e| Error::from_write(path.display().to_string(), e))?;
                Ok(Saved::File(path))
            }
            Target::Sink(mut writer) => {
                writer
                    .write_all(&bytes)
                    .await
                    .map_err(|e| Error::from_write("stream", e))?;
                writer
                    .flush()
                    .await
                    .map_err(|e| Error::from_write("stream", e))?;
                Ok(Saved::Sink)
            }
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Buffer => f.write_str("Buffer"),
            Target::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Target::Sink(_) => f.write_str("Sink"),
        }
    }
}

impl From<PathBuf> for Target {
    fn from(path: PathBuf) -> Self {
        Target::Path(path)
    }
}

impl From<&Path> for Target {
    fn from(path: &Path) -> Self {
        Target::Path(path.to_path_buf())
    }
}

impl From<&str> for Target {
    fn from(path: &str) -> Self {
        Target::Path(PathBuf::from(path))
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match parse_descriptor(s) {
            Descriptor::Stdio => Ok(Target::stdout()),
            Descriptor::Path(path) => Ok(Target::Path(path)),
            Descriptor::Unknown => Err(Error::UnknownDestinationType(s.to_string())),
        }
    }
}

/// What a save produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Saved {
    Buffer(Vec<u8>),
    /// The path written, after `{ext}` substitution.
    File(PathBuf),
    Sink,
}

impl Saved {
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Saved::Buffer(bytes) => Some(bytes),
            Saved::File(_) | Saved::Sink => None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Saved::File(path) => Some(path),
            Saved::Buffer(_) | Saved::Sink => None,
        }
    }
}

/// Replace every `{ext}` in `path` with `format`'s canonical extension.
pub fn expand_ext(path: &Path, format: Format) -> PathBuf {
    let text = path.to_string_lossy();
    if text.contains(EXT_PLACEHOLDER) {
        PathBuf::from(text.replace(EXT_PLACEHOLDER, format.extension()))
    } else {
        path.to_path_buf()
    }
}

enum Descriptor {
    Stdio,
    Path(PathBuf),
    Unknown,
}

fn parse_descriptor(s: &str) -> Descriptor {
    if s == "-" {
        return Descriptor::Stdio;
    }
    match s.split_once("://") {
        Some(("file", path)) => Descriptor::Path(PathBuf::from(path)),
        Some((scheme, _))
            if !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) =>
        {
            Descriptor::Unknown
        }
        _ => Descriptor::Path(PathBuf::from(s)),
    }
}
