//! Error types for the collector, walker, codec and pipeline.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which I/O step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    /// Opening or reading an input file.
    ReadFailed,
    /// Handing encoded text to the sink.
    SinkWriteFailed,
    /// Writing decoded bytes to the output directory (decode mode).
    WriteFailed,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IoOp::ReadFailed => "read failed",
            IoOp::SinkWriteFailed => "sink write failed",
            IoOp::WriteFailed => "write failed",
        };
        f.write_str(s)
    }
}

/// Codec failures. Decode errors are returned to the caller, never tolerated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid base64 character 0x{byte:02x} at offset {offset}")]
    InvalidCharacter { byte: u8, offset: usize },

    #[error("invalid base64 length {0} (must be a multiple of 4)")]
    InvalidLength(usize),

    #[error("misplaced padding at offset {offset}")]
    InvalidPadding { offset: usize },

    #[error("destination too small: need {needed}, have {available}")]
    BufferTooSmall { needed: usize, available: usize },
}

#[derive(Error, Debug)]
pub enum Clip64Error {
    #[error("path too long ({len} >= {limit}): {}", path.display())]
    PathTooLong {
        path: PathBuf,
        len: usize,
        limit: usize,
    },

    #[error("out of memory (requested {requested} elements)")]
    OutOfMemory { requested: usize },

    #[error("{op}: {}", path.display())]
    Io {
        op: IoOp,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl Clip64Error {
    pub(crate) fn io(op: IoOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// The path this error occurred at, if applicable.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::PathTooLong { path, .. } | Self::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}
