//! Error types for is3dump-media.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for is3dump-media operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for is3dump-media operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Metadata document is not valid JSON.
    #[error("Invalid metadata JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Channel directory does not exist.
    #[error("Channel directory does not exist: {0}")]
    ChannelNotFound(PathBuf),

    /// No metadata document for the requested stream.
    #[error("No metadata document for stream {stream_id}")]
    MissingMetadata { stream_id: u64 },

    /// More than one metadata document matched the requested stream.
    #[error("Stream {stream_id} has {} metadata documents: {paths:?}", .paths.len())]
    DuplicateMetadata { stream_id: u64, paths: Vec<PathBuf> },

    /// A key the dump needs is absent from the metadata document.
    #[error("Metadata key not found: {0}")]
    MissingKey(&'static str),

    /// Metadata value has the wrong shape.
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Encoding named by the metadata is not supported.
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    /// Audio configuration cannot be expressed in an ADTS header.
    #[error("Invalid audio config: {0}")]
    InvalidConfig(String),

    /// Frame does not fit the 13-bit ADTS frame length.
    #[error("Frame too large: {size} bytes (max: {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// Index record describes an impossible byte range.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl Error {
    /// Create an invalid metadata error.
    pub fn invalid_metadata(msg: impl Into<String>) -> Self {
        Self::InvalidMetadata(msg.into())
    }

    /// Create an invalid audio config error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an invalid record error.
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }
}

impl From<is3dump_common::Error> for Error {
    fn from(err: is3dump_common::Error) -> Self {
        match err {
            is3dump_common::Error::UnknownEncoding(name) => Self::UnknownEncoding(name),
            is3dump_common::Error::InvalidInput(msg) => Self::InvalidMetadata(msg),
        }
    }
}
