//! Error types and fault classification for s3fan.
//!
//! This crate provides:
//! - [`Error`] - the single error enum shared by the engine and the CLI
//! - [`FaultKind`] for retry decisions
//! - [`Result`] alias used throughout the workspace

use thiserror::Error;

/// Top-level error type for s3fan.
#[derive(Error, Debug)]
pub enum Error {
    /// The target bucket does not exist. Never retried.
    #[error("bucket {0} does not exist")]
    BucketNotFound(String),

    /// Transient failures exceeded the retry budget for one page.
    #[error("too many failed attempts to list objects after {attempts} tries: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    /// Pre-request wiring failed (client construction, channel setup).
    #[error("setup failed: {0}")]
    Setup(String),

    /// The object stream closed underneath a producer.
    #[error("object stream closed before the traversal completed")]
    StreamClosed,

    /// A single request failed; candidate for retry.
    #[error("{0}")]
    Request(String),

    /// Generic errors (wrapped anyhow).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Fault classification for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Retry with exponential backoff.
    Transient,
    /// Abort the whole traversal.
    Fatal,
}

impl Error {
    /// Classify this error for the retry loop.
    pub fn kind(&self) -> FaultKind {
        match self {
            Error::Request(_) => FaultKind::Transient,
            Error::BucketNotFound(_)
            | Error::RetriesExhausted { .. }
            | Error::Setup(_)
            | Error::StreamClosed
            | Error::Other(_) => FaultKind::Fatal,
        }
    }

    /// Whether this error aborts the traversal instead of being retried.
    pub fn is_fatal(&self) -> bool {
        self.kind() == FaultKind::Fatal
    }
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
