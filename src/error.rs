//! Error types

use std::io;

use thiserror::Error;

/// Failure reported by an `Output` sink
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// A write stopped because the sink failed
#[derive(Error, Debug)]
#[error("Output failed after {consumed} bytes: {source}")]
pub struct WriteError {
    /// Bytes of the input accepted before the failure
    pub consumed: usize,
    #[source]
    pub source: OutputError,
}

/// Configuration error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<WriteError> for io::Error {
    fn from(err: WriteError) -> Self {
        match err.source {
            OutputError::Io(inner) => inner,
            other => io::Error::other(other),
        }
    }
}
