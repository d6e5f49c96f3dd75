//! Error types for skill-marquee.
//!
//! None of these reach the viewer: the marquee turns them into visual
//! degradation (label-only items) and a log line.

use std::path::PathBuf;

/// Crate-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level HTTP failure (DNS, connect, timeout, body read).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    /// A payload could not be decoded.
    #[error("decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// Terminal or file I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value or file.
    #[error("invalid config {path:?}: {message}")]
    Config {
        path: Option<PathBuf>,
        message: String,
    },

    /// The layout engine rejected the item tree.
    #[error("layout failed: {0}")]
    Layout(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Config {
            path: None,
            message: message.into(),
        }
    }
}

impl From<taffy::TaffyError> for Error {
    fn from(err: taffy::TaffyError) -> Self {
        Error::Layout(err.to_string())
    }
}
