//! Error types for vlmdoc library.

use std::io;
use thiserror::Error;

/// Result type alias for vlmdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur at the library boundary.
///
/// The reconstruction algorithms themselves never fail on noisy input:
/// malformed detections are dropped and ambiguous attachments degrade to
/// plain text. Errors only surface from configuration, serialization and I/O.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error during rendering (Markdown, content list, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// A configuration value was rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
