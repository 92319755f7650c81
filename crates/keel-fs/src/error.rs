//! Error types for filesystem groups

/// Result type for filesystem group operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for filesystem group operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The named group has no registered directories
    #[error("Unknown filesystem group: {0}")]
    UnknownGroup(String),

    /// I/O error during a scan
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
