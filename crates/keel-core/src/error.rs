//! Error types for the Keel package subsystem

/// Result type alias using [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Main error type for the Keel package subsystem
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Load target does not exist in the registry
    #[error("Unknown package: {0}")]
    UnknownPackage(String),

    /// A registered package fails the descriptor validity contract
    #[error("Invalid package '{package}': {message}")]
    InvalidPackage {
        /// Package uid
        package: String,
        /// Reason the descriptor is invalid
        message: String,
    },

    /// Idempotency guard: the package has already been loaded
    #[error("{kind} '{id}' is already loaded")]
    AlreadyLoaded {
        /// Package kind
        kind: String,
        /// Package id
        id: String,
    },

    /// An addressing string could not be split into a kind and an id
    #[error("Malformed package uid '{0}': expected \"<kind>.<id>\"")]
    MalformedUid(String),

    /// A package resource failed while executing
    #[error("Failed to load package '{package}': {message}")]
    LoadFailed {
        /// Package uid
        package: String,
        /// What went wrong
        message: String,
    },

    /// Version string could not be parsed
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an [`Error::InvalidPackage`]
    pub fn invalid(package: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidPackage {
            package: package.into(),
            message: message.into(),
        }
    }

    /// Create an [`Error::LoadFailed`]
    pub fn load_failed(package: impl Into<String>, message: impl Into<String>) -> Self {
        Error::LoadFailed {
            package: package.into(),
            message: message.into(),
        }
    }
}
