//! Runtime environment snapshot
//!
//! Conditional package activation is decided against a snapshot of the
//! running environment: the host application version and the set of loaded
//! extensions. The snapshot is captured once by the embedder and passed by
//! reference into registry construction, which keeps the activation
//! evaluator a pure function.

use crate::error::{Error, Result};
use semver::Version;
use std::collections::BTreeSet;

/// Snapshot of the facts conditional activation can check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    version: Version,
    extensions: BTreeSet<String>,
}

impl Environment {
    /// Create a snapshot with the given application version and no
    /// extensions
    pub fn new(version: Version) -> Self {
        Self {
            version,
            extensions: BTreeSet::new(),
        }
    }

    /// Create a snapshot from a version string.
    ///
    /// Accepts partial versions (`"7.4"`, `"8"`) via [`parse_version`].
    pub fn from_version(version: &str) -> Result<Self> {
        Ok(Self::new(parse_version(version)?))
    }

    /// Add an available extension (builder style)
    pub fn with_extension(mut self, name: impl Into<String>) -> Self {
        self.extensions.insert(name.into());
        self
    }

    /// Host application version
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Whether the named extension is present
    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.contains(name)
    }
}

/// Parse a version string leniently.
///
/// Falls back to padding missing segments with zeros (`"7.4"` → `7.4.0`)
/// when the input is not already a full semver version. Segments must be
/// numeric.
pub fn parse_version(input: &str) -> Result<Version> {
    let trimmed = input.trim();

    if let Ok(version) = Version::parse(trimmed) {
        return Ok(version);
    }

    let mut segments = [0u64; 3];
    let parts: Vec<&str> = trimmed.split('.').collect();

    if parts.is_empty() || parts.len() > 3 {
        return Err(Error::InvalidVersion(input.to_string()));
    }

    for (i, part) in parts.iter().enumerate() {
        segments[i] = part
            .parse::<u64>()
            .map_err(|_| Error::InvalidVersion(input.to_string()))?;
    }

    Ok(Version::new(segments[0], segments[1], segments[2]))
}
