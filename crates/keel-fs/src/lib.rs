//! # Keel Filesystem Groups
//!
//! Named groups of root directories with depth-limited recursive scanning:
//! - Registration of directory roots under group names (`"views"`,
//!   `"assets"`, ...) with a per-root max depth
//! - Flattened, cached per-group scans
//! - Single-file lookup inside a group

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod error;
pub mod groups;

pub use error::{Error, Result};
pub use groups::{normalize, FileGroups, DEFAULT_SCAN_DEPTH};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::groups::{FileGroups, DEFAULT_SCAN_DEPTH};
}
