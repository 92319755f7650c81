//! # Keel Core
//!
//! Core types, traits, and error handling for the Keel package subsystem.
//!
//! This crate provides the foundational abstractions used throughout the
//! workspace:
//! - Package identity and addressing ([`PackageUid`], [`UidSpec`])
//! - The [`Package`] trait and the built-in library/module descriptors
//! - The runtime [`Environment`] snapshot for conditional activation
//! - Error types

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod env;
pub mod error;
pub mod package;
pub mod uid;

pub use env::{parse_version, Environment};
pub use error::{Error, Result};
pub use package::{Library, Module, Package, PackageBuilder, PackageInfo};
pub use uid::{PackageUid, UidSpec};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::env::Environment;
    pub use crate::error::{Error, Result};
    pub use crate::package::{Library, Module, Package, PackageBuilder, PackageInfo};
    pub use crate::uid::{PackageUid, UidSpec};
}
