//! # Keel Packages
//!
//! Package lifecycle management:
//! - A registry of pluggable packages (libraries and application modules)
//!   keyed by kind and id
//! - Declarative registration lists (`preload`, `ondemand`, `conditional`)
//!   consumed once at construction
//! - Conditional activation gated on runtime environment facts
//! - Idempotent, one-time loading of each package's resources (bootstrap,
//!   routes, schema scripts; view and asset directories)
//! - A lifecycle event per successful load

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod activation;
pub mod context;
pub mod loader;
pub mod manager;
pub mod registry;

pub use context::{LoadContext, SharedFileGroups, SERVICE_DATABASE, SERVICE_ROUTER};
pub use loader::PackageLoader;
pub use manager::{PackageManager, SharedEvents};
pub use registry::PackageRegistry;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::context::{LoadContext, SharedFileGroups};
    pub use crate::loader::PackageLoader;
    pub use crate::manager::{PackageManager, SharedEvents};
    pub use crate::registry::PackageRegistry;
    pub use keel_core::prelude::*;
}
