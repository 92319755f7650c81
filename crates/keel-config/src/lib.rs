//! # Keel Configuration
//!
//! Configuration management with support for:
//! - Multiple formats (YAML, TOML, JSON)
//! - Environment variable expansion (`${VAR}`, `${VAR:-default}`)
//! - Validation
//! - Default values

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod loader;
pub mod types;
pub mod validator;

pub use loader::{load_config, load_from_file, load_from_str};
pub use types::{AppConfig, Config, ConfigFormat, PackagesConfig};
pub use validator::validate_config;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::loader::{load_config, load_from_file, load_from_str};
    pub use crate::types::{AppConfig, Config, ConfigFormat, PackagesConfig};
    pub use crate::validator::validate_config;
}
