//! Configuration types

use indexmap::IndexMap;
use keel_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,

    /// Package subsystem settings
    #[serde(default)]
    pub packages: PackagesConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Application name
    pub name: String,

    /// Application version; conditional package activation compares
    /// against this value
    pub version: String,

    /// Character set
    #[serde(default = "default_charset")]
    pub charset: String,

    /// Timezone identifier
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Debug mode
    #[serde(default)]
    pub debug: bool,
}

fn default_charset() -> String {
    "UTF-8".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Declarative package lists consumed once at registry construction
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PackagesConfig {
    /// Packages registered and loaded eagerly, in declaration order
    #[serde(default)]
    pub preload: Vec<String>,

    /// Packages registered for later explicit loading
    #[serde(default)]
    pub ondemand: Vec<String>,

    /// Condition expression → packages registered and loaded only when the
    /// condition holds against the runtime environment. Declaration order
    /// is preserved.
    #[serde(default)]
    pub conditional: IndexMap<String, Vec<String>>,

    /// Base directory per package kind, used when registering packages by
    /// bare name
    #[serde(default)]
    pub roots: IndexMap<String, PathBuf>,
}

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML (`.yaml` / `.yml`)
    Yaml,
    /// TOML (`.toml`)
    Toml,
    /// JSON (`.json`)
    Json,
}

impl ConfigFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            other => Err(Error::Config(format!(
                "Unsupported config format: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }
}
