//! Configuration loading

use crate::{Config, ConfigFormat};
use keel_core::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::Path;

/// Load configuration from a file
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

    let format = ConfigFormat::from_path(path)?;

    load_from_str(&content, format)
}

/// Expand environment variables in a configuration string
/// Supports syntax: ${VAR} and ${VAR:-default}
fn expand_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(:-([^}]*))?\}")
        .map_err(|e| Error::Config(format!("Invalid regex: {e}")))?;

    let mut missing = None;

    let expanded = re.replace_all(content, |caps: &regex::Captures<'_>| {
        let var_name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let default_value = caps.get(3).map(|m| m.as_str());

        match env::var(var_name) {
            Ok(value) => value,
            Err(_) => match default_value {
                Some(default) => default.to_string(),
                None => {
                    missing.get_or_insert_with(|| var_name.to_string());
                    String::new()
                }
            },
        }
    });

    if let Some(var_name) = missing {
        return Err(Error::Config(format!(
            "Environment variable '{var_name}' not set and no default provided"
        )));
    }

    Ok(expanded.into_owned())
}

/// Load configuration from a string
pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<Config> {
    let expanded_content = expand_env_vars(content)?;

    let config = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse YAML: {e}")))?,
        ConfigFormat::Toml => toml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {e}")))?,
        ConfigFormat::Json => serde_json::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse JSON: {e}")))?,
    };

    Ok(config)
}

/// Load and validate configuration from a file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let config = load_from_file(path)?;

    crate::validator::validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BASE_YAML: &str = r#"
app:
  name: demo
  version: "1.0"
packages:
  preload: ["library.db"]
"#;

    #[test]
    fn test_load_from_str_yaml() {
        let config = load_from_str(BASE_YAML, ConfigFormat::Yaml).unwrap();
        assert_eq!(config.app.name, "demo");
        assert_eq!(config.packages.preload, vec!["library.db"]);
    }

    #[test]
    fn test_load_from_str_toml() {
        let content = r#"
[app]
name = "demo"
version = "1.0"

[packages]
ondemand = ["module.admin"]
"#;
        let config = load_from_str(content, ConfigFormat::Toml).unwrap();
        assert_eq!(config.packages.ondemand, vec!["module.admin"]);
    }

    #[test]
    fn test_load_from_file_dispatches_on_extension() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        file.write_all(BASE_YAML.as_bytes()).unwrap();

        let config = load_from_file(file.path()).unwrap();
        assert_eq!(config.app.name, "demo");
    }

    #[test]
    fn test_env_expansion_with_default() {
        let content = r#"
app:
  name: "${KEEL_TEST_UNSET_NAME:-fallback}"
  version: "1.0"
"#;
        let config = load_from_str(content, ConfigFormat::Yaml).unwrap();
        assert_eq!(config.app.name, "fallback");
    }

    #[test]
    fn test_env_expansion_set_var() {
        env::set_var("KEEL_TEST_APP_NAME", "from-env");
        let content = r#"
app:
  name: "${KEEL_TEST_APP_NAME}"
  version: "1.0"
"#;
        let config = load_from_str(content, ConfigFormat::Yaml).unwrap();
        assert_eq!(config.app.name, "from-env");
    }

    #[test]
    fn test_env_expansion_missing_without_default() {
        let content = r#"
app:
  name: "${KEEL_TEST_DEFINITELY_UNSET}"
  version: "1.0"
"#;
        assert!(load_from_str(content, ConfigFormat::Yaml).is_err());
    }
}
