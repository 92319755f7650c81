//! Configuration validation

use crate::Config;
use keel_core::{parse_version, Error, PackageUid, Result};

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_app(config)?;
    validate_packages(config)?;

    Ok(())
}

fn validate_app(config: &Config) -> Result<()> {
    if config.app.name.is_empty() {
        return Err(Error::Config("app name cannot be empty".to_string()));
    }

    parse_version(&config.app.version)
        .map_err(|e| Error::Config(format!("app version: {e}")))?;

    Ok(())
}

fn validate_packages(config: &Config) -> Result<()> {
    let packages = &config.packages;

    for uid in packages.preload.iter().chain(packages.ondemand.iter()) {
        validate_uid(uid)?;
    }

    for uid in &packages.ondemand {
        if packages.preload.contains(uid) {
            // Re-registering replaces the descriptor, which would drop the
            // loaded flag set by the preload pass.
            tracing::warn!(package = %uid, "Package listed in both preload and ondemand");
        }
    }

    for (condition, uids) in &packages.conditional {
        if condition.is_empty() {
            return Err(Error::Config(
                "conditional key cannot be empty".to_string(),
            ));
        }

        for uid in uids {
            validate_uid(uid)?;
        }
    }

    for (kind, root) in &packages.roots {
        if kind.is_empty() {
            return Err(Error::Config("package kind cannot be empty".to_string()));
        }

        if root.as_os_str().is_empty() {
            return Err(Error::Config(format!(
                "root path for kind '{kind}' cannot be empty"
            )));
        }
    }

    Ok(())
}

fn validate_uid(uid: &str) -> Result<()> {
    PackageUid::parse(uid)
        .map(|_| ())
        .map_err(|e| Error::Config(format!("invalid package reference: {e}")))
}
