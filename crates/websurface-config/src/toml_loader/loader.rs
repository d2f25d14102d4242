//! Reading a websurface config file, falling back to the user's default one.

use crate::schema::WebSurfaceConfig;
use crate::validation;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};
use websurface_common::ConfigError;

use super::paths::{create_default_config, default_config_path};

/// Parse the surface settings stored at `path`.
///
/// Sections and keys left out of the file keep their defaults. Validation
/// problems are logged and the config is returned as written; the caller
/// decides whether to reject it.
pub fn load_from_path(path: &Path) -> Result<WebSurfaceConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
        _ => ConfigError::ParseError(format!("failed to read {}: {e}", path.display())),
    })?;

    let config: WebSurfaceConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), error = %e, "config has problems, using it as written");
    }

    info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Settings from [`default_config_path`]. The first run finds no file,
/// writes the commented template there and starts from defaults.
pub fn load_default() -> Result<WebSurfaceConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            info!(path = %path.display(), "first run, writing config template");
            create_default_config(&path)?;
            Ok(WebSurfaceConfig::default())
        }
        other => other,
    }
}
