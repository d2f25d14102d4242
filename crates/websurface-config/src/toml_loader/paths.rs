//! Where the websurface config lives and how its first copy is written.

use std::path::{Path, PathBuf};
use tracing::info;
use websurface_common::ConfigError;

use super::template::default_config_toml;

/// Names a config file to use instead of the per-user one.
pub const CONFIG_PATH_ENV: &str = "WEBSURFACE_CONFIG";

/// `$WEBSURFACE_CONFIG` when set, else `<config dir>/websurface/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    resolve_config_path(std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
}

pub(crate) fn resolve_config_path(env_override: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = env_override.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path);
    }
    dirs::config_dir()
        .map(|dir| dir.join("websurface").join("config.toml"))
        .ok_or_else(|| ConfigError::ParseError("no per-user config directory on this platform".into()))
}

/// Write the commented template to `path`, creating missing parent
/// directories. An existing file is overwritten.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_err = |what: &str, at: &Path, e: std::io::Error| {
        ConfigError::ParseError(format!("failed to {what} {}: {e}", at.display()))
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| write_err("create", parent, e))?;
    }
    std::fs::write(path, default_config_toml()).map_err(|e| write_err("write", path, e))?;

    info!(path = %path.display(), "config template written");
    Ok(())
}
