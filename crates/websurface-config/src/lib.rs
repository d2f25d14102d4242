//! websurface configuration.
//!
//! TOML-based defaults for new surfaces plus logging settings. Every section
//! uses serde defaults so a partial file (or none at all) works.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use websurface_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{LogLevel, LoggingConfig, SurfaceConfig, WebSurfaceConfig};
pub use toml_loader::{load_default, load_from_path};

use websurface_common::ConfigError;

/// Load config from the platform default path and validate it.
///
/// Creates a commented default file if none exists yet.
pub fn load_config() -> Result<WebSurfaceConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &WebSurfaceConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
