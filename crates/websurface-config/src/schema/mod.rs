//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod logging;
mod surface;

pub use logging::*;
pub use surface::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSurfaceConfig {
    pub surface: SurfaceConfig,
    pub logging: LoggingConfig,
}
