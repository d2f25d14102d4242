//! Defaults applied to every newly created surface.

use serde::{Deserialize, Serialize};
use websurface_common::DEFAULT_JS_NAVIGATION_SCHEME;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Only let the engine load `localhost` URLs; delegate everything else.
    pub localhost_only: bool,
    /// Register the script bridge and install the postMessage shim.
    pub messaging_enabled: bool,
    /// Script evaluated once after each load completes.
    pub injected_script: Option<String>,
    /// Scheme reserved for script-driven "navigation complete" signals.
    pub js_navigation_scheme: String,
    /// Hand delegated URIs to the system opener. When false they are only
    /// recorded and logged.
    pub open_external: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            localhost_only: false,
            messaging_enabled: false,
            injected_script: None,
            js_navigation_scheme: DEFAULT_JS_NAVIGATION_SCHEME.to_string(),
            open_external: true,
        }
    }
}

impl SurfaceConfig {
    /// The injected script, treating an empty string as absent.
    pub fn effective_injected_script(&self) -> Option<&str> {
        self.injected_script.as_deref().filter(|s| !s.is_empty())
    }
}
