//! External handlers for navigations the engine must not perform.

use std::sync::{Arc, Mutex};

use tracing::info;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LaunchError {
    #[error("malformed URI {uri:?}: {reason}")]
    MalformedUri { uri: String, reason: String },

    #[error("no handler for {uri:?}: {reason}")]
    NoHandler { uri: String, reason: String },
}

/// Opens a URI outside the engine, e.g. the user's default app for its scheme.
pub trait ExternalLauncher {
    fn open(&self, uri: &str) -> Result<(), LaunchError>;
}

fn parse_for_launch(uri: &str) -> Result<Url, LaunchError> {
    Url::parse(uri).map_err(|e| LaunchError::MalformedUri {
        uri: uri.to_string(),
        reason: e.to_string(),
    })
}

/// Hands the URI to the user's default application for its scheme.
///
/// The opener runs detached; failing to start it is reported as `NoHandler`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ExternalLauncher for SystemLauncher {
    fn open(&self, uri: &str) -> Result<(), LaunchError> {
        let parsed = parse_for_launch(uri)?;
        open::that_detached(parsed.as_str()).map_err(|e| LaunchError::NoHandler {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;
        info!(uri = %parsed, "delegated to system opener");
        Ok(())
    }
}

/// Records delegated URIs instead of opening them.
///
/// Clones share the same record, so a caller can keep one and hand another
/// to a surface.
#[derive(Debug, Clone, Default)]
pub struct RecordingLauncher {
    opened: Arc<Mutex<Vec<String>>>,
    unhandled_schemes: Arc<Mutex<Vec<String>>>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend no handler is installed for `scheme`.
    pub fn without_handler_for(self, scheme: &str) -> Self {
        if let Ok(mut schemes) = self.unhandled_schemes.lock() {
            schemes.push(scheme.to_ascii_lowercase());
        }
        self
    }

    /// URIs successfully handed off, in order.
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .map(|opened| opened.clone())
            .unwrap_or_default()
    }
}

impl ExternalLauncher for RecordingLauncher {
    fn open(&self, uri: &str) -> Result<(), LaunchError> {
        let parsed = parse_for_launch(uri)?;
        let unhandled = self
            .unhandled_schemes
            .lock()
            .map(|schemes| schemes.iter().any(|s| s == parsed.scheme()))
            .unwrap_or(false);
        if unhandled {
            return Err(LaunchError::NoHandler {
                uri: uri.to_string(),
                reason: format!("no activity registered for scheme {}", parsed.scheme()),
            });
        }

        info!(uri, "delegated (recorded)");
        if let Ok(mut opened) = self.opened.lock() {
            opened.push(uri.to_string());
        }
        Ok(())
    }
}
