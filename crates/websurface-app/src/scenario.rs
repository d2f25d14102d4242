//! Scripted sessions replayed against a headless surface.
//!
//! A scenario is a JSON document `{"steps": [...]}`. Each step is tagged by
//! `op`. Host-side steps go through the surface's command queue; steps that
//! stand in for the page or the engine act on the headless engine directly.

use std::path::Path;

use serde::Deserialize;
use websurface::{ActivityResult, EngineCallback, NavigationHistory};
use websurface_common::{Result, WebSurfaceError};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    // -- Host --
    Load {
        url: String,
        #[serde(default)]
        content: Option<String>,
    },
    SetLocalhostOnly {
        enabled: bool,
    },
    SetInjectedScript {
        #[serde(default)]
        script: Option<String>,
    },
    SetMessagingEnabled {
        enabled: bool,
    },
    HostResume,
    HostPause,
    HostDestroy,
    ActivityResult {
        request_code: i32,
        result_code: i32,
        #[serde(default)]
        data: Option<String>,
    },
    Capture,

    // -- Engine --
    Engine {
        callback: EngineCallback,
    },
    SetTitle {
        title: String,
    },
    SetHistory {
        #[serde(default)]
        history: Option<NavigationHistory>,
    },
    SetCaptureStatus {
        status: i32,
        #[serde(default)]
        empty: bool,
    },

    // -- Page --
    ScriptMessage {
        payload: String,
    },
}

impl Step {
    pub fn activity_result(&self) -> Option<ActivityResult> {
        match self {
            Self::ActivityResult {
                request_code,
                result_code,
                data,
            } => Some(ActivityResult {
                request_code: *request_code,
                result_code: *result_code,
                data: data.clone(),
            }),
            _ => None,
        }
    }
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| WebSurfaceError::Scenario(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents).map_err(|e| match e {
            WebSurfaceError::Scenario(msg) => {
                WebSurfaceError::Scenario(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }
}
