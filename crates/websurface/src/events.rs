//! Host-facing event types.
//!
//! Every event is tagged with the emitting surface and, except for script
//! messages, the monotonic time at which it was dispatched.

use serde::{Deserialize, Serialize};
use websurface_common::SurfaceId;

/// Navigation state snapshot, emitted when a load starts and when it finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEvent {
    pub surface_id: SurfaceId,
    pub timestamp_ms: u64,
    pub is_loading: bool,
    pub title: String,
    pub url: String,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub surface_id: SurfaceId,
    pub timestamp_ms: u64,
    /// Load progress, always within `0..=100`.
    pub percent: u8,
}

/// An engine-reported load failure, passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEvent {
    pub surface_id: SurfaceId,
    pub timestamp_ms: u64,
    pub error_code: i32,
    pub description: String,
    pub failing_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadFinishedEvent {
    pub surface_id: SurfaceId,
    pub timestamp_ms: u64,
}

/// A string posted by hosted script through the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub surface_id: SurfaceId,
    pub payload: String,
}

/// Everything a surface can report to its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum HostEvent {
    LoadFinished(LoadFinishedEvent),
    NavigationStateChange(NavigationEvent),
    Progress(ProgressEvent),
    Error(ErrorEvent),
    Message(MessageEvent),
}

impl HostEvent {
    /// Name under which the host registers a listener for this event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadFinished(_) => "loadingFinish",
            Self::NavigationStateChange(_) => "navigationStateChange",
            Self::Progress(_) => "progress",
            Self::Error(_) => "loadingError",
            Self::Message(_) => "message",
        }
    }

    pub fn surface_id(&self) -> SurfaceId {
        match self {
            Self::LoadFinished(e) => e.surface_id,
            Self::NavigationStateChange(e) => e.surface_id,
            Self::Progress(e) => e.surface_id,
            Self::Error(e) => e.surface_id,
            Self::Message(e) => e.surface_id,
        }
    }

    /// Dispatch time. Script messages carry none.
    pub fn timestamp_ms(&self) -> Option<u64> {
        match self {
            Self::LoadFinished(e) => Some(e.timestamp_ms),
            Self::NavigationStateChange(e) => Some(e.timestamp_ms),
            Self::Progress(e) => Some(e.timestamp_ms),
            Self::Error(e) => Some(e.timestamp_ms),
            Self::Message(_) => None,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize event: {e}\"}}"))
    }
}
