//! In-memory engine that records every call.
//!
//! Used by the scenario runner and by tests. Page script is simulated with
//! [`HeadlessEngine::post_from_script`], which reaches the host only while a
//! bridge object is registered under the given name.

use std::collections::HashMap;

use tracing::debug;

use super::{CaptureCallback, EngineDriver, NavigationHistory, SurfaceImage};
use crate::bridge::BridgeObject;
use crate::error::EngineError;
use crate::lifecycle::ActivityResult;

/// One recorded call into the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Load {
        url: String,
        content: Option<String>,
    },
    EvaluateScript(String),
    AddJsInterface(String),
    RemoveJsInterface(String),
    PauseTimers,
    ResumeTimers,
    Show,
    Hide,
    Destroy,
    ActivityResult(ActivityResult),
    CaptureBitmap,
}

#[derive(Debug)]
pub struct HeadlessEngine {
    calls: Vec<EngineCall>,
    history: Option<NavigationHistory>,
    title: String,
    interfaces: HashMap<String, BridgeObject>,
    capture_image: Option<SurfaceImage>,
    capture_status: i32,
    load_failure: Option<String>,
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            history: Some(NavigationHistory::default()),
            title: String::new(),
            interfaces: HashMap::new(),
            capture_image: Some(SurfaceImage {
                width: 1,
                height: 1,
                rgba: vec![0, 0, 0, 0],
            }),
            capture_status: 0,
            load_failure: None,
        }
    }

    pub fn set_history(&mut self, history: Option<NavigationHistory>) {
        self.history = history;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Outcome reported by the next captures.
    pub fn set_capture_result(&mut self, image: Option<SurfaceImage>, status: i32) {
        self.capture_image = image;
        self.capture_status = status;
    }

    /// Make `load` fail with `message`, or succeed again with `None`.
    pub fn set_load_failure(&mut self, message: Option<String>) {
        self.load_failure = message;
    }

    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<EngineCall> {
        std::mem::take(&mut self.calls)
    }

    /// Scripts evaluated so far, in order.
    pub fn evaluated_scripts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                EngineCall::EvaluateScript(script) => Some(script.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &EngineCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn has_interface(&self, name: &str) -> bool {
        self.interfaces.contains_key(name)
    }

    /// Simulate page script calling `name.postMessage(message)`.
    ///
    /// Returns false when no object is registered under `name`.
    pub fn post_from_script(&self, name: &str, message: &str) -> bool {
        match self.interfaces.get(name) {
            Some(bridge) => bridge.post_message(message),
            None => {
                debug!(name, "script posted to unregistered interface");
                false
            }
        }
    }
}

impl EngineDriver for HeadlessEngine {
    fn load(&mut self, url: &str, content: Option<&str>) -> Result<(), EngineError> {
        self.calls.push(EngineCall::Load {
            url: url.to_string(),
            content: content.map(str::to_string),
        });
        match &self.load_failure {
            Some(message) => Err(EngineError::new(message.clone())),
            None => Ok(()),
        }
    }

    fn evaluate_script(&mut self, script: &str) -> Result<(), EngineError> {
        self.calls.push(EngineCall::EvaluateScript(script.to_string()));
        Ok(())
    }

    fn add_js_interface(&mut self, name: &str, bridge: BridgeObject) {
        self.calls.push(EngineCall::AddJsInterface(name.to_string()));
        self.interfaces.insert(name.to_string(), bridge);
    }

    fn remove_js_interface(&mut self, name: &str) {
        self.calls.push(EngineCall::RemoveJsInterface(name.to_string()));
        self.interfaces.remove(name);
    }

    fn pause_timers(&mut self) {
        self.calls.push(EngineCall::PauseTimers);
    }

    fn resume_timers(&mut self) {
        self.calls.push(EngineCall::ResumeTimers);
    }

    fn on_show(&mut self) {
        self.calls.push(EngineCall::Show);
    }

    fn on_hide(&mut self) {
        self.calls.push(EngineCall::Hide);
    }

    fn destroy(&mut self) {
        self.calls.push(EngineCall::Destroy);
        self.interfaces.clear();
    }

    fn on_activity_result(&mut self, result: &ActivityResult) {
        self.calls.push(EngineCall::ActivityResult(result.clone()));
    }

    fn navigation_history(&self) -> Option<NavigationHistory> {
        self.history
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn capture_bitmap_async(&mut self, callback: CaptureCallback) {
        self.calls.push(EngineCall::CaptureBitmap);
        callback(self.capture_image.clone(), self.capture_status);
    }
}
