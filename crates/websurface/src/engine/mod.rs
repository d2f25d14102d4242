//! The browser engine collaborator.
//!
//! [`EngineDriver`] is what a surface calls into. The engine calls back
//! through two narrow sinks, [`NavigationCallbackSink`] and
//! [`ChromeCallbackSink`], or through queued [`EngineCallback`]s when the
//! engine lives behind a [`SurfaceHandle`](crate::SurfaceHandle).

use serde::{Deserialize, Serialize};

use crate::bridge::BridgeObject;
use crate::error::EngineError;
use crate::lifecycle::ActivityResult;

mod headless;
#[cfg(feature = "wry")]
pub mod wry_engine;

pub use headless::{EngineCall, HeadlessEngine};

/// Back/forward availability at the time of a callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationHistory {
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

/// RGBA pixels captured from a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Completion for [`EngineDriver::capture_bitmap_async`]: the image, if
/// any, and the engine status code (0 means success).
pub type CaptureCallback = Box<dyn FnOnce(Option<SurfaceImage>, i32)>;

/// Operations a surface needs from its engine.
pub trait EngineDriver {
    /// Start a navigation. With `content`, render it as the document for `url`.
    fn load(&mut self, url: &str, content: Option<&str>) -> Result<(), EngineError>;

    fn evaluate_script(&mut self, script: &str) -> Result<(), EngineError>;

    /// Expose `bridge` to page script under the global `name`.
    fn add_js_interface(&mut self, name: &str, bridge: BridgeObject);

    fn remove_js_interface(&mut self, name: &str);

    fn pause_timers(&mut self);

    fn resume_timers(&mut self);

    /// The surface became visible again.
    fn on_show(&mut self);

    /// The surface was hidden.
    fn on_hide(&mut self);

    /// Irreversible teardown.
    fn destroy(&mut self);

    fn on_activity_result(&mut self, result: &ActivityResult);

    /// `None` until the engine has a history object.
    fn navigation_history(&self) -> Option<NavigationHistory>;

    fn title(&self) -> String;

    /// Capture the rendered surface. `callback` runs on the engine's thread.
    fn capture_bitmap_async(&mut self, callback: CaptureCallback);
}

/// A file chooser the page opened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChooserRequest {
    pub accept_type: String,
    pub capture: bool,
}

/// Resource-client callbacks: load lifecycle and navigation requests.
pub trait NavigationCallbackSink {
    fn on_load_started(&mut self, url: &str);

    fn on_load_finished(&mut self, url: &str);

    fn on_progress_changed(&mut self, percent: i32);

    fn on_received_load_error(&mut self, error_code: i32, description: &str, failing_url: &str);

    /// Returns true when the engine must not load `url` itself.
    fn should_override_url_loading(&mut self, url: &str) -> bool;
}

/// UI-client callbacks.
pub trait ChromeCallbackSink {
    fn on_file_chooser_opened(&mut self, request: &FileChooserRequest);
}

/// An engine callback in transit, for engines that cannot call the surface
/// directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineCallback {
    LoadStarted {
        url: String,
    },
    LoadFinished {
        url: String,
    },
    ProgressChanged {
        percent: i32,
    },
    LoadError {
        code: i32,
        description: String,
        failing_url: String,
    },
    NavigationRequested {
        url: String,
    },
    FileChooserOpened {
        #[serde(default)]
        accept_type: String,
        #[serde(default)]
        capture: bool,
    },
}

impl EngineCallback {
    /// Deliver this callback to the sinks. Returns the override verdict for
    /// navigation requests, `None` otherwise.
    pub fn deliver<S>(self, sink: &mut S) -> Option<bool>
    where
        S: NavigationCallbackSink + ChromeCallbackSink,
    {
        match self {
            Self::LoadStarted { url } => sink.on_load_started(&url),
            Self::LoadFinished { url } => sink.on_load_finished(&url),
            Self::ProgressChanged { percent } => sink.on_progress_changed(percent),
            Self::LoadError {
                code,
                description,
                failing_url,
            } => sink.on_received_load_error(code, &description, &failing_url),
            Self::NavigationRequested { url } => {
                return Some(sink.should_override_url_loading(&url));
            }
            Self::FileChooserOpened {
                accept_type,
                capture,
            } => sink.on_file_chooser_opened(&FileChooserRequest {
                accept_type,
                capture,
            }),
        }
        None
    }
}
