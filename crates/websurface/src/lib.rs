//! Embeddable web-content surface.
//!
//! Bridges a browser engine into a host's component/event model:
//! - Ordered, timestamped host events from engine lifecycle callbacks
//! - Navigation policy (load internally, block and notify, delegate externally)
//! - Bidirectional script messaging that survives per-navigation context resets
//! - Host lifecycle coordination (pause/resume, file chooser, teardown)
//! - One-shot script injection per load
//!
//! The engine itself is a collaborator behind [`EngineDriver`]. A
//! [`HeadlessEngine`] is always available; enable the `wry` feature for a
//! `wry::WebView` backed engine.

pub mod bridge;
pub mod clock;
pub mod emitter;
pub mod engine;
pub mod error;
pub mod events;
pub mod injector;
pub mod launcher;
pub mod lifecycle;
pub mod policy;
pub mod surface;

pub use bridge::{BridgeObject, MessageBridge, BRIDGE_NAME};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use emitter::{event_channel, EventEmitter, EventSink, EventStream};
pub use engine::{
    ChromeCallbackSink, EngineCallback, EngineDriver, FileChooserRequest, HeadlessEngine,
    NavigationCallbackSink, NavigationHistory, SurfaceImage,
};
pub use error::{CaptureError, EngineError, SurfaceError};
pub use events::{
    ErrorEvent, HostEvent, LoadFinishedEvent, MessageEvent, NavigationEvent, ProgressEvent,
};
pub use injector::{ScriptInjector, ShimState};
pub use launcher::{ExternalLauncher, LaunchError, RecordingLauncher, SystemLauncher};
pub use lifecycle::{ActivityResult, LifecycleCoordinator, LifecycleState};
pub use policy::{NavigationDecision, NavigationPolicy};
pub use surface::{
    PendingCapture, Surface, SurfaceCommand, SurfaceDriver, SurfaceHandle, SurfaceRegistry,
};
pub use websurface_common::SurfaceId;
