//! Normalizes engine callbacks into host events.
//!
//! One emitter per surface. All events go through a single unbounded channel,
//! so the host sees them in the order the engine raised the callbacks.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, trace};
use websurface_common::SurfaceId;

use crate::clock::{Clock, MonotonicClock};
use crate::engine::NavigationHistory;
use crate::events::{
    ErrorEvent, HostEvent, LoadFinishedEvent, MessageEvent, NavigationEvent, ProgressEvent,
};

/// Sending half of the host event channel.
pub type EventSink = mpsc::UnboundedSender<HostEvent>;
/// Receiving half of the host event channel.
pub type EventStream = mpsc::UnboundedReceiver<HostEvent>;

/// Create a host event channel.
pub fn event_channel() -> (EventSink, EventStream) {
    mpsc::unbounded_channel()
}

/// The engine fires load callbacks with an empty URL while resetting its
/// internal state. Those are not navigations.
pub fn is_blank_url(url: &str) -> bool {
    url.is_empty()
}

#[derive(Clone)]
pub struct EventEmitter {
    surface_id: SurfaceId,
    clock: Arc<dyn Clock>,
    sink: EventSink,
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("surface_id", &self.surface_id)
            .field("closed", &self.sink.is_closed())
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    pub fn new(surface_id: SurfaceId, sink: EventSink) -> Self {
        Self {
            surface_id,
            clock: Arc::new(MonotonicClock),
            sink,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    /// Navigation started. Emits `NavigationStateChange { is_loading: true }`.
    ///
    /// Returns false when nothing was emitted: empty URL, or the engine has
    /// no history yet.
    pub fn load_started(
        &self,
        url: &str,
        title: &str,
        history: Option<NavigationHistory>,
    ) -> bool {
        if is_blank_url(url) {
            trace!(surface_id = %self.surface_id, "ignoring load-started with empty url");
            return false;
        }
        let Some(history) = history else {
            debug!(surface_id = %self.surface_id, url, "no navigation history yet");
            return false;
        };
        self.navigation_state(true, url, title, history);
        true
    }

    /// Navigation finished. Emits `LoadFinished`, then
    /// `NavigationStateChange { is_loading: false }` when history is available.
    pub fn load_finished(
        &self,
        url: &str,
        title: &str,
        history: Option<NavigationHistory>,
    ) -> bool {
        if is_blank_url(url) {
            trace!(surface_id = %self.surface_id, "ignoring load-finished with empty url");
            return false;
        }
        self.dispatch(HostEvent::LoadFinished(LoadFinishedEvent {
            surface_id: self.surface_id,
            timestamp_ms: self.clock.now_ms(),
        }));
        if let Some(history) = history {
            self.navigation_state(false, url, title, history);
        }
        true
    }

    /// Engines report progress as a signed integer; clamp it to a percentage.
    pub fn progress(&self, percent: i32) {
        self.dispatch(HostEvent::Progress(ProgressEvent {
            surface_id: self.surface_id,
            timestamp_ms: self.clock.now_ms(),
            percent: percent.clamp(0, 100) as u8,
        }));
    }

    pub fn load_error(&self, error_code: i32, description: &str, failing_url: &str) {
        self.dispatch(HostEvent::Error(ErrorEvent {
            surface_id: self.surface_id,
            timestamp_ms: self.clock.now_ms(),
            error_code,
            description: description.to_string(),
            failing_url: failing_url.to_string(),
        }));
    }

    pub fn message(&self, payload: String) {
        self.dispatch(HostEvent::Message(MessageEvent {
            surface_id: self.surface_id,
            payload,
        }));
    }

    fn navigation_state(&self, is_loading: bool, url: &str, title: &str, history: NavigationHistory) {
        self.dispatch(HostEvent::NavigationStateChange(NavigationEvent {
            surface_id: self.surface_id,
            timestamp_ms: self.clock.now_ms(),
            is_loading,
            title: title.to_string(),
            url: url.to_string(),
            can_go_back: history.can_go_back,
            can_go_forward: history.can_go_forward,
        }));
    }

    fn dispatch(&self, event: HostEvent) {
        trace!(surface_id = %self.surface_id, event = event.name(), "dispatch");
        if self.sink.send(event).is_err() {
            debug!(surface_id = %self.surface_id, "host event channel closed, event dropped");
        }
    }
}
