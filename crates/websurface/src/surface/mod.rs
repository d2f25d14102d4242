//! The surface: one embeddable web-content instance and its bridging state.
//!
//! `Surface` is single-thread-affine. Hosts that are not can own it through a
//! [`SurfaceDriver`] and talk to it via cloneable [`SurfaceHandle`]s; every
//! mutation and engine callback then goes through one ordered queue.

use std::sync::Arc;

use tracing::{debug, info, warn};
use websurface_common::SurfaceId;
use websurface_config::SurfaceConfig;

use crate::bridge::MessageBridge;
use crate::clock::Clock;
use crate::emitter::{EventEmitter, EventSink};
use crate::engine::{EngineCallback, EngineDriver, SurfaceImage};
use crate::error::{CaptureError, SurfaceError};
use crate::injector::{ScriptInjector, ShimState};
use crate::launcher::{ExternalLauncher, RecordingLauncher, SystemLauncher};
use crate::lifecycle::{ActivityResult, LifecycleCoordinator, LifecycleState};
use crate::policy::NavigationPolicy;

mod callbacks;
mod command;
mod driver;
mod handle;
mod registry;

#[cfg(test)]
mod tests;

pub use command::SurfaceCommand;
pub use driver::SurfaceDriver;
pub use handle::{PendingCapture, SurfaceHandle};
pub use registry::SurfaceRegistry;

pub struct Surface<E: EngineDriver> {
    id: SurfaceId,
    engine: E,
    policy: NavigationPolicy,
    launcher: Box<dyn ExternalLauncher>,
    emitter: EventEmitter,
    bridge: MessageBridge,
    injector: ScriptInjector,
    lifecycle: LifecycleCoordinator,
}

impl<E: EngineDriver> Surface<E> {
    /// A surface with the default policy, the system launcher and a
    /// monotonic clock. Events go to `events`.
    pub fn new(id: SurfaceId, engine: E, events: EventSink) -> Self {
        Self {
            id,
            engine,
            policy: NavigationPolicy::default(),
            launcher: Box::new(SystemLauncher),
            emitter: EventEmitter::new(id, events),
            bridge: MessageBridge::new(),
            injector: ScriptInjector::new(),
            lifecycle: LifecycleCoordinator::new(),
        }
    }

    /// A surface initialised from configured defaults.
    pub fn from_config(id: SurfaceId, engine: E, events: EventSink, config: &SurfaceConfig) -> Self {
        let mut surface = Self::new(id, engine, events).with_policy(NavigationPolicy::from_config(config));
        if !config.open_external {
            surface = surface.with_launcher(RecordingLauncher::new());
        }
        surface.set_injected_script(config.effective_injected_script().map(str::to_string));
        surface.set_messaging_enabled(config.messaging_enabled);
        surface
    }

    /// Replace the navigation policy. Keep a clone to share it with an
    /// engine adapter.
    pub fn with_policy(mut self, policy: NavigationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_launcher(mut self, launcher: impl ExternalLauncher + 'static) -> Self {
        self.launcher = Box::new(launcher);
        self
    }

    /// Must be set before messaging is enabled; the bridge object keeps the
    /// emitter it was registered with.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.emitter = self.emitter.with_clock(clock);
        self
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn policy(&self) -> &NavigationPolicy {
        &self.policy
    }

    pub fn localhost_only(&self) -> bool {
        self.policy.localhost_only()
    }

    pub fn messaging_enabled(&self) -> bool {
        self.bridge.is_enabled()
    }

    pub fn injected_script(&self) -> Option<&str> {
        self.injector.script()
    }

    pub fn injected_this_load(&self) -> bool {
        self.injector.injected_this_load()
    }

    pub fn shim_state(&self) -> ShimState {
        self.injector.shim_state()
    }

    pub fn is_choosing_file(&self) -> bool {
        self.lifecycle.is_choosing_file()
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn is_destroyed(&self) -> bool {
        self.lifecycle.is_destroyed()
    }

    // -- Configuration --

    pub fn set_localhost_only(&mut self, enabled: bool) {
        self.policy.set_localhost_only(enabled);
        debug!(surface_id = %self.id, enabled, "localhost-only mode");
    }

    pub fn set_injected_script(&mut self, script: Option<String>) {
        self.injector.set_script(script);
    }

    pub fn set_messaging_enabled(&mut self, enabled: bool) {
        if self.is_destroyed() {
            return;
        }
        self.bridge
            .set_enabled(enabled, &mut self.engine, &self.emitter);
    }

    // -- Navigation --

    /// Start a new navigation. Resets per-load state first.
    pub fn load(&mut self, url: &str, content: Option<&str>) -> Result<(), SurfaceError> {
        if self.is_destroyed() {
            return Err(SurfaceError::Destroyed);
        }
        self.injector.reset_for_load();
        self.lifecycle.reset_for_load();
        debug!(surface_id = %self.id, url, inline = content.is_some(), "load");
        self.engine.load(url, content)?;
        Ok(())
    }

    /// Install the shim and injected script for the current navigation.
    /// Idempotent until the next navigation.
    pub fn arm_and_inject(&mut self) {
        if self.is_destroyed() {
            return;
        }
        self.injector.arm_and_inject(&self.bridge, &mut self.engine);
    }

    /// Deliver a queued engine callback. Returns the override verdict for
    /// navigation requests.
    pub fn handle_engine_callback(&mut self, callback: EngineCallback) -> Option<bool> {
        callback.deliver(self)
    }

    /// Emit a queued inbound message if messaging has not been disabled or
    /// re-registered since it was posted.
    fn deliver_script_message(&self, registration: u64, payload: String) {
        if self.is_destroyed() || !self.bridge.accepts(registration) {
            debug!(surface_id = %self.id, registration, "stale script message dropped");
            return;
        }
        self.emitter.message(payload);
    }

    fn delegate_external(&self, uri: &str) {
        match self.launcher.open(uri) {
            Ok(()) => info!(surface_id = %self.id, uri, "navigation delegated"),
            Err(e) => warn!(
                surface_id = %self.id,
                uri,
                error = %e,
                "delegation failed, navigation suppressed"
            ),
        }
    }

    // -- Host lifecycle --

    pub fn on_host_resume(&mut self) {
        self.lifecycle.on_host_resume(&mut self.engine);
    }

    pub fn on_host_pause(&mut self) {
        self.lifecycle.on_host_pause(&mut self.engine);
    }

    pub fn on_host_destroy(&mut self) {
        if self.lifecycle.on_host_destroy(&mut self.engine) {
            self.bridge.detach();
            info!(surface_id = %self.id, "surface destroyed");
        }
    }

    pub fn on_activity_result(&mut self, result: &ActivityResult) {
        self.lifecycle.on_activity_result(&mut self.engine, result);
    }

    // -- Capture --

    /// Capture the rendered surface. `callback` runs on the engine's thread
    /// once the engine reports back.
    pub fn capture_image<F>(&mut self, callback: F)
    where
        F: FnOnce(Result<SurfaceImage, CaptureError>) + 'static,
    {
        if self.is_destroyed() {
            callback(Err(CaptureError::Destroyed));
            return;
        }
        let id = self.id;
        self.engine
            .capture_bitmap_async(Box::new(move |image, status| {
                let outcome = match (status, image) {
                    (0, Some(image)) => Ok(image),
                    (0, None) => Err(CaptureError::EmptyImage),
                    (status, _) => Err(CaptureError::EngineStatus(status)),
                };
                if let Err(e) = &outcome {
                    warn!(surface_id = %id, error = %e, "capture failed");
                }
                callback(outcome);
            }));
    }
}
