//! Script ⇄ host messaging.
//!
//! - **Script -> host**: page script calls `window.postMessage(data)`. The
//!   shim installed by [`MessageBridge::install_shim`] forwards
//!   `String(data)` to the bridge object's `postMessage`, which emits a
//!   `Message` host event.
//! - The engine discards the page's script context on every navigation, so
//!   the shim has to be installed again after each load (see
//!   [`ScriptInjector`](crate::ScriptInjector)).
//! - Behind a [`SurfaceDriver`](crate::SurfaceDriver), inbound messages are
//!   queued as [`SurfaceCommand::ScriptMessage`] like every other engine
//!   callback and emitted only if their registration is still current when
//!   the command is applied.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::emitter::EventEmitter;
use crate::engine::EngineDriver;
use crate::surface::SurfaceCommand;

/// Where bridge objects send inbound messages. `None` emits directly. The
/// sender is weak so the bridge never keeps a driver's queue open.
type CommandRoute = Arc<Mutex<Option<mpsc::WeakUnboundedSender<SurfaceCommand>>>>;

/// Global name of the bridge object inside the page.
pub const BRIDGE_NAME: &str = "__WEBSURFACE_BRIDGE";

/// JavaScript that keeps the page's own `postMessage` as
/// `window.originalPostMessage` and routes `window.postMessage` to the bridge.
pub fn shim_script() -> String {
    format!(
        "window.originalPostMessage = window.postMessage, \
         window.postMessage = function(data) {{ {BRIDGE_NAME}.postMessage(String(data)); }}"
    )
}

/// The script-reachable object. Its single method delivers a message to the
/// host.
///
/// Each registration gets a fresh id and liveness flag; once the bridge is
/// unregistered, calls through any copy the engine still holds are dropped.
#[derive(Debug, Clone)]
pub struct BridgeObject {
    emitter: EventEmitter,
    registration: u64,
    live: Arc<AtomicBool>,
    route: CommandRoute,
}

impl BridgeObject {
    fn new(emitter: EventEmitter, registration: u64, route: CommandRoute) -> Self {
        Self {
            emitter,
            registration,
            live: Arc::new(AtomicBool::new(true)),
            route,
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Inbound entry point. Returns whether the message was emitted or
    /// queued for the surface.
    pub fn post_message(&self, message: impl Into<String>) -> bool {
        if !self.is_live() {
            debug!(
                surface_id = %self.emitter.surface_id(),
                "message on unregistered bridge dropped"
            );
            return false;
        }
        let payload = message.into();
        let route = match self.route.lock() {
            Ok(route) => route.clone(),
            Err(_) => None,
        };
        let Some(weak) = route else {
            self.emitter.message(payload);
            return true;
        };
        let command = SurfaceCommand::ScriptMessage {
            registration: self.registration,
            payload,
        };
        match weak.upgrade().map(|commands| commands.send(command)) {
            Some(Ok(())) => true,
            _ => {
                debug!(
                    surface_id = %self.emitter.surface_id(),
                    "surface queue closed, message dropped"
                );
                false
            }
        }
    }

    fn retire(&self) {
        self.live.store(false, Ordering::SeqCst);
    }
}

/// Owns the messaging-enabled flag and the current bridge registration.
#[derive(Debug, Default)]
pub struct MessageBridge {
    registration: Option<BridgeObject>,
    next_registration: u64,
    route: CommandRoute,
}

impl MessageBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.registration.is_some()
    }

    /// Queue inbound messages on `commands` instead of emitting them, for
    /// every registration past and future. `None` restores direct emission.
    pub fn route_through(&self, commands: Option<&mpsc::UnboundedSender<SurfaceCommand>>) {
        if let Ok(mut route) = self.route.lock() {
            *route = commands.map(mpsc::UnboundedSender::downgrade);
        }
    }

    /// Whether a queued message from `registration` may still be emitted.
    pub fn accepts(&self, registration: u64) -> bool {
        self.registration
            .as_ref()
            .is_some_and(|current| current.registration == registration && current.is_live())
    }

    /// Toggle messaging. Same-state calls do nothing; returns whether the
    /// state changed.
    ///
    /// Enabling registers a new bridge object and installs the shim right
    /// away, without waiting for the next load.
    pub fn set_enabled<E>(&mut self, enabled: bool, engine: &mut E, emitter: &EventEmitter) -> bool
    where
        E: EngineDriver + ?Sized,
    {
        if enabled == self.is_enabled() {
            return false;
        }

        if enabled {
            self.next_registration += 1;
            let bridge = BridgeObject::new(
                emitter.clone(),
                self.next_registration,
                Arc::clone(&self.route),
            );
            engine.add_js_interface(BRIDGE_NAME, bridge.clone());
            self.registration = Some(bridge);
            self.install_shim(engine);
            info!(surface_id = %emitter.surface_id(), "messaging enabled");
        } else {
            if let Some(bridge) = self.registration.take() {
                bridge.retire();
            }
            engine.remove_js_interface(BRIDGE_NAME);
            info!(surface_id = %emitter.surface_id(), "messaging disabled");
        }
        true
    }

    /// Drop the registration without calling into the engine, for when the
    /// engine is already gone.
    pub fn detach(&mut self) {
        if let Some(bridge) = self.registration.take() {
            bridge.retire();
        }
    }

    /// Evaluate the shim if messaging is enabled. Returns whether it ran.
    pub fn install_shim<E>(&self, engine: &mut E) -> bool
    where
        E: EngineDriver + ?Sized,
    {
        if !self.is_enabled() {
            return false;
        }
        if let Err(e) = engine.evaluate_script(&shim_script()) {
            warn!(error = %e, "failed to install messaging shim");
            return false;
        }
        true
    }
}
