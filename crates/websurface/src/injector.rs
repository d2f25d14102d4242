//! Per-navigation script injection.

use tracing::{debug, warn};

use crate::bridge::MessageBridge;
use crate::engine::EngineDriver;

/// Whether the messaging shim is present in the current script context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShimState {
    /// The context was (or is about to be) replaced; the shim is gone.
    #[default]
    Disarmed,
    /// The shim was installed after the last load completion.
    Armed,
}

/// Applies the host-configured script at most once per `load`, always after
/// the messaging shim.
#[derive(Debug, Default)]
pub struct ScriptInjector {
    script: Option<String>,
    injected_this_load: bool,
    shim: ShimState,
}

impl ScriptInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    /// Takes effect from the next injection; an already injected script is
    /// not re-run.
    pub fn set_script(&mut self, script: Option<String>) {
        self.script = script;
    }

    pub fn injected_this_load(&self) -> bool {
        self.injected_this_load
    }

    pub fn shim_state(&self) -> ShimState {
        self.shim
    }

    /// A new `load` call: the script may run once more.
    pub fn reset_for_load(&mut self) {
        self.injected_this_load = false;
        self.shim = ShimState::Disarmed;
    }

    /// Navigation started; the engine is replacing the script context.
    pub fn disarm(&mut self) {
        self.shim = ShimState::Disarmed;
    }

    /// Re-arm after a load completion.
    ///
    /// Installs the shim if the context was reset, then evaluates the script
    /// if it has not run since the last `load`. Repeated calls are no-ops.
    pub fn arm_and_inject<E>(&mut self, bridge: &MessageBridge, engine: &mut E)
    where
        E: EngineDriver + ?Sized,
    {
        if self.shim == ShimState::Disarmed {
            bridge.install_shim(engine);
            self.shim = ShimState::Armed;
        }

        if self.injected_this_load {
            return;
        }
        self.injected_this_load = true;

        if let Some(script) = self.script.as_deref().filter(|s| !s.is_empty()) {
            debug!(len = script.len(), "evaluating injected script");
            if let Err(e) = engine.evaluate_script(script) {
                warn!(error = %e, "injected script failed");
            }
        }
    }
}
