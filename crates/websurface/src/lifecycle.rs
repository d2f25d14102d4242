//! Host lifecycle coordination.
//!
//! Pauses and resumes engine timers with the host and decides when the
//! engine is told it was hidden or shown. An open file chooser backgrounds
//! the host temporarily; that pause must not count as "hidden".

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::EngineDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Active,
    Backgrounded,
    /// Terminal. The engine has been torn down.
    Destroyed,
}

/// Result of an external activity (e.g. a file chooser) returning to the host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivityResult {
    pub request_code: i32,
    pub result_code: i32,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug)]
pub struct LifecycleCoordinator {
    state: LifecycleState,
    choosing_file: bool,
}

impl Default for LifecycleCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleCoordinator {
    /// Starts `Active`: a freshly mounted surface is assumed visible, so the
    /// first resume after mount does not fire the show hook.
    pub fn new() -> Self {
        Self {
            state: LifecycleState::Active,
            choosing_file: false,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == LifecycleState::Destroyed
    }

    pub fn is_choosing_file(&self) -> bool {
        self.choosing_file
    }

    /// Resume timers. The show hook fires only when coming back from
    /// `Backgrounded`, mirroring the hide hook that put it there.
    pub fn on_host_resume<E>(&mut self, engine: &mut E)
    where
        E: EngineDriver + ?Sized,
    {
        if self.is_destroyed() {
            return;
        }
        engine.resume_timers();
        if self.state == LifecycleState::Backgrounded {
            engine.on_show();
        }
        self.state = LifecycleState::Active;
    }

    /// Pause timers and hide, unless a file chooser is open.
    pub fn on_host_pause<E>(&mut self, engine: &mut E)
    where
        E: EngineDriver + ?Sized,
    {
        if self.is_destroyed() {
            return;
        }
        engine.pause_timers();
        if self.choosing_file {
            debug!("host paused while choosing a file; staying visible");
            return;
        }
        if self.state == LifecycleState::Active {
            engine.on_hide();
            self.state = LifecycleState::Backgrounded;
        }
    }

    /// Tear the engine down. Returns false if it already was.
    pub fn on_host_destroy<E>(&mut self, engine: &mut E) -> bool
    where
        E: EngineDriver + ?Sized,
    {
        if self.is_destroyed() {
            return false;
        }
        engine.destroy();
        self.state = LifecycleState::Destroyed;
        self.choosing_file = false;
        info!("engine destroyed");
        true
    }

    /// Ends any chooser interaction, then lets the engine handle the result.
    pub fn on_activity_result<E>(&mut self, engine: &mut E, result: &ActivityResult)
    where
        E: EngineDriver + ?Sized,
    {
        if self.is_destroyed() {
            return;
        }
        if self.choosing_file {
            self.choosing_file = false;
            debug!(request_code = result.request_code, "file chooser finished");
        }
        engine.on_activity_result(result);
    }

    pub fn on_file_chooser_opened(&mut self) {
        if !self.is_destroyed() {
            self.choosing_file = true;
        }
    }

    /// A new navigation invalidates any stale chooser state.
    pub fn reset_for_load(&mut self) {
        self.choosing_file = false;
    }
}
