use tokio::sync::oneshot;
use tracing::warn;

use crate::engine::{EngineCallback, EngineDriver, SurfaceImage};
use crate::error::CaptureError;
use crate::lifecycle::ActivityResult;

use super::Surface;

/// One serialized operation on a surface.
#[derive(Debug)]
pub enum SurfaceCommand {
    Load {
        url: String,
        content: Option<String>,
    },
    SetLocalhostOnly(bool),
    SetInjectedScript(Option<String>),
    SetMessagingEnabled(bool),
    HostResume,
    HostPause,
    HostDestroy,
    ActivityResult(ActivityResult),
    Engine(EngineCallback),
    /// Page script posted a message through bridge registration
    /// `registration`.
    ScriptMessage {
        registration: u64,
        payload: String,
    },
    Capture(oneshot::Sender<Result<SurfaceImage, CaptureError>>),
}

impl<E: EngineDriver> Surface<E> {
    /// Apply a queued command.
    pub fn apply(&mut self, command: SurfaceCommand) {
        match command {
            SurfaceCommand::Load { url, content } => {
                if let Err(e) = self.load(&url, content.as_deref()) {
                    warn!(surface_id = %self.id, url, error = %e, "queued load failed");
                }
            }
            SurfaceCommand::SetLocalhostOnly(enabled) => self.set_localhost_only(enabled),
            SurfaceCommand::SetInjectedScript(script) => self.set_injected_script(script),
            SurfaceCommand::SetMessagingEnabled(enabled) => self.set_messaging_enabled(enabled),
            SurfaceCommand::HostResume => self.on_host_resume(),
            SurfaceCommand::HostPause => self.on_host_pause(),
            SurfaceCommand::HostDestroy => self.on_host_destroy(),
            SurfaceCommand::ActivityResult(result) => self.on_activity_result(&result),
            SurfaceCommand::Engine(callback) => {
                self.handle_engine_callback(callback);
            }
            SurfaceCommand::ScriptMessage {
                registration,
                payload,
            } => self.deliver_script_message(registration, payload),
            SurfaceCommand::Capture(responder) => self.capture_image(move |outcome| {
                // The requester may have given up waiting.
                let _ = responder.send(outcome);
            }),
        }
    }
}
