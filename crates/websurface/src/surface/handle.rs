use tokio::sync::{mpsc, oneshot};
use websurface_common::SurfaceId;
use websurface_config::SurfaceConfig;

use crate::engine::{EngineCallback, SurfaceImage};
use crate::error::{CaptureError, SurfaceError};
use crate::lifecycle::ActivityResult;

use super::command::SurfaceCommand;

/// Cloneable, `Send` handle that queues commands for a surface's driver.
///
/// Every method only enqueues; nothing blocks. Errors mean the driver is gone.
#[derive(Debug, Clone)]
pub struct SurfaceHandle {
    id: SurfaceId,
    commands: mpsc::UnboundedSender<SurfaceCommand>,
}

impl SurfaceHandle {
    pub(super) fn new(id: SurfaceId, commands: mpsc::UnboundedSender<SurfaceCommand>) -> Self {
        Self { id, commands }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    pub fn send(&self, command: SurfaceCommand) -> Result<(), SurfaceError> {
        self.commands
            .send(command)
            .map_err(|_| SurfaceError::QueueClosed)
    }

    pub fn load(&self, url: impl Into<String>, content: Option<String>) -> Result<(), SurfaceError> {
        self.send(SurfaceCommand::Load {
            url: url.into(),
            content,
        })
    }

    pub fn set_localhost_only(&self, enabled: bool) -> Result<(), SurfaceError> {
        self.send(SurfaceCommand::SetLocalhostOnly(enabled))
    }

    pub fn set_injected_script(&self, script: Option<String>) -> Result<(), SurfaceError> {
        self.send(SurfaceCommand::SetInjectedScript(script))
    }

    pub fn set_messaging_enabled(&self, enabled: bool) -> Result<(), SurfaceError> {
        self.send(SurfaceCommand::SetMessagingEnabled(enabled))
    }

    /// Push configured defaults into a live surface.
    pub fn apply_config(&self, config: &SurfaceConfig) -> Result<(), SurfaceError> {
        self.set_localhost_only(config.localhost_only)?;
        self.set_injected_script(config.effective_injected_script().map(str::to_string))?;
        self.set_messaging_enabled(config.messaging_enabled)
    }

    pub fn on_host_resume(&self) -> Result<(), SurfaceError> {
        self.send(SurfaceCommand::HostResume)
    }

    pub fn on_host_pause(&self) -> Result<(), SurfaceError> {
        self.send(SurfaceCommand::HostPause)
    }

    pub fn on_host_destroy(&self) -> Result<(), SurfaceError> {
        self.send(SurfaceCommand::HostDestroy)
    }

    pub fn on_activity_result(&self, result: ActivityResult) -> Result<(), SurfaceError> {
        self.send(SurfaceCommand::ActivityResult(result))
    }

    /// Forward an engine callback raised off the surface's thread.
    pub fn engine_callback(&self, callback: EngineCallback) -> Result<(), SurfaceError> {
        self.send(SurfaceCommand::Engine(callback))
    }

    /// Queue a bitmap capture. The result arrives once the driver has run
    /// the command and the engine has reported back.
    pub fn request_capture(&self) -> Result<PendingCapture, SurfaceError> {
        let (tx, rx) = oneshot::channel();
        self.send(SurfaceCommand::Capture(tx))?;
        Ok(PendingCapture(rx))
    }
}

/// A capture in flight.
#[derive(Debug)]
pub struct PendingCapture(oneshot::Receiver<Result<SurfaceImage, CaptureError>>);

impl PendingCapture {
    pub async fn outcome(self) -> Result<SurfaceImage, CaptureError> {
        self.0
            .await
            .unwrap_or_else(|_| Err(CaptureError::Abandoned))
    }

    /// Non-blocking poll. `None` while the engine has not reported yet.
    pub fn try_outcome(&mut self) -> Option<Result<SurfaceImage, CaptureError>> {
        match self.0.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(CaptureError::Abandoned)),
        }
    }
}
