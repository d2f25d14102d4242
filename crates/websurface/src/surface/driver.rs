use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::EngineDriver;

use super::command::SurfaceCommand;
use super::handle::SurfaceHandle;
use super::Surface;

/// Owns a surface on its UI thread and applies queued commands in order.
pub struct SurfaceDriver<E: EngineDriver> {
    surface: Surface<E>,
    commands: mpsc::UnboundedReceiver<SurfaceCommand>,
}

impl<E: EngineDriver> Surface<E> {
    /// Move the surface behind a command queue.
    ///
    /// Script messages from the bridge are queued alongside everything else
    /// from here on.
    pub fn into_driver(self) -> (SurfaceHandle, SurfaceDriver<E>) {
        let (tx, rx) = mpsc::unbounded_channel();
        self.bridge.route_through(Some(&tx));
        let handle = SurfaceHandle::new(self.id, tx);
        (
            handle,
            SurfaceDriver {
                surface: self,
                commands: rx,
            },
        )
    }
}

impl<E: EngineDriver> SurfaceDriver<E> {
    pub fn surface(&self) -> &Surface<E> {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface<E> {
        &mut self.surface
    }

    /// Apply everything queued so far without waiting. Returns how many
    /// commands ran. Meant to be called from the host's event loop.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(command) = self.commands.try_recv() {
            self.surface.apply(command);
            applied += 1;
        }
        applied
    }

    /// Apply commands as they arrive until every handle is dropped or the
    /// surface is destroyed. Returns the surface.
    pub async fn run(mut self) -> Surface<E> {
        while let Some(command) = self.commands.recv().await {
            self.surface.apply(command);
            if self.surface.is_destroyed() {
                debug!(surface_id = %self.surface.id(), "driver stopping after destroy");
                break;
            }
        }
        self.into_surface()
    }

    /// Take the surface back out of the queue. Script messages are emitted
    /// directly again.
    pub fn into_surface(self) -> Surface<E> {
        self.surface.bridge.route_through(None);
        self.surface
    }
}
