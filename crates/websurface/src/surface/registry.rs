use std::collections::HashMap;

use tracing::debug;
use websurface_common::SurfaceId;

use crate::error::CaptureError;

use super::handle::{PendingCapture, SurfaceHandle};

/// Host-held map from surface identity to its handle.
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    handles: HashMap<SurfaceId, SurfaceHandle>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handle, returning any previous handle for the same id.
    pub fn register(&mut self, handle: SurfaceHandle) -> Option<SurfaceHandle> {
        debug!(surface_id = %handle.id(), "surface registered");
        self.handles.insert(handle.id(), handle)
    }

    pub fn get(&self, id: SurfaceId) -> Option<&SurfaceHandle> {
        self.handles.get(&id)
    }

    pub fn contains(&self, id: SurfaceId) -> bool {
        self.handles.contains_key(&id)
    }

    /// Forget a surface without touching it.
    pub fn remove(&mut self, id: SurfaceId) -> Option<SurfaceHandle> {
        self.handles.remove(&id)
    }

    /// Queue teardown for a surface and forget it.
    pub fn destroy(&mut self, id: SurfaceId) -> bool {
        match self.handles.remove(&id) {
            Some(handle) => {
                // A closed queue means the driver is already gone.
                let _ = handle.on_host_destroy();
                debug!(surface_id = %id, "surface destroy queued");
                true
            }
            None => false,
        }
    }

    /// Used during host shutdown.
    pub fn destroy_all(&mut self) {
        for id in self.ids() {
            self.destroy(id);
        }
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<SurfaceId> {
        let mut ids: Vec<SurfaceId> = self.handles.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Queue a capture of the surface registered as `id`.
    pub fn capture(&self, id: SurfaceId) -> Result<PendingCapture, CaptureError> {
        let handle = self.get(id).ok_or(CaptureError::UnknownSurface(id))?;
        handle.request_capture().map_err(|_| CaptureError::Abandoned)
    }
}
