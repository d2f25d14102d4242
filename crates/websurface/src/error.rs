use websurface_common::{SurfaceId, WebSurfaceError};

/// Failure reported by the engine collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[cfg(feature = "wry")]
impl From<wry::Error> for EngineError {
    fn from(e: wry::Error) -> Self {
        Self(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("surface has been destroyed")]
    Destroyed,

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("surface command queue is closed")]
    QueueClosed,
}

/// Outcome of a failed bitmap capture.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("engine reported capture status {0}")]
    EngineStatus(i32),

    #[error("engine reported success without an image")]
    EmptyImage,

    #[error("surface has been destroyed")]
    Destroyed,

    #[error("capture was abandoned before completing")]
    Abandoned,

    #[error("no surface registered as {0}")]
    UnknownSurface(SurfaceId),
}

impl From<SurfaceError> for WebSurfaceError {
    fn from(e: SurfaceError) -> Self {
        match e {
            SurfaceError::Engine(inner) => WebSurfaceError::Engine(inner.0),
            other => WebSurfaceError::Surface(other.to_string()),
        }
    }
}

impl From<CaptureError> for WebSurfaceError {
    fn from(e: CaptureError) -> Self {
        WebSurfaceError::Surface(e.to_string())
    }
}
