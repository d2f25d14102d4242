pub mod errors;
pub mod id;

pub use errors::{ConfigError, WebSurfaceError};
pub use id::{next_surface_id, SurfaceId};

pub type Result<T> = std::result::Result<T, WebSurfaceError>;

/// URI scheme reserved for script-driven "navigation complete" signals.
///
/// A page sets `location.href = "websurface-js-navigation://..."` to tell the
/// host it has settled without the engine performing a real load.
pub const DEFAULT_JS_NAVIGATION_SCHEME: &str = "websurface-js-navigation";

/// Schemes the engine is allowed to render directly.
pub const RENDERABLE_SCHEMES: &[&str] = &["http", "https", "file"];
