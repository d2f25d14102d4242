//! Configuration validation.
//!
//! Each check pushes a message into a shared list; the orchestrator turns a
//! non-empty list into a single `ConfigError::ValidationError`.


use crate::schema::{SurfaceConfig, WebSurfaceConfig};
use websurface_common::{ConfigError, RENDERABLE_SCHEMES};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &WebSurfaceConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_surface(&mut errors, &config.surface);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_surface(errors: &mut Vec<String>, surface: &SurfaceConfig) {
    let scheme = surface.js_navigation_scheme.as_str();

    if scheme.is_empty() {
        errors.push("surface.js_navigation_scheme must not be empty".into());
        return;
    }

    if !is_valid_scheme(scheme) {
        errors.push(format!(
            "surface.js_navigation_scheme = {scheme:?} is not a valid URI scheme"
        ));
    }

    if RENDERABLE_SCHEMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(scheme))
    {
        errors.push(format!(
            "surface.js_navigation_scheme = {scheme:?} collides with a renderable scheme"
        ));
    }
}

/// RFC 3986: `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
pub(crate) fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
