//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# websurface configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[surface]
# Only load http(s)://localhost pages in the engine; hand everything else
# to the system opener.
# localhost_only = false

# Register the script bridge and redirect window.postMessage to the host.
# messaging_enabled = false

# Script evaluated once after each load completes.
# injected_script = "document.body.dataset.embedded = 'true';"

# Reserved scheme for script-driven "navigation complete" signals.
# Must not be http, https or file.
# js_navigation_scheme = "websurface-js-navigation"

# Open delegated URIs with the platform opener (open / xdg-open / start).
# open_external = true

[logging]
# trace | debug | info | warn | error
# level = "info"
"##
    .to_string()
}
