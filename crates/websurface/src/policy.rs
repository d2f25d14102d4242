//! Navigation policy: what happens to each URL the engine is asked to load.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use url::Url;
use websurface_common::{DEFAULT_JS_NAVIGATION_SCHEME, RENDERABLE_SCHEMES};
use websurface_config::SurfaceConfig;

/// Verdict for a requested navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Let the engine load the URL itself.
    AllowInternal,
    /// Suppress the load and report a finished navigation to the host.
    BlockAndNotify,
    /// Suppress the load and hand the URI to an external handler.
    DelegateExternal,
}

impl NavigationDecision {
    /// Whether the engine must not perform the navigation.
    pub fn suppresses_engine_load(self) -> bool {
        !matches!(self, Self::AllowInternal)
    }
}

#[derive(Debug)]
struct PolicyState {
    localhost_only: AtomicBool,
    js_navigation_scheme: String,
}

/// Shared navigation policy.
///
/// Cloning yields another handle onto the same state, so an engine adapter
/// that has to answer navigation requests synchronously sees localhost-mode
/// changes made by the owning surface.
#[derive(Debug, Clone)]
pub struct NavigationPolicy {
    inner: Arc<PolicyState>,
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_JS_NAVIGATION_SCHEME)
    }
}

impl NavigationPolicy {
    pub fn new(js_navigation_scheme: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(PolicyState {
                localhost_only: AtomicBool::new(false),
                js_navigation_scheme: js_navigation_scheme.into().to_ascii_lowercase(),
            }),
        }
    }

    pub fn from_config(config: &SurfaceConfig) -> Self {
        let policy = Self::new(config.js_navigation_scheme.as_str());
        policy.set_localhost_only(config.localhost_only);
        policy
    }

    pub fn js_navigation_scheme(&self) -> &str {
        &self.inner.js_navigation_scheme
    }

    pub fn localhost_only(&self) -> bool {
        self.inner.localhost_only.load(Ordering::SeqCst)
    }

    pub fn set_localhost_only(&self, enabled: bool) {
        self.inner.localhost_only.store(enabled, Ordering::SeqCst);
    }

    /// Decide what to do with a requested URI.
    ///
    /// Rules, first match wins:
    /// 1. reserved JS-navigation scheme → `BlockAndNotify`
    /// 2. localhost-only mode → allow only host `localhost`, else delegate
    /// 3. `http`, `https`, `file` → `AllowInternal`
    /// 4. anything else, including unparseable input → `DelegateExternal`
    pub fn decide(&self, uri: &str) -> NavigationDecision {
        let Ok(parsed) = Url::parse(uri) else {
            return NavigationDecision::DelegateExternal;
        };

        if parsed.scheme() == self.js_navigation_scheme() {
            return NavigationDecision::BlockAndNotify;
        }

        if self.localhost_only() {
            return if parsed.host_str() == Some("localhost") {
                NavigationDecision::AllowInternal
            } else {
                NavigationDecision::DelegateExternal
            };
        }

        if RENDERABLE_SCHEMES.contains(&parsed.scheme()) {
            NavigationDecision::AllowInternal
        } else {
            NavigationDecision::DelegateExternal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use NavigationDecision::*;

    const JS_NAV: &str = "websurface-js-navigation://done";

    #[test]
    fn reserved_scheme_blocks_in_both_modes() {
        let policy = NavigationPolicy::default();
        assert_eq!(policy.decide(JS_NAV), BlockAndNotify);
        assert_eq!(policy.decide("WEBSURFACE-JS-NAVIGATION:x"), BlockAndNotify);
        policy.set_localhost_only(true);
        assert_eq!(policy.decide(JS_NAV), BlockAndNotify);
    }

    #[test]
    fn renderable_schemes_allowed_by_default() {
        let policy = NavigationPolicy::default();
        assert_eq!(policy.decide("http://example.com/"), AllowInternal);
        assert_eq!(policy.decide("https://example.com/a?b=c"), AllowInternal);
        assert_eq!(policy.decide("file:///android_asset/index.html"), AllowInternal);
    }

    #[test]
    fn other_schemes_delegated() {
        let policy = NavigationPolicy::default();
        assert_eq!(policy.decide("mailto:someone@example.com"), DelegateExternal);
        assert_eq!(policy.decide("tel:+15551234"), DelegateExternal);
        assert_eq!(policy.decide("market://details?id=app"), DelegateExternal);
        assert_eq!(policy.decide("intent://scan/#Intent;end"), DelegateExternal);
    }

    #[test]
    fn localhost_only_allows_exact_host() {
        let policy = NavigationPolicy::default();
        policy.set_localhost_only(true);
        assert_eq!(policy.decide("http://localhost:8081/index.html"), AllowInternal);
        assert_eq!(policy.decide("https://localhost/"), AllowInternal);
    }

    #[test]
    fn localhost_only_delegates_everything_else() {
        let policy = NavigationPolicy::default();
        policy.set_localhost_only(true);
        for uri in [
            "https://example.com/",
            "http://127.0.0.1:8081/",
            "http://localhost.example.com/",
            "http://sub.localhost/",
            "file:///etc/hosts",
            "mailto:a@b.c",
        ] {
            assert_eq!(policy.decide(uri), DelegateExternal, "{uri}");
        }
    }

    #[test]
    fn unparseable_input_is_delegated() {
        let policy = NavigationPolicy::default();
        assert_eq!(policy.decide(""), DelegateExternal);
        assert_eq!(policy.decide("not a url"), DelegateExternal);
        assert_eq!(policy.decide("/relative/path"), DelegateExternal);
    }

    #[test]
    fn clones_share_localhost_mode() {
        let policy = NavigationPolicy::default();
        let adapter_view = policy.clone();
        policy.set_localhost_only(true);
        assert!(adapter_view.localhost_only());
        assert_eq!(adapter_view.decide("https://example.com/"), DelegateExternal);
    }

    #[test]
    fn from_config_applies_settings() {
        let config = SurfaceConfig {
            localhost_only: true,
            js_navigation_scheme: "My-App-Nav".into(),
            ..Default::default()
        };
        let policy = NavigationPolicy::from_config(&config);
        assert!(policy.localhost_only());
        assert_eq!(policy.js_navigation_scheme(), "my-app-nav");
        assert_eq!(policy.decide("my-app-nav://settled"), BlockAndNotify);
    }

    #[test]
    fn only_allow_internal_reaches_the_engine() {
        assert!(!AllowInternal.suppresses_engine_load());
        assert!(BlockAndNotify.suppresses_engine_load());
        assert!(DelegateExternal.suppresses_engine_load());
    }
}
