//! Engine callback sinks implemented by the surface.

use tracing::{debug, warn};

use crate::emitter::is_blank_url;
use crate::engine::{ChromeCallbackSink, EngineDriver, FileChooserRequest, NavigationCallbackSink};
use crate::policy::NavigationDecision;

use super::Surface;

impl<E: EngineDriver> NavigationCallbackSink for Surface<E> {
    fn on_load_started(&mut self, url: &str) {
        if self.is_destroyed() || is_blank_url(url) {
            return;
        }
        self.injector.disarm();
        let title = self.engine.title();
        self.emitter
            .load_started(url, &title, self.engine.navigation_history());
    }

    fn on_load_finished(&mut self, url: &str) {
        if self.is_destroyed() || is_blank_url(url) {
            return;
        }
        self.arm_and_inject();
        let title = self.engine.title();
        self.emitter
            .load_finished(url, &title, self.engine.navigation_history());
    }

    fn on_progress_changed(&mut self, percent: i32) {
        if self.is_destroyed() {
            return;
        }
        self.emitter.progress(percent);
    }

    fn on_received_load_error(&mut self, error_code: i32, description: &str, failing_url: &str) {
        if self.is_destroyed() {
            return;
        }
        warn!(
            surface_id = %self.id,
            error_code,
            failing_url,
            "load error: {description}"
        );
        self.emitter.load_error(error_code, description, failing_url);
    }

    fn should_override_url_loading(&mut self, url: &str) -> bool {
        if self.is_destroyed() {
            return true;
        }
        let decision = self.policy.decide(url);
        debug!(surface_id = %self.id, url, ?decision, "navigation requested");
        match decision {
            NavigationDecision::AllowInternal => {}
            NavigationDecision::BlockAndNotify => self.on_load_finished(url),
            NavigationDecision::DelegateExternal => self.delegate_external(url),
        }
        decision.suppresses_engine_load()
    }
}

impl<E: EngineDriver> ChromeCallbackSink for Surface<E> {
    fn on_file_chooser_opened(&mut self, request: &FileChooserRequest) {
        debug!(
            surface_id = %self.id,
            accept_type = %request.accept_type,
            capture = request.capture,
            "file chooser opened"
        );
        self.lifecycle.on_file_chooser_opened();
    }
}
