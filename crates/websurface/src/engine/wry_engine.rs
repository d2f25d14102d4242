//! [`EngineDriver`] backed by a native `wry::WebView`.
//!
//! wry invokes its handlers on the UI thread while the webview is being
//! driven, so they never touch the surface directly. Page loads and
//! suppressed navigations are queued through a [`SurfaceHandle`]; the
//! surface's driver applies them in order. Script messages arriving over
//! IPC go through the registered [`BridgeObject`], which queues them the
//! same way.

use std::sync::{Arc, Mutex};

use tracing::{debug, trace, warn};
use wry::raw_window_handle;
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use super::{CaptureCallback, EngineCallback, EngineDriver, NavigationHistory};
use crate::bridge::{BridgeObject, BRIDGE_NAME};
use crate::error::EngineError;
use crate::lifecycle::ActivityResult;
use crate::policy::NavigationPolicy;
use crate::surface::SurfaceHandle;

/// Status reported to capture callbacks; wry cannot snapshot a webview.
pub const CAPTURE_UNSUPPORTED: i32 = -1;

/// Defines the bridge global on every page. Messages travel over wry's IPC
/// channel and are forwarded only while a bridge object is registered.
fn bridge_init_script() -> String {
    format!(
        "window.{BRIDGE_NAME} = {{ postMessage: function(m) {{ window.ipc.postMessage(String(m)); }} }};"
    )
}

type BridgeSlot = Arc<Mutex<Option<BridgeObject>>>;

pub struct WryEngine {
    webview: Option<WebView>,
    title: Arc<Mutex<String>>,
    bridge: BridgeSlot,
}

impl WryEngine {
    /// Build a webview as a child of `window` and wire its handlers to
    /// `handle`. `policy` must be the same policy the surface uses.
    pub fn build_as_child<W: raw_window_handle::HasWindowHandle>(
        window: &W,
        bounds: wry::Rect,
        handle: SurfaceHandle,
        policy: NavigationPolicy,
    ) -> Result<Self, EngineError> {
        let title = Arc::new(Mutex::new(String::new()));
        let bridge: BridgeSlot = Arc::new(Mutex::new(None));

        let mut builder = WebViewBuilder::new()
            .with_bounds(bounds)
            .with_focused(false)
            .with_initialization_script(&bridge_init_script());
        builder = attach_ipc_handler(builder, Arc::clone(&bridge), &handle);
        builder = attach_page_load_handler(builder, handle.clone());
        builder = attach_title_handler(builder, Arc::clone(&title), &handle);
        builder = attach_navigation_handler(builder, handle.clone(), policy);

        let webview = builder.build_as_child(window)?;
        debug!(surface_id = %handle.id(), "webview created");

        Ok(Self {
            webview: Some(webview),
            title,
            bridge,
        })
    }

    fn webview(&self) -> Result<&WebView, EngineError> {
        self.webview
            .as_ref()
            .ok_or_else(|| EngineError::new("webview has been destroyed"))
    }

    fn set_visible(&self, visible: bool) {
        if let Some(webview) = &self.webview {
            if let Err(e) = webview.set_visible(visible) {
                warn!(visible, error = %e, "failed to change webview visibility");
            }
        }
    }
}

fn attach_ipc_handler<'a>(
    builder: WebViewBuilder<'a>,
    bridge: BridgeSlot,
    handle: &SurfaceHandle,
) -> WebViewBuilder<'a> {
    let id = handle.id();
    builder.with_ipc_handler(move |request| {
        let body = request.body().to_string();
        let registered = bridge.lock().ok().and_then(|slot| slot.clone());
        match registered {
            Some(object) => {
                object.post_message(body);
            }
            None => debug!(surface_id = %id, "IPC message without bridge dropped"),
        }
    })
}

/// Callbacks for one wry page-load event. wry reports no intermediate
/// progress, so completion is reported as 100%.
fn page_load_callbacks(event: PageLoadEvent, url: String) -> Vec<EngineCallback> {
    match event {
        PageLoadEvent::Started => vec![EngineCallback::LoadStarted { url }],
        PageLoadEvent::Finished => vec![
            EngineCallback::ProgressChanged { percent: 100 },
            EngineCallback::LoadFinished { url },
        ],
    }
}

fn attach_page_load_handler(builder: WebViewBuilder<'_>, handle: SurfaceHandle) -> WebViewBuilder<'_> {
    builder.with_on_page_load_handler(move |event, url| {
        for callback in page_load_callbacks(event, url) {
            if handle.engine_callback(callback).is_err() {
                trace!(surface_id = %handle.id(), "page load after driver stopped");
                return;
            }
        }
    })
}

fn attach_title_handler<'a>(
    builder: WebViewBuilder<'a>,
    title: Arc<Mutex<String>>,
    handle: &SurfaceHandle,
) -> WebViewBuilder<'a> {
    let id = handle.id();
    builder.with_document_title_changed_handler(move |new_title| {
        debug!(surface_id = %id, title = %new_title, "title changed");
        if let Ok(mut current) = title.lock() {
            *current = new_title;
        }
    })
}

/// wry needs the verdict synchronously, so the shared policy is consulted
/// here. Anything not rendered internally is cancelled and handed to the
/// surface as a callback, which blocks or delegates it.
fn suppressed_navigation(policy: &NavigationPolicy, url: String) -> Option<EngineCallback> {
    policy
        .decide(&url)
        .suppresses_engine_load()
        .then_some(EngineCallback::NavigationRequested { url })
}

fn attach_navigation_handler(
    builder: WebViewBuilder<'_>,
    handle: SurfaceHandle,
    policy: NavigationPolicy,
) -> WebViewBuilder<'_> {
    builder.with_navigation_handler(move |url| {
        let Some(callback) = suppressed_navigation(&policy, url) else {
            return true;
        };
        if handle.engine_callback(callback).is_err() {
            trace!(surface_id = %handle.id(), "navigation after driver stopped");
        }
        false
    })
}

impl EngineDriver for WryEngine {
    fn load(&mut self, url: &str, content: Option<&str>) -> Result<(), EngineError> {
        let webview = self.webview()?;
        match content {
            Some(html) => {
                // wry has no base URL for inline HTML.
                debug!(url, "inline content loaded; base URL ignored");
                webview.load_html(html)?
            }
            None => webview.load_url(url)?,
        }
        Ok(())
    }

    fn evaluate_script(&mut self, script: &str) -> Result<(), EngineError> {
        self.webview()?.evaluate_script(script)?;
        Ok(())
    }

    fn add_js_interface(&mut self, name: &str, bridge: BridgeObject) {
        if name != BRIDGE_NAME {
            warn!(name, "only the built-in bridge name is exposed to pages");
            return;
        }
        if let Ok(mut slot) = self.bridge.lock() {
            *slot = Some(bridge);
        }
    }

    fn remove_js_interface(&mut self, name: &str) {
        if name != BRIDGE_NAME {
            return;
        }
        if let Ok(mut slot) = self.bridge.lock() {
            *slot = None;
        }
    }

    fn pause_timers(&mut self) {
        trace!("timer pause not supported by wry");
    }

    fn resume_timers(&mut self) {
        trace!("timer resume not supported by wry");
    }

    fn on_show(&mut self) {
        self.set_visible(true);
    }

    fn on_hide(&mut self) {
        self.set_visible(false);
    }

    fn destroy(&mut self) {
        self.remove_js_interface(BRIDGE_NAME);
        // Dropping the webview releases the native view.
        self.webview = None;
    }

    fn on_activity_result(&mut self, result: &ActivityResult) {
        trace!(request_code = result.request_code, "activity result ignored");
    }

    // wry exposes no history query.
    fn navigation_history(&self) -> Option<NavigationHistory> {
        Some(NavigationHistory::default())
    }

    fn title(&self) -> String {
        self.title
            .lock()
            .map(|title| title.clone())
            .unwrap_or_default()
    }

    fn capture_bitmap_async(&mut self, callback: CaptureCallback) {
        callback(None, CAPTURE_UNSUPPORTED);
    }
}
