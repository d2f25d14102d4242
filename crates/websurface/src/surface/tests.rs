//! Behavioural tests for the surface and its queue.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use websurface_common::SurfaceId;
use websurface_config::SurfaceConfig;

use super::*;
use crate::bridge::{shim_script, BRIDGE_NAME};
use crate::clock::ManualClock;
use crate::emitter::{event_channel, EventStream};
use crate::engine::{
    ChromeCallbackSink, EngineCall, FileChooserRequest, HeadlessEngine, NavigationCallbackSink,
    NavigationHistory,
};
use crate::events::HostEvent;
use crate::launcher::RecordingLauncher;

const PAGE: &str = "https://example.com/";
const SCRIPT: &str = "document.title = 'injected';";
const JS_NAV: &str = "websurface-js-navigation://settled";

struct Fixture {
    surface: Surface<HeadlessEngine>,
    events: EventStream,
    launcher: RecordingLauncher,
    clock: ManualClock,
}

fn fixture() -> Fixture {
    let (sink, events) = event_channel();
    let launcher = RecordingLauncher::new();
    let clock = ManualClock::new(10_000);
    let surface = Surface::new(SurfaceId(11), HeadlessEngine::new(), sink)
        .with_launcher(launcher.clone())
        .with_clock(Arc::new(clock.clone()));
    Fixture {
        surface,
        events,
        launcher,
        clock,
    }
}

fn drain(events: &mut EventStream) -> Vec<HostEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

fn names(events: &[HostEvent]) -> Vec<&'static str> {
    events.iter().map(HostEvent::name).collect()
}

fn load_finished_count(events: &[HostEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, HostEvent::LoadFinished(_)))
        .count()
}

// -- Navigation policy --

#[test]
fn reserved_scheme_blocks_and_finishes_once() {
    for localhost_only in [false, true] {
        let mut f = fixture();
        f.surface.set_localhost_only(localhost_only);

        assert!(f.surface.should_override_url_loading(JS_NAV));

        let events = drain(&mut f.events);
        assert_eq!(load_finished_count(&events), 1);
        assert!(f.launcher.opened().is_empty());
        assert!(!f
            .surface
            .engine()
            .calls()
            .iter()
            .any(|c| matches!(c, EngineCall::Load { .. })));
    }
}

#[test]
fn localhost_only_delegates_foreign_hosts() {
    let mut f = fixture();
    f.surface.set_localhost_only(true);

    assert!(!f.surface.should_override_url_loading("http://localhost:8081/app"));
    assert!(f.surface.should_override_url_loading(PAGE));
    assert_eq!(f.launcher.opened(), vec![PAGE]);
    assert!(drain(&mut f.events).is_empty());
}

#[test]
fn renderable_schemes_load_internally() {
    let mut f = fixture();
    for uri in ["http://a.test/", "https://a.test/", "file:///index.html"] {
        assert!(!f.surface.should_override_url_loading(uri));
    }
    assert!(f.launcher.opened().is_empty());
}

#[test]
fn custom_schemes_are_delegated() {
    let mut f = fixture();
    assert!(f.surface.should_override_url_loading("mailto:team@example.com"));
    assert_eq!(f.launcher.opened(), vec!["mailto:team@example.com"]);
}

#[test]
fn delegation_failure_is_swallowed() {
    let (sink, mut events) = event_channel();
    let launcher = RecordingLauncher::new().without_handler_for("market");
    let mut surface = Surface::new(SurfaceId(1), HeadlessEngine::new(), sink)
        .with_launcher(launcher.clone());

    assert!(surface.should_override_url_loading("market://details?id=x"));
    assert!(surface.should_override_url_loading("::not a uri::"));
    assert!(launcher.opened().is_empty());
    assert!(drain(&mut events).is_empty());

    // Still usable afterwards.
    assert!(surface.load(PAGE, None).is_ok());
}

// -- Event stream --

#[test]
fn scripted_load_keeps_callback_order() {
    let mut f = fixture();
    f.surface.engine_mut().set_title("Example");
    f.surface.load(PAGE, None).unwrap();

    f.surface.on_load_started(PAGE);
    f.clock.advance(5);
    f.surface.on_progress_changed(30);
    f.clock.advance(5);
    f.surface.on_progress_changed(70);
    f.clock.advance(5);
    f.surface.on_load_finished(PAGE);

    let events = drain(&mut f.events);
    assert_eq!(
        names(&events),
        vec![
            "navigationStateChange",
            "progress",
            "progress",
            "loadingFinish",
            "navigationStateChange",
        ]
    );

    let loading: Vec<bool> = events
        .iter()
        .filter_map(|e| match e {
            HostEvent::NavigationStateChange(nav) => Some(nav.is_loading),
            _ => None,
        })
        .collect();
    assert_eq!(loading, vec![true, false]);

    let percents: Vec<u8> = events
        .iter()
        .filter_map(|e| match e {
            HostEvent::Progress(p) => Some(p.percent),
            _ => None,
        })
        .collect();
    assert_eq!(percents, vec![30, 70]);

    let stamps: Vec<u64> = events.iter().filter_map(HostEvent::timestamp_ms).collect();
    assert_eq!(stamps, vec![10_000, 10_005, 10_010, 10_015, 10_015]);
    assert!(events.iter().all(|e| e.surface_id() == SurfaceId(11)));
}

#[test]
fn navigation_event_carries_history_and_title() {
    let mut f = fixture();
    f.surface.engine_mut().set_title("Second page");
    f.surface.engine_mut().set_history(Some(NavigationHistory {
        can_go_back: true,
        can_go_forward: false,
    }));

    f.surface.on_load_finished("https://example.com/2");
    match drain(&mut f.events).pop() {
        Some(HostEvent::NavigationStateChange(nav)) => {
            assert_eq!(nav.title, "Second page");
            assert_eq!(nav.url, "https://example.com/2");
            assert!(nav.can_go_back);
            assert!(!nav.can_go_forward);
            assert!(!nav.is_loading);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn empty_url_callbacks_produce_nothing() {
    let mut f = fixture();
    f.surface.set_injected_script(Some(SCRIPT.into()));
    f.surface.on_load_started("");
    f.surface.on_load_finished("");
    assert!(drain(&mut f.events).is_empty());
    assert!(!f.surface.injected_this_load());
    assert!(f.surface.engine().evaluated_scripts().is_empty());
}

#[test]
fn load_error_is_passed_through() {
    let mut f = fixture();
    f.surface.on_load_started(PAGE);
    f.surface
        .on_received_load_error(-2, "net::ERR_NAME_NOT_RESOLVED", PAGE);
    let events = drain(&mut f.events);
    assert_eq!(names(&events), vec!["navigationStateChange", "loadingError"]);
    match &events[1] {
        HostEvent::Error(err) => {
            assert_eq!(err.error_code, -2);
            assert_eq!(err.description, "net::ERR_NAME_NOT_RESOLVED");
            assert_eq!(err.failing_url, PAGE);
        }
        other => panic!("unexpected {other:?}"),
    }
}

// -- Messaging and injection --

#[test]
fn enabling_messaging_twice_registers_once() {
    let mut f = fixture();
    f.surface.set_messaging_enabled(true);
    f.surface.set_messaging_enabled(true);
    let engine = f.surface.engine();
    assert_eq!(engine.count(&EngineCall::AddJsInterface(BRIDGE_NAME.into())), 1);
    assert_eq!(engine.evaluated_scripts(), vec![shim_script().as_str()]);
    assert!(f.surface.messaging_enabled());
}

#[test]
fn script_messages_reach_host_while_enabled() {
    let mut f = fixture();
    f.surface.set_messaging_enabled(true);
    assert!(f.surface.engine().post_from_script(BRIDGE_NAME, "ping"));

    f.surface.set_messaging_enabled(false);
    assert!(!f.surface.engine().post_from_script(BRIDGE_NAME, "lost"));

    let events = drain(&mut f.events);
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], HostEvent::Message(m) if m.payload == "ping"));
}

#[test]
fn injected_script_runs_at_most_once_per_load() {
    let mut f = fixture();
    f.surface.set_injected_script(Some(SCRIPT.into()));
    f.surface.load(PAGE, None).unwrap();

    f.surface.on_load_started(PAGE);
    f.surface.on_load_finished(PAGE);
    f.surface.arm_and_inject();
    f.surface.should_override_url_loading(JS_NAV);
    // In-page navigation without a new load call.
    f.surface.on_load_started("https://example.com/#section");
    f.surface.on_load_finished("https://example.com/#section");

    let count = |s: &Surface<HeadlessEngine>| {
        s.engine()
            .evaluated_scripts()
            .iter()
            .filter(|script| **script == SCRIPT)
            .count()
    };
    assert_eq!(count(&f.surface), 1);

    f.surface.load("https://example.com/next", None).unwrap();
    assert!(!f.surface.injected_this_load());
    f.surface.on_load_finished("https://example.com/next");
    assert_eq!(count(&f.surface), 2);
}

#[test]
fn shim_is_reinstalled_after_every_navigation() {
    let mut f = fixture();
    f.surface.set_messaging_enabled(true);
    f.surface.set_injected_script(Some(SCRIPT.into()));
    f.surface.engine_mut().take_calls();

    f.surface.load(PAGE, None).unwrap();
    assert_eq!(f.surface.shim_state(), ShimState::Disarmed);
    f.surface.on_load_started(PAGE);
    f.surface.on_load_finished(PAGE);
    assert_eq!(f.surface.shim_state(), ShimState::Armed);
    f.surface.on_load_started("https://example.com/b");
    assert_eq!(f.surface.shim_state(), ShimState::Disarmed);
    f.surface.on_load_finished("https://example.com/b");

    let shim = shim_script();
    assert_eq!(
        f.surface.engine().evaluated_scripts(),
        vec![shim.as_str(), SCRIPT, shim.as_str()]
    );
}

// -- Lifecycle --

#[test]
fn pause_during_file_chooser_does_not_background() {
    let mut f = fixture();
    f.surface.on_file_chooser_opened(&FileChooserRequest {
        accept_type: "image/*".into(),
        capture: true,
    });
    assert!(f.surface.is_choosing_file());

    f.surface.on_host_pause();
    assert_eq!(f.surface.lifecycle_state(), LifecycleState::Active);
    assert_eq!(f.surface.engine().calls(), &[EngineCall::PauseTimers]);

    f.surface.on_activity_result(&ActivityResult {
        request_code: 7,
        result_code: -1,
        data: None,
    });
    assert!(!f.surface.is_choosing_file());
}

#[test]
fn load_resets_chooser_and_injection_flags() {
    let mut f = fixture();
    f.surface.on_file_chooser_opened(&FileChooserRequest::default());
    f.surface.arm_and_inject();
    assert!(f.surface.injected_this_load());

    f.surface.load(PAGE, Some("<p>inline</p>")).unwrap();
    assert!(!f.surface.is_choosing_file());
    assert!(!f.surface.injected_this_load());
    assert_eq!(
        f.surface.engine().calls().last(),
        Some(&EngineCall::Load {
            url: PAGE.into(),
            content: Some("<p>inline</p>".into()),
        })
    );
}

#[test]
fn destroyed_surface_ignores_callbacks_and_rejects_load() {
    let mut f = fixture();
    f.surface.set_messaging_enabled(true);
    f.surface.on_host_destroy();
    f.surface.on_host_destroy();
    assert!(f.surface.is_destroyed());
    assert!(!f.surface.messaging_enabled());

    assert_eq!(f.surface.load(PAGE, None), Err(SurfaceError::Destroyed));
    f.surface.on_load_started(PAGE);
    f.surface.on_progress_changed(50);
    f.surface.on_load_finished(PAGE);
    f.surface.set_messaging_enabled(true);
    assert!(drain(&mut f.events).is_empty());
    assert_eq!(f.surface.engine().count(&EngineCall::Destroy), 1);
}

#[test]
fn engine_load_failure_is_reported() {
    let mut f = fixture();
    f.surface
        .engine_mut()
        .set_load_failure(Some("renderer crashed".into()));
    let err = f.surface.load(PAGE, None).unwrap_err();
    assert!(matches!(err, SurfaceError::Engine(_)));
    assert!(err.to_string().contains("renderer crashed"));
}

// -- Capture --

#[test]
fn capture_success_and_failure() {
    let mut f = fixture();
    let seen: Rc<RefCell<Vec<Result<SurfaceImage, CaptureError>>>> = Rc::default();

    let sink = Rc::clone(&seen);
    f.surface.capture_image(move |r| sink.borrow_mut().push(r));

    f.surface.engine_mut().set_capture_result(None, 2);
    let sink = Rc::clone(&seen);
    f.surface.capture_image(move |r| sink.borrow_mut().push(r));

    f.surface.engine_mut().set_capture_result(None, 0);
    let sink = Rc::clone(&seen);
    f.surface.capture_image(move |r| sink.borrow_mut().push(r));

    f.surface.on_host_destroy();
    let sink = Rc::clone(&seen);
    f.surface.capture_image(move |r| sink.borrow_mut().push(r));

    let seen = seen.borrow();
    assert!(seen[0].is_ok());
    assert_eq!(seen[1], Err(CaptureError::EngineStatus(2)));
    assert_eq!(seen[2], Err(CaptureError::EmptyImage));
    assert_eq!(seen[3], Err(CaptureError::Destroyed));
}

// -- Configuration --

#[test]
fn from_config_applies_defaults() {
    let (sink, _events) = event_channel();
    let config = SurfaceConfig {
        localhost_only: true,
        messaging_enabled: true,
        injected_script: Some(SCRIPT.into()),
        js_navigation_scheme: "host-nav".into(),
        open_external: false,
    };
    let surface = Surface::from_config(SurfaceId(4), HeadlessEngine::new(), sink, &config);
    assert!(surface.localhost_only());
    assert!(surface.messaging_enabled());
    assert_eq!(surface.injected_script(), Some(SCRIPT));
    assert_eq!(surface.policy().js_navigation_scheme(), "host-nav");
    assert!(surface.engine().has_interface(BRIDGE_NAME));
}

// -- Queue --

#[test]
fn pump_applies_commands_in_order() {
    let f = fixture();
    let mut events = f.events;
    let (handle, mut driver) = f.surface.into_driver();

    handle.set_injected_script(Some(SCRIPT.into())).unwrap();
    handle.load(PAGE, None).unwrap();
    handle
        .engine_callback(EngineCallback::LoadStarted { url: PAGE.into() })
        .unwrap();
    handle
        .engine_callback(EngineCallback::ProgressChanged { percent: 55 })
        .unwrap();
    handle
        .engine_callback(EngineCallback::LoadFinished { url: PAGE.into() })
        .unwrap();

    assert_eq!(driver.pump(), 5);
    assert_eq!(driver.pump(), 0);
    assert_eq!(
        names(&drain(&mut events)),
        vec!["navigationStateChange", "progress", "loadingFinish", "navigationStateChange"]
    );
    assert_eq!(driver.surface().engine().evaluated_scripts(), vec![SCRIPT]);
}

#[test]
fn handle_apply_config_and_pending_capture() {
    let f = fixture();
    let (handle, mut driver) = f.surface.into_driver();

    handle
        .apply_config(&SurfaceConfig {
            localhost_only: true,
            messaging_enabled: true,
            ..Default::default()
        })
        .unwrap();
    let mut pending = handle.request_capture().unwrap();
    assert!(pending.try_outcome().is_none());

    driver.pump();
    assert!(driver.surface().localhost_only());
    assert!(driver.surface().messaging_enabled());
    assert!(matches!(pending.try_outcome(), Some(Ok(_))));
}

#[test]
fn script_messages_keep_engine_order_behind_driver() {
    let mut f = fixture();
    f.surface.set_messaging_enabled(true);
    let (handle, mut driver) = f.surface.into_driver();

    handle
        .engine_callback(EngineCallback::LoadStarted { url: PAGE.into() })
        .unwrap();
    handle
        .engine_callback(EngineCallback::LoadFinished { url: PAGE.into() })
        .unwrap();
    assert!(driver
        .surface()
        .engine()
        .post_from_script(BRIDGE_NAME, "after-finish"));
    assert!(drain(&mut f.events).is_empty());

    driver.pump();
    let events = drain(&mut f.events);
    assert_eq!(
        names(&events),
        vec![
            "navigationStateChange",
            "loadingFinish",
            "navigationStateChange",
            "message",
        ]
    );
    assert!(matches!(&events[3], HostEvent::Message(m) if m.payload == "after-finish"));
}

#[test]
fn message_posted_after_queued_disable_is_dropped() {
    let mut f = fixture();
    f.surface.set_messaging_enabled(true);
    let (handle, mut driver) = f.surface.into_driver();

    handle.set_messaging_enabled(false).unwrap();
    assert!(driver.surface().engine().post_from_script(BRIDGE_NAME, "late"));
    handle.set_messaging_enabled(true).unwrap();

    assert_eq!(driver.pump(), 3);
    assert!(drain(&mut f.events).is_empty());
    assert!(driver.surface().messaging_enabled());
}

#[test]
fn surface_taken_back_from_driver_emits_directly() {
    let mut f = fixture();
    f.surface.set_messaging_enabled(true);
    let (handle, driver) = f.surface.into_driver();
    let surface = driver.into_surface();
    drop(handle);

    assert!(surface.engine().post_from_script(BRIDGE_NAME, "direct"));
    assert_eq!(names(&drain(&mut f.events)), vec!["message"]);
}

#[tokio::test]
async fn run_stops_after_destroy() {
    let f = fixture();
    let (handle, driver) = f.surface.into_driver();

    let pending = handle.request_capture().unwrap();
    handle.on_host_destroy().unwrap();
    handle.on_host_pause().unwrap();

    let surface = driver.run().await;
    assert!(surface.is_destroyed());
    assert_eq!(surface.engine().calls().last(), Some(&EngineCall::Destroy));
    assert!(pending.outcome().await.is_ok());
    assert!(handle.is_closed());
    assert_eq!(handle.on_host_resume(), Err(SurfaceError::QueueClosed));
}

#[tokio::test]
async fn dropped_driver_abandons_capture() {
    let f = fixture();
    let (handle, driver) = f.surface.into_driver();
    let pending = handle.request_capture().unwrap();
    drop(driver);
    assert_eq!(pending.outcome().await, Err(CaptureError::Abandoned));
}

// -- Registry --

#[test]
fn registry_routes_by_id() {
    let mut registry = SurfaceRegistry::new();
    let (sink, _events) = event_channel();
    let (first, mut first_driver) =
        Surface::new(SurfaceId(1), HeadlessEngine::new(), sink.clone()).into_driver();
    let (second, mut second_driver) =
        Surface::new(SurfaceId(2), HeadlessEngine::new(), sink).into_driver();

    assert!(registry.register(first).is_none());
    assert!(registry.register(second).is_none());
    assert_eq!(registry.ids(), vec![SurfaceId(1), SurfaceId(2)]);

    assert!(registry.destroy(SurfaceId(2)));
    assert!(!registry.destroy(SurfaceId(9)));
    assert!(!registry.contains(SurfaceId(2)));
    first_driver.pump();
    second_driver.pump();
    assert!(!first_driver.surface().is_destroyed());
    assert!(second_driver.surface().is_destroyed());

    assert_eq!(
        registry.capture(SurfaceId(9)).unwrap_err(),
        CaptureError::UnknownSurface(SurfaceId(9))
    );
    let mut pending = registry.capture(SurfaceId(1)).unwrap();
    first_driver.pump();
    assert!(matches!(pending.try_outcome(), Some(Ok(_))));
}
