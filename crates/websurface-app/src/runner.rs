//! Replays a [`Scenario`] through a surface's command queue.

use serde::Serialize;
use tracing::{debug, warn};
use websurface::{
    CaptureError, EventStream, HeadlessEngine, HostEvent, Surface, SurfaceDriver, SurfaceHandle,
    SurfaceImage, BRIDGE_NAME,
};
use websurface_common::Result;

use crate::scenario::{Scenario, Step};

/// One line of runner output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Record {
    Event(HostEvent),
    Capture(CaptureRecord),
}

impl Record {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRecord {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<std::result::Result<SurfaceImage, CaptureError>> for CaptureRecord {
    fn from(outcome: std::result::Result<SurfaceImage, CaptureError>) -> Self {
        match outcome {
            Ok(image) => Self {
                ok: true,
                width: Some(image.width),
                height: Some(image.height),
                error: None,
            },
            Err(e) => Self {
                ok: false,
                width: None,
                height: None,
                error: Some(e.to_string()),
            },
        }
    }
}

pub struct Runner {
    handle: SurfaceHandle,
    driver: SurfaceDriver<HeadlessEngine>,
    events: EventStream,
}

impl Runner {
    pub fn new(surface: Surface<HeadlessEngine>, events: EventStream) -> Self {
        let (handle, driver) = surface.into_driver();
        Self {
            handle,
            driver,
            events,
        }
    }

    pub fn handle(&self) -> &SurfaceHandle {
        &self.handle
    }

    pub fn surface(&self) -> &Surface<HeadlessEngine> {
        self.driver.surface()
    }

    /// Run every step, collecting output in order.
    pub async fn run(&mut self, scenario: &Scenario) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        for (index, step) in scenario.steps.iter().enumerate() {
            debug!(index, ?step, "step");
            records.extend(self.step(step).await?);
        }
        Ok(records)
    }

    /// Apply one step and return what the host saw.
    pub async fn step(&mut self, step: &Step) -> Result<Vec<Record>> {
        let mut capture = None;
        match step {
            Step::Load { url, content } => self.handle.load(url.as_str(), content.clone())?,
            Step::SetLocalhostOnly { enabled } => self.handle.set_localhost_only(*enabled)?,
            Step::SetInjectedScript { script } => self.handle.set_injected_script(script.clone())?,
            Step::SetMessagingEnabled { enabled } => self.handle.set_messaging_enabled(*enabled)?,
            Step::HostResume => self.handle.on_host_resume()?,
            Step::HostPause => self.handle.on_host_pause()?,
            Step::HostDestroy => self.handle.on_host_destroy()?,
            Step::ActivityResult { .. } => {
                if let Some(result) = step.activity_result() {
                    self.handle.on_activity_result(result)?;
                }
            }
            Step::Capture => capture = Some(self.handle.request_capture()?),
            Step::Engine { callback } => self.handle.engine_callback(callback.clone())?,
            Step::SetTitle { title } => self.engine_mut().set_title(title.as_str()),
            Step::SetHistory { history } => self.engine_mut().set_history(*history),
            Step::SetCaptureStatus { status, empty } => {
                let image = (!empty).then(|| SurfaceImage {
                    width: 1,
                    height: 1,
                    rgba: vec![0; 4],
                });
                self.engine_mut().set_capture_result(image, *status);
            }
            Step::ScriptMessage { payload } => {
                if !self.driver.surface().engine().post_from_script(BRIDGE_NAME, payload) {
                    warn!("script message dropped: messaging is disabled");
                }
            }
        }

        self.driver.pump();
        let mut records = self.drain();
        if let Some(pending) = capture {
            records.push(Record::Capture(pending.outcome().await.into()));
        }
        Ok(records)
    }

    /// Apply anything queued from outside (e.g. registry teardown) and
    /// return the resulting events.
    pub fn flush(&mut self) -> Vec<Record> {
        self.driver.pump();
        self.drain()
    }

    fn engine_mut(&mut self) -> &mut HeadlessEngine {
        self.driver.surface_mut().engine_mut()
    }

    fn drain(&mut self) -> Vec<Record> {
        let mut records = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            records.push(Record::Event(event));
        }
        records
    }
}
