use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};

use super::capture::{capture_viewport, CaptureBackend, CaptureOutcome};
use super::state::{RecorderState, SessionState};
use super::types::{Step, StepDraft};
use crate::settings::Settings;

/// Default upper bound for one viewport capture.
pub const DEFAULT_CAPTURE_TIMEOUT: Duration = Duration::from_secs(2);

/// Buffered notifications per subscriber before the oldest are dropped.
const EVENT_CAPACITY: usize = 64;

/// Notifications for any open UI. Nobody listening is fine.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RecorderEvent {
    #[serde(rename_all = "camelCase")]
    StepRecorded { step: Step, count: usize },
    #[serde(rename_all = "camelCase")]
    StateChanged { is_recording: bool },
}

/// Compact recording status for a toolbar badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
    pub is_recording: bool,
    pub count: usize,
}

impl Indicator {
    /// Empty when idle, `REC` before the first step, then the step count
    /// (last four digits).
    pub fn badge_text(&self) -> String {
        if !self.is_recording {
            return String::new();
        }
        if self.count == 0 {
            return "REC".to_string();
        }
        let text = self.count.to_string();
        text[text.len().saturating_sub(4)..].to_string()
    }
}

/// What happened to a draft handed to [`Session::ingest`].
#[derive(Debug)]
pub enum Ingestion {
    Recorded { count: usize, capture: CaptureOutcome },
    /// Session was idle; the draft was discarded.
    Dropped,
}

pub struct SessionConfig {
    pub capture_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capture_timeout: DEFAULT_CAPTURE_TIMEOUT,
        }
    }
}

/// Owner of the recording state and the step log.
pub struct Session {
    state: RecorderState,
    steps: Vec<Step>,
    settings: watch::Receiver<Settings>,
    capture: Option<Arc<dyn CaptureBackend>>,
    config: SessionConfig,
    events: broadcast::Sender<RecorderEvent>,
    indicator: Indicator,
}

impl Session {
    pub fn new(settings: watch::Receiver<Settings>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: RecorderState::new(),
            steps: Vec::new(),
            settings,
            capture: None,
            config: SessionConfig::default(),
            events,
            indicator: Indicator {
                is_recording: false,
                count: 0,
            },
        }
    }

    pub fn with_capture_backend(mut self, backend: Arc<dyn CaptureBackend>) -> Self {
        self.capture = Some(backend);
        self
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn is_recording(&self) -> bool {
        self.state.is_recording()
    }

    pub fn current_state(&self) -> SessionState {
        self.state.current_state()
    }

    pub fn get_steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn indicator(&self) -> Indicator {
        self.indicator
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecorderEvent> {
        self.events.subscribe()
    }

    /// Sender side of the notification channel, for handing out
    /// subscriptions once the session has moved into a task.
    pub fn event_sender(&self) -> broadcast::Sender<RecorderEvent> {
        self.events.clone()
    }

    /// Start or stop recording. Never touches the log.
    pub fn toggle(&mut self) -> bool {
        let state = self.state.toggle();
        tracing::info!(?state, steps = self.steps.len(), "recording toggled");
        let is_recording = self.is_recording();
        self.notify(RecorderEvent::StateChanged { is_recording });
        self.refresh_indicator();
        is_recording
    }

    /// Empty the log. The recording state is unchanged.
    pub fn clear(&mut self) {
        tracing::info!(cleared = self.steps.len(), "step log cleared");
        self.steps.clear();
        self.refresh_indicator();
    }

    /// Append a draft if recording, enriching click/submit steps with a
    /// viewport capture when enabled.
    pub async fn ingest(&mut self, draft: StepDraft) -> Ingestion {
        if !self.is_recording() {
            tracing::debug!(action = %draft.action, "session idle, step dropped");
            return Ingestion::Dropped;
        }

        let settings = *self.settings.borrow();
        let capture = match &self.capture {
            Some(backend) if settings.capture_screenshots && draft.action.wants_visual_capture() => {
                capture_viewport(backend.as_ref(), self.config.capture_timeout).await
            }
            _ => CaptureOutcome::Unavailable,
        };
        if let CaptureOutcome::Degraded(err) = &capture {
            tracing::warn!(error = %err, "visual capture degraded, recording step without image");
        }

        let mut draft = draft;
        if let Some(last) = self.steps.last() {
            // Wall clocks can step backwards; log order is capture order.
            draft.timestamp = draft.timestamp.max(last.timestamp);
        }

        let (step, capture) = match capture {
            CaptureOutcome::Captured(image) => (
                draft.into_step(Some(image.clone())),
                CaptureOutcome::Captured(image),
            ),
            other => (draft.into_step(None), other),
        };
        self.steps.push(step.clone());
        let count = self.steps.len();
        tracing::debug!(action = %step.action, count, "step recorded");

        self.notify(RecorderEvent::StepRecorded { step, count });
        self.refresh_indicator();
        Ingestion::Recorded { count, capture }
    }

    fn notify(&self, event: RecorderEvent) {
        // Err only means nobody is subscribed.
        let _ = self.events.send(event);
    }

    fn refresh_indicator(&mut self) {
        self.indicator = Indicator {
            is_recording: self.is_recording(),
            count: self.steps.len(),
        };
        tracing::trace!(badge = %self.indicator.badge_text(), "indicator refreshed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::capture::tests::png_bytes;
    use crate::recorder::capture::CaptureError;
    use crate::recorder::types::ActionType;
    use crate::settings::SettingsStore;
    use async_trait::async_trait;

    struct Fixed;

    #[async_trait]
    impl CaptureBackend for Fixed {
        async fn capture_viewport(&self) -> Result<Vec<u8>, CaptureError> {
            Ok(png_bytes(2, 2))
        }
    }

    struct Stalled;

    #[async_trait]
    impl CaptureBackend for Stalled {
        async fn capture_viewport(&self) -> Result<Vec<u8>, CaptureError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(png_bytes(2, 2))
        }
    }

    struct Broken;

    #[async_trait]
    impl CaptureBackend for Broken {
        async fn capture_viewport(&self) -> Result<Vec<u8>, CaptureError> {
            Err(CaptureError::Backend("no active tab".into()))
        }
    }

    fn draft(action: ActionType, ts: i64) -> StepDraft {
        StepDraft {
            id: format!("id-{ts}"),
            timestamp: ts,
            url: "https://example.com".into(),
            page_title: "Example".into(),
            action,
            selector: "button:nth-of-type(1)".into(),
            label: None,
            value: None,
        }
    }

    #[tokio::test]
    async fn idle_session_drops_steps() {
        let store = SettingsStore::in_memory();
        let mut session = Session::new(store.subscribe());
        let result = session.ingest(draft(ActionType::Click, 1)).await;
        assert!(matches!(result, Ingestion::Dropped));
        assert!(session.get_steps().is_empty());
    }

    #[tokio::test]
    async fn toggle_preserves_log_and_clear_keeps_state() {
        let store = SettingsStore::in_memory();
        let mut session = Session::new(store.subscribe());
        assert!(session.toggle());
        session.ingest(draft(ActionType::Input, 1)).await;
        assert!(!session.toggle());
        assert!(session.toggle());
        assert_eq!(session.get_steps().len(), 1);

        session.clear();
        assert!(session.get_steps().is_empty());
        assert!(session.is_recording());
    }

    #[tokio::test]
    async fn click_gets_capture_input_does_not() {
        let store = SettingsStore::in_memory();
        let mut session = Session::new(store.subscribe()).with_capture_backend(Arc::new(Fixed));
        session.toggle();

        let clicked = session.ingest(draft(ActionType::Click, 1)).await;
        assert!(matches!(
            clicked,
            Ingestion::Recorded { count: 1, capture: CaptureOutcome::Captured(_) }
        ));
        let typed = session.ingest(draft(ActionType::Input, 2)).await;
        assert!(matches!(
            typed,
            Ingestion::Recorded { count: 2, capture: CaptureOutcome::Unavailable }
        ));
        assert!(session.get_steps()[0].visual_capture.is_some());
        assert!(session.get_steps()[1].visual_capture.is_none());
    }

    #[tokio::test]
    async fn failed_capture_still_records() {
        let store = SettingsStore::in_memory();
        let mut session = Session::new(store.subscribe()).with_capture_backend(Arc::new(Broken));
        session.toggle();
        let result = session.ingest(draft(ActionType::Submit, 1)).await;
        assert!(matches!(
            result,
            Ingestion::Recorded { count: 1, capture: CaptureOutcome::Degraded(_) }
        ));
        assert!(session.get_steps()[0].visual_capture.is_none());
    }

    #[tokio::test]
    async fn configured_timeout_bounds_capture() {
        let store = SettingsStore::in_memory();
        let mut session = Session::new(store.subscribe())
            .with_capture_backend(Arc::new(Stalled))
            .with_config(SessionConfig {
                capture_timeout: Duration::from_millis(20),
            });
        session.toggle();
        let result = session.ingest(draft(ActionType::Click, 1)).await;
        assert!(matches!(
            result,
            Ingestion::Recorded {
                count: 1,
                capture: CaptureOutcome::Degraded(CaptureError::TimedOut(t)),
            } if t == Duration::from_millis(20)
        ));
        assert!(session.get_steps()[0].visual_capture.is_none());
    }

    #[tokio::test]
    async fn settings_change_applies_to_next_step_only() {
        let store = SettingsStore::in_memory();
        let mut session = Session::new(store.subscribe()).with_capture_backend(Arc::new(Fixed));
        session.toggle();
        session.ingest(draft(ActionType::Click, 1)).await;

        store.apply_change("captureScreenshots", false).unwrap();
        session.ingest(draft(ActionType::Click, 2)).await;

        let steps = session.get_steps();
        assert!(steps[0].visual_capture.is_some());
        assert!(steps[1].visual_capture.is_none());
    }

    #[tokio::test]
    async fn timestamps_never_go_backwards() {
        let store = SettingsStore::in_memory();
        let mut session = Session::new(store.subscribe());
        session.toggle();
        for ts in [100, 50, 200, 150] {
            session.ingest(draft(ActionType::Navigate, ts)).await;
        }
        let ts: Vec<i64> = session.get_steps().iter().map(|s| s.timestamp).collect();
        assert_eq!(ts, vec![100, 100, 200, 200]);
    }

    #[tokio::test]
    async fn subscribers_see_recorded_steps() {
        let store = SettingsStore::in_memory();
        let mut session = Session::new(store.subscribe());
        let mut rx = session.subscribe();
        session.toggle();
        session.ingest(draft(ActionType::Navigate, 1)).await;

        assert!(matches!(
            rx.recv().await.unwrap(),
            RecorderEvent::StateChanged { is_recording: true }
        ));
        match rx.recv().await.unwrap() {
            RecorderEvent::StepRecorded { step, count } => {
                assert_eq!(count, 1);
                assert_eq!(step.action, ActionType::Navigate);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn badge_text() {
        let idle = Indicator { is_recording: false, count: 3 };
        assert_eq!(idle.badge_text(), "");
        let fresh = Indicator { is_recording: true, count: 0 };
        assert_eq!(fresh.badge_text(), "REC");
        let busy = Indicator { is_recording: true, count: 12345 };
        assert_eq!(busy.badge_text(), "2345");
    }

    #[tokio::test]
    async fn indicator_tracks_log() {
        let store = SettingsStore::in_memory();
        let mut session = Session::new(store.subscribe());
        session.toggle();
        session.ingest(draft(ActionType::Navigate, 1)).await;
        assert_eq!(session.indicator(), Indicator { is_recording: true, count: 1 });
        session.clear();
        assert_eq!(session.indicator().count, 0);
    }
}
