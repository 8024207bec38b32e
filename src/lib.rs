pub mod dom;
pub mod export;
pub mod recorder;
pub mod settings;

use export::{ExportFormat, ExportOptions};
use recorder::session::{RecorderEvent, Session};
use recorder::types::{Step, StepDraft};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};

/// Commands queued before the recorder task applies back-pressure.
const COMMAND_CAPACITY: usize = 128;

/// Requests from the popup/options layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum Command {
    ToggleRecording,
    ClearLog,
    GetState,
    SubmitEvent(StepDraft),
    ExportMarkdown,
    ExportJson,
    ExportDocument,
    ExportReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    #[serde(rename_all = "camelCase")]
    Recording { is_recording: bool },
    Cleared { ok: bool },
    #[serde(rename_all = "camelCase")]
    State { steps: Vec<Step>, is_recording: bool },
    Ack,
    Text { text: String },
}

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("recorder task has stopped")]
    Closed,
}

/// The session plus everything needed to answer commands.
pub struct Recorder {
    session: Session,
    title: Option<String>,
}

impl Recorder {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            title: None,
        }
    }

    /// Override the document title used by exports.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn export_options(&self) -> ExportOptions {
        let options = ExportOptions::now();
        match &self.title {
            Some(title) => options.with_title(title.clone()),
            None => options,
        }
    }

    fn export(&self, format: ExportFormat) -> Response {
        Response::Text {
            text: format.render(self.session.get_steps(), &self.export_options()),
        }
    }

    /// Apply one command to completion.
    pub async fn handle(&mut self, command: Command) -> Response {
        match command {
            Command::ToggleRecording => Response::Recording {
                is_recording: self.session.toggle(),
            },
            Command::ClearLog => {
                self.session.clear();
                Response::Cleared { ok: true }
            }
            Command::GetState => Response::State {
                steps: self.session.get_steps().to_vec(),
                is_recording: self.session.is_recording(),
            },
            Command::SubmitEvent(draft) => {
                self.session.ingest(draft).await;
                Response::Ack
            }
            Command::ExportMarkdown => self.export(ExportFormat::Markdown),
            Command::ExportJson => self.export(ExportFormat::Json),
            Command::ExportDocument => self.export(ExportFormat::Document),
            Command::ExportReport => self.export(ExportFormat::Report),
        }
    }
}

type Envelope = (Command, Option<oneshot::Sender<Response>>);

/// Cloneable handle to a recorder running on its own task.
#[derive(Clone)]
pub struct RecorderHandle {
    tx: mpsc::Sender<Envelope>,
    events: broadcast::Sender<RecorderEvent>,
}

impl RecorderHandle {
    pub async fn request(&self, command: Command) -> Result<Response, RecorderError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send((command, Some(reply_tx)))
            .await
            .map_err(|_| RecorderError::Closed)?;
        reply_rx.await.map_err(|_| RecorderError::Closed)
    }

    /// Queue a captured step without waiting for it to be ingested.
    pub async fn submit_event(&self, draft: StepDraft) -> Result<(), RecorderError> {
        self.tx
            .send((Command::SubmitEvent(draft), None))
            .await
            .map_err(|_| RecorderError::Closed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecorderEvent> {
        self.events.subscribe()
    }
}

/// Move `recorder` onto a task that applies commands one at a time, in
/// arrival order. The task ends when every handle is dropped.
pub fn spawn(mut recorder: Recorder) -> RecorderHandle {
    let (tx, mut rx) = mpsc::channel::<Envelope>(COMMAND_CAPACITY);
    let events = recorder.session.event_sender();

    tokio::spawn(async move {
        while let Some((command, reply)) = rx.recv().await {
            let response = recorder.handle(command).await;
            if let Some(reply) = reply {
                let _ = reply.send(response);
            }
        }
        tracing::debug!("recorder task finished");
    });

    RecorderHandle { tx, events }
}

/// Install a `tracing` subscriber filtered by `RUST_LOG`
/// (default `workmap=info`). Safe to call more than once.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("workmap=info,workmap_lib=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
