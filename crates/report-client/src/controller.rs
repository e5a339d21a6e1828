//! Report Request Controller.
//!
//! One controller drives one form: it owns the field values, issues the
//! generation request and tracks the request lifecycle. Each `submit` takes a
//! new generation number; only the reply for the newest generation may change
//! state, so a late reply for a superseded submission is dropped.

use std::sync::Arc;
use std::time::SystemTime;

use report_protocol::download::download_path;
use report_protocol::{ErrorBody, FieldValue};
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};

use crate::error::{ControllerError, TransportError};
use crate::events::ControllerEvent;
use crate::form::FormSpec;
use crate::http_utils::join_base_path;
use crate::params::RequestParameters;
use crate::transport::{ReportTransport, TransportResponse};

pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to generate report, please try again later.";
const DEFAULT_EVENT_CAPACITY: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportResult {
    pub report_text: String,
    pub artifact_path: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ControllerSnapshot {
    pub form: String,
    pub phase: Phase,
    pub generation: u64,
    pub parameters: RequestParameters,
    pub result: Option<ReportResult>,
    pub error: Option<String>,
    pub settled_at: Option<String>,
}

impl ControllerSnapshot {
    pub fn download_url(&self) -> Option<String> {
        match (self.phase, self.result.as_ref()) {
            (Phase::Succeeded, Some(result)) => Some(download_path(&result.artifact_path)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ControllerOptions {
    pub fallback_message: String,
    pub event_capacity: usize,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            fallback_message: DEFAULT_FAILURE_MESSAGE.to_string(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// What a finished `submit` call did to the controller.
#[derive(Clone, Debug)]
pub struct Submission {
    pub generation: u64,
    /// True when a newer submission started before this reply arrived.
    pub superseded: bool,
    pub snapshot: ControllerSnapshot,
}

#[derive(Debug)]
enum Outcome {
    Succeeded(ReportResult),
    Failed(String),
}

struct ControllerState {
    phase: Phase,
    parameters: RequestParameters,
    result: Option<ReportResult>,
    error: Option<String>,
    generation: u64,
    settled_at: Option<SystemTime>,
}

#[derive(Clone)]
pub struct ReportController {
    spec: Arc<FormSpec>,
    transport: Arc<dyn ReportTransport>,
    fallback_message: Arc<str>,
    state: Arc<RwLock<ControllerState>>,
    event_tx: broadcast::Sender<ControllerEvent>,
}

impl ReportController {
    pub fn new(
        spec: FormSpec,
        transport: Arc<dyn ReportTransport>,
        options: ControllerOptions,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(options.event_capacity.max(1));
        let state = ControllerState {
            phase: Phase::Idle,
            parameters: RequestParameters::from_schema(&spec.fields),
            result: None,
            error: None,
            generation: 0,
            settled_at: None,
        };
        Self {
            spec: Arc::new(spec),
            transport,
            fallback_message: Arc::from(options.fallback_message),
            state: Arc::new(RwLock::new(state)),
            event_tx,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.event_tx.subscribe()
    }

    pub async fn snapshot(&self) -> ControllerSnapshot {
        let state = self.state.read().await;
        self.snapshot_of(&state)
    }

    pub async fn phase(&self) -> Phase {
        self.state.read().await.phase
    }

    pub async fn parameters(&self) -> RequestParameters {
        self.state.read().await.parameters.clone()
    }

    pub async fn update_field(
        &self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), ControllerError> {
        let value = value.into();
        let mut state = self.state.write().await;
        if !state.parameters.set(name, value) {
            return Err(ControllerError::UnknownField {
                form: self.spec.name.clone(),
                field: name.to_string(),
            });
        }
        Ok(())
    }

    /// Sends the current field values and waits for the reply.
    ///
    /// Never fails: every transport or service error ends in `Phase::Failed`.
    /// The request runs on its own task, so dropping this future does not
    /// leave the form in `Loading`.
    pub async fn submit(&self) -> Submission {
        let (generation, payload) = self.begin().await;
        tracing::info!(
            form = %self.spec.name,
            endpoint = %self.spec.endpoint,
            generation,
            "report generation submitted"
        );
        let controller = self.clone();
        let request = tokio::spawn(async move {
            let response = controller
                .transport
                .post_json(&controller.spec.endpoint, &payload)
                .await;
            let outcome = controller.classify(generation, response);
            controller.settle(generation, outcome).await
        });
        match request.await {
            Ok(submission) => submission,
            Err(err) => {
                tracing::error!(
                    form = %self.spec.name,
                    generation,
                    error = %err,
                    "report generation task failed"
                );
                let message = self.fallback_message.to_string();
                self.settle(generation, Outcome::Failed(message)).await
            }
        }
    }

    /// Relative link to the generated artifact; only available after success.
    pub async fn download_url(&self) -> Option<String> {
        self.snapshot().await.download_url()
    }

    pub async fn absolute_download_url(&self, base_url: &str) -> Result<String, ControllerError> {
        let path = self.download_url().await.ok_or_else(|| self.no_artifact())?;
        Ok(join_base_path(base_url, &path)?)
    }

    /// Fetches the artifact bytes through the same transport.
    pub async fn download_artifact(&self) -> Result<Vec<u8>, ControllerError> {
        let path = self.download_url().await.ok_or_else(|| self.no_artifact())?;
        let response = self.transport.get(&path).await?;
        if !response.is_success() {
            let message = ErrorBody::parse(&response.body)
                .and_then(|body| body.message().map(str::to_string))
                .unwrap_or_else(|| String::from_utf8_lossy(&response.body).into_owned());
            tracing::warn!(
                form = %self.spec.name,
                status = response.status,
                "artifact download rejected"
            );
            return Err(ControllerError::DownloadStatus {
                status: response.status,
                message,
            });
        }
        tracing::info!(
            form = %self.spec.name,
            bytes = response.body.len(),
            "artifact downloaded"
        );
        Ok(response.body)
    }

    async fn begin(&self) -> (u64, serde_json::Value) {
        let mut state = self.state.write().await;
        state.generation += 1;
        state.phase = Phase::Loading;
        state.error = None;
        state.result = None;
        state.settled_at = None;
        let generation = state.generation;
        let payload = state.parameters.to_payload();
        // Sent under the guard so subscribers see events in generation order.
        let _ = self.event_tx.send(ControllerEvent::StateChanged {
            snapshot: self.snapshot_of(&state),
        });
        (generation, payload)
    }

    fn classify(
        &self,
        generation: u64,
        response: Result<TransportResponse, TransportError>,
    ) -> Outcome {
        let response = match response {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(
                    form = %self.spec.name,
                    generation,
                    error = %err,
                    "report generation transport failure"
                );
                return Outcome::Failed(self.fallback_message.to_string());
            }
        };

        if response.is_success() {
            return match (self.spec.map_response)(&response.body) {
                Ok(result) => Outcome::Succeeded(result),
                Err(err) => {
                    tracing::warn!(
                        form = %self.spec.name,
                        generation,
                        status = response.status,
                        error = %err,
                        "report generation reply could not be decoded"
                    );
                    Outcome::Failed(self.fallback_message.to_string())
                }
            };
        }

        let message = ErrorBody::parse(&response.body)
            .and_then(|body| body.message().map(str::to_string));
        tracing::warn!(
            form = %self.spec.name,
            generation,
            status = response.status,
            service_error = ?message,
            "report generation rejected"
        );
        Outcome::Failed(message.unwrap_or_else(|| self.fallback_message.to_string()))
    }

    async fn settle(&self, generation: u64, outcome: Outcome) -> Submission {
        let mut state = self.state.write().await;
        if state.generation != generation {
            let snapshot = self.snapshot_of(&state);
            tracing::debug!(
                form = %self.spec.name,
                generation,
                current = snapshot.generation,
                "discarding reply for superseded submission"
            );
            let _ = self.event_tx.send(ControllerEvent::StaleResponseDiscarded {
                form: self.spec.name.clone(),
                generation,
            });
            return Submission {
                generation,
                superseded: true,
                snapshot,
            };
        }

        match outcome {
            Outcome::Succeeded(result) => {
                state.phase = Phase::Succeeded;
                state.result = Some(result);
                state.error = None;
            }
            Outcome::Failed(message) => {
                state.phase = Phase::Failed;
                state.result = None;
                state.error = Some(message);
            }
        }
        state.settled_at = Some(SystemTime::now());
        let snapshot = self.snapshot_of(&state);
        let _ = self.event_tx.send(ControllerEvent::StateChanged {
            snapshot: snapshot.clone(),
        });
        drop(state);

        tracing::info!(
            form = %self.spec.name,
            generation,
            phase = ?snapshot.phase,
            "report generation settled"
        );
        Submission {
            generation,
            superseded: false,
            snapshot,
        }
    }

    fn snapshot_of(&self, state: &ControllerState) -> ControllerSnapshot {
        ControllerSnapshot {
            form: self.spec.name.clone(),
            phase: state.phase,
            generation: state.generation,
            parameters: state.parameters.clone(),
            result: state.result.clone(),
            error: state.error.clone(),
            settled_at: state.settled_at.map(format_time),
        }
    }

    fn no_artifact(&self) -> ControllerError {
        ControllerError::NoArtifact {
            form: self.spec.name.clone(),
        }
    }
}

fn format_time(time: SystemTime) -> String {
    humantime::format_rfc3339(time).to_string()
}
