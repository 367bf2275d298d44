//! Session state for one running frontend and the controller that drives it.
//!
//! Every operation is split into a synchronous `begin_*` half, applied the
//! moment the user acts, and a `settle_*` half applied when the service
//! answers. Outcomes settle in arrival order: when several chat requests
//! overlap, the last one to settle owns `citations`.

use std::{path::Path, sync::Arc};

use shared::{
    domain::{ChatMessage, Citation, Difficulty, Mode},
    protocol::{ChatRequest, ChatResponse, IngestSummary, UploadReceipt},
};
use tracing::{debug, info, warn};

use crate::{error::ClientError, transport::DocumentUpload, StudyBackend};

pub const DEFAULT_MODEL: &str = "llama3.1:8b";
pub const CHAT_FAILURE_MESSAGE: &str = "Request failed. Is the backend running?";
pub const UPLOADING_STATUS: &str = "Uploading PDF...";
pub const INGESTING_STATUS: &str = "Indexing (ingest)...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    mode: Mode,
    difficulty: Difficulty,
    model: String,
    question: String,
    user_answer: String,
    messages: Vec<ChatMessage>,
    citations: Vec<Citation>,
    upload_status: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::with_model(DEFAULT_MODEL)
    }
}

impl SessionState {
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            mode: Mode::default(),
            difficulty: Difficulty::default(),
            model: model.into(),
            question: String::new(),
            user_answer: String::new(),
            messages: Vec::new(),
            citations: Vec::new(),
            upload_status: String::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn user_answer(&self) -> &str {
        &self.user_answer
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn citations(&self) -> &[Citation] {
        &self.citations
    }

    pub fn upload_status(&self) -> &str {
        &self.upload_status
    }

    /// The answer box only matters in grade mode.
    pub fn shows_answer_box(&self) -> bool {
        self.mode == Mode::Grade
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
    }

    pub fn set_user_answer(&mut self, user_answer: impl Into<String>) {
        self.user_answer = user_answer.into();
    }

    /// Editable drafts, for frontends that bind text widgets directly.
    pub fn question_mut(&mut self) -> &mut String {
        &mut self.question
    }

    pub fn user_answer_mut(&mut self) -> &mut String {
        &mut self.user_answer
    }

    pub fn model_mut(&mut self) -> &mut String {
        &mut self.model
    }

    pub fn begin_upload(&mut self) {
        self.upload_status = UPLOADING_STATUS.to_string();
    }

    pub fn settle_upload(&mut self, outcome: Result<UploadReceipt, ClientError>) {
        self.upload_status = match outcome {
            Ok(receipt) => {
                info!(filename = %receipt.filename, "document uploaded");
                format!("Uploaded: {}", receipt.filename)
            }
            Err(err) => {
                warn!(kind = ?err.kind(), "upload failed: {err}");
                format!("Upload failed: {err}")
            }
        };
    }

    pub fn begin_ingest(&mut self) {
        self.upload_status = INGESTING_STATUS.to_string();
    }

    pub fn settle_ingest(&mut self, outcome: Result<IngestSummary, ClientError>) {
        self.upload_status = match outcome {
            Ok(summary) => {
                info!(
                    pdf_count = summary.pdf_count,
                    pages_loaded = summary.pages_loaded,
                    chunks_added = ?summary.chunks_added,
                    "ingest complete"
                );
                format!(
                    "Ingest complete → PDFs: {}, Pages: {}",
                    summary.pdf_count, summary.pages_loaded
                )
            }
            Err(err) => {
                warn!(kind = ?err.kind(), "ingest failed: {err}");
                format!("Ingest failed: {err}")
            }
        };
    }

    /// Takes the drafted question and appends it as a user message.
    ///
    /// Returns `None` without touching state when the trimmed question is
    /// empty; otherwise the request to send. The draft is cleared, the answer
    /// draft is kept.
    pub fn begin_send(&mut self) -> Option<ChatRequest> {
        let question = self.question.trim().to_string();
        if question.is_empty() {
            return None;
        }

        self.messages.push(ChatMessage::user(question.clone()));
        self.question.clear();

        let user_answer = if self.mode == Mode::Grade {
            self.user_answer.clone()
        } else {
            String::new()
        };

        Some(ChatRequest {
            question,
            mode: self.mode,
            difficulty: self.difficulty,
            user_answer,
            model: self.model.clone(),
        })
    }

    pub fn settle_send(&mut self, outcome: Result<ChatResponse, ClientError>) {
        match outcome {
            Ok(response) => {
                if let Some(routed) = response.mode.as_deref() {
                    debug!(routed_mode = routed, "chat answered");
                }
                self.messages.push(ChatMessage::assistant(response.answer));
                self.citations = response.citations.unwrap_or_default();
            }
            Err(err) => {
                warn!(kind = ?err.kind(), "chat request failed: {err}");
                self.messages.push(ChatMessage::assistant(CHAT_FAILURE_MESSAGE));
            }
        }
    }
}

/// Owns a [`SessionState`] and performs each operation end to end against a
/// [`StudyBackend`].
pub struct SessionController {
    state: SessionState,
    backend: Arc<dyn StudyBackend>,
}

impl SessionController {
    pub fn new(backend: Arc<dyn StudyBackend>) -> Self {
        Self::with_state(backend, SessionState::default())
    }

    pub fn with_state(backend: Arc<dyn StudyBackend>, state: SessionState) -> Self {
        Self { state, backend }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn backend(&self) -> Arc<dyn StudyBackend> {
        Arc::clone(&self.backend)
    }

    /// Returns whether the service accepted the document.
    pub async fn upload_document(&mut self, document: DocumentUpload) -> bool {
        self.state.begin_upload();
        let outcome = self.backend.upload_document(document).await;
        let accepted = outcome.is_ok();
        self.state.settle_upload(outcome);
        accepted
    }

    /// Reads `path` and uploads it. A read failure is reported through the
    /// upload status like any other upload failure.
    pub async fn upload_path(&mut self, path: &Path) -> bool {
        self.state.begin_upload();
        let outcome = match DocumentUpload::read(path).await {
            Ok(document) => self.backend.upload_document(document).await,
            Err(err) => Err(err),
        };
        let accepted = outcome.is_ok();
        self.state.settle_upload(outcome);
        accepted
    }

    /// Returns whether indexing completed.
    pub async fn trigger_ingest(&mut self) -> bool {
        self.state.begin_ingest();
        let outcome = self.backend.trigger_ingest().await;
        let completed = outcome.is_ok();
        self.state.settle_ingest(outcome);
        completed
    }

    /// Returns `false` when there was nothing to send.
    pub async fn send_message(&mut self) -> bool {
        let Some(request) = self.state.begin_send() else {
            return false;
        };
        let outcome = self.backend.chat(request).await;
        self.state.settle_send(outcome);
        true
    }

    pub async fn check_health(&self) -> Result<String, ClientError> {
        self.backend.health().await
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
