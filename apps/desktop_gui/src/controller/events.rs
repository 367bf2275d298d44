//! UI/backend events and error modeling for desktop GUI controller.

use client_core::ClientError;
use shared::{
    error::FailureKind,
    protocol::{ChatResponse, IngestSummary, UploadReceipt},
};

pub enum UiEvent {
    Info(String),
    Error(UiError),
    UploadSettled(Result<UploadReceipt, ClientError>),
    IngestSettled(Result<IngestSummary, ClientError>),
    ChatSettled(Result<ChatResponse, ClientError>),
    HealthChecked(Result<String, ClientError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    CommandQueue,
    Health,
}

#[derive(Debug, Clone)]
pub struct UiError {
    kind: FailureKind,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(kind: FailureKind, context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            kind,
            context,
            message: message.into(),
        }
    }

    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        Self::new(err.kind(), context, err.to_string())
    }

    /// One-line summary for the status banner; the raw message is shown
    /// underneath.
    pub fn headline(&self) -> &'static str {
        match (self.context, self.kind) {
            (UiErrorContext::BackendStartup, _) => {
                "Backend worker startup failure; restart the app."
            }
            (UiErrorContext::CommandQueue, _) => "Request could not be queued; please retry.",
            (UiErrorContext::Health, FailureKind::Transport) => {
                "Service unreachable; check the API base and that the backend is running."
            }
            (UiErrorContext::Health, _) => "Service answered the health check with an error.",
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
