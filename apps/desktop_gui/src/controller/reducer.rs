//! Applies backend events to the session and the shell status line.

use client_core::SessionState;

use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Worker and service status shown outside the session itself.
#[derive(Debug, Clone, Default)]
pub struct ShellStatus {
    pub backend: String,
    pub banner: Option<UiError>,
}

pub fn apply_ui_event(session: &mut SessionState, shell: &mut ShellStatus, event: UiEvent) {
    match event {
        UiEvent::Info(message) => shell.backend = message,
        UiEvent::Error(error) => {
            shell.backend = error.headline().to_string();
            shell.banner = Some(error);
        }
        UiEvent::UploadSettled(outcome) => session.settle_upload(outcome),
        UiEvent::IngestSettled(outcome) => session.settle_ingest(outcome),
        UiEvent::ChatSettled(outcome) => session.settle_send(outcome),
        UiEvent::HealthChecked(Ok(status)) => {
            shell.backend = format!("Backend: {status}");
            shell.banner = None;
        }
        UiEvent::HealthChecked(Err(err)) => {
            let error = UiError::from_client_error(UiErrorContext::Health, &err);
            shell.backend = error.headline().to_string();
            shell.banner = Some(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::{session::CHAT_FAILURE_MESSAGE, ClientError};
    use shared::{
        domain::{Citation, PageRef},
        error::FailureKind,
        protocol::{ChatResponse, IngestSummary, UploadReceipt},
    };

    fn cited(source: &str) -> Vec<Citation> {
        vec![Citation {
            source: source.to_string(),
            page: PageRef::Number(1),
            snippet: String::new(),
        }]
    }

    #[test]
    fn upload_and_ingest_outcomes_update_status() {
        let mut session = SessionState::default();
        let mut shell = ShellStatus::default();

        session.begin_upload();
        assert_eq!(session.upload_status(), "Uploading PDF...");
        apply_ui_event(
            &mut session,
            &mut shell,
            UiEvent::UploadSettled(Ok(UploadReceipt {
                filename: "renal.pdf".to_string(),
            })),
        );
        assert_eq!(session.upload_status(), "Uploaded: renal.pdf");

        session.begin_ingest();
        apply_ui_event(
            &mut session,
            &mut shell,
            UiEvent::IngestSettled(Ok(IngestSummary {
                pdf_count: 3,
                pages_loaded: 42,
                chunks_added: Some(80),
            })),
        );
        assert_eq!(session.upload_status(), "Ingest complete → PDFs: 3, Pages: 42");
    }

    #[test]
    fn chat_events_settle_in_arrival_order() {
        let mut session = SessionState::default();
        let mut shell = ShellStatus::default();
        session.set_question("first");
        session.begin_send().expect("first");
        session.set_question("second");
        session.begin_send().expect("second");

        apply_ui_event(
            &mut session,
            &mut shell,
            UiEvent::ChatSettled(Ok(ChatResponse {
                answer: "second answer".to_string(),
                citations: Some(cited("second.pdf")),
                mode: None,
            })),
        );
        apply_ui_event(
            &mut session,
            &mut shell,
            UiEvent::ChatSettled(Err(ClientError::Refused("overloaded".to_string()))),
        );

        let texts: Vec<&str> = session.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "second answer", CHAT_FAILURE_MESSAGE]);
        assert_eq!(session.citations(), cited("second.pdf").as_slice());
    }

    #[test]
    fn health_failure_raises_banner_and_success_clears_it() {
        let mut session = SessionState::default();
        let mut shell = ShellStatus::default();

        apply_ui_event(
            &mut session,
            &mut shell,
            UiEvent::HealthChecked(Err(ClientError::Rejected {
                status: 503,
                body: "starting".to_string(),
            })),
        );
        let banner = shell.banner.as_ref().expect("banner");
        assert_eq!(banner.kind(), FailureKind::Rejected);
        assert_eq!(banner.message(), "starting");

        apply_ui_event(
            &mut session,
            &mut shell,
            UiEvent::HealthChecked(Ok("ok".to_string())),
        );
        assert!(shell.banner.is_none());
        assert_eq!(shell.backend, "Backend: ok");
        assert_eq!(session, SessionState::default());
    }
}
