use shared::error::FailureKind;
use thiserror::Error;

/// Failure of a single request to the study service.
///
/// `Display` yields the text shown to the user after the `"... failed: "`
/// prefix, so `Rejected` renders the raw response body.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("{}", rejected_text(.status, .body))]
    Rejected { status: u16, body: String },
    #[error("{0}")]
    Refused(String),
    #[error("unexpected response from service: {0}")]
    Decode(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ClientError::Transport(_) => FailureKind::Transport,
            ClientError::Rejected { .. } | ClientError::Refused(_) | ClientError::Decode(_) => {
                FailureKind::Rejected
            }
            ClientError::Io(_) => FailureKind::Local,
        }
    }
}

fn rejected_text(status: &u16, body: &str) -> String {
    if body.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        body.to_string()
    }
}
