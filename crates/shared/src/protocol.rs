use serde::{Deserialize, Serialize};

use crate::domain::{Citation, Difficulty, Mode};

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub user_answer: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub citations: Option<Vec<Citation>>,
    /// Mode the service actually routed to; `"blocked"` when its safety
    /// filter refused the question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// Body of a 2xx `POST /upload`. The service reports type rejections in-band
/// with `status = "error"` and a `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub filename: String,
}

/// Body of a 2xx `POST /ingest`. With nothing uploaded the service answers
/// `status = "no_files"` and a `message` instead of counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages_loaded: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks_added: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub pdf_count: u64,
    pub pages_loaded: u64,
    pub chunks_added: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_uses_lowercase_wire_enums() {
        let request = ChatRequest {
            question: "Explain preload".to_string(),
            mode: Mode::Flashcards,
            difficulty: Difficulty::Hard,
            user_answer: String::new(),
            model: "gemma2:2b".to_string(),
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "question": "Explain preload",
                "mode": "flashcards",
                "difficulty": "hard",
                "user_answer": "",
                "model": "gemma2:2b",
            })
        );
    }

    #[test]
    fn chat_response_without_citations_decodes() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"answer":"Upload notes first."}"#).expect("decode");
        assert_eq!(response.citations, None);
        assert_eq!(response.mode, None);
    }

    #[test]
    fn ingest_no_files_body_decodes() {
        let response: IngestResponse = serde_json::from_str(
            r#"{"status":"no_files","message":"No PDFs found in uploads folder."}"#,
        )
        .expect("decode");
        assert_eq!(response.pdf_count, None);
        assert_eq!(response.status.as_deref(), Some("no_files"));
    }
}
