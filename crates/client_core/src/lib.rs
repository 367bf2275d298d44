use async_trait::async_trait;
use shared::protocol::{ChatRequest, ChatResponse, IngestSummary, UploadReceipt};

pub mod config;
pub mod error;
pub mod session;
pub mod transport;

pub use config::{load_settings, ClientSettings};
pub use error::ClientError;
pub use session::{SessionController, SessionState};
pub use transport::{DocumentUpload, HttpStudyBackend};

/// The study service as seen from a client session.
#[async_trait]
pub trait StudyBackend: Send + Sync {
    async fn upload_document(&self, document: DocumentUpload) -> Result<UploadReceipt, ClientError>;
    async fn trigger_ingest(&self) -> Result<IngestSummary, ClientError>;
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ClientError>;
    async fn health(&self) -> Result<String, ClientError>;
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
