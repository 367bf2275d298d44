//! Backend commands queued from UI to backend worker.

use shared::protocol::ChatRequest;
use std::path::PathBuf;

pub enum BackendCommand {
    Upload { path: PathBuf },
    Ingest,
    Chat { request: ChatRequest },
    Health,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Upload { .. } => "upload",
            BackendCommand::Ingest => "ingest",
            BackendCommand::Chat { .. } => "chat",
            BackendCommand::Health => "health",
        }
    }
}
