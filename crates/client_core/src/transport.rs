use std::path::Path;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::DeserializeOwned;
use shared::protocol::{
    ChatRequest, ChatResponse, HealthResponse, IngestResponse, IngestSummary, UploadReceipt,
    UploadResponse,
};
use tracing::debug;

use crate::{error::ClientError, StudyBackend};

const PDF_MIME: &str = "application/pdf";
const OCTET_STREAM_MIME: &str = "application/octet-stream";

/// A document picked by the user, read fully into memory before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    pub async fn read(path: &Path) -> Result<Self, ClientError> {
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());
        Ok(Self { filename, bytes })
    }

    fn mime_type(&self) -> &'static str {
        if self.filename.to_ascii_lowercase().ends_with(".pdf") {
            PDF_MIME
        } else {
            OCTET_STREAM_MIME
        }
    }
}

/// [`StudyBackend`] over plain HTTP against the study service.
#[derive(Clone)]
pub struct HttpStudyBackend {
    http: Client,
    api_base: String,
}

impl HttpStudyBackend {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_base)
    }

    pub fn with_client(http: Client, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self { http, api_base }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.api_base)
    }
}

#[async_trait]
impl StudyBackend for HttpStudyBackend {
    async fn upload_document(&self, document: DocumentUpload) -> Result<UploadReceipt, ClientError> {
        let mime_type = document.mime_type();
        let part = Part::bytes(document.bytes)
            .file_name(document.filename)
            .mime_str(mime_type)?;
        let form = Form::new().part("file", part);
        let response = self
            .http
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;
        let body: UploadResponse = decode_json(ensure_success(response).await?).await?;

        if body.status.as_deref() == Some("error") {
            return Err(ClientError::Refused(
                body.message
                    .unwrap_or_else(|| "upload refused by service".to_string()),
            ));
        }
        let filename = body
            .filename
            .ok_or_else(|| ClientError::Decode("upload response has no filename".to_string()))?;
        Ok(UploadReceipt { filename })
    }

    async fn trigger_ingest(&self) -> Result<IngestSummary, ClientError> {
        let response = self.http.post(self.endpoint("ingest")).send().await?;
        let body: IngestResponse = decode_json(ensure_success(response).await?).await?;

        match (body.pdf_count, body.pages_loaded) {
            (Some(pdf_count), Some(pages_loaded)) => Ok(IngestSummary {
                pdf_count,
                pages_loaded,
                chunks_added: body.chunks_added,
            }),
            _ => Err(ClientError::Refused(body.message.unwrap_or_else(|| {
                format!(
                    "ingest reported status '{}'",
                    body.status.as_deref().unwrap_or("unknown")
                )
            }))),
        }
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ClientError> {
        let response = self
            .http
            .post(self.endpoint("chat"))
            .json(&request)
            .send()
            .await?;
        decode_json(ensure_success(response).await?).await
    }

    async fn health(&self) -> Result<String, ClientError> {
        let response = self.http.get(self.endpoint("health")).send().await?;
        let body: HealthResponse = decode_json(ensure_success(response).await?).await?;
        Ok(body.status)
    }
}

/// Turns a non-2xx response into [`ClientError::Rejected`] carrying the raw
/// body text.
async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await?;
    debug!(status = status.as_u16(), "study service rejected request");
    Err(ClientError::Rejected {
        status: status.as_u16(),
        body,
    })
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|err| ClientError::Decode(err.to_string()))
}
