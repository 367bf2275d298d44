//! Backend worker: owns a tokio runtime and runs each queued command as its
//! own task, so responses come back in whatever order the service answers.

use std::{sync::Arc, thread};

use client_core::{DocumentUpload, HttpStudyBackend, StudyBackend};
use crossbeam_channel::{Receiver, Sender};
use shared::error::FailureKind;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, api_base: String) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                    FailureKind::Local,
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let backend: Arc<dyn StudyBackend> = Arc::new(HttpStudyBackend::new(api_base));
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                let backend = Arc::clone(&backend);
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    let event = run_command(backend.as_ref(), cmd).await;
                    if ui_tx.send(event).is_err() {
                        tracing::debug!("ui event receiver dropped; discarding result");
                    }
                });
            }
            tracing::info!("backend command queue closed; worker exiting");
        });
    });
}

async fn run_command(backend: &dyn StudyBackend, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::Upload { path } => {
            let outcome = match DocumentUpload::read(&path).await {
                Ok(document) => backend.upload_document(document).await,
                Err(err) => Err(err),
            };
            UiEvent::UploadSettled(outcome)
        }
        BackendCommand::Ingest => UiEvent::IngestSettled(backend.trigger_ingest().await),
        BackendCommand::Chat { request } => UiEvent::ChatSettled(backend.chat(request).await),
        BackendCommand::Health => UiEvent::HealthChecked(backend.health().await),
    }
}
