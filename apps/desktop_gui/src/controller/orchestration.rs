//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};
use shared::error::FailureKind;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext};

/// Queues `cmd` for the backend worker. On failure the returned error says
/// why; the caller settles the operation it had begun.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), UiError> {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => Err(UiError::new(
            FailureKind::Local,
            UiErrorContext::CommandQueue,
            "UI command queue is full; please retry",
        )),
        Err(TrySendError::Disconnected(_)) => Err(UiError::new(
            FailureKind::Local,
            UiErrorContext::CommandQueue,
            "Backend command processor disconnected (possible startup/runtime failure); restart the app",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn queued_command_reaches_worker() {
        let (tx, rx) = bounded(1);
        dispatch_backend_command(&tx, BackendCommand::Ingest).expect("queued");
        assert!(matches!(rx.try_recv(), Ok(BackendCommand::Ingest)));
    }

    #[test]
    fn full_queue_is_reported() {
        let (tx, _rx) = bounded(1);
        dispatch_backend_command(&tx, BackendCommand::Health).expect("first");
        let err = dispatch_backend_command(&tx, BackendCommand::Ingest).expect_err("full");
        assert_eq!(err.context(), UiErrorContext::CommandQueue);
        assert_eq!(err.message(), "UI command queue is full; please retry");
    }

    #[test]
    fn disconnected_worker_is_reported() {
        let (tx, rx) = bounded(4);
        drop(rx);
        let err = dispatch_backend_command(&tx, BackendCommand::Health).expect_err("gone");
        assert!(err.message().starts_with("Backend command processor disconnected"));
    }
}
