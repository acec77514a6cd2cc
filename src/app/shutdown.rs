//! Graceful shutdown handling.

use tokio_util::sync::CancellationToken;

/// Stops the progress logger and waits for it to drain.
pub async fn shutdown_gracefully(
    cancel: CancellationToken,
    logging_task: Option<tokio::task::JoinHandle<()>>,
) {
    cancel.cancel();
    if let Some(logging_task) = logging_task {
        let _ = logging_task.await;
    }
}
