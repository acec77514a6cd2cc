//! Progress logging utilities.

use log::{debug, info, warn};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::messages::{Message, NotificationBus};
use crate::store::ExtractionStatus;

/// Logs progress information about an extraction batch.
pub fn log_progress(status: &ExtractionStatus) {
    let elapsed_secs = (chrono::Utc::now() - status.start_time)
        .to_std()
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    info!(
        "Processed {}/{} products in {:.2} seconds ({} successful, {} failed)",
        status.processed, status.total, elapsed_secs, status.successful, status.failed
    );
}

/// Logs every notification published on `bus` until `cancel` fires.
pub fn spawn_progress_logger(bus: &NotificationBus, cancel: CancellationToken) -> JoinHandle<()> {
    let mut receiver = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                message = receiver.recv() => match message {
                    Ok(Message::ExtractionProgress { data }) => log_progress(&data),
                    Ok(Message::ExtractionComplete { data }) => info!("{}", data.current_message),
                    Ok(Message::ExtractionFailed { data }) => warn!("{}", data.current_message),
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("Progress logger skipped {} notifications", skipped);
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_progress_logger_stops_on_cancel() {
        let bus = NotificationBus::new();
        let cancel = CancellationToken::new();
        let task = spawn_progress_logger(&bus, cancel.clone());

        let mut status = ExtractionStatus::started(2);
        status.processed = 1;
        assert_eq!(bus.publish(Message::ExtractionProgress { data: status }), 1);

        cancel.cancel();
        task.await.expect("logger task should finish cleanly");
    }
}
