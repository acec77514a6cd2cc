//! Messages exchanged between the UI side and the extraction pipeline.
//!
//! Requests (`EXTRACT_IMAGES`, `EXTRACT_GALLERY_IMAGES`,
//! `GET_EXTRACTION_STATUS`) are answered with a [`Reply`]. Notifications
//! (`EXTRACTION_PROGRESS`, `EXTRACTION_COMPLETE`, `EXTRACTION_FAILED`) are
//! fanned out through a [`NotificationBus`]; publishing with nobody
//! listening is not an error.

use log::trace;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::extractor::{ExtractionResult, PageSnapshot};
use crate::store::ExtractionStatus;

const BUS_CAPACITY: usize = 64;

/// A request or notification, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Start a batch extraction.
    ExtractImages {
        /// Identifiers to extract
        asins: Vec<String>,
    },
    /// Run the extractor against a page.
    ExtractGalleryImages {
        /// Page to extract from
        snapshot: PageSnapshot,
    },
    /// Ask for the current extraction status.
    GetExtractionStatus,
    /// A batch made progress.
    ExtractionProgress {
        /// Status after the step
        data: ExtractionStatus,
    },
    /// A batch finished.
    ExtractionComplete {
        /// Final status
        data: ExtractionStatus,
    },
    /// A batch failed as a whole.
    ExtractionFailed {
        /// Final status, with the error set
        data: ExtractionStatus,
    },
}

/// Answer to a request [`Message`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    /// Acknowledgement of an accepted or rejected request.
    Ack {
        /// Request accepted
        success: bool,
        /// Human-readable note
        message: String,
    },
    /// Extractor output for one page.
    Extraction(ExtractionResult),
    /// Current status; `None` when no batch has run.
    Status(Option<ExtractionStatus>),
}

impl Reply {
    /// Accepted request.
    pub fn ack(message: impl Into<String>) -> Self {
        Reply::Ack {
            success: true,
            message: message.into(),
        }
    }

    /// Rejected request.
    pub fn rejected(message: impl Into<String>) -> Self {
        Reply::Ack {
            success: false,
            message: message.into(),
        }
    }
}

/// Best-effort broadcast of notification messages.
#[derive(Clone)]
pub struct NotificationBus {
    sender: broadcast::Sender<Message>,
}

impl NotificationBus {
    /// Creates a bus with no listeners.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BUS_CAPACITY);
        Self { sender }
    }

    /// Registers a listener.
    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.sender.subscribe()
    }

    /// Publishes a notification; returns the number of listeners reached.
    pub fn publish(&self, message: Message) -> usize {
        match self.sender.send(message) {
            Ok(n) => n,
            Err(_) => {
                trace!("Notification dropped, no listeners");
                0
            }
        }
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}
