//! Page-based extraction orchestrator.
//!
//! For each identifier of a batch, strictly one after another:
//! 1. open a hidden product page through a [`PageHost`]
//! 2. wait for it to settle, then poll it until ready, blocked, not found or
//!    past the deadline
//! 3. run the DOM extractor against the loaded page
//! 4. close the page, whatever happened
//!
//! Failed identifiers are retried with an escalating delay, identifiers are
//! spaced by a fixed delay, and progress is persisted to the store and
//! announced on the notification bus after every identifier.

mod batch;
mod dispatch;
mod guard;
mod http_host;
mod lifecycle;
mod page_host;
mod progress;

pub use batch::{ExtractionRun, Orchestrator};
pub use guard::PageGuard;
pub use http_host::HttpPageHost;
pub use lifecycle::{extract_from_page, LifecycleState};
pub use page_host::{PageHost, PageId};
pub use progress::ProgressReporter;
