//! The page host seam.

use std::fmt;

use async_trait::async_trait;

use crate::error_handling::PageError;
use crate::extractor::PageSnapshot;

/// Handle of a page opened by a [`PageHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(pub u64);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page#{}", self.0)
    }
}

/// Opens hidden pages, reads their current document and closes them.
///
/// Implementations must tolerate `close` on a page that already failed.
#[async_trait]
pub trait PageHost: Send + Sync {
    /// Starts loading `url` in a new hidden page.
    async fn open(&self, url: &str) -> Result<PageId, PageError>;

    /// Current state of the page's document.
    async fn snapshot(&self, id: PageId) -> Result<PageSnapshot, PageError>;

    /// Closes the page and releases its resources.
    async fn close(&self, id: PageId) -> Result<(), PageError>;
}
