//! Collaborators of the watch cycle: page fetching and notification.

pub mod email;
pub mod fetcher;
pub mod notifier;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::ListingRecord;

pub use email::EmailNotifier;
pub use fetcher::HttpFetcher;
pub use notifier::LogNotifier;

/// Source of listing pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch and decode one page (1-based). Implementations apply their own
    /// retries; an error means the page is unavailable for this run.
    async fn fetch(&self, page: u32) -> Result<Value>;
}

/// Delivery channel for new-listing alerts.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, title: &str, link: &str, record: &ListingRecord) -> Result<()>;
}
