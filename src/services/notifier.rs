//! Log-only notifier.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ListingRecord;
use crate::services::Notifier;

/// Writes new listings to the log instead of delivering them.
///
/// Used for dry runs, baseline seeding and when email is not configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, title: &str, link: &str, record: &ListingRecord) -> Result<()> {
        log::info!("Not sending (log only): {} {}", title, link);
        log::debug!("Raw: {}", record.to_compact_json());
        Ok(())
    }
}
