//! The watch cycle: paginate, detect new listings, mark them seen, notify.
//!
//! Pages are processed strictly in order, one at a time. For each record
//! that is not yet in the seen-set the cycle
//!
//! 1. inserts its id into the in-memory set,
//! 2. persists the whole set, and only then
//! 3. hands the listing to the notifier.
//!
//! A crash between 2 and 3 loses at most one notification and never causes
//! a duplicate. A failed persist stops the run before anything is sent.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::models::{ListingId, ListingRecord, SeenSet};
use crate::pipeline::{identity, normalize};
use crate::services::{Notifier, PageFetcher};
use crate::storage::SeenStore;

/// What happens to listings discovered during the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleMode {
    /// Mark new listings seen and notify for each.
    Notify,
    /// Mark new listings seen without notifying (initial baseline).
    Baseline,
}

/// Watch cycle parameters.
#[derive(Debug, Clone)]
pub struct CycleOptions {
    /// Highest page number to request.
    pub max_pages: u32,
    /// Site root used to build notification links.
    pub site_base: String,
    pub mode: CycleMode,
}

/// Why pagination ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// The configured page bound was reached.
    PageLimit,
    /// A page yielded no records.
    EmptyPage { page: u32 },
    /// A page could not be fetched after retries.
    FetchFailed { page: u32 },
}

/// Counts reported at the end of a cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Pages fetched successfully, including a terminating empty page.
    pub pages: u32,
    /// Records extracted across all pages.
    pub total_fetched: usize,
    /// Records not seen before this run.
    pub total_new: usize,
    pub notified: usize,
    pub notify_failures: usize,
    /// Ids of new records, in discovery order.
    pub new_ids: Vec<ListingId>,
    /// Size of the seen-set at the end of the cycle.
    pub seen_total: usize,
    pub stop: StopReason,
}

impl CycleSummary {
    fn start() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            pages: 0,
            total_fetched: 0,
            total_new: 0,
            notified: 0,
            notify_failures: 0,
            new_ids: Vec::new(),
            seen_total: 0,
            stop: StopReason::PageLimit,
        }
    }

    fn finish(&mut self, stop: StopReason, seen: &SeenSet) {
        self.stop = stop;
        self.seen_total = seen.len();
        self.finished_at = Utc::now();
    }
}

/// One watch cycle over the given collaborators.
pub struct WatchCycle<'a> {
    fetcher: &'a dyn PageFetcher,
    store: &'a dyn SeenStore,
    notifier: &'a dyn Notifier,
    options: CycleOptions,
}

impl<'a> WatchCycle<'a> {
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        store: &'a dyn SeenStore,
        notifier: &'a dyn Notifier,
        options: CycleOptions,
    ) -> Self {
        Self {
            fetcher,
            store,
            notifier,
            options,
        }
    }

    /// Run the cycle to completion.
    ///
    /// Fetch and notification failures are absorbed into the summary. A
    /// seen-state load or persist failure aborts the cycle with an error.
    pub async fn run(&self) -> Result<CycleSummary> {
        let mut summary = CycleSummary::start();
        let mut seen = self.store.load().await?;
        log::info!(
            "Loaded {} seen ids from {}",
            seen.len(),
            self.store.location()
        );

        let stop = match self.paginate(&mut seen, &mut summary).await {
            Ok(stop) => stop,
            Err(e) => {
                log::error!(
                    "Aborting watch cycle: {}. Fetched {} items; new found: {}",
                    e,
                    summary.total_fetched,
                    summary.total_new
                );
                return Err(e);
            }
        };

        summary.finish(stop, &seen);
        log::info!(
            "Fetched {} items; new found: {}",
            summary.total_fetched,
            summary.total_new
        );
        Ok(summary)
    }

    async fn paginate(&self, seen: &mut SeenSet, summary: &mut CycleSummary) -> Result<StopReason> {
        for page in 1..=self.options.max_pages {
            let response = match self.fetcher.fetch(page).await {
                Ok(response) => response,
                Err(e) => {
                    log::error!("Failed to fetch page {}: {}", page, e);
                    return Ok(StopReason::FetchFailed { page });
                }
            };
            summary.pages += 1;

            let records = normalize::extract(&response);
            log::debug!("page {} -> {} items", page, records.len());
            if page == 1 && log::log_enabled!(log::Level::Debug) {
                if let Some(sample) = records.first() {
                    log::debug!(
                        "sample item (raw): {}",
                        serde_json::to_string_pretty(sample.raw())?
                    );
                }
            }

            if records.is_empty() {
                return Ok(StopReason::EmptyPage { page });
            }
            summary.total_fetched += records.len();

            for record in &records {
                self.process(record, seen, summary).await?;
            }
        }

        Ok(StopReason::PageLimit)
    }

    async fn process(
        &self,
        record: &ListingRecord,
        seen: &mut SeenSet,
        summary: &mut CycleSummary,
    ) -> Result<()> {
        let id = identity::resolve(record);
        if seen.contains(&id) {
            log::debug!("Already seen: {}", id);
            return Ok(());
        }

        seen.insert(id.clone());
        self.store.persist(seen).await?;
        summary.total_new += 1;
        summary.new_ids.push(id.clone());

        if self.options.mode == CycleMode::Baseline {
            log::debug!("Marked as seen without notifying: {}", id);
            return Ok(());
        }

        let title = record.display_title();
        let link = record.display_link(&self.options.site_base);
        log::info!("New: {} {}", title, link);

        match self.notifier.notify(&title, &link, record).await {
            Ok(()) => summary.notified += 1,
            Err(e) => {
                summary.notify_failures += 1;
                log::error!("Notification failed for {} ({}): {}", id, title, e);
            }
        }
        Ok(())
    }
}
