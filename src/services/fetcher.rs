// src/services/fetcher.rs

//! Batched per-identifier fetching.
//!
//! Every identifier is requested at most once per fetcher: identifiers are
//! claimed into the attempted-set before any request goes out, whatever the
//! outcome of that request. A failed identifier is logged and skipped; it
//! never aborts the batch.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::models::{CreatureRecord, FetcherConfig};
use crate::services::CreatureSource;

/// Result of one `fetch_batch` call.
#[derive(Debug, Default)]
pub struct Batch {
    /// Successfully parsed records, in identifier order
    pub records: Vec<CreatureRecord>,
    /// Identifiers a request was issued for
    pub requested: usize,
    /// Identifiers skipped because they were already attempted
    pub skipped: usize,
    /// Requests that failed
    pub failed: usize,
}

impl Batch {
    /// An empty batch means no more data.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Fetches contiguous identifier ranges from a [`CreatureSource`].
pub struct Fetcher<S> {
    source: S,
    config: FetcherConfig,
    max_id: u32,
    attempted: Mutex<BTreeSet<u32>>,
}

impl<S: CreatureSource> Fetcher<S> {
    /// Create a fetcher for identifiers up to and including `max_id`.
    pub fn new(source: S, config: FetcherConfig, max_id: u32) -> Self {
        Self {
            source,
            config,
            max_id,
            attempted: Mutex::new(BTreeSet::new()),
        }
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Highest identifier this fetcher will request.
    pub fn max_id(&self) -> u32 {
        self.max_id
    }

    /// Whether `id` has already been attempted.
    pub fn is_attempted(&self, id: u32) -> bool {
        self.attempted().contains(&id)
    }

    /// Number of attempted identifiers.
    pub fn attempted_count(&self) -> usize {
        self.attempted().len()
    }

    /// Forget every attempted identifier.
    pub fn reset(&self) {
        self.attempted().clear();
    }

    /// Fetch `[start_id, start_id + count - 1]`, clamped to `max_id`.
    ///
    /// Already attempted identifiers are skipped without a request. With
    /// `max_concurrent > 1` requests fan out up to that many at a time;
    /// results are still returned in identifier order.
    pub async fn fetch_batch(&self, start_id: u32, count: u32) -> Batch {
        let (claimed, skipped) = self.claim(start_id, count);
        let mut batch = Batch {
            requested: claimed.len(),
            skipped,
            ..Batch::default()
        };

        if claimed.is_empty() {
            log::debug!("Nothing to fetch from #{start_id} (count {count})");
            return batch;
        }

        let delay = Duration::from_millis(self.config.request_delay_ms);
        let concurrency = self.config.max_concurrent.max(1);

        let mut results = stream::iter(claimed)
            .map(|id| async move { (id, self.source.fetch_by_id(id).await) })
            .buffered(concurrency);

        let mut remaining = batch.requested;
        while let Some((id, result)) = results.next().await {
            remaining -= 1;
            match result {
                Ok(record) => batch.records.push(record),
                Err(error) => {
                    batch.failed += 1;
                    log::warn!("Skipping creature #{id}: {error}");
                }
            }

            // No pause once the last request has completed.
            if remaining > 0 && delay.as_millis() > 0 {
                tokio::time::sleep(delay).await;
            }
        }

        log::info!(
            "Batch from #{start_id}: {} loaded, {} failed, {} skipped",
            batch.records.len(),
            batch.failed,
            batch.skipped
        );
        batch
    }

    /// Mark every not-yet-attempted identifier of the range as attempted and
    /// return them, together with the number of skipped identifiers.
    fn claim(&self, start_id: u32, count: u32) -> (Vec<u32>, usize) {
        if count == 0 || start_id > self.max_id {
            return (Vec::new(), 0);
        }
        let end = start_id.saturating_add(count - 1).min(self.max_id);

        let mut attempted = self.attempted();
        let mut claimed = Vec::new();
        let mut skipped = 0;
        for id in start_id..=end {
            if attempted.insert(id) {
                claimed.push(id);
            } else {
                skipped += 1;
            }
        }
        (claimed, skipped)
    }

    fn attempted(&self) -> MutexGuard<'_, BTreeSet<u32>> {
        self.attempted.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
