// src/pipeline/session.rs

//! Load-more driver and owner of the catalog state.
//!
//! At most one batch is in flight per session: a load request made while a
//! batch is loading is rejected, not queued. Completions that arrive after
//! [`CatalogSession::close`] or after a [`CatalogSession::reload`] started
//! are dropped without touching the state.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{AppError, Result};
use crate::models::{ApiShape, CatalogState, Config, CreatureRecord, ViewState};
use crate::pipeline::{ProjectionCache, merge, merge_filling};
use crate::services::{CreatureSource, Fetcher};

/// First identifier served by the per-identifier API.
const FIRST_ID: u32 = 1;

/// What a load request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Records were merged; carries the number received
    Loaded(usize),
    /// No more data is available
    Exhausted,
    /// Another load is in flight; nothing was done
    Busy,
    /// The session was closed or reloaded before completion
    Closed,
    /// The load failed; the message is in `last_error`
    Failed,
}

/// A browsing session over one catalog source.
pub struct CatalogSession<S> {
    fetcher: Fetcher<S>,
    shape: ApiShape,
    batch_size: u32,
    state: Mutex<CatalogState>,
    cache: Mutex<ProjectionCache>,
    epoch: AtomicU64,
    closed: AtomicBool,
}

/// Clears the in-flight flag when a load ends, however it ends.
struct LoadingGuard<'a, S> {
    session: &'a CatalogSession<S>,
    epoch: u64,
}

impl<S> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        // A reload already installed a fresh state; leave it alone.
        if self.session.epoch.load(Ordering::SeqCst) == self.epoch {
            self.session.lock_state().loading = false;
        }
    }
}

impl<S: CreatureSource> CatalogSession<S> {
    /// Create a session with empty state.
    pub fn new(source: S, config: &Config) -> Self {
        Self {
            fetcher: Fetcher::new(source, config.fetcher.clone(), config.api.max_id),
            shape: config.api.shape,
            batch_size: config.fetcher.batch_size.max(1),
            state: Mutex::new(CatalogState::new(FIRST_ID)),
            cache: Mutex::new(ProjectionCache::new()),
            epoch: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// The fetcher backing this session.
    pub fn fetcher(&self) -> &Fetcher<S> {
        &self.fetcher
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> CatalogState {
        self.lock_state().clone()
    }

    /// Tear the session down. In-flight work still runs to completion but
    /// its results are discarded.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Initial load for the configured API shape.
    ///
    /// A failure here is fatal to the view: the message is kept in
    /// `last_error` and returned. Nothing is retried automatically.
    pub async fn load_initial(&self) -> Result<LoadOutcome> {
        match self.shape {
            ApiShape::Bulk => self.load_bulk().await,
            ApiShape::PerId => {
                let outcome = self.load_more().await;
                if outcome == LoadOutcome::Exhausted && self.lock_state().records.is_empty() {
                    let error = AppError::fetch("initial load", "no records could be loaded");
                    self.fail(&error);
                    return Err(error);
                }
                Ok(outcome)
            }
        }
    }

    /// Load the next batch of identifiers starting at the cursor.
    ///
    /// On success the batch is merged and the cursor advances by the batch
    /// size; an empty batch ends pagination.
    pub async fn load_more(&self) -> LoadOutcome {
        if self.shape == ApiShape::Bulk {
            return self.load_bulk().await.unwrap_or(LoadOutcome::Failed);
        }

        let (cursor, guard) = match self.begin_load() {
            Ok(started) => started,
            Err(outcome) => return outcome,
        };

        let batch = self.fetcher.fetch_batch(cursor, self.batch_size).await;

        let Some(mut state) = self.lock_current(guard.epoch) else {
            log::debug!("Discarding batch from #{cursor}: session closed");
            return LoadOutcome::Closed;
        };

        if batch.is_empty() {
            state.has_more = false;
            log::info!("No more creatures after #{cursor}");
            return LoadOutcome::Exhausted;
        }

        let received = batch.records.len();
        let merged = merge(&state.records, batch.records);
        state.replace_records(merged);
        state.cursor = cursor.saturating_add(self.batch_size);
        LoadOutcome::Loaded(received)
    }

    /// Search the remote listing by name and merge the matches.
    ///
    /// Listing entries carry no levels, so already loaded levels and images
    /// are kept for matches that are known. Returns the number of matches received.
    pub async fn search_remote(&self, name: &str) -> Result<usize> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(0);
        }
        let epoch = self.epoch.load(Ordering::SeqCst);

        let found = self.fetcher.source().search(name).await?;
        let count = found.len();
        log::info!("Remote search '{name}' matched {count} creatures");

        if let Some(mut state) = self.lock_current(epoch) {
            let merged = merge_filling(&state.records, found);
            state.replace_records(merged);
        }
        Ok(count)
    }

    /// Replace the state wholesale, forget attempted identifiers and load
    /// again from the start.
    pub async fn reload(&self) -> Result<LoadOutcome> {
        if self.is_closed() {
            return Ok(LoadOutcome::Closed);
        }
        log::info!("Reloading catalog");
        {
            let mut state = self.lock_state();
            self.epoch.fetch_add(1, Ordering::SeqCst);
            state.reset(FIRST_ID);
        }
        self.fetcher.reset();
        self.cache().invalidate();
        self.load_initial().await
    }

    /// Filtered, sorted rows for `view`, memoized on the records snapshot
    /// and the view inputs.
    pub fn view(&self, view: &ViewState) -> Vec<CreatureRecord> {
        let state = self.lock_state();
        let mut cache = self.cache();
        cache.get(state.generation, &state.records, view).to_vec()
    }

    async fn load_bulk(&self) -> Result<LoadOutcome> {
        let (_, guard) = match self.begin_load() {
            Ok(started) => started,
            Err(outcome) => return Ok(outcome),
        };

        let result = self.fetcher.source().fetch_all().await;

        let Some(mut state) = self.lock_current(guard.epoch) else {
            return Ok(LoadOutcome::Closed);
        };

        match result {
            Ok(records) => {
                let received = records.len();
                let merged = merge(&state.records, records);
                state.replace_records(merged);
                state.has_more = false;
                state.last_error = None;
                log::info!("Loaded {received} creatures from the bulk endpoint");
                Ok(LoadOutcome::Loaded(received))
            }
            Err(error) => {
                log::error!("Initial load failed: {error}");
                state.last_error = Some(error.to_string());
                Err(error)
            }
        }
    }

    /// Claim the in-flight flag and return the cursor to load from.
    fn begin_load(&self) -> std::result::Result<(u32, LoadingGuard<'_, S>), LoadOutcome> {
        let mut state = self.lock_state();
        if self.is_closed() {
            return Err(LoadOutcome::Closed);
        }
        if state.loading {
            log::debug!("Load requested while a batch is in flight; ignoring");
            return Err(LoadOutcome::Busy);
        }
        if !state.has_more {
            return Err(LoadOutcome::Exhausted);
        }
        state.loading = true;
        let guard = LoadingGuard {
            session: self,
            epoch: self.epoch.load(Ordering::SeqCst),
        };
        Ok((state.cursor, guard))
    }

    fn fail(&self, error: &AppError) {
        log::error!("Initial load failed: {error}");
        self.lock_state().last_error = Some(error.to_string());
    }
}

impl<S> CatalogSession<S> {
    fn lock_state(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cache(&self) -> MutexGuard<'_, ProjectionCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the state only if the session is still open and no reload
    /// happened since `epoch`.
    fn lock_current(&self, epoch: u64) -> Option<MutexGuard<'_, CatalogState>> {
        let state = self.lock_state();
        if self.closed.load(Ordering::SeqCst) || self.epoch.load(Ordering::SeqCst) != epoch {
            return None;
        }
        Some(state)
    }
}
