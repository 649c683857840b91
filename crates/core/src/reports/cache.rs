//! Generated report caching using Moka.
//!
//! Reports are keyed by [`ReportRequest::cache_key`](super::ReportRequest::cache_key)
//! and expire after a fixed time-to-live. Posting to the ledger clears the
//! whole cache.
//!
//! Every stored key is scoped to a generation number that
//! [`ReportCache::invalidate_all`] advances. A report generated from entries
//! read before an invalidation is filed under the old generation and is never
//! served afterwards.

use moka::sync::Cache;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::types::ReportDocument;

/// Default cache capacity (number of reports).
pub const DEFAULT_CACHE_CAPACITY: u64 = 200;

/// Default time-to-live for cached reports (5 minutes).
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Cache for generated reports.
///
/// Thread-safe and cheap to clone; clones share the same entries.
#[derive(Clone)]
pub struct ReportCache {
    cache: Cache<(u64, String), Arc<ReportDocument>>,
    generation: Arc<AtomicU64>,
}

impl ReportCache {
    /// Creates a report cache with default settings.
    ///
    /// Default: 200 reports max, 5 minute TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a report cache with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `max_capacity` - Maximum number of reports to keep
    /// * `ttl_secs` - Time-to-live in seconds for each report
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            cache,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current generation. Read it before loading the entries a report is
    /// built from, and pass it to [`get_or_generate_at`](Self::get_or_generate_at).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Returns the cached report for `key`, if still live.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<ReportDocument>> {
        self.cache.get(&(self.generation(), key.to_string()))
    }

    /// Stores a report under `key` in the current generation.
    pub fn insert(&self, key: String, document: Arc<ReportDocument>) {
        self.cache.insert((self.generation(), key), document);
    }

    /// Returns the cached report for `key`, or generates and caches it.
    ///
    /// The flag is `true` when the report came from the cache. Failed
    /// generations are not cached.
    ///
    /// # Errors
    ///
    /// Returns whatever `generate` returns.
    pub fn get_or_generate<E>(
        &self,
        key: &str,
        generate: impl FnOnce() -> Result<ReportDocument, E>,
    ) -> Result<(Arc<ReportDocument>, bool), E> {
        self.get_or_generate_at(self.generation(), key, generate)
    }

    /// Like [`get_or_generate`](Self::get_or_generate), for a report whose
    /// inputs were read at `generation`.
    ///
    /// If the cache has been invalidated since, the report is returned but
    /// not stored.
    ///
    /// # Errors
    ///
    /// Returns whatever `generate` returns.
    pub fn get_or_generate_at<E>(
        &self,
        generation: u64,
        key: &str,
        generate: impl FnOnce() -> Result<ReportDocument, E>,
    ) -> Result<(Arc<ReportDocument>, bool), E> {
        let scoped = (generation, key.to_string());
        if let Some(cached) = self.cache.get(&scoped) {
            return Ok((cached, true));
        }

        let document = Arc::new(generate()?);
        if self.generation() == generation {
            self.cache.insert(scoped, Arc::clone(&document));
        }
        Ok((document, false))
    }

    /// Invalidates all cached reports, including any being generated from
    /// entries read before this call.
    pub fn invalidate_all(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.cache.invalidate_all();
    }

    /// Returns the number of reports currently in the cache.
    ///
    /// The count is approximate until [`run_pending_tasks`](Self::run_pending_tasks)
    /// has been called.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs cache maintenance tasks.
    ///
    /// Moka handles this automatically in the background, but calling
    /// this explicitly can help reclaim memory sooner.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

impl Default for ReportCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReportCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportCache")
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}
