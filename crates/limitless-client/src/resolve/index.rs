//! Market Index Cache - locally cached slug -> metadata mapping
//!
//! A refresh replaces the entire index in one atomic `Arc` swap; readers
//! working from a snapshot never observe a partially updated index. Entries
//! have no implicit expiry - refresh cadence is the caller's concern (e.g.
//! hourly for recurring markets).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::Result;
use crate::rest::ApiClient;
use crate::types::MarketSummary;

type Snapshot = Arc<HashMap<String, MarketSummary>>;

/// Cached mapping of slug -> lightweight market metadata
pub struct MarketIndex {
    inner: RwLock<Snapshot>,
}

impl MarketIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Arc::new(HashMap::new())),
        }
    }

    /// Replace the entire index with a fresh bulk listing
    ///
    /// Returns the number of cached entries. Concurrent readers keep their
    /// snapshot until the swap completes.
    pub async fn refresh(&self, client: &ApiClient) -> Result<usize> {
        let listing = client.active_slugs().await?;
        let count = listing.len();
        self.install(listing);
        info!("Market index refreshed: {} entries", count);
        Ok(count)
    }

    /// Install a listing as the new index contents (single atomic swap)
    pub fn install(&self, listing: Vec<MarketSummary>) {
        let map: HashMap<String, MarketSummary> = listing
            .into_iter()
            .map(|summary| (summary.slug.clone(), summary))
            .collect();
        *self.write_lock() = Arc::new(map);
    }

    /// Current snapshot; stays consistent for as long as the caller holds it
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.read_lock())
    }

    /// Point lookup by slug
    pub fn get(&self, slug: &str) -> Option<MarketSummary> {
        self.snapshot().get(slug).cloned()
    }

    /// Filter the cached set with an arbitrary predicate
    pub fn filter<F>(&self, pred: F) -> Vec<MarketSummary>
    where
        F: Fn(&MarketSummary) -> bool,
    {
        let mut out: Vec<MarketSummary> =
            self.snapshot().values().filter(|s| pred(s)).cloned().collect();
        // HashMap iteration order is arbitrary; keep output deterministic
        out.sort_by(|a, b| a.slug.cmp(&b.slug));
        out
    }

    /// All entries whose ticker equals `ticker` exactly
    pub fn by_ticker(&self, ticker: &str) -> Vec<MarketSummary> {
        self.filter(|s| s.ticker == ticker)
    }

    /// All entries whose slug contains `needle`
    pub fn slug_contains(&self, needle: &str) -> Vec<MarketSummary> {
        self.filter(|s| s.slug.contains(needle))
    }

    /// All entries with a deadline in [from, to)
    pub fn deadline_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<MarketSummary> {
        self.filter(|s| {
            s.deadline_timestamp()
                .map(|d| d >= from && d < to)
                .unwrap_or(false)
        })
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Whether the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Lock poisoning can only come from a panicking writer, and the write
    // section is a single pointer assignment; recover rather than propagate.
    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, Snapshot> {
        self.inner.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, Snapshot> {
        self.inner.write().unwrap_or_else(|p| p.into_inner())
    }
}

impl Default for MarketIndex {
    fn default() -> Self {
        Self::new()
    }
}
