//! Detail Fetcher - slug to authoritative full market record
//!
//! "Not found" is terminal for a slug; transport failures are retryable
//! (`ApiError::is_retryable`). Position ids are always re-fetched from the
//! current record - hardcoded or cached token ids go stale when markets
//! roll over and produce "Invalid token ID" / "Position not found" errors
//! downstream.

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::rest::ApiClient;
use crate::types::Market;

/// Fetches full market records by slug
#[derive(Clone)]
pub struct DetailFetcher {
    client: ApiClient,
}

impl DetailFetcher {
    /// Create a fetcher over an API client
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the full market record for a slug
    ///
    /// Returns `Ok(None)` when the slug does not exist. A returned record
    /// whose deadline has passed is logged as stale but still returned;
    /// interpreting staleness is the caller's call.
    pub async fn fetch(&self, slug: &str) -> Result<Option<Market>> {
        let market = match self.client.market_by_slug(slug).await? {
            Some(m) => m,
            None => {
                debug!("No market for slug '{}'", slug);
                return Ok(None);
            }
        };

        if market.is_past_deadline(Utc::now()) {
            warn!("Market '{}' is past its deadline; treat as stale", slug);
        }

        Ok(Some(market))
    }

    /// Fetch the current YES/NO position id pair for a slug
    ///
    /// Always hits the remote so callers never act on cached token ids.
    /// Returns `Ok(None)` when the slug does not exist or the market does
    /// not carry a binary token pair.
    pub async fn position_ids(&self, slug: &str) -> Result<Option<[String; 2]>> {
        let market = match self.fetch(slug).await? {
            Some(m) => m,
            None => return Ok(None),
        };

        match market.position_ids.as_slice() {
            [yes, no] => Ok(Some([yes.clone(), no.clone()])),
            other => {
                warn!(
                    "Market '{}' has {} position id(s), expected 2",
                    slug,
                    other.len()
                );
                Ok(None)
            }
        }
    }
}
