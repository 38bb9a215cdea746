//! Market Resolver - free text to canonical slug
//!
//! # Design Principles
//! 1. Remote search is the authority for ranking; the client re-sorts by
//!    score only and never assumes a stable secondary order for ties
//! 2. "No match" is a normal empty result, not a failure
//! 3. When search comes up empty, fall back to filtering the bulk listing
//!    by token overlap between the query and the slug
//!
//! # Algorithm
//! 1. GET /markets/search with the configured limit and threshold
//! 2. Sort candidates by descending score
//! 3. If empty and fallback enabled: GET /markets/active/slugs, score each
//!    slug as matched_tokens / query_tokens, keep scores above threshold

use tracing::{debug, info};

use crate::error::Result;
use crate::rest::ApiClient;
use crate::types::{MarketSummary, SearchResult};

/// Market Resolver configuration
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Maximum candidates to request from remote search
    pub limit: u32,
    /// Minimum relevance score in [0, 1]
    pub similarity_threshold: f64,
    /// Whether to fall back to bulk-list filtering on an empty search
    pub fallback_to_index: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            limit: 10,
            similarity_threshold: 0.5,
            fallback_to_index: true,
        }
    }
}

/// Resolves free-text market queries to canonical slugs
#[derive(Clone)]
pub struct MarketResolver {
    client: ApiClient,
    config: ResolverConfig,
}

impl MarketResolver {
    /// Create a resolver with default configuration
    pub fn new(client: ApiClient) -> Self {
        Self::with_config(client, ResolverConfig::default())
    }

    /// Create a resolver with custom configuration
    pub fn with_config(client: ApiClient, config: ResolverConfig) -> Self {
        Self { client, config }
    }

    /// Resolve a free-text query to ranked (slug, title, score) candidates
    ///
    /// Returns zero or more candidates sorted by non-increasing score.
    /// An empty Vec means no market matched; that is not an error.
    pub async fn resolve(&self, query: &str) -> Result<Vec<SearchResult>> {
        let mut results = self
            .client
            .search_markets(query, self.config.limit, self.config.similarity_threshold)
            .await?;

        if results.is_empty() && self.config.fallback_to_index {
            debug!("Search returned no candidates for '{}', falling back to bulk listing", query);
            let listing = self.client.active_slugs().await?;
            results = score_against_listing(query, &listing, self.config.similarity_threshold);
        }

        // Remote ties have no guaranteed secondary order; sort by score only
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        if results.len() > self.config.limit as usize {
            results.truncate(self.config.limit as usize);
        }

        info!("Resolved '{}' to {} candidate(s)", query, results.len());
        Ok(results)
    }

    /// Resolve a query to its single best candidate, if any
    pub async fn best_match(&self, query: &str) -> Result<Option<SearchResult>> {
        Ok(self.resolve(query).await?.into_iter().next())
    }

    /// List slugs in a category, optionally filtered by substrings
    ///
    /// Every returned slug contains all of `filters`. The result carries no
    /// ranking; order is whatever the remote listing produced.
    pub async fn category_slugs(&self, category_id: &str, filters: &[&str]) -> Result<Vec<String>> {
        let markets = self
            .client
            .markets_in_category(category_id, self.config.limit.max(100), None)
            .await?;

        let slugs: Vec<String> = markets
            .into_iter()
            .map(|m| m.slug)
            .filter(|slug| filters.iter().all(|f| slug.contains(f)))
            .collect();

        debug!(
            "Category '{}' with filters {:?}: {} slug(s)",
            category_id,
            filters,
            slugs.len()
        );
        Ok(slugs)
    }
}

/// Score each listing entry against the query by token overlap.
///
/// Tokens come from lowercasing and splitting on whitespace and hyphens.
/// Score = matched query tokens / total query tokens, so it stays in [0, 1].
fn score_against_listing(
    query: &str,
    listing: &[MarketSummary],
    threshold: f64,
) -> Vec<SearchResult> {
    let query_tokens = tokenize(query);
    if query_tokens.is_empty() {
        return Vec::new();
    }

    listing
        .iter()
        .filter_map(|summary| {
            let slug_tokens = tokenize(&summary.slug);
            let mut haystack = slug_tokens;
            haystack.extend(tokenize(&summary.ticker));

            let matched = query_tokens.iter().filter(|t| haystack.contains(t)).count();
            let score = matched as f64 / query_tokens.len() as f64;

            if score >= threshold {
                Some(SearchResult {
                    slug: summary.slug.clone(),
                    // Bulk listing carries no title; the slug is the best stand-in
                    title: summary.slug.clone(),
                    score,
                })
            } else {
                None
            }
        })
        .collect()
}

fn tokenize(s: &str) -> Vec<String> {
    s.to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
