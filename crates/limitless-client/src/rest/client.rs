//! Typed REST client for the Limitless market-data API
//!
//! Base URL: https://api.limitless.exchange
//!
//! # Endpoints
//! - GET /markets/search?query=&limit=&similarityThreshold= - ranked search
//! - GET /markets/active/slugs - bulk slug + lightweight metadata listing
//! - GET /markets/categories/count - category identifiers and counts
//! - GET /markets/active/{categoryId}?limit=&sortBy= - markets in a category
//! - GET /markets/{slug} - full market record
//! - POST /auth/login - session login (eoa / smart-wallet)
//!
//! All GETs are stateless and idempotent; "not found" and empty listings
//! are values, never errors.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use crate::error::{ApiError, Result};
use crate::rest::auth::{LoginRequest, SessionToken};
use crate::types::{CategoryCount, Market, MarketSummary, SearchResult};
use crate::API_BASE;

/// Sort order for category listings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortBy {
    Volume,
    Liquidity,
    Deadline,
}

impl SortBy {
    /// Wire value for the `sortBy` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Volume => "volume",
            SortBy::Liquidity => "liquidity",
            SortBy::Deadline => "deadline",
        }
    }

    /// Parse from string (CLI input)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "volume" => Some(SortBy::Volume),
            "liquidity" => Some(SortBy::Liquidity),
            "deadline" => Some(SortBy::Deadline),
            _ => None,
        }
    }
}

/// REST client for the Limitless API
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client against the official base URL
    pub fn new() -> Result<Self> {
        Self::with_base_url(API_BASE)
    }

    /// Create a new client with a custom base URL (tests, staging)
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|e| ApiError::Decode {
            url: base_url.to_string(),
            message: format!("invalid base URL: {}", e),
        })?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// GET a JSON body, classifying non-2xx responses
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, url, body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// GET /markets/search - ranked free-text search
    ///
    /// Returns candidates ordered by descending relevance. An empty result
    /// means "no market matched", which is a normal outcome.
    pub async fn search_markets(
        &self,
        query: &str,
        limit: u32,
        similarity_threshold: f64,
    ) -> Result<Vec<SearchResult>> {
        let url = format!(
            "{}/markets/search?query={}&limit={}&similarityThreshold={}",
            self.base_url,
            urlencode(query),
            limit,
            similarity_threshold
        );
        self.get_json(&url).await
    }

    /// GET /markets/active/slugs - bulk listing of active markets
    pub async fn active_slugs(&self) -> Result<Vec<MarketSummary>> {
        let url = format!("{}/markets/active/slugs", self.base_url);
        self.get_json(&url).await
    }

    /// GET /markets/categories/count - category identifiers and counts
    pub async fn category_counts(&self) -> Result<Vec<CategoryCount>> {
        let url = format!("{}/markets/categories/count", self.base_url);
        self.get_json(&url).await
    }

    /// GET /markets/active/{categoryId} - full market records in a category
    pub async fn markets_in_category(
        &self,
        category_id: &str,
        limit: u32,
        sort_by: Option<SortBy>,
    ) -> Result<Vec<Market>> {
        let mut url = format!(
            "{}/markets/active/{}?limit={}",
            self.base_url,
            urlencode(category_id),
            limit
        );
        if let Some(sort) = sort_by {
            url.push_str("&sortBy=");
            url.push_str(sort.as_str());
        }
        self.get_json(&url).await
    }

    /// GET /markets/{slug} - full market record by slug
    ///
    /// Returns `Ok(None)` on 404 (normal case for a wrong or expired slug),
    /// errors on other failures.
    pub async fn market_by_slug(&self, slug: &str) -> Result<Option<Market>> {
        let url = format!("{}/markets/{}", self.base_url, urlencode(slug));
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("Market not found for slug: {}", slug);
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &url, body));
        }

        let body = response.text().await?;
        let market: Market = serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            url: url.clone(),
            message: e.to_string(),
        })?;
        Ok(Some(market))
    }

    /// POST /auth/login - exchange a signed message for a session token
    ///
    /// HTTP 400 "Signer does not match" is surfaced as
    /// `ApiError::SignerMismatch`: the caller picked the wrong client mode
    /// for the address that produced the signature.
    pub async fn login(&self, request: &LoginRequest) -> Result<SessionToken> {
        let url = format!("{}/auth/login", self.base_url);
        debug!("POST {} (client={})", url, request.client.as_str());

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &url, body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            url,
            message: e.to_string(),
        })
    }

    /// Test connectivity to the API
    pub async fn test_connectivity(&self) -> Result<()> {
        info!("Testing connectivity to {}", self.base_url);

        let url = format!("{}/markets/categories/count", self.base_url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        info!("Connectivity test: HTTP {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &url, body));
        }

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Percent-encode a path or query segment.
///
/// Slugs and category ids are URL-safe in practice; free-text queries are not.
fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push_str("%20"),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
