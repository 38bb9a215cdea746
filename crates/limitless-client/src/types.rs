//! Wire types for the Limitless market-data API
//!
//! # Design Principles
//! 1. Numeric fields that carry money or token identifiers use String to
//!    preserve precision (position ids do not fit in u64/f64)
//! 2. Known types with unrecognized fields use `#[serde(flatten)] extra`
//!    to preserve data across API additions
//! 3. Field names match the remote camelCase schema exactly

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Shared Deserialization Helpers
// ============================================================================

/// Deserialize position ids that arrive either as a JSON array of strings or
/// as a stringified JSON array (e.g. "[\"123\", \"456\"]"). Missing/null
/// fields become an empty Vec.
fn deserialize_string_array_flexible<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, SeqAccess, Visitor};

    struct FlexibleArrayVisitor;

    impl<'de> Visitor<'de> for FlexibleArrayVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("an array of strings, a stringified JSON array, or null")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut out = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                out.push(item);
            }
            Ok(out)
        }

        fn visit_str<E: Error>(self, s: &str) -> Result<Self::Value, E> {
            if s.is_empty() {
                return Ok(Vec::new());
            }
            serde_json::from_str(s)
                .map_err(|e| E::custom(format!("invalid JSON array '{}': {}", s, e)))
        }

        fn visit_string<E: Error>(self, s: String) -> Result<Self::Value, E> {
            self.visit_str(&s)
        }

        fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(FlexibleArrayVisitor)
}

fn parse_deadline(raw: Option<&String>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

// ============================================================================
// Market Records
// ============================================================================

/// Full market record from GET /markets/{slug} or GET /markets/active/{categoryId}
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    /// URL-friendly unique identifier; the only safe cross-call key
    pub slug: String,

    /// Human-readable title; NOT unique, never use as a key
    pub title: String,

    /// Underlying ticker (e.g. "BTC")
    #[serde(default)]
    pub ticker: String,

    /// Strike price as a decimal string, absent for non-strike markets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike_price: Option<String>,

    /// Market deadline (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,

    /// Market status (e.g. "FUNDED", "RESOLVED")
    #[serde(default)]
    pub status: String,

    /// Traded volume as a decimal string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,

    /// Available liquidity as a decimal string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquidity: Option<String>,

    /// Outcome token ids as strings: index 0 = YES, index 1 = NO.
    /// Kept as strings end-to-end; values can exceed 2^256.
    /// The API sometimes returns this as a stringified JSON array.
    #[serde(default, deserialize_with = "deserialize_string_array_flexible")]
    pub position_ids: Vec<String>,

    /// Extra fields for forward compatibility
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Market {
    /// Check that the market carries exactly one YES/NO token pair
    pub fn is_binary(&self) -> bool {
        self.position_ids.len() == 2
    }

    /// Token id for the YES outcome (index 0)
    pub fn yes_position_id(&self) -> Option<&str> {
        self.position_ids.first().map(String::as_str)
    }

    /// Token id for the NO outcome (index 1)
    pub fn no_position_id(&self) -> Option<&str> {
        self.position_ids.get(1).map(String::as_str)
    }

    /// Parse the deadline as a UTC timestamp
    pub fn deadline_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_deadline(self.deadline.as_ref())
    }

    /// Whether a cached copy of this record must be treated as stale
    pub fn is_past_deadline(&self, now: DateTime<Utc>) -> bool {
        self.deadline_timestamp().map(|d| now >= d).unwrap_or(false)
    }
}

/// Lightweight listing entry from GET /markets/active/slugs
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    /// URL-friendly unique identifier
    pub slug: String,

    /// Underlying ticker
    #[serde(default)]
    pub ticker: String,

    /// Strike price as a decimal string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike_price: Option<String>,

    /// Market deadline (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl MarketSummary {
    /// Parse the deadline as a UTC timestamp
    pub fn deadline_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_deadline(self.deadline.as_ref())
    }
}

// ============================================================================
// Search & Categories
// ============================================================================

/// Ranked candidate from GET /markets/search
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Candidate market slug
    pub slug: String,

    /// Candidate market title
    pub title: String,

    /// Relevance score in [0, 1], higher is better
    pub score: f64,
}

/// Category entry from GET /markets/categories/count
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category identifier used in GET /markets/active/{categoryId}
    pub id: String,

    /// Human-readable category name
    #[serde(default)]
    pub name: String,

    /// Number of active markets in the category
    pub count: u64,
}
