//! Limitless Exchange market-data client
//!
//! Components:
//! - `rest`: typed REST client for the public market-data endpoints plus login
//! - `resolve`: market resolution (free text -> slug), index cache, detail fetcher
//!
//! # Identifier discipline
//! - `slug` is the only stable cross-call identifier; titles are not unique.
//! - Position (token) ids are large integers carried as strings end-to-end,
//!   never parsed into a numeric type.
//!
//! # Remote API
//! - GET /markets/search?query=&limit=&similarityThreshold=
//! - GET /markets/active/slugs
//! - GET /markets/categories/count
//! - GET /markets/active/{categoryId}?limit=&sortBy=
//! - GET /markets/{slug}
//! - POST /auth/login

pub mod error;
pub mod resolve;
pub mod rest;
pub mod types;

pub use error::{ApiError, Result};
pub use types::*;

/// Official Limitless API base URL
pub const API_BASE: &str = "https://api.limitless.exchange";
