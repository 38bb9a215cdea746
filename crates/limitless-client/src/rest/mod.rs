//! REST surface of the Limitless API
//!
//! # Components
//! - `ApiClient`: typed client for the public market-data endpoints
//! - `auth`: login request/response types and client-mode selection

pub mod auth;
mod client;

pub use auth::{ClientMode, LoginRequest, SessionToken};
pub use client::{ApiClient, SortBy};
