//! Market resolution and local caching
//!
//! # Components
//! - `MarketResolver`: free-text query -> ranked (slug, title, score)
//!   candidates, with bulk-list fallback when remote search comes up empty
//! - `MarketIndex`: locally cached slug -> metadata mapping, refreshed as a
//!   single atomic swap
//! - `DetailFetcher`: slug -> authoritative full market record

mod fetcher;
mod index;
pub mod resolver;

pub use fetcher::DetailFetcher;
pub use index::MarketIndex;
pub use resolver::{MarketResolver, ResolverConfig};
