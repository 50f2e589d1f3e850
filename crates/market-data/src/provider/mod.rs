//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that data sources implement
//! - The `SessionWindowFetcher` trait the comparison engine consumes
//! - `ProviderFetcher`, which adapts the former to the latter with pacing
//! - The Yahoo Finance provider

mod capabilities;
mod fetcher;
mod pacer;
mod traits;

pub mod yahoo;

// Re-exports
pub use capabilities::RateLimit;
pub use fetcher::ProviderFetcher;
pub use pacer::RequestPacer;
pub use traits::{MarketDataProvider, SessionWindowFetcher};
