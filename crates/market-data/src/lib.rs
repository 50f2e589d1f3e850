//! Crosslist Market Data Crate
//!
//! This crate provides the session-fetching boundary for the cross-listing
//! comparison engine.
//!
//! # Overview
//!
//! ```text
//! +---------------------+     +--------------------+     +------------------+
//! | SessionWindowFetcher| --> |  ProviderFetcher   | --> | MarketDataProvider|
//! |  (engine boundary)  |     | (window + pacing)  |     |   (Yahoo, ...)   |
//! +---------------------+     +--------------------+     +------------------+
//!                                                                |
//!                                                                v
//!                                                        +------------------+
//!                                                        |     Session      |
//!                                                        +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`InstrumentId`] - Ticker identity used as the per-instrument key
//! - [`Session`] - One daily bar with optional open/close
//! - [`SessionWindow`] - Calendar window fetched around a target date
//! - [`SessionWindowFetcher`] - `fetch(instrument, date, window_days)`
//! - [`MarketDataError`] / [`FailureClass`] - "no data" vs hard failures

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::{FailureClass, MarketDataError};
pub use models::{InstrumentId, Session, SessionWindow};
pub use provider::yahoo::YahooProvider;
pub use provider::{
    MarketDataProvider, ProviderFetcher, RateLimit, RequestPacer, SessionWindowFetcher,
};
