//! Provider and fetcher trait definitions.
//!
//! - [`MarketDataProvider`] is implemented by concrete data sources (Yahoo).
//! - [`SessionWindowFetcher`] is the boundary the comparison engine consumes.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::MarketDataError;
use crate::models::{InstrumentId, Session};

use super::capabilities::RateLimit;

/// Trait for market data providers.
///
/// Implement this trait to add support for a new source of daily bars.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use crosslist_market_data::provider::{MarketDataProvider, RateLimit};
///
/// struct CsvProvider {
///     root: std::path::PathBuf,
/// }
///
/// #[async_trait]
/// impl MarketDataProvider for CsvProvider {
///     fn id(&self) -> &'static str {
///         "CSV"
///     }
///
///     fn rate_limit(&self) -> RateLimit {
///         RateLimit::default()
///     }
///
///     // ... implement get_daily_sessions
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "YAHOO".
    ///
    /// Used in logs and error messages.
    fn id(&self) -> &'static str;

    /// Rate limiting configuration applied by the fetcher.
    fn rate_limit(&self) -> RateLimit;

    /// Fetch daily sessions for an instrument.
    ///
    /// # Arguments
    ///
    /// * `instrument` - The instrument to fetch
    /// * `start` - First calendar date of the range (inclusive)
    /// * `end` - Last calendar date of the range (inclusive)
    ///
    /// # Returns
    ///
    /// The sessions in the range. Ordering is not guaranteed; the fetcher
    /// sorts them. "No data" should be reported as an empty vector or
    /// [`MarketDataError::NoDataForRange`], never as a provider error.
    async fn get_daily_sessions(
        &self,
        instrument: &InstrumentId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Session>, MarketDataError>;
}

/// Source of trading sessions around a target date.
///
/// Returns every known session of `instrument` within `window_days` calendar
/// days on either side of `date`, ascending by date. An empty sequence is a
/// legitimate answer (untraded, delisted, or window too narrow).
#[async_trait]
pub trait SessionWindowFetcher: Send + Sync {
    async fn fetch(
        &self,
        instrument: &InstrumentId,
        date: NaiveDate,
        window_days: u32,
    ) -> Result<Vec<Session>, MarketDataError>;
}
