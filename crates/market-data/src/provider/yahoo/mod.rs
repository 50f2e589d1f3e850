//! Yahoo Finance market data provider.
//!
//! Fetches daily bars for exchange-listed tickers (e.g. YPF, YPFD.BA)
//! through the Yahoo Finance chart API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::{debug, warn};
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{InstrumentId, Session};
use crate::provider::{MarketDataProvider, RateLimit};

const PROVIDER_ID: &str = "YAHOO";

/// Default upper bound for a single history request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    request_timeout: Duration,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Result<Self, MarketDataError> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a provider whose history requests give up after `request_timeout`.
    pub fn with_timeout(request_timeout: Duration) -> Result<Self, MarketDataError> {
        let connector =
            yahoo::YahooConnector::new().map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to initialize Yahoo connector: {}", e),
            })?;
        Ok(Self {
            connector,
            request_timeout,
        })
    }

    /// Midnight UTC of `date` as the Yahoo API's time type.
    fn date_to_offset_datetime(date: NaiveDate) -> OffsetDateTime {
        let timestamp = date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or_default();
        OffsetDateTime::from_unix_timestamp(timestamp).unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }

    /// Convert a Yahoo bar to a Session.
    fn yahoo_quote_to_session(
        instrument: &InstrumentId,
        yahoo_quote: &yahoo::Quote,
    ) -> Result<Session, MarketDataError> {
        let date = Utc
            .timestamp_opt(yahoo_quote.timestamp as i64, 0)
            .single()
            .map(|dt| dt.date_naive())
            .ok_or_else(|| MarketDataError::ValidationFailed {
                message: format!("Invalid timestamp: {}", yahoo_quote.timestamp),
            })?;

        Ok(Session {
            instrument: instrument.clone(),
            date,
            open: price(yahoo_quote.open),
            close: price(yahoo_quote.close),
        })
    }
}

/// Missing Yahoo prices arrive as NaN (or garbage); both become `None`.
fn price(value: f64) -> Option<Decimal> {
    if value.is_finite() {
        Decimal::from_f64_retain(value)
    } else {
        None
    }
}

fn provider_error(e: yahoo::YahooError) -> MarketDataError {
    MarketDataError::ProviderError {
        provider: PROVIDER_ID.to_string(),
        message: e.to_string(),
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: 2000,
            burst_capacity: 10,
            min_delay: Duration::from_millis(50),
        }
    }

    async fn get_daily_sessions(
        &self,
        instrument: &InstrumentId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Session>, MarketDataError> {
        let symbol = instrument.as_str();

        debug!(
            "Fetching daily sessions for {} from {} to {} from Yahoo",
            symbol, start, end
        );

        // Yahoo treats the end of the range as exclusive
        let end_exclusive = end.checked_add_days(Days::new(1)).unwrap_or(end);
        let start_time = Self::date_to_offset_datetime(start);
        let end_time = Self::date_to_offset_datetime(end_exclusive);

        let request = self.connector.get_quote_history(symbol, start_time, end_time);
        let response = tokio::time::timeout(self.request_timeout, request)
            .await
            .map_err(|_| {
                warn!(
                    "Yahoo history request for '{}' timed out after {:?}",
                    symbol, self.request_timeout
                );
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            })?
            .map_err(|e| {
                if matches!(e, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
                    MarketDataError::SymbolNotFound(symbol.to_string())
                } else {
                    provider_error(e)
                }
            })?;

        match response.quotes() {
            Ok(yahoo_quotes) => Ok(yahoo_quotes
                .iter()
                .filter_map(|q| match Self::yahoo_quote_to_session(instrument, q) {
                    Ok(session) => Some(session),
                    Err(e) => {
                        warn!("Skipping bar for '{}': {}", symbol, e);
                        None
                    }
                })
                .collect()),
            Err(yahoo::YahooError::NoQuotes) => {
                warn!(
                    "No daily sessions returned for '{}' between {} and {}",
                    symbol, start, end
                );
                Err(MarketDataError::NoDataForRange)
            }
            Err(e) => Err(provider_error(e)),
        }
    }
}
