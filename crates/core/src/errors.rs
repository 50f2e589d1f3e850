//! Core error types for the comparison engine.
//!
//! Only hard failures live here. "No session found" and zero denominators are
//! part of the data model (absent entries, not-a-number metrics) and never
//! surface as an [`Error`].

use thiserror::Error;

use crosslist_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the comparison engine.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport/provider failure reported by the session fetcher.
    /// Aborts the current run; the engine never retries it.
    #[error("Market data provider failed: {0}")]
    ProviderFailure(#[from] MarketDataError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

/// Rejected comparison inputs.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Instrument universe is empty")]
    EmptyUniverse,

    #[error("Reference pair uses '{0}' for both listings")]
    DegenerateReferencePair(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = Error::from(ValidationError::DegenerateReferencePair("YPF".to_string()));
        assert_eq!(
            error.to_string(),
            "Input validation failed: Reference pair uses 'YPF' for both listings"
        );

        let error = Error::from(MarketDataError::RateLimited {
            provider: "YAHOO".to_string(),
        });
        assert_eq!(
            error.to_string(),
            "Market data provider failed: Rate limited: YAHOO"
        );
    }
}
