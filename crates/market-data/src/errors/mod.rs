//! Error types and failure classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all market data operations
//! - [`FailureClass`]: Whether a failure means "no data" or aborts the run

mod failure;

pub use failure::FailureClass;

use thiserror::Error;

/// Errors that can occur while fetching sessions.
///
/// Each variant is classified into a [`FailureClass`] via the
/// [`failure_class`](Self::failure_class) method.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The symbol exists but has no sessions in the requested window.
    #[error("No data for date range")]
    NoDataForRange,

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// A provider-specific or transport error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider returned data that cannot be interpreted.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },
}

impl MarketDataError {
    /// Returns the failure classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use crosslist_market_data::errors::{FailureClass, MarketDataError};
    ///
    /// let error = MarketDataError::Timeout { provider: "YAHOO".to_string() };
    /// assert_eq!(error.failure_class(), FailureClass::DataUnavailable);
    ///
    /// let error = MarketDataError::RateLimited { provider: "YAHOO".to_string() };
    /// assert_eq!(error.failure_class(), FailureClass::Hard);
    /// ```
    pub fn failure_class(&self) -> FailureClass {
        match self {
            // A timeout is indistinguishable from an empty window for the engine
            Self::SymbolNotFound(_) | Self::NoDataForRange | Self::Timeout { .. } => {
                FailureClass::DataUnavailable
            }

            Self::RateLimited { .. } | Self::ProviderError { .. } | Self::ValidationFailed { .. } => {
                FailureClass::Hard
            }
        }
    }

    /// Shorthand for `failure_class() == FailureClass::DataUnavailable`.
    pub fn is_data_unavailable(&self) -> bool {
        self.failure_class() == FailureClass::DataUnavailable
    }
}
