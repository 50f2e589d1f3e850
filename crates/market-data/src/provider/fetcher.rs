//! Windowed session fetching on top of a [`MarketDataProvider`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;

use crate::errors::MarketDataError;
use crate::models::{InstrumentId, Session, SessionWindow};

use super::pacer::RequestPacer;
use super::traits::{MarketDataProvider, SessionWindowFetcher};

/// [`SessionWindowFetcher`] backed by a single provider.
///
/// Computes the symmetric window around the target date, paces the request
/// according to the provider's rate limit, and returns the sessions sorted
/// ascending by date. Sessions outside the window or belonging to another
/// instrument are discarded.
pub struct ProviderFetcher {
    provider: Arc<dyn MarketDataProvider>,
    pacer: RequestPacer,
}

impl ProviderFetcher {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        let pacer = RequestPacer::new(&provider.rate_limit());
        Self { provider, pacer }
    }

    pub fn provider_id(&self) -> &'static str {
        self.provider.id()
    }
}

#[async_trait]
impl SessionWindowFetcher for ProviderFetcher {
    async fn fetch(
        &self,
        instrument: &InstrumentId,
        date: NaiveDate,
        window_days: u32,
    ) -> Result<Vec<Session>, MarketDataError> {
        let window = SessionWindow::around(date, window_days);

        self.pacer.acquire().await;

        debug!(
            "Fetching {} sessions from {} to {} via {}",
            instrument,
            window.start,
            window.end,
            self.provider.id()
        );

        let mut sessions = self
            .provider
            .get_daily_sessions(instrument, window.start, window.end)
            .await?;

        sessions.retain(|s| &s.instrument == instrument && window.contains(s.date));
        // Stable: duplicate dates keep provider order
        sessions.sort_by_key(|s| s.date);

        Ok(sessions)
    }
}
