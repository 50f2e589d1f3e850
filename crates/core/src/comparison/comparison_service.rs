use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, info, warn};

use crosslist_market_data::{InstrumentId, Session, SessionWindowFetcher};

use super::comparison_metrics::compute_metrics;
use super::comparison_model::{
    ComparisonReport, ComparisonRequest, Exclusion, ExclusionReason, MetricRecord,
};
use super::comparison_traits::ComparisonServiceTrait;
use crate::config::EngineConfig;
use crate::errors::{Error, Result};
use crate::sessions::{
    clean, resolve_universe, Direction, ResolutionRequest, ResolvedSessionMap, SessionWindows,
};

/// Runs comparisons against a session fetcher.
///
/// Stateless across runs: every call fetches, resolves and computes afresh.
pub struct ComparisonService {
    fetcher: Arc<dyn SessionWindowFetcher>,
    config: EngineConfig,
}

impl ComparisonService {
    pub fn new(fetcher: Arc<dyn SessionWindowFetcher>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { fetcher, config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fetch the session window of every instrument around `date`.
    ///
    /// Fetches run concurrently, at most `max_concurrency` at a time.
    /// Data-unavailable failures (including timeouts) become empty windows;
    /// any other failure aborts.
    async fn fetch_windows(
        &self,
        universe: &BTreeSet<InstrumentId>,
        date: NaiveDate,
    ) -> Result<SessionWindows> {
        let window_days = self.config.window_days;

        let fetches: Vec<_> = universe
            .iter()
            .cloned()
            .map(|instrument| {
                let fetcher = Arc::clone(&self.fetcher);
                async move {
                    match fetcher.fetch(&instrument, date, window_days).await {
                        Ok(sessions) => Ok((instrument, sessions)),
                        Err(e) if e.is_data_unavailable() => {
                            warn!("No sessions for {} around {}: {}", instrument, date, e);
                            Ok((instrument, Vec::<Session>::new()))
                        }
                        Err(e) => Err(Error::from(e)),
                    }
                }
            })
            .collect();

        let windows: Vec<(InstrumentId, Vec<Session>)> = stream::iter(fetches)
            .buffer_unordered(self.config.max_concurrency)
            .try_collect()
            .await?;

        Ok(windows.into_iter().collect())
    }

    async fn resolve_date(
        &self,
        request: &ComparisonRequest,
        date: NaiveDate,
        direction: Direction,
    ) -> Result<ResolvedSessionMap> {
        let windows = self.fetch_windows(&request.universe, date).await?;

        let resolution = ResolutionRequest {
            universe: request.universe.clone(),
            target_date: date,
            direction,
        };
        let resolved = resolve_universe(
            &windows,
            &resolution,
            Some(&request.reference_pair),
            self.config.incomplete_session_policy,
        );
        let cleaned = clean(resolved);

        debug!(
            "{:?} resolution for {}: {} usable, {} unresolved, {} incomplete",
            direction,
            date,
            cleaned.len(),
            cleaned.unresolved().len(),
            cleaned.incomplete().len()
        );

        Ok(cleaned)
    }
}

/// Explain every universe member without a metric record.
fn exclusions(
    universe: &BTreeSet<InstrumentId>,
    records: &[MetricRecord],
    maps: [&ResolvedSessionMap; 2],
) -> Vec<Exclusion> {
    let reported: BTreeSet<&InstrumentId> = records.iter().map(|r| &r.instrument).collect();

    universe
        .iter()
        .filter(|instrument| !reported.contains(instrument))
        .filter_map(|instrument| {
            maps.iter().find_map(|map| {
                let reason = if map.unresolved().contains(instrument) {
                    ExclusionReason::DataUnavailable
                } else if map.incomplete().contains(instrument) {
                    ExclusionReason::IncompleteSession
                } else {
                    return None;
                };
                Some(Exclusion {
                    instrument: instrument.clone(),
                    target_date: map.target_date,
                    reason,
                })
            })
        })
        .collect()
}

#[async_trait]
impl ComparisonServiceTrait for ComparisonService {
    async fn compare(&self, request: &ComparisonRequest) -> Result<Vec<MetricRecord>> {
        Ok(self.compare_detailed(request).await?.records)
    }

    async fn compare_detailed(&self, request: &ComparisonRequest) -> Result<ComparisonReport> {
        request.validate()?;

        info!(
            "Comparing {} instruments between {} and {} (reference {}/{})",
            request.universe.len(),
            request.date1,
            request.date2,
            request.reference_pair.local,
            request.reference_pair.foreign
        );

        let m1 = self
            .resolve_date(request, request.date1, Direction::Forward)
            .await?;
        let m2 = self
            .resolve_date(request, request.date2, Direction::Backward)
            .await?;

        let outcome = compute_metrics(&m1, &m2, &request.reference_pair);
        let exclusions = exclusions(&request.universe, &outcome.records, [&m1, &m2]);

        info!(
            "Comparison produced {} records, {} exclusions",
            outcome.records.len(),
            exclusions.len()
        );

        Ok(ComparisonReport {
            date1: m1,
            date2: m2,
            ratios: outcome.ratios,
            records: outcome.records,
            exclusions,
        })
    }
}
