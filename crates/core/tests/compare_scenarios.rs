//! End-to-end comparison runs against an in-memory session fetcher.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crosslist_core::comparison::{
    find_record, ComparisonRequest, ComparisonService, ComparisonServiceTrait, ExclusionReason,
    MetricValue, NanReason,
};
use crosslist_core::{EngineConfig, Error, IncompleteSessionPolicy, ReferencePair};
use crosslist_market_data::{
    InstrumentId, MarketDataError, Session, SessionWindow, SessionWindowFetcher,
};

// =============================================================================
// Mock fetcher
// =============================================================================

#[derive(Clone, Copy)]
enum Failure {
    Timeout,
    NotFound,
    Provider,
}

#[derive(Default)]
struct MockFetcher {
    sessions: HashMap<InstrumentId, Vec<Session>>,
    failures: HashMap<InstrumentId, Failure>,
    calls: AtomicUsize,
}

impl MockFetcher {
    fn with_bar(mut self, ticker: &str, date: NaiveDate, open: Decimal, close: Decimal) -> Self {
        let id = InstrumentId::from(ticker);
        self.sessions
            .entry(id.clone())
            .or_default()
            .push(Session::new(id, date, open, close));
        self
    }

    fn with_session(mut self, session: Session) -> Self {
        self.sessions
            .entry(session.instrument.clone())
            .or_default()
            .push(session);
        self
    }

    fn failing(mut self, ticker: &str, failure: Failure) -> Self {
        self.failures.insert(InstrumentId::from(ticker), failure);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionWindowFetcher for MockFetcher {
    async fn fetch(
        &self,
        instrument: &InstrumentId,
        date: NaiveDate,
        window_days: u32,
    ) -> Result<Vec<Session>, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.failures.get(instrument) {
            Some(Failure::Timeout) => {
                return Err(MarketDataError::Timeout {
                    provider: "MOCK".to_string(),
                })
            }
            Some(Failure::NotFound) => {
                return Err(MarketDataError::SymbolNotFound(instrument.to_string()))
            }
            Some(Failure::Provider) => {
                return Err(MarketDataError::ProviderError {
                    provider: "MOCK".to_string(),
                    message: "connection reset".to_string(),
                })
            }
            None => {}
        }

        let window = SessionWindow::around(date, window_days);
        let mut sessions: Vec<Session> = self
            .sessions
            .get(instrument)
            .map(|all| {
                all.iter()
                    .filter(|s| window.contains(s.date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        sessions.sort_by_key(|s| s.date);
        Ok(sessions)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn d(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

fn id(ticker: &str) -> InstrumentId {
    InstrumentId::from(ticker)
}

fn request(tickers: &[&str], date1: NaiveDate, date2: NaiveDate) -> ComparisonRequest {
    ComparisonRequest::new(
        date1,
        date2,
        tickers.iter().map(|t| id(t)),
        ReferencePair::new("YPFD.BA", "YPF"),
    )
}

fn service(fetcher: MockFetcher) -> (Arc<MockFetcher>, ComparisonService) {
    service_with(fetcher, EngineConfig::default())
}

fn service_with(fetcher: MockFetcher, config: EngineConfig) -> (Arc<MockFetcher>, ComparisonService) {
    let fetcher = Arc::new(fetcher);
    let service = ComparisonService::new(fetcher.clone(), config).unwrap();
    (fetcher, service)
}

fn reference_fetcher() -> MockFetcher {
    MockFetcher::default()
        .with_bar("YPFD.BA", d(3, 1), dec!(50), dec!(51))
        .with_bar("YPFD.BA", d(3, 28), dec!(59), dec!(60))
        .with_bar("YPF", d(3, 1), dec!(25), dec!(26))
        .with_bar("YPF", d(3, 28), dec!(23), dec!(24))
}

/// Friday 2024-03-01 and Thursday 2024-03-28 sessions for the worked example.
fn worked_example_fetcher() -> MockFetcher {
    reference_fetcher()
        .with_bar("GGAL.BA", d(3, 1), dec!(100), dec!(101))
        .with_bar("GGAL.BA", d(3, 28), dec!(108), dec!(110))
}

const UNIVERSE: [&str; 3] = ["GGAL.BA", "YPFD.BA", "YPF"];

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_worked_example() {
    let (_, service) = service(worked_example_fetcher());

    let records = service
        .compare(&request(&UNIVERSE, d(3, 1), d(3, 28)))
        .await
        .unwrap();

    let ggal = find_record(&records, &id("GGAL.BA")).unwrap();
    assert_eq!(ggal.raw_percent_diff, MetricValue::Value(dec!(10)));
    assert_eq!(ggal.normalized_percent_diff, MetricValue::Value(dec!(-12)));

    let local = find_record(&records, &id("YPFD.BA")).unwrap();
    assert_eq!(local.normalized_percent_diff, MetricValue::Value(dec!(25)));

    let order: Vec<&str> = records.iter().map(|r| r.instrument.as_str()).collect();
    assert_eq!(order, vec!["YPFD.BA", "GGAL.BA", "YPF"]);
}

#[tokio::test]
async fn test_weekend_dates_resolve_to_surrounding_sessions() {
    let fetcher = worked_example_fetcher()
        .with_bar("GGAL.BA", d(3, 4), dec!(200), dec!(201))
        .with_bar("YPFD.BA", d(3, 4), dec!(100), dec!(101))
        .with_bar("YPF", d(3, 4), dec!(50), dec!(51));
    let (_, service) = service(fetcher);

    // Saturday 2024-03-02 and Sunday 2024-03-31
    let report = service
        .compare_detailed(&request(&UNIVERSE, d(3, 2), d(3, 31)))
        .await
        .unwrap();

    for (instrument, first) in report.date1.sessions() {
        assert_eq!(first.date(), d(3, 4), "{}", instrument);
        assert!(!first.via_fallback);
    }
    for (_, last) in report.date2.sessions() {
        assert_eq!(last.date(), d(3, 28));
    }

    let ggal = find_record(&report.records, &id("GGAL.BA")).unwrap();
    // 200 -> 110
    assert_eq!(ggal.raw_percent_diff, MetricValue::Value(dec!(-45)));
}

#[tokio::test]
async fn test_unavailable_instruments_are_excluded() {
    let fetcher = worked_example_fetcher()
        .failing("PAMP.BA", Failure::Timeout)
        .failing("DELISTED.BA", Failure::NotFound);
    let (fetcher, service) = service(fetcher);

    let tickers = ["GGAL.BA", "YPFD.BA", "YPF", "PAMP.BA", "DELISTED.BA", "EMPTY.BA"];
    let report = service
        .compare_detailed(&request(&tickers, d(3, 1), d(3, 28)))
        .await
        .unwrap();

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.exclusions.len(), 3);
    for exclusion in &report.exclusions {
        assert_eq!(exclusion.reason, ExclusionReason::DataUnavailable);
        assert_eq!(exclusion.target_date, d(3, 1));
    }
    // Two dates, one fetch per instrument each
    assert_eq!(fetcher.calls(), 12);
}

#[tokio::test]
async fn test_provider_failure_aborts_run() {
    let fetcher = worked_example_fetcher().failing("PAMP.BA", Failure::Provider);
    let (_, service) = service(fetcher);

    let result = service
        .compare(&request(&["GGAL.BA", "PAMP.BA"], d(3, 1), d(3, 28)))
        .await;

    assert!(matches!(
        result,
        Err(Error::ProviderFailure(MarketDataError::ProviderError { .. }))
    ));
}

#[tokio::test]
async fn test_reference_listing_falls_back_to_previous_session() {
    // Nothing for the local listing between 2024-03-02 and the end of its window
    let fetcher = MockFetcher::default()
        .with_bar("GGAL.BA", d(3, 4), dec!(100), dec!(101))
        .with_bar("GGAL.BA", d(5, 15), dec!(108), dec!(110))
        .with_bar("YPFD.BA", d(2, 28), dec!(50), dec!(51))
        .with_bar("YPFD.BA", d(5, 15), dec!(59), dec!(60))
        .with_bar("YPF", d(2, 28), dec!(25), dec!(26))
        .with_bar("YPF", d(3, 4), dec!(30), dec!(31))
        .with_bar("YPF", d(5, 15), dec!(23), dec!(24));
    let (_, service) = service(fetcher);

    let report = service
        .compare_detailed(&request(&UNIVERSE, d(3, 2), d(5, 15)))
        .await
        .unwrap();

    let local = report.date1.get(&id("YPFD.BA")).unwrap();
    let foreign = report.date1.get(&id("YPF")).unwrap();
    assert!(local.via_fallback && foreign.via_fallback);
    assert_eq!(local.date(), d(2, 28));
    assert_eq!(foreign.date(), d(2, 28));
    assert_eq!(report.date1.get(&id("GGAL.BA")).unwrap().date(), d(3, 4));

    let ratios = report.ratios.unwrap();
    assert_eq!(ratios.ratio1, MetricValue::Value(dec!(2)));
    assert_eq!(ratios.ratio2, MetricValue::Value(dec!(2.5)));
    let ggal = find_record(&report.records, &id("GGAL.BA")).unwrap();
    assert_eq!(ggal.normalized_percent_diff, MetricValue::Value(dec!(-12)));
}

#[tokio::test]
async fn test_missing_reference_keeps_raw_metrics() {
    let fetcher = worked_example_fetcher().failing("YPF", Failure::Timeout);
    let (_, service) = service(fetcher);

    let report = service
        .compare_detailed(&request(&UNIVERSE, d(3, 1), d(3, 28)))
        .await
        .unwrap();

    assert!(report.ratios.is_none());
    let ggal = find_record(&report.records, &id("GGAL.BA")).unwrap();
    assert_eq!(ggal.raw_percent_diff, MetricValue::Value(dec!(10)));
    assert_eq!(
        ggal.normalized_percent_diff,
        MetricValue::NotANumber(NanReason::ReferenceUnavailable)
    );
}

#[tokio::test]
async fn test_zero_open_does_not_disturb_others() {
    let fetcher = worked_example_fetcher()
        .with_bar("ZERO.BA", d(3, 1), dec!(0), dec!(1))
        .with_bar("ZERO.BA", d(3, 28), dec!(2), dec!(3));
    let (_, service) = service(fetcher);

    let records = service
        .compare(&request(
            &["GGAL.BA", "YPFD.BA", "YPF", "ZERO.BA"],
            d(3, 1),
            d(3, 28),
        ))
        .await
        .unwrap();

    let zero = find_record(&records, &id("ZERO.BA")).unwrap();
    assert_eq!(
        zero.raw_percent_diff,
        MetricValue::NotANumber(NanReason::ZeroDenominator)
    );
    assert_eq!(records.last().unwrap().instrument, id("ZERO.BA"));
    let ggal = find_record(&records, &id("GGAL.BA")).unwrap();
    assert_eq!(ggal.normalized_percent_diff, MetricValue::Value(dec!(-12)));
}

#[tokio::test]
async fn test_incomplete_session_policies() {
    let fetcher = || {
        reference_fetcher()
            .with_session(Session {
                instrument: id("GGAL.BA"),
                date: d(3, 1),
                open: None,
                close: Some(dec!(101)),
            })
            .with_bar("GGAL.BA", d(3, 4), dec!(80), dec!(81))
            .with_bar("GGAL.BA", d(3, 28), dec!(108), dec!(110))
    };

    let (_, excluding) = service(fetcher());
    let report = excluding
        .compare_detailed(&request(&UNIVERSE, d(3, 1), d(3, 28)))
        .await
        .unwrap();
    assert!(find_record(&report.records, &id("GGAL.BA")).is_none());
    assert_eq!(report.exclusions.len(), 1);
    assert_eq!(report.exclusions[0].instrument, id("GGAL.BA"));
    assert_eq!(report.exclusions[0].reason, ExclusionReason::IncompleteSession);

    let config = EngineConfig {
        incomplete_session_policy: IncompleteSessionPolicy::SkipSession,
        ..Default::default()
    };
    let (_, skipping) = service_with(fetcher(), config);
    let report = skipping
        .compare_detailed(&request(&UNIVERSE, d(3, 1), d(3, 28)))
        .await
        .unwrap();
    let ggal = find_record(&report.records, &id("GGAL.BA")).unwrap();
    // 80 -> 110
    assert_eq!(ggal.raw_percent_diff, MetricValue::Value(dec!(37.5)));
    assert!(report.exclusions.is_empty());
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let (_, service) = service(worked_example_fetcher());
    let req = request(&UNIVERSE, d(3, 1), d(3, 28));

    let first = service.compare_detailed(&req).await.unwrap();
    let second = service.compare_detailed(&req).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(service.compare(&req).await.unwrap(), first.records);
}

#[tokio::test]
async fn test_invalid_request_is_rejected_before_fetching() {
    let (fetcher, service) = service(worked_example_fetcher());

    let result = service.compare(&request(&[], d(3, 1), d(3, 28))).await;

    assert!(matches!(result, Err(Error::Validation(_))));
    assert_eq!(fetcher.calls(), 0);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = EngineConfig {
        window_days: 0,
        ..Default::default()
    };
    let result = ComparisonService::new(Arc::new(MockFetcher::default()), config);
    assert!(matches!(result, Err(Error::InvalidConfigValue(_))));
}
