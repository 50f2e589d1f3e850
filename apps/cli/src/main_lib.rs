use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crosslist_core::{ComparisonRequest, ComparisonService};
use crosslist_market_data::{ProviderFetcher, YahooProvider};

use crate::config::Config;

/// Install the global subscriber. Logs go to stderr so stdout carries only
/// the report.
pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Parse the two positional `YYYY-MM-DD` dates.
pub fn parse_dates(
    mut args: impl Iterator<Item = String>,
) -> anyhow::Result<(NaiveDate, NaiveDate)> {
    let (Some(first), Some(second)) = (args.next(), args.next()) else {
        bail!("usage: crosslist <DATE1> <DATE2> (dates as YYYY-MM-DD)");
    };
    if args.next().is_some() {
        bail!("expected exactly two dates");
    }

    let date1 = parse_date(&first)?;
    let date2 = parse_date(&second)?;
    Ok((date1, date2))
}

fn parse_date(value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", value))
}

pub fn build_service(config: &Config) -> anyhow::Result<ComparisonService> {
    let provider = YahooProvider::with_timeout(config.fetch_timeout)?;
    let fetcher = ProviderFetcher::new(Arc::new(provider));
    tracing::debug!("Using provider {}", fetcher.provider_id());

    Ok(ComparisonService::new(Arc::new(fetcher), config.engine.clone())?)
}

pub fn build_request(config: &Config, date1: NaiveDate, date2: NaiveDate) -> ComparisonRequest {
    ComparisonRequest::new(
        date1,
        date2,
        config.universe.iter().cloned(),
        config.reference_pair.clone(),
    )
}
