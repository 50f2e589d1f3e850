use std::time::Duration;

use anyhow::{bail, Context};
use crosslist_core::{EngineConfig, IncompleteSessionPolicy, ReferencePair};
use crosslist_market_data::InstrumentId;

pub struct Config {
    pub universe: Vec<InstrumentId>,
    pub reference_pair: ReferencePair,
    pub engine: EngineConfig,
    pub fetch_timeout: Duration,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let universe: Vec<InstrumentId> = var("CROSSLIST_UNIVERSE")
            .unwrap_or_else(|| "YPFD.BA,YPF".into())
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(InstrumentId::from)
            .collect();

        let reference_pair = ReferencePair::new(
            var("CROSSLIST_REFERENCE_LOCAL").unwrap_or_else(|| "YPFD.BA".into()),
            var("CROSSLIST_REFERENCE_FOREIGN").unwrap_or_else(|| "YPF".into()),
        );

        let defaults = EngineConfig::default();
        let window_days = match var("CROSSLIST_WINDOW_DAYS") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("Invalid CROSSLIST_WINDOW_DAYS: {}", v))?,
            None => defaults.window_days,
        };
        let max_concurrency = match var("CROSSLIST_MAX_CONCURRENCY") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("Invalid CROSSLIST_MAX_CONCURRENCY: {}", v))?,
            None => defaults.max_concurrency,
        };
        let incomplete_session_policy = match var("CROSSLIST_SKIP_INCOMPLETE") {
            Some(v) if parse_flag(&v) => IncompleteSessionPolicy::SkipSession,
            _ => IncompleteSessionPolicy::ExcludeInstrument,
        };

        let timeout_ms: u64 = match var("CROSSLIST_FETCH_TIMEOUT_MS") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("Invalid CROSSLIST_FETCH_TIMEOUT_MS: {}", v))?,
            None => 10000,
        };
        if timeout_ms == 0 {
            bail!("CROSSLIST_FETCH_TIMEOUT_MS must be at least 1");
        }
        let log_format = var("CROSSLIST_LOG_FORMAT").unwrap_or_else(|| "text".into());

        let engine = EngineConfig {
            window_days,
            max_concurrency,
            incomplete_session_policy,
        };
        engine.validate()?;

        Ok(Self {
            universe,
            reference_pair,
            engine,
            fetch_timeout: Duration::from_millis(timeout_ms),
            log_format,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
