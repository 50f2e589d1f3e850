//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Calendar days fetched on each side of a target date.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Concurrent fetches per target date.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// What to do with sessions that lack an open or a close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IncompleteSessionPolicy {
    /// Resolve against every session; if the nearest one is incomplete the
    /// instrument is dropped from the comparison.
    #[default]
    ExcludeInstrument,

    /// Ignore incomplete sessions while resolving, so the next complete
    /// session in the requested direction is used instead.
    SkipSession,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window_days: u32,
    pub max_concurrency: usize,
    pub incomplete_session_policy: IncompleteSessionPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            incomplete_session_policy: IncompleteSessionPolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_days == 0 {
            return Err(Error::InvalidConfigValue(
                "window_days must be at least 1".to_string(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(Error::InvalidConfigValue(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
