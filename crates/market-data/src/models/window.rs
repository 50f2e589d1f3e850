use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive calendar window fetched around a target date.
///
/// The window is symmetric: `window_days` before and after the target. Both
/// resolution directions can therefore be served from the same fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SessionWindow {
    /// Window of `window_days` on each side of `date`, clamped to the
    /// representable calendar.
    pub fn around(date: NaiveDate, window_days: u32) -> Self {
        let span = Days::new(u64::from(window_days));
        Self {
            start: date.checked_sub_days(span).unwrap_or(NaiveDate::MIN),
            end: date.checked_add_days(span).unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
