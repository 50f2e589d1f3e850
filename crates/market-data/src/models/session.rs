use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::instrument::InstrumentId;

/// One daily trading session of an instrument.
///
/// Providers occasionally return bars with a missing open or close; those
/// prices are `None` and the session is considered incomplete.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub instrument: InstrumentId,

    /// Calendar date of the session (UTC)
    pub date: NaiveDate,

    /// Opening price
    pub open: Option<Decimal>,

    /// Closing price
    pub close: Option<Decimal>,
}

impl Session {
    /// Create a session with both prices present
    pub fn new(instrument: InstrumentId, date: NaiveDate, open: Decimal, close: Decimal) -> Self {
        Self {
            instrument,
            date,
            open: Some(open),
            close: Some(close),
        }
    }

    /// Whether both open and close are present.
    pub fn is_complete(&self) -> bool {
        self.open.is_some() && self.close.is_some()
    }
}
