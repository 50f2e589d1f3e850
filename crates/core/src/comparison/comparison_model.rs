//! Comparison domain models.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crosslist_market_data::InstrumentId;

use crate::errors::ValidationError;
use crate::sessions::{ReferencePair, ResolvedSessionMap};

// =============================================================================
// MetricValue
// =============================================================================

/// Why a metric has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NanReason {
    /// A price or ratio in a denominator was zero.
    ZeroDenominator,
    /// The result does not fit in a `Decimal`.
    Overflow,
    /// The reference pair was not resolved on both dates.
    ReferenceUnavailable,
}

/// A computed quantity or an explicit not-a-number state.
///
/// Serializes as a JSON number, or `null` when not-a-number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricValue {
    Value(Decimal),
    NotANumber(NanReason),
}

impl MetricValue {
    pub fn value(self) -> Option<Decimal> {
        match self {
            MetricValue::Value(v) => Some(v),
            MetricValue::NotANumber(_) => None,
        }
    }

    pub fn is_nan(self) -> bool {
        matches!(self, MetricValue::NotANumber(_))
    }

    /// Floating-point view; not-a-number maps to `f64::NAN`.
    pub fn as_f64(self) -> f64 {
        self.value().and_then(|v| v.to_f64()).unwrap_or(f64::NAN)
    }

    /// `numerator / denominator`, not-a-number on a zero denominator.
    pub fn ratio(numerator: Decimal, denominator: Decimal) -> Self {
        if denominator.is_zero() {
            return MetricValue::NotANumber(NanReason::ZeroDenominator);
        }
        numerator
            .checked_div(denominator)
            .map(MetricValue::Value)
            .unwrap_or(MetricValue::NotANumber(NanReason::Overflow))
    }

    /// `(to - from) / from * 100`.
    pub fn percent_change(from: Decimal, to: Decimal) -> Self {
        if from.is_zero() {
            return MetricValue::NotANumber(NanReason::ZeroDenominator);
        }
        to.checked_sub(from)
            .and_then(|delta| delta.checked_div(from))
            .and_then(|fraction| fraction.checked_mul(Decimal::ONE_HUNDRED))
            .map(MetricValue::Value)
            .unwrap_or(MetricValue::NotANumber(NanReason::Overflow))
    }

    pub fn and_then(self, f: impl FnOnce(Decimal) -> MetricValue) -> Self {
        match self {
            MetricValue::Value(v) => f(v),
            nan => nan,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Value(v) => write!(f, "{}", v),
            MetricValue::NotANumber(_) => write!(f, "NaN"),
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Value(v) => Serialize::serialize(v, serializer),
            MetricValue::NotANumber(_) => serializer.serialize_none(),
        }
    }
}

// =============================================================================
// Records
// =============================================================================

/// Comparison result for one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricRecord {
    pub instrument: InstrumentId,
    /// Change from the date-1 open to the date-2 close, in percent.
    pub raw_percent_diff: MetricValue,
    /// Same change after dividing both prices by the reference ratio.
    pub normalized_percent_diff: MetricValue,
}

/// Conversion ratios between the reference listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReferenceRatios {
    /// local open / foreign open on date 1
    pub ratio1: MetricValue,
    /// local close / foreign close on date 2
    pub ratio2: MetricValue,
    /// Percent change from `ratio1` to `ratio2`.
    pub drift: MetricValue,
}

// =============================================================================
// Request / Report
// =============================================================================

/// Inputs of one comparison run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRequest {
    /// Resolved forward: first session on or after this date (open is used).
    pub date1: NaiveDate,
    /// Resolved backward: last session on or before this date (close is used).
    pub date2: NaiveDate,
    pub universe: BTreeSet<InstrumentId>,
    pub reference_pair: ReferencePair,
}

impl ComparisonRequest {
    pub fn new(
        date1: NaiveDate,
        date2: NaiveDate,
        universe: impl IntoIterator<Item = InstrumentId>,
        reference_pair: ReferencePair,
    ) -> Self {
        Self {
            date1,
            date2,
            universe: universe.into_iter().collect(),
            reference_pair,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.universe.is_empty() {
            return Err(ValidationError::EmptyUniverse);
        }
        if self.reference_pair.local == self.reference_pair.foreign {
            return Err(ValidationError::DegenerateReferencePair(
                self.reference_pair.local.to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// No session in the fetched window on the admitted side of the date.
    DataUnavailable,
    /// The resolved session lacked an open or a close.
    IncompleteSession,
}

/// A universe member that produced no metric record, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exclusion {
    pub instrument: InstrumentId,
    pub target_date: NaiveDate,
    pub reason: ExclusionReason,
}

/// Full outcome of a comparison run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub date1: ResolvedSessionMap,
    pub date2: ResolvedSessionMap,
    pub ratios: Option<ReferenceRatios>,
    /// Presentation order: descending raw change.
    pub records: Vec<MetricRecord>,
    pub exclusions: Vec<Exclusion>,
}
