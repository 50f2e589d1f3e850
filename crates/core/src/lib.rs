//! Crosslist Core
//!
//! Trading-date resolution and cross-listing normalization engine.
//!
//! Given two calendar dates, an instrument universe and a reference pair
//! (the same underlying quoted on two listings), the engine:
//!
//! 1. fetches a window of daily sessions around each date per instrument,
//! 2. resolves the first session on or after date 1 and the last session on
//!    or before date 2, retrying the reference pair once in the opposite
//!    direction when it is incomplete,
//! 3. drops sessions with missing prices,
//! 4. computes the raw change (date-1 open to date-2 close) and the change
//!    normalized by the reference pair's price ratio.
//!
//! No state survives a run. Missing data excludes an instrument and zero
//! denominators produce not-a-number; only a hard provider failure ends a
//! run with an error.

pub mod comparison;
pub mod config;
pub mod errors;
pub mod sessions;

pub use comparison::{
    ComparisonReport, ComparisonRequest, ComparisonService, ComparisonServiceTrait, MetricRecord,
    MetricValue,
};
pub use config::{EngineConfig, IncompleteSessionPolicy};
pub use errors::{Error, Result, ValidationError};
pub use sessions::{Direction, ReferencePair};
