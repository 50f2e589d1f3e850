//! Cross-listing price comparison.
//!
//! - [`comparison_model`] - Metric values, records, requests and reports
//! - [`comparison_metrics`] - Raw and ratio-normalized percentage changes
//! - [`comparison_service`] - Fetch, resolve, clean and compute in one run
//!
//! # Flow
//!
//! ```text
//! date1 ──fetch──▶ resolve Forward ──▶ clean ──┐
//!                                              ├──▶ compute_metrics ──▶ records
//! date2 ──fetch──▶ resolve Backward ─▶ clean ──┘
//! ```

pub mod comparison_metrics;
pub mod comparison_model;
pub mod comparison_service;
pub mod comparison_traits;

pub use comparison_metrics::{
    compute_metrics, find_record, reference_ratios, sort_for_presentation, MetricsOutcome,
};
pub use comparison_model::{
    ComparisonReport, ComparisonRequest, Exclusion, ExclusionReason, MetricRecord, MetricValue,
    NanReason, ReferenceRatios,
};
pub use comparison_service::ComparisonService;
pub use comparison_traits::ComparisonServiceTrait;

// The reference pair is shared with session resolution
pub use crate::sessions::ReferencePair;
