use async_trait::async_trait;

use super::comparison_model::{ComparisonReport, ComparisonRequest, MetricRecord};
use crate::errors::Result;

/// Trait for comparison service operations.
#[async_trait]
pub trait ComparisonServiceTrait: Send + Sync {
    /// Metric records for the request, in presentation order.
    async fn compare(&self, request: &ComparisonRequest) -> Result<Vec<MetricRecord>>;

    /// Metric records plus the resolved sessions, reference ratios and
    /// exclusions behind them.
    async fn compare_detailed(&self, request: &ComparisonRequest) -> Result<ComparisonReport>;
}
