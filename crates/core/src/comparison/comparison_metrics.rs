//! Raw and ratio-normalized percentage changes.

use std::cmp::Ordering;

use log::debug;

use crosslist_market_data::InstrumentId;

use super::comparison_model::{MetricRecord, MetricValue, NanReason, ReferenceRatios};
use crate::sessions::{ReferencePair, ResolvedSessionMap};

/// Output of [`compute_metrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsOutcome {
    /// `None` when either reference listing is missing on either date.
    pub ratios: Option<ReferenceRatios>,
    /// One record per instrument present on both dates, presentation order.
    pub records: Vec<MetricRecord>,
}

/// Reference conversion ratios, when both listings are present on both dates.
pub fn reference_ratios(
    m1: &ResolvedSessionMap,
    m2: &ResolvedSessionMap,
    pair: &ReferencePair,
) -> Option<ReferenceRatios> {
    let local_open = m1.get(&pair.local)?.open()?;
    let foreign_open = m1.get(&pair.foreign)?.open()?;
    let local_close = m2.get(&pair.local)?.close()?;
    let foreign_close = m2.get(&pair.foreign)?.close()?;

    let ratio1 = MetricValue::ratio(local_open, foreign_open);
    let ratio2 = MetricValue::ratio(local_close, foreign_close);
    let drift = ratio1.and_then(|r1| ratio2.and_then(|r2| MetricValue::percent_change(r1, r2)));

    Some(ReferenceRatios {
        ratio1,
        ratio2,
        drift,
    })
}

/// Compute metrics for every instrument resolved on both dates.
///
/// `m1` and `m2` are the cleaned maps for date 1 (forward) and date 2
/// (backward). The raw change uses the date-1 open and the date-2 close.
/// The normalized change divides the open by ratio 1 and the close by
/// ratio 2 before taking the change, cancelling the reference pair's drift.
/// The local reference listing itself reports the drift of the ratio.
/// Zero denominators yield not-a-number for that metric only.
pub fn compute_metrics(
    m1: &ResolvedSessionMap,
    m2: &ResolvedSessionMap,
    pair: &ReferencePair,
) -> MetricsOutcome {
    let ratios = reference_ratios(m1, m2, pair);
    if ratios.is_none() {
        debug!(
            "Reference pair {}/{} not resolved on both dates; normalized metrics unavailable",
            pair.local, pair.foreign
        );
    }

    let mut records: Vec<MetricRecord> = m1
        .sessions()
        .filter_map(|(instrument, first)| {
            let open = first.open()?;
            let close = m2.get(instrument)?.close()?;

            let normalized_percent_diff = match &ratios {
                None => MetricValue::NotANumber(NanReason::ReferenceUnavailable),
                Some(ratios) if *instrument == pair.local => ratios.drift,
                Some(ratios) => {
                    let adj_open = ratios.ratio1.and_then(|r1| MetricValue::ratio(open, r1));
                    let adj_close = ratios.ratio2.and_then(|r2| MetricValue::ratio(close, r2));
                    adj_open.and_then(|o| adj_close.and_then(|c| MetricValue::percent_change(o, c)))
                }
            };

            Some(MetricRecord {
                instrument: instrument.clone(),
                raw_percent_diff: MetricValue::percent_change(open, close),
                normalized_percent_diff,
            })
        })
        .collect();

    sort_for_presentation(&mut records);

    MetricsOutcome { ratios, records }
}

/// Descending raw change, ties by instrument ascending; not-a-number last.
pub fn sort_for_presentation(records: &mut [MetricRecord]) {
    records.sort_by(|a, b| {
        compare_raw_descending(a.raw_percent_diff, b.raw_percent_diff)
            .then_with(|| a.instrument.cmp(&b.instrument))
    });
}

fn compare_raw_descending(a: MetricValue, b: MetricValue) -> Ordering {
    match (a.value(), b.value()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Look up a record by instrument.
pub fn find_record<'a>(
    records: &'a [MetricRecord],
    instrument: &InstrumentId,
) -> Option<&'a MetricRecord> {
    records.iter().find(|r| &r.instrument == instrument)
}
