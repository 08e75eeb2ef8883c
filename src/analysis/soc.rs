//! State-of-charge derivation by coulomb counting.
//!
//! Charge is integrated trapezoidally over adjacent record pairs and
//! normalized against the nominal capacity: `soc = 100 - Ah/capacity × 100`,
//! with positive current accumulating positive amp-hours. When the series
//! carries no current readings at all, SOC degrades to the record's
//! fractional position in the sequence — coarse, but it keeps charts usable
//! for voltage-only exports.

use super::SocOptions;
use crate::parsers::types::MeasurementRecord;

/// Whether any record carries a usable current reading.
fn has_current_data(records: &[MeasurementRecord]) -> bool {
    records.iter().any(|record| record.current.is_some())
}

/// Degraded mode: fractional position in the sequence, scaled to percent.
fn position_fallback(index: usize, len: usize) -> f64 {
    if len < 2 {
        return 0.0;
    }
    index as f64 / (len - 1) as f64 * 100.0
}

fn clamp_soc(soc: f64, options: &SocOptions) -> f64 {
    if options.allow_overcharge {
        soc.max(0.0)
    } else {
        soc.clamp(0.0, 100.0)
    }
}

/// Amp-hours accumulated over one adjacent pair. A missing current reading
/// inside an otherwise current-bearing series integrates as 0 A.
fn pair_amp_hours(prev: &MeasurementRecord, next: &MeasurementRecord) -> f64 {
    let dt_hours = (next.time - prev.time) / 3600.0;
    let avg_current = (prev.current.unwrap_or(0.0) + next.current.unwrap_or(0.0)) / 2.0;
    avg_current * dt_hours
}

/// Trapezoidal amp-hour prefix sums: `prefix[i]` is the charge integrated
/// from the first record up to record `i`. Computed once in O(n) so callers
/// doing many point lookups avoid re-integrating.
pub fn amp_hour_prefix(records: &[MeasurementRecord]) -> Vec<f64> {
    let mut prefix = Vec::with_capacity(records.len());
    let mut amp_hours = 0.0;
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            amp_hours += pair_amp_hours(&records[i - 1], record);
        }
        prefix.push(amp_hours);
    }
    prefix
}

/// State of charge at one record, addressed by index.
///
/// An out-of-range index yields 0.0 rather than panicking, matching the
/// repository's treatment of unknown ids.
pub fn soc_at(records: &[MeasurementRecord], index: usize, options: &SocOptions) -> f64 {
    if index >= records.len() {
        return 0.0;
    }
    if !has_current_data(records) {
        return position_fallback(index, records.len());
    }

    let mut amp_hours = 0.0;
    for pair in records[..=index].windows(2) {
        amp_hours += pair_amp_hours(&pair[0], &pair[1]);
    }
    clamp_soc(
        100.0 - amp_hours / options.nominal_capacity_ah * 100.0,
        options,
    )
}

/// State of charge for every record in one pass. The result is aligned
/// index-for-index with the input and is never stored back onto the test.
pub fn soc_series(records: &[MeasurementRecord], options: &SocOptions) -> Vec<f64> {
    if !has_current_data(records) {
        return (0..records.len())
            .map(|i| position_fallback(i, records.len()))
            .collect();
    }

    amp_hour_prefix(records)
        .into_iter()
        .map(|amp_hours| {
            clamp_soc(
                100.0 - amp_hours / options.nominal_capacity_ah * 100.0,
                options,
            )
        })
        .collect()
}
