//! Discharge-energy integration.

use crate::parsers::types::MeasurementRecord;

/// Total energy delivered during discharge, in watt-hours.
///
/// Only adjacent pairs whose first point is discharging (negative current)
/// contribute; each adds the interval's average |V·I| power times its
/// duration in hours. Empty and single-record inputs yield 0.
pub fn discharge_energy_wh(records: &[MeasurementRecord]) -> f64 {
    let mut total_wh = 0.0;
    for pair in records.windows(2) {
        let Some(current) = pair[0].current else {
            continue;
        };
        if current >= 0.0 {
            continue;
        }
        let dt_hours = (pair[1].time - pair[0].time) / 3600.0;
        let avg_power = ((pair[0].voltage * current).abs()
            + (pair[1].voltage * pair[1].current.unwrap_or(0.0)).abs())
            / 2.0;
        total_wh += avg_power * dt_hours;
    }
    total_wh
}
