//! CSV re-export of a test's records.

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::parsers::types::FieldValue;
use crate::state::BatteryTest;

/// Render a test's records back to CSV.
///
/// The header is the canonical columns followed by the sorted union of
/// extra-field names across all records. Numbers are written in their
/// shortest round-trip form, so re-parsing an export recovers the same
/// values; an absent current reading becomes an empty field.
pub fn to_csv(test: &BatteryTest) -> String {
    let extra_columns: BTreeSet<&str> = test
        .records
        .iter()
        .flat_map(|record| record.extra.keys().map(String::as_str))
        .collect();

    let mut out = String::new();
    out.push_str("time,voltage,current,temperature");
    for column in &extra_columns {
        out.push(',');
        out.push_str(column);
    }
    out.push('\n');

    for record in &test.records {
        let _ = write!(out, "{},{},", record.time, record.voltage);
        if let Some(current) = record.current {
            let _ = write!(out, "{current}");
        }
        let _ = write!(out, ",{}", record.temperature);
        for column in &extra_columns {
            out.push(',');
            match record.extra.get(*column) {
                Some(FieldValue::Number(value)) => {
                    let _ = write!(out, "{value}");
                }
                Some(FieldValue::Text(text)) => out.push_str(text),
                None => {}
            }
        }
        out.push('\n');
    }
    out
}
