//! Battery-test CSV normalizer.
//!
//! Cycler exports vary in delimiter (comma, semicolon, tab), decimal
//! separator (point or comma, sometimes mixed within one file), column
//! naming, and whether a metadata line precedes the header. The parser
//! resolves all of that heuristically and emits a uniform sequence of
//! timestamped [`MeasurementRecord`]s plus a [`ParseReport`] with
//! dropped/retained row counts.

use rayon::prelude::*;
use std::cmp::Ordering;

use super::types::{
    Delimiter, FieldValue, MeasurementRecord, ParseError, ParseReport, ParsedFile,
};
use crate::normalize::{default_rules, resolve_header, CanonicalField, HeaderRule};

/// What a column's values feed into, resolved once from the header.
#[derive(Clone, Debug)]
enum ColumnTarget {
    Canonical(CanonicalField),
    Extra(String),
}

/// Per-row parse outcome. Dropped rows are counted, never escalated.
enum RowOutcome {
    Record(Box<MeasurementRecord>),
    ColumnMismatch,
    NoNumericData,
}

/// Battery CSV parser with a configurable header rule list.
pub struct BatteryCsv {
    rules: Vec<HeaderRule>,
}

impl Default for BatteryCsv {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

impl BatteryCsv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the built-in header rules. Rules are tried in order.
    pub fn with_rules(rules: Vec<HeaderRule>) -> Self {
        Self { rules }
    }

    /// Parse raw file text into normalized measurement records.
    pub fn parse(&self, raw: &str) -> Result<ParsedFile, ParseError> {
        // Any line-ending style; blank lines dropped
        let lines: Vec<&str> = raw
            .split(['\r', '\n'])
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if lines.len() < 2 {
            return Err(ParseError::EmptyFile);
        }

        let skipped_metadata_line = should_skip_first_line(lines[0], lines.get(1).copied());
        let header_index = usize::from(skipped_metadata_line);

        let header_line = lines[header_index];
        let delimiter = detect_delimiter(header_line);
        let headers: Vec<&str> = header_line
            .split(delimiter.as_char())
            .map(str::trim)
            .collect();
        if headers.len() < 2 {
            return Err(ParseError::InvalidHeader(headers.len()));
        }

        let targets: Vec<ColumnTarget> = headers
            .iter()
            .map(|header| match resolve_header(header, &self.rules) {
                Some(field) => ColumnTarget::Canonical(field),
                None => ColumnTarget::Extra(header.to_lowercase()),
            })
            .collect();

        let data_lines = &lines[header_index + 1..];

        let outcomes: Vec<RowOutcome> = data_lines
            .par_iter()
            .enumerate()
            .map(|(row_index, line)| parse_row(line, delimiter, &targets, row_index))
            .collect();

        let mut report = ParseReport {
            delimiter,
            skipped_metadata_line,
            data_rows: data_lines.len(),
            ..Default::default()
        };
        let mut records: Vec<MeasurementRecord> = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                RowOutcome::Record(record) => {
                    report.rows_retained += 1;
                    records.push(*record);
                }
                RowOutcome::ColumnMismatch => report.rows_dropped_column_mismatch += 1,
                RowOutcome::NoNumericData => report.rows_dropped_no_numeric += 1,
            }
        }

        if records.is_empty() {
            return Err(ParseError::NoValidData);
        }

        // Consumers rely on non-decreasing time; stable-sort only when the
        // file is actually out of order
        if records.windows(2).any(|pair| pair[1].time < pair[0].time) {
            tracing::warn!("rows are out of time order, sorting");
            records.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(Ordering::Equal));
        }

        if report.rows_dropped() > 0 {
            tracing::warn!(
                "dropped {} of {} data rows ({} column mismatch, {} non-numeric)",
                report.rows_dropped(),
                report.data_rows,
                report.rows_dropped_column_mismatch,
                report.rows_dropped_no_numeric
            );
        }
        tracing::info!(
            "parsed {} records from {} data rows ({} columns)",
            report.rows_retained,
            report.data_rows,
            headers.len()
        );

        Ok(ParsedFile { records, report })
    }
}

/// Leading metadata-line heuristic: a line that already names a voltage
/// column is always the header; otherwise a marker character, or a
/// following line that does name one, marks the first line as metadata.
fn should_skip_first_line(first: &str, second: Option<&str>) -> bool {
    let lower = first.to_lowercase();
    if lower.contains("voltage") {
        return false;
    }
    if first.contains('#') || first.contains('%') {
        return true;
    }
    second
        .map(|line| line.to_lowercase().contains("voltage"))
        .unwrap_or(false)
}

/// Delimiter detection, header line only: prefer semicolon or tab when
/// present without a comma.
fn detect_delimiter(header_line: &str) -> Delimiter {
    let has_comma = header_line.contains(',');
    if header_line.contains(';') && !has_comma {
        Delimiter::Semicolon
    } else if header_line.contains('\t') && !has_comma {
        Delimiter::Tab
    } else {
        Delimiter::Comma
    }
}

/// Parse a field as a finite float, retrying with decimal-comma
/// normalization ("3,14" → 3.14).
fn parse_number(field: &str) -> Option<f64> {
    field
        .parse::<f64>()
        .ok()
        .or_else(|| field.replace(',', ".").parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Convert a colon-separated clock value ("HH:MM:SS") to elapsed seconds.
fn parse_clock_time(field: &str) -> Option<f64> {
    let parts: Vec<&str> = field.split(':').collect();
    if parts.len() != 3 {
        return None;
    }
    let hours: f64 = parts[0].trim().parse().ok()?;
    let minutes: f64 = parts[1].trim().parse().ok()?;
    let seconds = parse_number(parts[2].trim())?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

fn parse_row(
    line: &str,
    delimiter: Delimiter,
    targets: &[ColumnTarget],
    row_index: usize,
) -> RowOutcome {
    let fields: Vec<&str> = line.split(delimiter.as_char()).map(str::trim).collect();
    if fields.len() != targets.len() {
        return RowOutcome::ColumnMismatch;
    }

    let mut record = MeasurementRecord::default();
    let mut time: Option<f64> = None;
    let mut numeric_fields = 0usize;

    for (field, target) in fields.iter().zip(targets) {
        if field.is_empty() {
            continue;
        }
        let number = parse_number(field);
        if number.is_some() {
            numeric_fields += 1;
        }
        match target {
            ColumnTarget::Canonical(CanonicalField::Time) => {
                if let Some(value) = number {
                    time = Some(value);
                } else if let Some(value) = parse_clock_time(field) {
                    time = Some(value);
                    numeric_fields += 1;
                }
            }
            ColumnTarget::Canonical(CanonicalField::Voltage) => {
                if let Some(value) = number {
                    record.voltage = value;
                }
            }
            ColumnTarget::Canonical(CanonicalField::Current) => {
                if let Some(value) = number {
                    record.current = Some(value);
                }
            }
            ColumnTarget::Canonical(CanonicalField::Temperature) => {
                if let Some(value) = number {
                    record.temperature = value;
                }
            }
            ColumnTarget::Extra(name) => {
                let value = match number {
                    Some(v) => FieldValue::Number(v),
                    None => FieldValue::Text(field.to_string()),
                };
                record.extra.insert(name.clone(), value);
            }
        }
    }

    if numeric_fields == 0 {
        return RowOutcome::NoNumericData;
    }

    // No usable time value: fall back to the row's position in the data
    record.time = time.unwrap_or(row_index as f64);
    RowOutcome::Record(Box::new(record))
}
