use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Value of a CSV column that does not map onto a canonical measurement
/// field. Numeric where the field parsed as a finite number, text otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric value, if this field parsed as a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }
}

/// One timestamped measurement row of a battery test.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Elapsed seconds. Non-decreasing within one test.
    pub time: f64,
    /// Voltage in volts. 0.0 when the source had no usable voltage column.
    pub voltage: f64,
    /// Signed current in amps: positive = charge, negative = discharge.
    /// `None` when the source carried no parseable current reading.
    pub current: Option<f64>,
    /// Temperature in °C. 0.0 when the source had no temperature column.
    #[serde(default)]
    pub temperature: f64,
    /// Remaining columns, keyed by lower-cased header name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, FieldValue>,
}

/// Field delimiter detected from the header line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Delimiter {
    #[default]
    Comma,
    Semicolon,
    Tab,
}

impl Delimiter {
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Semicolon => ';',
            Delimiter::Tab => '\t',
        }
    }
}

/// Diagnostic counts from one parse run. Dropped rows are a recoverable
/// partial-data condition, not an error; callers decide whether to surface
/// them.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParseReport {
    pub delimiter: Delimiter,
    /// Whether a leading metadata line was skipped before the header.
    pub skipped_metadata_line: bool,
    /// Total data lines after the header.
    pub data_rows: usize,
    pub rows_retained: usize,
    /// Rows whose field count differed from the header count.
    pub rows_dropped_column_mismatch: usize,
    /// Rows in which no field parsed as a finite number.
    pub rows_dropped_no_numeric: usize,
}

impl ParseReport {
    pub fn rows_dropped(&self) -> usize {
        self.rows_dropped_column_mismatch + self.rows_dropped_no_numeric
    }
}

/// Successful parse output: the normalized record sequence plus diagnostics.
#[derive(Clone, Debug)]
pub struct ParsedFile {
    pub records: Vec<MeasurementRecord>,
    pub report: ParseReport,
}

/// Whole-file parse failures, recoverable at per-file granularity.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("file contains no data lines")]
    EmptyFile,
    #[error("header line has {0} column(s), need at least 2")]
    InvalidHeader(usize),
    #[error("no row contained a numeric value")]
    NoValidData,
}
