//! Normalizer integration tests: delimiter/locale variants, ragged rows,
//! and parse-report accounting.

#[path = "common/mod.rs"]
mod common;

use common::synthetic::{cycler_csv, reference_rows};
use packlog::parsers::{BatteryCsv, Delimiter, FieldValue, ParseError};

#[test]
fn test_same_values_across_all_delimiters() {
    let rows = reference_rows();
    let comma = cycler_csv(',', false, &rows);
    let semicolon = cycler_csv(';', false, &rows);
    let tab = cycler_csv('\t', false, &rows);

    let parser = BatteryCsv::new();
    let from_comma = parser.parse(&comma).unwrap();
    let from_semicolon = parser.parse(&semicolon).unwrap();
    let from_tab = parser.parse(&tab).unwrap();

    assert_eq!(from_comma.report.delimiter, Delimiter::Comma);
    assert_eq!(from_semicolon.report.delimiter, Delimiter::Semicolon);
    assert_eq!(from_tab.report.delimiter, Delimiter::Tab);

    assert_eq!(from_comma.records, from_semicolon.records);
    assert_eq!(from_comma.records, from_tab.records);

    for (record, (time, voltage, current)) in from_comma.records.iter().zip(&rows) {
        assert_eq!(record.time, *time);
        assert_eq!(record.voltage, *voltage);
        assert_eq!(record.current, Some(*current));
    }
}

#[test]
fn test_decimal_comma_locale_equivalent_to_decimal_point() {
    let rows = reference_rows();
    let point = cycler_csv(';', false, &rows);
    let comma = cycler_csv(';', true, &rows);

    let parser = BatteryCsv::new();
    assert_eq!(
        parser.parse(&point).unwrap().records,
        parser.parse(&comma).unwrap().records
    );
}

#[test]
fn test_ragged_rows_excluded_without_error() {
    let sample = "time,voltage,current\n\
                  0,4.2,-1\n\
                  1,4.1\n\
                  2,4.0,-1,junk\n\
                  3,3.9,-1\n";
    let parsed = BatteryCsv::new().parse(sample).unwrap();

    assert_eq!(parsed.records.len(), 2);
    assert!(parsed.records.len() < 4);
    assert_eq!(parsed.report.rows_dropped_column_mismatch, 2);
}

#[test]
fn test_report_counts_are_consistent() {
    common::init_tracing();
    let sample = "time,voltage\n0,4.2\nbad row here\nx,y\n1,4.1\n";
    let parsed = BatteryCsv::new().parse(sample).unwrap();
    let report = parsed.report;

    assert_eq!(report.data_rows, 4);
    assert_eq!(report.rows_retained, parsed.records.len());
    assert_eq!(report.rows_retained + report.rows_dropped(), report.data_rows);
}

#[test]
fn test_heuristic_headers_resolve_canonical_fields() {
    let sample = "Elapsed;Pack Voltage (V);Charge Current [A];Cell Temp 1;Internal Resistance\n\
                  0;50,1;2,0;21;0,05\n\
                  60;50,4;2,0;21,5;0,05\n";
    let parsed = BatteryCsv::new().parse(sample).unwrap();

    assert_eq!(parsed.records.len(), 2);
    let second = &parsed.records[1];
    assert_eq!(second.time, 60.0);
    assert_eq!(second.voltage, 50.4);
    assert_eq!(second.current, Some(2.0));
    assert_eq!(second.temperature, 21.5);
    assert_eq!(
        second.extra.get("internal resistance"),
        Some(&FieldValue::Number(0.05))
    );
}

#[test]
fn test_clock_time_column() {
    let sample = "Time,Voltage,Current\n00:00:00,4.2,-1\n00:10:00,4.1,-1\n02:00:30,4.0,-1\n";
    let parsed = BatteryCsv::new().parse(sample).unwrap();
    let times: Vec<f64> = parsed.records.iter().map(|r| r.time).collect();
    assert_eq!(times, vec![0.0, 600.0, 7230.0]);
}

#[test]
fn test_whole_file_failures() {
    let parser = BatteryCsv::new();
    assert!(matches!(parser.parse(""), Err(ParseError::EmptyFile)));
    assert!(matches!(
        parser.parse("single\n1\n2\n"),
        Err(ParseError::InvalidHeader(_))
    ));
    assert!(matches!(
        parser.parse("time,voltage\na,b\nc,d\n"),
        Err(ParseError::NoValidData)
    ));
}

#[test]
fn test_metadata_line_before_header() {
    let sample = "# exported by cycler firmware 3.1\n\
                  time;voltage;current\n\
                  0;3,95;-0,25\n";
    let parsed = BatteryCsv::new().parse(sample).unwrap();
    assert!(parsed.report.skipped_metadata_line);
    assert_eq!(parsed.records[0].voltage, 3.95);
}
