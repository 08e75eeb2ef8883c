//! Common test utilities shared across all test modules.

#![allow(dead_code)]

use chrono::Utc;
use packlog::parsers::types::MeasurementRecord;
use packlog::state::BatteryTest;

/// Install a subscriber so test runs show parser diagnostics. Safe to call
/// from every test; only the first call wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Build a record with the canonical fields set and no extras.
pub fn record(time: f64, voltage: f64, current: Option<f64>) -> MeasurementRecord {
    MeasurementRecord {
        time,
        voltage,
        current,
        ..Default::default()
    }
}

/// Build a bare test entity around a record sequence.
pub fn test_with_records(id: &str, records: Vec<MeasurementRecord>) -> BatteryTest {
    BatteryTest {
        id: id.to_string(),
        file_name: format!("{id}.csv"),
        pack_number: 0,
        module_number: 0,
        upload_date: Utc::now(),
        records,
    }
}

/// A steady one-amp discharge at 4 V, sampled every 10 minutes for an hour.
pub fn discharge_records() -> Vec<MeasurementRecord> {
    (0..=6)
        .map(|i| record(i as f64 * 600.0, 4.0, Some(-1.0)))
        .collect()
}

/// Synthetic CSV builders for the normalizer tests.
pub mod synthetic {
    /// Render rows of (time, voltage, current) with the given delimiter and
    /// decimal separator.
    pub fn cycler_csv(delimiter: char, decimal_comma: bool, rows: &[(f64, f64, f64)]) -> String {
        let mut out = format!("time{delimiter}voltage{delimiter}current\n");
        for (time, voltage, current) in rows {
            let mut line = format!("{time}{delimiter}{voltage}{delimiter}{current}");
            if decimal_comma {
                line = line.replace('.', ",");
            }
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// Rows used by the cross-delimiter equivalence tests.
    pub fn reference_rows() -> Vec<(f64, f64, f64)> {
        vec![
            (0.0, 4.2, -1.5),
            (10.0, 4.15, -1.5),
            (20.0, 4.1, -1.4),
            (30.0, 4.05, -1.4),
        ]
    }
}
