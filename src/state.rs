//! Core entity types and constants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::parsers::types::MeasurementRecord;

/// Nominal capacity assumed when the caller does not supply one, in Ah.
pub const DEFAULT_NOMINAL_CAPACITY_AH: f64 = 6.5;

/// File extensions accepted for ingestion.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "txt"];

/// One ingested battery test: filename metadata plus the normalized record
/// sequence. Immutable after creation; owned by the repository and only
/// handed out as borrows.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatteryTest {
    /// Collision-resistant opaque id (UUID v4).
    pub id: String,
    pub file_name: String,
    /// 0 = unidentified.
    pub pack_number: u32,
    /// 0 = unidentified.
    pub module_number: u32,
    /// Serialized as an ISO-8601 string.
    pub upload_date: DateTime<Utc>,
    pub records: Vec<MeasurementRecord>,
}

impl BatteryTest {
    /// Whether this test matches the given pack/module filter; `None`
    /// matches everything.
    pub fn matches(&self, pack: Option<u32>, module: Option<u32>) -> bool {
        pack.map_or(true, |p| self.pack_number == p)
            && module.map_or(true, |m| self.module_number == m)
    }
}
