pub mod battery_csv;
pub mod types;

pub use battery_csv::BatteryCsv;
pub use types::{
    Delimiter, FieldValue, MeasurementRecord, ParseError, ParseReport, ParsedFile,
};
