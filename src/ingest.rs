//! Batch file ingestion.
//!
//! Files are processed strictly sequentially, one fully parsed before the
//! next begins, and a failing file never aborts the batch: failures are
//! reported per file so the caller can retry just those. Parsing itself is
//! synchronous — interactive callers should run a batch on a worker task.

use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::metadata;
use crate::parsers::battery_csv::BatteryCsv;
use crate::parsers::types::{MeasurementRecord, ParseError, ParseReport};
use crate::repository::TestRepository;
use crate::state::{BatteryTest, SUPPORTED_EXTENSIONS};

/// Per-file ingestion failures.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("could not read file: {0}")]
    Read(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A successfully ingested file.
#[derive(Clone, Debug)]
pub struct Ingested {
    /// Id of the test now held by the repository.
    pub id: String,
    pub report: ParseReport,
}

/// A file that failed to ingest, kept separate so the caller can retry it.
#[derive(Debug)]
pub struct FileFailure {
    pub file_name: String,
    pub error: IngestError,
}

/// Outcome of a multi-file batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub loaded: Vec<Ingested>,
    pub failed: Vec<FileFailure>,
}

/// Loose extension check for file pickers and drop handlers.
pub fn is_supported_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Assemble a test entity from parsed records and filename conventions.
pub fn build_test(file_name: &str, records: Vec<MeasurementRecord>) -> BatteryTest {
    let pack_module = metadata::extract(file_name);
    BatteryTest {
        id: Uuid::new_v4().to_string(),
        file_name: file_name.to_string(),
        pack_number: pack_module.pack_number,
        module_number: pack_module.module_number,
        upload_date: Utc::now(),
        records,
    }
}

/// Parse one file's text and add the resulting test to the repository.
pub fn ingest_text(
    repo: &mut TestRepository,
    file_name: &str,
    text: &str,
) -> Result<Ingested, IngestError> {
    let parsed = BatteryCsv::new().parse(text)?;
    let test = build_test(file_name, parsed.records);
    let id = test.id.clone();
    tracing::info!(
        "ingested {}: {} record(s), pack {}, module {}",
        file_name,
        test.records.len(),
        test.pack_number,
        test.module_number
    );
    repo.add(test);
    Ok(Ingested {
        id,
        report: parsed.report,
    })
}

/// Ingest an in-memory byte buffer, as handed over by drag-and-drop or a
/// file picker. Bytes are decoded as UTF-8, lossily.
pub fn ingest_bytes(
    repo: &mut TestRepository,
    file_name: &str,
    bytes: &[u8],
) -> Result<Ingested, IngestError> {
    let text = String::from_utf8_lossy(bytes);
    ingest_text(repo, file_name, &text)
}

/// Ingest a batch of files, one fully parsed before the next begins.
pub fn ingest_files(repo: &mut TestRepository, paths: &[PathBuf]) -> BatchReport {
    let mut batch = BatchReport::default();
    for path in paths {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let result = std::fs::read_to_string(path)
            .map_err(IngestError::from)
            .and_then(|text| ingest_text(repo, &file_name, &text));

        match result {
            Ok(ingested) => batch.loaded.push(ingested),
            Err(error) => {
                tracing::warn!("failed to ingest {}: {}", file_name, error);
                batch.failed.push(FileFailure { file_name, error });
            }
        }
    }
    batch
}
