//! Pack/module identification from filename conventions.
//!
//! Lab files encode which pack and module a test exercised in the filename
//! ("B12MD3_discharge.csv", "pack4_7.csv"). Extraction is best-effort and
//! never fails; `0` means "unidentified", never a valid id.

use regex::Regex;
use std::sync::LazyLock;

/// Pack and module numbers recovered from a filename.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PackModule {
    pub pack_number: u32,
    pub module_number: u32,
}

/// Filename patterns in priority order. First match wins.
static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)B(\d+)MD(\d+)").expect("Failed to compile regex"),
        Regex::new(r"(?i)B(\d+)[^0-9]+(\d+)").expect("Failed to compile regex"),
        Regex::new(r"(?i)PACK(\d+)[^0-9]+(\d+)").expect("Failed to compile regex"),
    ]
});

/// Derive pack/module identifiers from a filename.
pub fn extract(file_name: &str) -> PackModule {
    for pattern in PATTERNS.iter() {
        if let Some(captures) = pattern.captures(file_name) {
            let pack = captures.get(1).and_then(|m| m.as_str().parse().ok());
            let module = captures.get(2).and_then(|m| m.as_str().parse().ok());
            if let (Some(pack_number), Some(module_number)) = (pack, module) {
                return PackModule {
                    pack_number,
                    module_number,
                };
            }
        }
    }
    PackModule::default()
}
