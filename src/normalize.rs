//! Header-name normalization for battery CSV dialects.
//!
//! Exported files name their columns inconsistently ("Voltage (V)", "volt",
//! "Current[A]", "Cell Temp", "Time", "timestamp"). This module maps
//! arbitrary headers onto the canonical measurement fields through an
//! ordered rule list, so new dialects are added by extending the list
//! without touching the parser core.

use strum::AsRefStr;

/// Canonical measurement fields a CSV column can resolve to.
#[derive(AsRefStr, Clone, Copy, Debug, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum CanonicalField {
    Time,
    Voltage,
    Current,
    Temperature,
}

/// A single header-matching rule. Rules are tried in order; the first match
/// wins.
#[derive(Clone, Debug)]
pub enum HeaderRule {
    /// Header contains the needle (case-insensitive).
    Contains(&'static str, CanonicalField),
    /// Header equals one of the names (case-insensitive).
    Equals(&'static [&'static str], CanonicalField),
}

impl HeaderRule {
    /// Apply this rule to a header, returning the canonical field on match.
    pub fn resolve(&self, header: &str) -> Option<CanonicalField> {
        let lower = header.trim().to_lowercase();
        match self {
            HeaderRule::Contains(needle, field) => lower.contains(needle).then_some(*field),
            HeaderRule::Equals(names, field) => {
                names.iter().any(|name| lower == *name).then_some(*field)
            }
        }
    }
}

/// Recognized names for the elapsed-time column.
///
/// Time is matched by equality rather than containment: too many unrelated
/// channels contain "time" as a substring ("Charge Time Remaining").
const TIME_NAMES: &[&str] = &[
    "time",
    "timestamp",
    "t",
    "elapsed",
    "elapsed time",
    "time_s",
    "time (s)",
    "time(s)",
];

/// The built-in rule list, in priority order.
pub fn default_rules() -> Vec<HeaderRule> {
    vec![
        HeaderRule::Equals(TIME_NAMES, CanonicalField::Time),
        HeaderRule::Contains("volt", CanonicalField::Voltage),
        HeaderRule::Contains("curr", CanonicalField::Current),
        HeaderRule::Contains("temp", CanonicalField::Temperature),
    ]
}

/// Resolve a header against a rule list. `None` means the caller keeps the
/// column as an extra field under its lower-cased name.
pub fn resolve_header(header: &str, rules: &[HeaderRule]) -> Option<CanonicalField> {
    rules.iter().find_map(|rule| rule.resolve(header))
}
