// ==========================================
// AIT CMMS - flexible date parsing
// ==========================================
// Master-data date columns are free-form text filled in by hand
// over the years. Parse failure is a normal outcome, treated by
// callers as "never completed"; no error ever escapes.
// ==========================================

use chrono::NaiveDate;

/// Accepted formats, tried in order. ISO first; ambiguous
/// day/month forms resolve US-style before day-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%m-%d-%Y",
    "%m-%d-%y",
    "%d/%m/%Y",
    "%d/%m/%y",
];

pub struct DateParser;

impl DateParser {
    /// Best-effort parse of a free-form date string.
    ///
    /// Empty or whitespace-only input and total parse failure both
    /// yield `None`.
    pub fn parse_flexible(date_string: &str) -> Option<NaiveDate> {
        let trimmed = date_string.trim();
        if trimmed.is_empty() {
            return None;
        }

        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
    }

    /// `parse_flexible` lifted over an optional column value.
    pub fn parse_flexible_opt(date_string: Option<&str>) -> Option<NaiveDate> {
        date_string.and_then(Self::parse_flexible)
    }
}
