//! Date cell parsing. Timestamps keep only their calendar date.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Formats tried in order. Month-first slashes win over day-first ones, so
/// `01/02/2024` is January 2nd; `15/01/2024` still parses day-first.
/// Two-digit years (`12/01/23`) only match the `%y` formats at the end.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d/%m/%Y",
    "%Y/%m/%d",
    "%m/%d/%y",
    "%d.%m.%y",
];

pub fn default_date_formats() -> Vec<String> {
    DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect()
}

/// Parse `raw` with the first matching format.
///
/// chrono's `%Y` happily reads `23` as year 23, so a `%Y` match is only
/// accepted when the year has four digits.
pub fn parse_date<S: AsRef<str>>(raw: &str, formats: &[S]) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in formats {
        let fmt: &str = fmt.as_ref();
        let parsed = if has_time_fields(fmt) {
            NaiveDateTime::parse_from_str(s, fmt).ok().map(|dt| dt.date())
        } else {
            NaiveDate::parse_from_str(s, fmt).ok()
        };
        let parsed = parsed.filter(|date| !fmt.contains("%Y") || date.year() >= 1000);
        if parsed.is_some() {
            return parsed;
        }
    }
    None
}

fn has_time_fields(fmt: &str) -> bool {
    ["%H", "%M", "%S", "%T", "%R"].iter().any(|f| fmt.contains(f))
}
