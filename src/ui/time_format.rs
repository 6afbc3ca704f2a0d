use chrono::{DateTime, Locale, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse the timestamp text a server template puts into a table cell.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.ffffff]` (with a space or `T`)
/// and a bare `YYYY-MM-DD`. Offsets are dropped; the wall-clock time shown
/// is the one the server wrote.
pub fn parse_cell_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Long human date for admin tables, e.g. "15 March 2024, 14:30" with
/// `en_US`. Unknown locale names fall back to POSIX month names.
pub fn format_long_date(at: NaiveDateTime, locale: &str, format: &str) -> String {
    let locale = Locale::try_from(locale).unwrap_or(Locale::POSIX);
    Utc.from_utc_datetime(&at)
        .format_localized(format, locale)
        .to_string()
}

/// Reformat a cell, or `None` when the text is not a timestamp.
pub fn reformat_cell(text: &str, locale: &str, format: &str) -> Option<String> {
    parse_cell_timestamp(text).map(|at| format_long_date(at, locale, format))
}
