// src/table/cell.rs

use chrono::NaiveDate;

/// Date formats seen in export-sales tables, tried in order.
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%b %d, %Y", "%B %d, %Y", "%d-%b-%Y"];

/// Parse a `Week Ending` cell.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse a volume cell, ignoring thousands separators.
pub fn parse_int(raw: &str) -> Option<i64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '\'' | '_') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}
