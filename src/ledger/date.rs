use chrono::NaiveDate;

const DATE_FORMAT: &str = "%m/%d/%Y";

/// Parses a `MM/DD/YYYY` date. Month and day may omit their leading zero, the year may not.
pub fn parse_date(content: &str) -> Option<NaiveDate> {
    let content = content.trim();
    let year = content.rsplit('/').next()?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(content, DATE_FORMAT).ok()
}
