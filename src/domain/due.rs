use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime};

/// Display text for a due date that could not be parsed
pub const INVALID_DATE_TEXT: &str = "Invalid date format";

/// Format used when writing dates back out (Today / +1 / -1)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of the created-date stamp
pub const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M";

const DATE_ONLY_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Parse a date string, discarding any time component
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    for format in DATE_ONLY_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Some(date);
        }
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
            return Some(datetime.date());
        }
    }
    DateTime::parse_from_rfc3339(input).ok().map(|dt| dt.date_naive())
}

/// Signed number of whole days from `today` to the due date
pub fn days_until(due: &str, today: NaiveDate) -> Option<i64> {
    parse_date(due).map(|date| (date - today).num_days())
}

/// Human-readable remaining time for `due` relative to `today`.
///
/// Empty input yields an empty string and unparsable input yields
/// [`INVALID_DATE_TEXT`]; neither is an error.
pub fn remaining(due: &str, today: NaiveDate) -> String {
    if due.is_empty() {
        return String::new();
    }

    match days_until(due, today) {
        None => INVALID_DATE_TEXT.to_string(),
        Some(0) => "Due today".to_string(),
        Some(days) if days > 0 => format!("{} {} left", days, day_word(days)),
        Some(days) => format!("{} {} overdue", days.abs(), day_word(days)),
    }
}

/// [`remaining`] against the local calendar date
pub fn remaining_today(due: &str) -> String {
    remaining(due, today())
}

fn day_word(days: i64) -> &'static str {
    if days.abs() > 1 {
        "days"
    } else {
        "day"
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Today's date in [`DATE_FORMAT`]
pub fn today_string() -> String {
    today().format(DATE_FORMAT).to_string()
}

/// Current local time as a created-date stamp
pub fn now_stamp() -> String {
    Local::now().format(CREATED_FORMAT).to_string()
}

/// Move a date by `days`. Unparsable input starts from `today`.
/// `None` when the result falls outside the supported calendar range.
pub fn shift_date(date: &str, days: i64, today: NaiveDate) -> Option<String> {
    let start = parse_date(date).unwrap_or(today);
    let shifted = start.checked_add_signed(Duration::try_days(days)?)?;
    Some(shifted.format(DATE_FORMAT).to_string())
}
