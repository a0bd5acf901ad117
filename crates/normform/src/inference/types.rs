//! Cell-level data type detection.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::DataType;

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================

/// `m/d/yyyy` and `m/d/yy`, one or two digit month and day.
static US_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2}|\d{4})$").unwrap());

/// `yyyy-mm-dd` and `yyyy/mm/dd`.
static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})[-/](\d{2})[-/](\d{2})$").unwrap());

/// Literals read as booleans (compared case-insensitively).
const BOOLEAN_LITERALS: &[&str] = &["true", "false", "yes", "no", "on", "off", "t", "f"];

/// Separator that marks a text cell as a list of values.
const LIST_SEPARATOR: char = ',';

/// Detect the data type of a single cell.
///
/// Checks run from most to least specific: bit, boolean, integer, float,
/// date/time, UUID, and finally variable-length text.
pub fn infer_cell_type(value: &str) -> DataType {
    let trimmed = value.trim();

    if trimmed == "0" || trimmed == "1" {
        return DataType::Bit;
    }

    if is_boolean_literal(trimmed) {
        return DataType::Boolean;
    }

    if trimmed.parse::<i64>().is_ok() {
        return DataType::Integer;
    }

    if trimmed.parse::<f64>().is_ok() {
        return DataType::Float;
    }

    if is_date_time(trimmed) {
        return DataType::DateTime;
    }

    if uuid::Uuid::parse_str(trimmed).is_ok() {
        return DataType::Uuid;
    }

    DataType::varchar_for(trimmed.chars().count())
}

/// Whether the value is one of the accepted boolean words.
pub fn is_boolean_literal(value: &str) -> bool {
    BOOLEAN_LITERALS
        .iter()
        .any(|literal| value.eq_ignore_ascii_case(literal))
}

/// Whether the value parses as a calendar date or timestamp.
pub fn is_date_time(value: &str) -> bool {
    if DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").is_ok()
    {
        return true;
    }

    if let Some(caps) = ISO_DATE.captures(value) {
        return valid_date(&caps[1], &caps[2], &caps[3]);
    }

    if let Some(caps) = US_DATE.captures(value) {
        let year = if caps[3].len() == 2 {
            format!("20{}", &caps[3])
        } else {
            caps[3].to_string()
        };
        return valid_date(&year, &caps[1], &caps[2]);
    }

    false
}

fn valid_date(year: &str, month: &str, day: &str) -> bool {
    match (year.parse::<i32>(), month.parse::<u32>(), day.parse::<u32>()) {
        (Ok(y), Ok(m), Ok(d)) => NaiveDate::from_ymd_opt(y, m, d).is_some(),
        _ => false,
    }
}

/// Whether a cell holds more than one value.
///
/// Only text cells can be lists; numbers and dates never are.
pub fn is_list_value(value: &str) -> bool {
    infer_cell_type(value).is_text() && value.contains(LIST_SEPARATOR)
}
