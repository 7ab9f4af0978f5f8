//! Locale-independent display helpers shared by the summary text and the document.

use super::catalog::ProjectType;
use super::submission::parse_calendar_date;
use chrono::{Datelike, NaiveDate};

pub const NOT_PROVIDED: &str = "Not provided";
pub const NOT_SPECIFIED: &str = "Not specified";

/// `1234567` -> `1,234,567`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// `1234567` -> `$1,234,567`; negatives keep the sign ahead of the symbol.
pub fn money(value: i64) -> String {
    if value < 0 {
        format!("-${}", group_thousands(value.saturating_neg()))
    } else {
        format!("${}", group_thousands(value))
    }
}

/// Month/day/year without zero padding.
pub fn us_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Dates that do not parse are shown exactly as submitted.
pub fn display_date(raw: &str) -> String {
    parse_calendar_date(raw)
        .map(us_date)
        .unwrap_or_else(|| raw.to_string())
}

pub fn project_type_label(raw: Option<&str>) -> &'static str {
    raw.and_then(ProjectType::from_key)
        .map(ProjectType::label)
        .unwrap_or(NOT_SPECIFIED)
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
