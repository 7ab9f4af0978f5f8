use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Form field names as posted by the application front end.
pub mod keys {
    pub const COMPANY_NAME: &str = "companyName";
    pub const HQ_ADDRESS: &str = "hqAddress";
    pub const CONTACT_NAME: &str = "contactName";
    pub const CONTACT_TITLE: &str = "contactTitle";
    pub const CONTACT_EMAIL: &str = "contactEmail";
    pub const CONTACT_PHONE: &str = "contactPhone";
    pub const PROJECT_ADDRESS: &str = "projectAddress";
    pub const PROJECT_TYPE: &str = "projectType";
    pub const ACTIVITIES: &str = "activities";
    pub const SITE_SIZE: &str = "siteSize";
    pub const BUILDING_SIZE: &str = "buildingSize";
    pub const UPFIT_SIZE: &str = "upfitSize";
    pub const RETAINED_JOBS: &str = "retainedJobs";
    pub const NEW_JOBS_YEAR_1: &str = "newJobsYear1";
    pub const NEW_JOBS_YEAR_2: &str = "newJobsYear2";
    pub const NEW_JOBS_YEAR_3: &str = "newJobsYear3";
    pub const AVERAGE_WAGE: &str = "averageWage";
    pub const PEOPLE_MOVING: &str = "peopleMoving";
    pub const TOTAL_INVESTMENT: &str = "totalInvestment";
    pub const LAND_PURCHASE: &str = "landPurchase";
    pub const CONSTRUCTION: &str = "construction";
    pub const FURNITURE: &str = "furniture";
    pub const COMPUTERS: &str = "computers";
    pub const OWNERSHIP_TYPE: &str = "ownershipType";
    pub const LEASE_TERM: &str = "leaseTerm";
    pub const LEASE_PAYMENTS: &str = "leasePayments";
    pub const LEASE_RATE: &str = "leaseRate";
    pub const SITE_PLAN_DATE: &str = "sitePlanDate";
    pub const BUILDING_PLAN_DATE: &str = "buildingPlanDate";
    pub const UPFIT_PLAN_DATE: &str = "upfitPlanDate";
    pub const OCCUPANCY_DATE: &str = "occupancyDate";
    pub const ANNUAL_REPORTS: &str = "annualReports";
    pub const PUBLIC_ANNOUNCEMENT: &str = "publicAnnouncement";
    pub const SIGNATURE: &str = "signature";
    pub const DATE_SIGN: &str = "dateSign";
}

/// Loosely typed form record. Accessors never fail: anything that cannot be read as the
/// requested type is reported as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSubmission {
    values: BTreeMap<String, Value>,
}

impl RawSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Non-empty string value, returned verbatim.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(Value::String(value)) if !value.is_empty() => Some(value.as_str()),
            _ => None,
        }
    }

    /// Printable form of a scalar value; numbers keep their JSON spelling.
    pub fn display(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            Value::String(value) if !value.is_empty() => Some(value.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }

    /// Leading-integer read: `"12.7"` yields 12, `"1,000"` yields 1, `"abc"` is absent.
    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.values.get(key)? {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().and_then(truncate_finite)),
            Value::String(raw) => parse_leading_integer(raw),
            _ => None,
        }
    }

    /// Leading-decimal read, rejecting non-finite values.
    pub fn decimal(&self, key: &str) -> Option<f64> {
        match self.values.get(key)? {
            Value::Number(number) => number.as_f64().filter(|value| value.is_finite()),
            Value::String(raw) => parse_leading_decimal(raw),
            _ => None,
        }
    }

    /// Checkbox-style flag. Absent, empty, and the usual negative spellings are `false`.
    pub fn flag(&self, key: &str) -> bool {
        match self.values.get(key) {
            Some(Value::Bool(value)) => *value,
            Some(Value::Number(number)) => number.as_f64().map(|v| v != 0.0).unwrap_or(false),
            Some(Value::String(raw)) => !matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "" | "false" | "no" | "off" | "0"
            ),
            _ => false,
        }
    }

    /// Calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        self.text(key).and_then(parse_calendar_date)
    }
}

impl FromIterator<(String, Value)> for RawSubmission {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

pub(crate) fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.naive_utc().date())
}

fn truncate_finite(value: f64) -> Option<i64> {
    if value.is_finite() && value.abs() < i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

fn parse_leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['+', '-']));
    let digits = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    trimmed[..sign_len + digits].parse().ok()
}

fn parse_leading_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = usize::from(trimmed.starts_with(['+', '-']));

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    trimmed[..end]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
