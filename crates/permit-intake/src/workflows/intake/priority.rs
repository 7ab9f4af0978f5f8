use super::catalog::Priority;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Stand-in for "no occupancy date": far enough out to never escalate.
pub const FAR_FUTURE_DAYS: i64 = 999;

pub const HIGH_INVESTMENT_THRESHOLD: i64 = 5_000_000;
pub const MEDIUM_INVESTMENT_THRESHOLD: i64 = 1_000_000;
pub const HIGH_URGENCY_DAYS: i64 = 90;
pub const MEDIUM_URGENCY_DAYS: i64 = 180;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Whole days from `now` until UTC midnight of the occupancy date, rounded toward
/// negative infinity.
pub fn days_until_occupancy(occupancy: Option<NaiveDate>, now: DateTime<Utc>) -> i64 {
    let Some(midnight) = occupancy.and_then(|date| date.and_hms_opt(0, 0, 0)) else {
        return FAR_FUTURE_DAYS;
    };
    let occupancy = Utc.from_utc_datetime(&midnight);
    (occupancy - now)
        .num_milliseconds()
        .div_euclid(MILLIS_PER_DAY)
}

/// Both thresholds are strict: exactly 90 days or exactly $1,000,000 stays in the lower tier.
pub fn classify(total_investment: i64, days_until_occupancy: i64) -> Priority {
    if total_investment > HIGH_INVESTMENT_THRESHOLD || days_until_occupancy < HIGH_URGENCY_DAYS {
        Priority::High
    } else if total_investment > MEDIUM_INVESTMENT_THRESHOLD
        || days_until_occupancy < MEDIUM_URGENCY_DAYS
    {
        Priority::Medium
    } else {
        Priority::Low
    }
}
