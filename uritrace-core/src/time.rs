//! Calendar-aware time utilities.
//!
//! Every date boundary decision in the analytics layer goes through these
//! helpers. They operate on the calendar of the zone carried by the input
//! timestamp, so "7 days before" and "1 month before" survive month-length
//! changes and DST transitions the way a wall calendar would, not as fixed
//! 24h/30-day arithmetic.
//!
//! The zone is injected by the caller through the timestamp itself; nothing
//! here reads a global clock or a global time zone.

use chrono::{DateTime, Days, Months, TimeZone, Timelike};

/// Midnight at the start of `t`'s calendar day, in `t`'s zone.
///
/// When midnight does not exist in that zone (a DST gap), the earliest valid
/// instant of the day is used.
pub fn start_of_day<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    let midnight = t
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid wall time");
    t.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .unwrap_or_else(|| t.clone())
}

/// The same wall-clock time `n` calendar days before `t`.
pub fn days_before<Tz: TimeZone>(t: &DateTime<Tz>, n: u64) -> DateTime<Tz> {
    t.clone()
        .checked_sub_days(Days::new(n))
        .unwrap_or_else(|| t.clone())
}

/// The same wall-clock time `n` calendar months before `t`, clamped to the
/// last day of shorter months (Mar 31 minus one month is Feb 28/29).
pub fn months_before<Tz: TimeZone>(t: &DateTime<Tz>, n: u32) -> DateTime<Tz> {
    t.clone()
        .checked_sub_months(Months::new(n))
        .unwrap_or_else(|| t.clone())
}

/// Hour of `t`'s day in its own zone, 0-23.
pub fn hour_of_day<Tz: TimeZone>(t: &DateTime<Tz>) -> u32 {
    t.hour()
}
