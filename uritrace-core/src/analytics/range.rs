//! Closed date ranges used by the statistics layer.

use chrono::{DateTime, Datelike, TimeZone, Utc};

/// A closed date range. Day/week/month variants contain a date by
/// calendar-unit equality in the range's zone, not by literal 24h multiples.
#[derive(Debug, Clone)]
pub enum DateRange<Tz: TimeZone> {
    /// The calendar day containing this instant
    Day(DateTime<Tz>),
    /// The calendar week (ISO) containing this instant
    Week(DateTime<Tz>),
    /// The calendar month containing this instant
    Month(DateTime<Tz>),
    /// An explicit closed interval `[start, end]`
    Custom {
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    },
}

impl<Tz: TimeZone> DateRange<Tz> {
    /// Number of days this range spans.
    ///
    /// Months report their actual length; custom ranges report whole days
    /// between the two endpoints and may be zero or negative when the
    /// endpoints are inverted (callers guard division accordingly).
    pub fn number_of_days(&self) -> i64 {
        match self {
            DateRange::Day(_) => 1,
            DateRange::Week(_) => 7,
            DateRange::Month(t) => {
                let first = t.date_naive().with_day(1);
                first
                    .and_then(|first| {
                        let next = first.checked_add_months(chrono::Months::new(1))?;
                        Some((next - first).num_days())
                    })
                    .unwrap_or(30)
            }
            DateRange::Custom { start, end } => (end.clone() - start.clone()).num_days(),
        }
    }

    /// Whether `date` falls inside this range.
    pub fn contains(&self, date: &DateTime<Utc>) -> bool {
        match self {
            DateRange::Day(t) => {
                let local = date.with_timezone(&t.timezone());
                local.date_naive() == t.date_naive()
            }
            DateRange::Week(t) => {
                let local = date.with_timezone(&t.timezone());
                local.iso_week() == t.iso_week()
            }
            DateRange::Month(t) => {
                let local = date.with_timezone(&t.timezone());
                local.year() == t.year() && local.month() == t.month()
            }
            DateRange::Custom { start, end } => {
                let start = start.with_timezone(&Utc);
                let end = end.with_timezone(&Utc);
                *date >= start && *date <= end
            }
        }
    }
}
