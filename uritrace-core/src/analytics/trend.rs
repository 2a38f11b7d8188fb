//! Period-over-period trend detection.
//!
//! A trend compares a count in the current rolling period against the
//! immediately preceding period of the same duration type. The percentage
//! denominator is `max(previous, 1)`: this deliberately avoids division by
//! zero at the cost of reporting a first-ever occurrence as "count x 100%".
//! Consumers rely on that exact figure, so it is preserved as-is rather than
//! replaced with a mathematically cleaner formula.

use chrono::{DateTime, TimeZone, Utc};

use crate::time;
use crate::types::{Session, Symptom};

/// Direction and magnitude of a period-over-period change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trend {
    Increasing { percentage: f64 },
    Decreasing { percentage: f64 },
    Stable,
}

impl Trend {
    /// Display form used by the doctor summary: "↑ 12.3%", "↓ 12.3%", or
    /// "Stable".
    pub fn description(&self) -> String {
        match self {
            Trend::Increasing { percentage } => format!("↑ {:.1}%", percentage),
            Trend::Decreasing { percentage } => format!("↓ {:.1}%", percentage),
            Trend::Stable => "Stable".to_string(),
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A rolling calendar window compared against the immediately preceding
/// window of equal length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendPeriod {
    Week,
    Month,
    ThreeMonths,
}

impl TrendPeriod {
    /// Start of the current period: the period length subtracted from
    /// `from`, calendar-aware.
    pub fn start_date<Tz: TimeZone>(&self, from: &DateTime<Tz>) -> DateTime<Tz> {
        match self {
            TrendPeriod::Week => time::days_before(from, 7),
            TrendPeriod::Month => time::months_before(from, 1),
            TrendPeriod::ThreeMonths => time::months_before(from, 3),
        }
    }

    /// Start of the preceding period: the period length subtracted again
    /// from the current period's start (not from now).
    pub fn previous_period_start<Tz: TimeZone>(&self, current_start: &DateTime<Tz>) -> DateTime<Tz> {
        self.start_date(current_start)
    }

    /// Nominal day count used for per-day averages in reports.
    pub fn number_of_days(&self) -> i64 {
        match self {
            TrendPeriod::Week => 7,
            TrendPeriod::Month => 30,
            TrendPeriod::ThreeMonths => 90,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TrendPeriod::Week => "week",
            TrendPeriod::Month => "month",
            TrendPeriod::ThreeMonths => "three months",
        }
    }
}

/// Classify a current-vs-previous count pair.
pub fn detect_trend(current: usize, previous: usize) -> Trend {
    if current > previous {
        let percentage = (current - previous) as f64 / previous.max(1) as f64 * 100.0;
        Trend::Increasing { percentage }
    } else if current < previous {
        let percentage = (previous - current) as f64 / previous.max(1) as f64 * 100.0;
        Trend::Decreasing { percentage }
    } else {
        Trend::Stable
    }
}

/// Window boundaries for a trend computation: current period `[start, now]`
/// inclusive, previous period `[previous_start, start)`.
fn windows<Tz: TimeZone>(
    now: &DateTime<Tz>,
    period: TrendPeriod,
) -> (DateTime<Utc>, DateTime<Utc>, DateTime<Utc>) {
    let current_start = period.start_date(now);
    let previous_start = period.previous_period_start(&current_start);
    (
        previous_start.with_timezone(&Utc),
        current_start.with_timezone(&Utc),
        now.with_timezone(&Utc),
    )
}

/// Compare completed-session counts between the current period and the one
/// before it.
pub fn detect_frequency_trend<Tz: TimeZone>(
    sessions: &[Session],
    now: &DateTime<Tz>,
    period: TrendPeriod,
) -> Trend {
    let (previous_start, current_start, now) = windows(now, period);

    let current = sessions
        .iter()
        .filter(|s| matches!(s.end_time, Some(t) if t >= current_start && t <= now))
        .count();
    let previous = sessions
        .iter()
        .filter(|s| matches!(s.end_time, Some(t) if t >= previous_start && t < current_start))
        .count();

    detect_trend(current, previous)
}

/// Compare counts of completed sessions carrying `symptom` between the
/// current period and the one before it.
pub fn detect_symptom_trend<Tz: TimeZone>(
    sessions: &[Session],
    symptom: Symptom,
    now: &DateTime<Tz>,
    period: TrendPeriod,
) -> Trend {
    let (previous_start, current_start, now) = windows(now, period);

    let current = sessions
        .iter()
        .filter(|s| matches!(s.end_time, Some(t) if t >= current_start && t <= now))
        .filter(|s| s.has_symptom(symptom))
        .count();
    let previous = sessions
        .iter()
        .filter(|s| matches!(s.end_time, Some(t) if t >= previous_start && t < current_start))
        .filter(|s| s.has_symptom(symptom))
        .count();

    detect_trend(current, previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Outcome;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn session_ending_at(end: &str, symptoms: &[Symptom]) -> Session {
        let end = ts(end);
        let mut session = Session::start(end - chrono::Duration::seconds(30));
        let outcome = if symptoms.is_empty() {
            Outcome::Positive
        } else {
            Outcome::negative(symptoms.iter().copied())
        };
        session.complete(end, outcome, None);
        session
    }

    #[test]
    fn test_detect_trend_classification() {
        assert_eq!(
            detect_trend(10, 5),
            Trend::Increasing { percentage: 100.0 }
        );
        assert_eq!(detect_trend(3, 10), Trend::Decreasing { percentage: 70.0 });
        assert_eq!(detect_trend(5, 5), Trend::Stable);
        assert_eq!(detect_trend(0, 0), Trend::Stable);
    }

    #[test]
    fn test_zero_previous_uses_max_guard() {
        // (5 - 0) / max(0, 1) * 100 = 500%
        assert_eq!(detect_trend(5, 0), Trend::Increasing { percentage: 500.0 });
    }

    #[test]
    fn test_trend_description() {
        assert_eq!(
            Trend::Increasing { percentage: 12.34 }.description(),
            "↑ 12.3%"
        );
        assert_eq!(
            Trend::Decreasing { percentage: 5.0 }.description(),
            "↓ 5.0%"
        );
        assert_eq!(Trend::Stable.description(), "Stable");
    }

    #[test]
    fn test_frequency_trend_windows() {
        let now = ts("2024-05-15T12:00:00Z");
        // 3 sessions in the trailing week, 1 in the week before it
        let sessions = vec![
            session_ending_at("2024-05-14T09:00:00Z", &[]),
            session_ending_at("2024-05-13T09:00:00Z", &[]),
            session_ending_at("2024-05-09T09:00:00Z", &[]),
            session_ending_at("2024-05-03T09:00:00Z", &[]),
            // Outside both windows
            session_ending_at("2024-04-20T09:00:00Z", &[]),
        ];

        assert_eq!(
            detect_frequency_trend(&sessions, &now, TrendPeriod::Week),
            Trend::Increasing { percentage: 200.0 }
        );
    }

    #[test]
    fn test_previous_window_excludes_current_start() {
        let now = ts("2024-05-15T12:00:00Z");
        // Exactly at the current period start: belongs to the current window
        let sessions = vec![session_ending_at("2024-05-08T12:00:00Z", &[])];

        assert_eq!(
            detect_frequency_trend(&sessions, &now, TrendPeriod::Week),
            Trend::Increasing { percentage: 100.0 }
        );
    }

    #[test]
    fn test_symptom_trend_counts_only_matching_sessions() {
        let now = ts("2024-05-15T12:00:00Z");
        let sessions = vec![
            session_ending_at("2024-05-14T09:00:00Z", &[Symptom::Pain]),
            session_ending_at("2024-05-13T09:00:00Z", &[Symptom::Pain]),
            session_ending_at("2024-05-12T09:00:00Z", &[Symptom::Burning]),
            session_ending_at("2024-05-03T09:00:00Z", &[Symptom::Pain]),
        ];

        assert_eq!(
            detect_symptom_trend(&sessions, Symptom::Pain, &now, TrendPeriod::Week),
            Trend::Increasing { percentage: 100.0 }
        );
        assert_eq!(
            detect_symptom_trend(&sessions, Symptom::Burning, &now, TrendPeriod::Week),
            Trend::Increasing { percentage: 100.0 }
        );
        assert_eq!(
            detect_symptom_trend(&sessions, Symptom::Blood, &now, TrendPeriod::Week),
            Trend::Stable
        );
    }

    #[test]
    fn test_month_period_is_calendar_aware() {
        let now = ts("2024-03-31T12:00:00Z");
        let start = TrendPeriod::Month.start_date(&now);
        assert_eq!(start, ts("2024-02-29T12:00:00Z"));
        let previous = TrendPeriod::Month.previous_period_start(&start);
        assert_eq!(previous, ts("2024-01-29T12:00:00Z"));
    }
}
