//! Basic aggregates and categorical breakdowns over a session set.
//!
//! Every function here is a pure transformation of the sessions it is given:
//! nothing mutates input, nothing reads a clock, and every possibly-zero
//! denominator is guarded with an explicit fallback. Only completed sessions
//! count; active sessions are invisible to every aggregate.

use chrono::{DateTime, TimeZone, Utc};

use crate::time;
use crate::types::{Session, Symptom};

use super::range::DateRange;

/// One of four fixed hour-of-day buckets used for distribution analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeCluster {
    EarlyMorning,
    Morning,
    Afternoon,
    Evening,
}

impl TimeCluster {
    /// All clusters in enumeration order; ties between cluster counts break
    /// toward the earliest entry here.
    pub const ALL: [TimeCluster; 4] = [
        TimeCluster::EarlyMorning,
        TimeCluster::Morning,
        TimeCluster::Afternoon,
        TimeCluster::Evening,
    ];

    /// Bucket an hour of day (0-23) into its cluster.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => TimeCluster::EarlyMorning,
            6..=11 => TimeCluster::Morning,
            12..=17 => TimeCluster::Afternoon,
            _ => TimeCluster::Evening,
        }
    }

    /// Index of this cluster in [`TimeCluster::ALL`].
    pub fn index(&self) -> usize {
        match self {
            TimeCluster::EarlyMorning => 0,
            TimeCluster::Morning => 1,
            TimeCluster::Afternoon => 2,
            TimeCluster::Evening => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeCluster::EarlyMorning => "Early Morning (12am-6am)",
            TimeCluster::Morning => "Morning (6am-12pm)",
            TimeCluster::Afternoon => "Afternoon (12pm-6pm)",
            TimeCluster::Evening => "Evening (6pm-12am)",
        }
    }
}

impl std::fmt::Display for TimeCluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn completed(sessions: &[Session]) -> impl Iterator<Item = &Session> {
    sessions.iter().filter(|s| s.is_completed())
}

/// Completed sessions per day over `range`.
///
/// Returns 0 when the range spans no days (guards the division, never
/// fails).
pub fn average_sessions_per_day<Tz: TimeZone>(
    sessions: &[Session],
    range: &DateRange<Tz>,
) -> f64 {
    let days = range.number_of_days();
    if days <= 0 {
        return 0.0;
    }

    let count = total_sessions(sessions, range);
    count as f64 / days as f64
}

/// Number of completed sessions whose end time falls inside `range`.
pub fn total_sessions<Tz: TimeZone>(sessions: &[Session], range: &DateRange<Tz>) -> usize {
    sessions
        .iter()
        .filter(|s| match s.end_time {
            Some(end) => range.contains(&end),
            None => false,
        })
        .count()
}

/// Mean duration in seconds over completed sessions; 0 when there are none.
pub fn average_duration(sessions: &[Session]) -> f64 {
    let durations: Vec<f64> = completed(sessions)
        .filter_map(|s| s.duration_secs())
        .collect();
    if durations.is_empty() {
        return 0.0;
    }
    durations.iter().sum::<f64>() / durations.len() as f64
}

/// Tally of symptom occurrences across completed sessions, sorted by count
/// descending and truncated to `limit`.
///
/// Ties keep first-encountered order: the tally preserves the order symptoms
/// were first seen in, and the sort is stable.
pub fn most_common_symptoms(sessions: &[Session], limit: usize) -> Vec<(Symptom, usize)> {
    let mut tallies: Vec<(Symptom, usize)> = Vec::new();

    for session in completed(sessions) {
        for &symptom in session.symptoms() {
            match tallies.iter_mut().find(|(s, _)| *s == symptom) {
                Some((_, count)) => *count += 1,
                None => tallies.push((symptom, 1)),
            }
        }
    }

    tallies.sort_by(|a, b| b.1.cmp(&a.1));
    tallies.truncate(limit);
    tallies
}

/// Count a single symptom across completed sessions (sessions, not
/// occurrences: each session contributes at most once per symptom).
pub fn symptom_count(sessions: &[Session], symptom: Symptom) -> usize {
    completed(sessions)
        .filter(|s| s.has_symptom(symptom))
        .count()
}

/// Per-symptom occurrence count divided by completed-session count.
///
/// Empty when there are no completed sessions (the division is guarded, not
/// performed).
pub fn symptom_frequency(sessions: &[Session]) -> Vec<(Symptom, f64)> {
    let total = completed(sessions).count();
    if total == 0 {
        return Vec::new();
    }

    most_common_symptoms(sessions, usize::MAX)
        .into_iter()
        .map(|(symptom, count)| (symptom, count as f64 / total as f64))
        .collect()
}

/// Percentage of completed sessions with a negative outcome, in [0, 100];
/// 0 when there are no completed sessions.
pub fn negative_session_percentage(sessions: &[Session]) -> f64 {
    let total = completed(sessions).count();
    if total == 0 {
        return 0.0;
    }

    let negative = completed(sessions)
        .filter(|s| s.outcome.is_negative())
        .count();
    negative as f64 / total as f64 * 100.0
}

/// Completed-session counts per time-of-day cluster, indexed by
/// [`TimeCluster::ALL`] order. Hours are taken from each session's start
/// time in the injected zone.
pub fn time_of_day_clustering<Tz: TimeZone>(sessions: &[Session], tz: &Tz) -> [usize; 4] {
    let mut clusters = [0usize; 4];
    for session in completed(sessions) {
        let local = session.start_time.with_timezone(tz);
        let cluster = TimeCluster::from_hour(time::hour_of_day(&local));
        clusters[cluster.index()] += 1;
    }
    clusters
}

/// Number of completed sessions that started at night (22:00-06:00 in the
/// injected zone).
pub fn nighttime_frequency<Tz: TimeZone>(sessions: &[Session], tz: &Tz) -> usize {
    completed(sessions)
        .filter(|s| {
            let hour = time::hour_of_day(&s.start_time.with_timezone(tz));
            hour >= 22 || hour < 6
        })
        .count()
}

/// Completed sessions whose end time falls in `[start, end]`.
pub fn sessions_ending_between<'a>(
    sessions: &'a [Session],
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> Vec<&'a Session> {
    let start = *start;
    let end = *end;
    sessions
        .iter()
        .filter(|s| match s.end_time {
            Some(t) => t >= start && t <= end,
            None => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Outcome;
    use chrono::TimeZone as _;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn completed_session(start: &str, secs: i64, outcome: Outcome) -> Session {
        let start = ts(start);
        let mut session = Session::start(start);
        session.complete(start + chrono::Duration::seconds(secs), outcome, None);
        session
    }

    fn negative(symptoms: &[Symptom]) -> Outcome {
        Outcome::negative(symptoms.iter().copied())
    }

    #[test]
    fn test_active_sessions_are_invisible() {
        let sessions = vec![
            Session::start(ts("2024-05-10T08:00:00Z")),
            completed_session("2024-05-10T09:00:00Z", 20, Outcome::Positive),
        ];

        let range = DateRange::Day(ts("2024-05-10T12:00:00Z"));
        assert_eq!(total_sessions(&sessions, &range), 1);
        assert_eq!(average_duration(&sessions), 20.0);
        assert_eq!(nighttime_frequency(&sessions, &Utc), 0);
    }

    #[test]
    fn test_average_per_day_guards_empty_range() {
        let sessions = vec![completed_session(
            "2024-05-10T09:00:00Z",
            20,
            Outcome::Positive,
        )];
        let inverted = DateRange::Custom {
            start: ts("2024-05-11T00:00:00Z"),
            end: ts("2024-05-10T00:00:00Z"),
        };
        assert_eq!(average_sessions_per_day(&sessions, &inverted), 0.0);

        let day = DateRange::Day(ts("2024-05-10T12:00:00Z"));
        assert_eq!(average_sessions_per_day(&sessions, &day), 1.0);
    }

    #[test]
    fn test_most_common_symptoms_breaks_ties_by_first_seen() {
        // Urgency is seen before Pain; both end up with 2 occurrences
        let sessions = vec![
            completed_session(
                "2024-05-10T08:00:00Z",
                10,
                negative(&[Symptom::Urgency, Symptom::Burning]),
            ),
            completed_session("2024-05-10T10:00:00Z", 10, negative(&[Symptom::Pain])),
            completed_session(
                "2024-05-10T12:00:00Z",
                10,
                negative(&[Symptom::Pain, Symptom::Urgency]),
            ),
        ];

        let top = most_common_symptoms(&sessions, 3);
        assert_eq!(
            top,
            vec![(Symptom::Urgency, 2), (Symptom::Pain, 2), (Symptom::Burning, 1)]
        );

        // Rerunning yields the identical order
        assert_eq!(most_common_symptoms(&sessions, 3), top);
    }

    #[test]
    fn test_symptom_frequency_guards_empty_input() {
        assert!(symptom_frequency(&[]).is_empty());

        let sessions = vec![
            completed_session("2024-05-10T08:00:00Z", 10, negative(&[Symptom::Burning])),
            completed_session("2024-05-10T10:00:00Z", 10, Outcome::Positive),
        ];
        let freq = symptom_frequency(&sessions);
        assert_eq!(freq, vec![(Symptom::Burning, 0.5)]);
    }

    #[test]
    fn test_negative_percentage_bounds() {
        assert_eq!(negative_session_percentage(&[]), 0.0);

        let sessions = vec![
            completed_session("2024-05-10T08:00:00Z", 10, negative(&[Symptom::Pain])),
            completed_session("2024-05-10T10:00:00Z", 10, Outcome::Positive),
            completed_session("2024-05-10T12:00:00Z", 10, Outcome::Positive),
            Session::start(ts("2024-05-10T13:00:00Z")),
        ];
        let pct = negative_session_percentage(&sessions);
        assert!((0.0..=100.0).contains(&pct));
        assert!((pct - 33.333).abs() < 0.01);
    }

    #[test]
    fn test_clustering_covers_all_four_buckets() {
        let sessions: Vec<Session> = [1u32, 7, 13, 19]
            .iter()
            .map(|hour| {
                let start = Utc
                    .with_ymd_and_hms(2024, 5, 10, *hour, 0, 0)
                    .unwrap();
                let mut s = Session::start(start);
                s.complete(
                    start + chrono::Duration::seconds(30),
                    Outcome::Positive,
                    None,
                );
                s
            })
            .collect();

        assert_eq!(time_of_day_clustering(&sessions, &Utc), [1, 1, 1, 1]);
    }

    #[test]
    fn test_nighttime_window_boundaries() {
        let hours_in = [22u32, 23, 0, 5];
        let hours_out = [6u32, 12, 21];

        let mut sessions = Vec::new();
        for hour in hours_in.iter().chain(hours_out.iter()) {
            let start = Utc.with_ymd_and_hms(2024, 5, 10, *hour, 30, 0).unwrap();
            let mut s = Session::start(start);
            s.complete(
                start + chrono::Duration::seconds(30),
                Outcome::Positive,
                None,
            );
            sessions.push(s);
        }

        assert_eq!(nighttime_frequency(&sessions, &Utc), hours_in.len());
    }
}
