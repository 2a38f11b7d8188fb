//! Weekly insights: a dashboard-style bundle of the trailing 7 days.

use chrono::{DateTime, TimeZone};

use crate::time;
use crate::types::{Session, Symptom};

use super::stats::{self, TimeCluster};

/// Summary of the trailing 7-day window ending at the injected "now".
///
/// Pure composition of the statistics layer; no new algorithm.
#[derive(Debug, Clone)]
pub struct WeeklyInsights {
    /// Completed sessions per day over the window
    pub average_per_day: f64,
    /// Completed sessions in the window
    pub total_sessions: usize,
    /// Top 3 symptoms with counts
    pub most_common_symptoms: Vec<(Symptom, usize)>,
    /// Cluster with the highest count; ties break toward the earliest
    /// cluster in enumeration order, and an empty week reports Morning
    pub most_active_cluster: TimeCluster,
    /// Sessions starting between 22:00 and 06:00
    pub nighttime_sessions: usize,
    /// Percentage of sessions with a negative outcome
    pub negative_percentage: f64,
}

/// Generate insights for the 7 calendar days ending at `now`.
pub fn generate_weekly_insights<Tz: TimeZone>(
    sessions: &[Session],
    now: &DateTime<Tz>,
) -> WeeklyInsights {
    let tz = now.timezone();
    let week_start = time::days_before(now, 7).with_timezone(&chrono::Utc);
    let now_utc = now.with_timezone(&chrono::Utc);

    let week_sessions: Vec<Session> = stats::sessions_ending_between(sessions, &week_start, &now_utc)
        .into_iter()
        .cloned()
        .collect();

    let clusters = stats::time_of_day_clustering(&week_sessions, &tz);
    let mut most_active = TimeCluster::Morning;
    let mut best = 0usize;
    for cluster in TimeCluster::ALL {
        let count = clusters[cluster.index()];
        // Strict comparison keeps the earliest cluster among ties
        if count > best {
            best = count;
            most_active = cluster;
        }
    }

    WeeklyInsights {
        average_per_day: week_sessions.len() as f64 / 7.0,
        total_sessions: week_sessions.len(),
        most_common_symptoms: stats::most_common_symptoms(&week_sessions, 3),
        most_active_cluster: most_active,
        nighttime_sessions: stats::nighttime_frequency(&week_sessions, &tz),
        negative_percentage: stats::negative_session_percentage(&week_sessions),
    }
}
