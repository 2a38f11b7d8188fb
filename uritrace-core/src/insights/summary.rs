//! Clinician-readable plain-text summary.
//!
//! The layout and numeric formatting are fixed: export consumers and tests
//! diff the output byte-for-byte. Percentages render with 0 decimal places,
//! averages with 1, and durations truncate to whole seconds.

use chrono::{DateTime, TimeZone, Utc};

use crate::analytics::stats;
use crate::analytics::trend::{detect_frequency_trend, TrendPeriod};
use crate::types::Session;

/// Render the session history into a fixed-format report for the given
/// period ending at `now`.
///
/// Statistics cover the sessions completed inside the period; the trend
/// line compares against the preceding period using the full history.
pub fn generate_doctor_summary<Tz: TimeZone>(
    sessions: &[Session],
    now: &DateTime<Tz>,
    period: TrendPeriod,
) -> String {
    let tz = now.timezone();
    let start = period.start_date(now);
    let start_utc = start.with_timezone(&Utc);
    let now_utc = now.with_timezone(&Utc);

    let relevant: Vec<Session> = stats::sessions_ending_between(sessions, &start_utc, &now_utc)
        .into_iter()
        .cloned()
        .collect();

    let avg_per_day = relevant.len() as f64 / period.number_of_days() as f64;
    let negative_percentage = stats::negative_session_percentage(&relevant);
    let symptoms = stats::most_common_symptoms(&relevant, 3);
    let nighttime = stats::nighttime_frequency(&relevant, &tz);
    let avg_duration = stats::average_duration(&relevant);

    let mut summary = format!(
        "URINARY HEALTH SUMMARY\n\
         Period: {} - {}\n\
         \n\
         FREQUENCY:\n\
         • Average sessions per day: {:.1}\n\
         • Total sessions: {}\n\
         • Nighttime sessions: {}\n\
         • Average duration: {} seconds\n\
         \n\
         SYMPTOMS:\n\
         • Sessions with issues: {:.0}%",
        format_date(&start),
        format_date(now),
        avg_per_day,
        relevant.len(),
        nighttime,
        avg_duration as i64,
        negative_percentage,
    );

    if !symptoms.is_empty() {
        summary.push_str("\n• Most common symptoms:");
        for (symptom, count) in &symptoms {
            let percentage = *count as f64 / relevant.len() as f64 * 100.0;
            summary.push_str(&format!(
                "\n  - {}: {} times ({:.0}%)",
                symptom.label(),
                count,
                percentage
            ));
        }
    }

    summary.push_str("\n\nTRENDS:");
    let trend = detect_frequency_trend(sessions, now, period);
    summary.push_str(&format!("\n• Frequency trend: {}", trend.description()));

    summary
}

/// Abbreviated date, e.g. "Oct 27, 2025", in the timestamp's own zone.
fn format_date<Tz: TimeZone>(t: &DateTime<Tz>) -> String {
    t.date_naive().format("%b %-d, %Y").to_string()
}
