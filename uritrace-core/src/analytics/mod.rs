//! Analytics for uritrace
//!
//! Pure, deterministic aggregation over a session snapshot:
//! - Basic statistics and categorical breakdowns ([`stats`])
//! - Closed date ranges with calendar-unit containment ([`range`])
//! - Period-over-period trend detection ([`trend`])
//! - The trailing-7-day dashboard bundle ([`weekly`])
//!
//! Every function takes the session collection and an explicit "now" (with
//! its time zone) as arguments; nothing here reads a clock or mutates
//! shared state, so results are reproducible from the same snapshot.

pub mod range;
pub mod stats;
pub mod trend;
pub mod weekly;

pub use range::DateRange;
pub use stats::{
    average_duration, average_sessions_per_day, most_common_symptoms, negative_session_percentage,
    nighttime_frequency, symptom_count, symptom_frequency, time_of_day_clustering, total_sessions,
    TimeCluster,
};
pub use trend::{detect_frequency_trend, detect_symptom_trend, detect_trend, Trend, TrendPeriod};
pub use weekly::{generate_weekly_insights, WeeklyInsights};
