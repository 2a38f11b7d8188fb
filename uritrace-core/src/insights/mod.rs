//! Health insight rule engine.
//!
//! Evaluates a fixed battery of threshold and pattern rules against the
//! completed-session history and emits prioritized, human-readable insights.
//! The engine is a flat, ordered sequence of independent rules: evaluation
//! order never changes a rule's outcome, only the tie-break position of
//! equal-priority insights in the final sort.
//!
//! Thresholds and wording are load-bearing: display surfaces and exported
//! reports diff against this exact output.

pub mod summary;

use chrono::{DateTime, TimeZone, Utc};

use crate::analytics::stats::{self, TimeCluster};
use crate::analytics::trend::{self, Trend, TrendPeriod};
use crate::time;
use crate::types::{Session, Symptom};

pub use summary::generate_doctor_summary;

// ============================================
// Insight types
// ============================================

/// Urgency of an insight. Ordering follows the numeric priority value
/// (critical=4 down to low=1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Numeric value used for display grouping.
    pub fn value(&self) -> u8 {
        match self {
            Priority::Critical => 4,
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// Which aspect of the history an insight speaks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Frequency,
    Symptoms,
    Patterns,
    Hydration,
    Trends,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Frequency => "Frequency",
            Category::Symptoms => "Symptoms",
            Category::Patterns => "Patterns",
            Category::Hydration => "Hydration",
            Category::Trends => "Trends",
        }
    }
}

/// A rule-generated observation with a recommendation.
#[derive(Debug, Clone)]
pub struct HealthInsight {
    pub title: String,
    pub description: String,
    pub recommendation: String,
    pub priority: Priority,
    pub category: Category,
}

// ============================================
// Engine
// ============================================

/// Run every rule against the full session history.
///
/// The returned list is sorted by descending priority; equal priorities keep
/// rule-evaluation order (the sort is stable). Consumers group by priority
/// for display but must not re-sort.
pub fn generate_insights<Tz: TimeZone>(
    sessions: &[Session],
    now: &DateTime<Tz>,
) -> Vec<HealthInsight> {
    let mut insights = Vec::new();

    insights.extend(analyze_frequency(sessions, now));
    insights.extend(analyze_symptom_patterns(sessions, now));
    insights.extend(analyze_nighttime_frequency(sessions, now));
    insights.extend(analyze_hydration(sessions, now));
    insights.extend(analyze_trends(sessions, now));

    insights.sort_by(|a, b| b.priority.cmp(&a.priority));

    tracing::debug!(
        total = insights.len(),
        critical = insights
            .iter()
            .filter(|i| i.priority == Priority::Critical)
            .count(),
        "Generated health insights"
    );

    insights
}

fn trailing_days<Tz: TimeZone>(
    sessions: &[Session],
    now: &DateTime<Tz>,
    days: u64,
) -> Vec<Session> {
    let start = time::days_before(now, days).with_timezone(&Utc);
    let now = now.with_timezone(&Utc);
    stats::sessions_ending_between(sessions, &start, &now)
        .into_iter()
        .cloned()
        .collect()
}

// ============================================
// Frequency (trailing 7 days)
// ============================================

/// Normal range is 6-8 sessions per day. Averages strictly inside (4, 6) or
/// (8, 10) intentionally produce no insight; that gap is observed behavior
/// and is pinned by tests.
fn analyze_frequency<Tz: TimeZone>(sessions: &[Session], now: &DateTime<Tz>) -> Vec<HealthInsight> {
    let mut insights = Vec::new();
    let week_sessions = trailing_days(sessions, now, 7);
    let avg_per_day = week_sessions.len() as f64 / 7.0;

    if avg_per_day > 10.0 {
        insights.push(HealthInsight {
            title: "High Urination Frequency".to_string(),
            description: format!(
                "You're averaging {:.1} sessions per day, which is higher than normal (6-8/day). \
                 This could indicate overhydration, diabetes, or urinary tract infection.",
                avg_per_day
            ),
            recommendation: "Consider tracking your fluid intake and consult with a healthcare \
                             provider if this persists."
                .to_string(),
            priority: Priority::High,
            category: Category::Frequency,
        });
    } else if avg_per_day < 4.0 {
        insights.push(HealthInsight {
            title: "Low Urination Frequency".to_string(),
            description: format!(
                "You're averaging {:.1} sessions per day, which is lower than normal (6-8/day). \
                 This might suggest dehydration.",
                avg_per_day
            ),
            recommendation: "Increase your fluid intake to 8-10 glasses of water per day and \
                             monitor for improvement."
                .to_string(),
            priority: Priority::Medium,
            category: Category::Frequency,
        });
    } else if (6.0..=8.0).contains(&avg_per_day) {
        insights.push(HealthInsight {
            title: "Healthy Frequency".to_string(),
            description: format!(
                "Your urination frequency of {:.1} sessions per day is within the normal range.",
                avg_per_day
            ),
            recommendation: "Keep up your current hydration habits!".to_string(),
            priority: Priority::Low,
            category: Category::Frequency,
        });
    }

    insights
}

// ============================================
// Symptom patterns (trailing 14 days)
// ============================================

fn analyze_symptom_patterns<Tz: TimeZone>(
    sessions: &[Session],
    now: &DateTime<Tz>,
) -> Vec<HealthInsight> {
    let mut insights = Vec::new();
    let recent = trailing_days(sessions, now, 14);
    let total = recent.len();

    let percentage_of = |count: usize| -> f64 {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        }
    };

    // Any blood at all requires immediate attention
    let blood_count = stats::symptom_count(&recent, Symptom::Blood);
    if blood_count > 0 {
        insights.push(HealthInsight {
            title: "⚠️ Blood Detected".to_string(),
            description: format!(
                "You've reported blood in your urine {} time(s) in the past two weeks. \
                 This requires immediate medical attention.",
                blood_count
            ),
            recommendation: "Seek medical evaluation immediately. Blood in urine (hematuria) can \
                             indicate infection, kidney stones, or other serious conditions."
                .to_string(),
            priority: Priority::Critical,
            category: Category::Symptoms,
        });
    }

    let pain_count = stats::symptom_count(&recent, Symptom::Pain);
    if pain_count >= 3 {
        insights.push(HealthInsight {
            title: "Recurring Pain".to_string(),
            description: format!(
                "You've experienced pain during {} sessions in the past two weeks.",
                pain_count
            ),
            recommendation: "Persistent pain could indicate a urinary tract infection, kidney \
                             stones, or prostate issues. Schedule an appointment with your \
                             healthcare provider."
                .to_string(),
            priority: Priority::High,
            category: Category::Symptoms,
        });
    }

    let incomplete_count = stats::symptom_count(&recent, Symptom::Incomplete);
    if incomplete_count >= 5 {
        insights.push(HealthInsight {
            title: "Incomplete Bladder Emptying".to_string(),
            description: format!(
                "You've reported not feeling fully empty in {:.0}% of your sessions.",
                percentage_of(incomplete_count)
            ),
            recommendation: "This could indicate benign prostatic hyperplasia (BPH) or bladder \
                             dysfunction. Consider pelvic floor exercises and consult a urologist."
                .to_string(),
            priority: Priority::Medium,
            category: Category::Symptoms,
        });
    }

    let weak_stream_count = stats::symptom_count(&recent, Symptom::WeakStream);
    if weak_stream_count >= 5 {
        insights.push(HealthInsight {
            title: "Weak Urine Stream".to_string(),
            description: format!(
                "You've experienced weak stream in {} sessions recently.",
                weak_stream_count
            ),
            recommendation: "This is common with age or prostate enlargement. Try double voiding \
                             (urinate, wait a moment, then try again) and consider pelvic floor \
                             strengthening."
                .to_string(),
            priority: Priority::Medium,
            category: Category::Symptoms,
        });
    }

    let burning_count = stats::symptom_count(&recent, Symptom::Burning);
    if burning_count >= 3 {
        insights.push(HealthInsight {
            title: "Burning Sensation".to_string(),
            description: format!(
                "You've experienced burning while urinating in {} recent sessions.",
                burning_count
            ),
            recommendation: "Burning sensation often indicates urinary tract infection (UTI) or \
                             inflammation. Increase water intake and consult a healthcare \
                             provider if symptoms persist."
                .to_string(),
            priority: Priority::High,
            category: Category::Symptoms,
        });
    }

    let hesitancy_count = stats::symptom_count(&recent, Symptom::Hesitancy);
    if hesitancy_count >= 5 {
        insights.push(HealthInsight {
            title: "Difficulty Initiating Flow".to_string(),
            description: format!(
                "You've had trouble starting urination in {} sessions.",
                hesitancy_count
            ),
            recommendation: "Hesitancy can be related to prostate issues or pelvic floor tension. \
                             Relaxation techniques and medical evaluation may help."
                .to_string(),
            priority: Priority::Medium,
            category: Category::Symptoms,
        });
    }

    let urgency_count = stats::symptom_count(&recent, Symptom::Urgency);
    if urgency_count >= 7 {
        insights.push(HealthInsight {
            title: "Frequent Urgent Urges".to_string(),
            description: format!(
                "You've experienced urgent needs to urinate in {:.0}% of sessions.",
                percentage_of(urgency_count)
            ),
            recommendation: "Urgency can indicate overactive bladder. Bladder training \
                             exercises, reducing caffeine/alcohol, and medical consultation may \
                             help."
                .to_string(),
            priority: Priority::High,
            category: Category::Symptoms,
        });
    }

    insights
}

// ============================================
// Nighttime (trailing 7 days)
// ============================================

fn analyze_nighttime_frequency<Tz: TimeZone>(
    sessions: &[Session],
    now: &DateTime<Tz>,
) -> Vec<HealthInsight> {
    let mut insights = Vec::new();
    let week_sessions = trailing_days(sessions, now, 7);
    let tz = now.timezone();

    let nighttime_count = stats::nighttime_frequency(&week_sessions, &tz);
    let avg_per_night = nighttime_count as f64 / 7.0;

    if avg_per_night >= 2.0 {
        insights.push(HealthInsight {
            title: "Nocturia (Nighttime Urination)".to_string(),
            description: format!(
                "You're waking up an average of {:.1} times per night to urinate.",
                avg_per_night
            ),
            recommendation: "Limit fluids 2-3 hours before bedtime, avoid caffeine and alcohol \
                             in the evening, and elevate your legs in the afternoon. If \
                             persistent, consult your doctor about possible sleep apnea or heart \
                             conditions."
                .to_string(),
            priority: Priority::Medium,
            category: Category::Patterns,
        });
    }

    insights
}

// ============================================
// Hydration proxies (trailing 7 days)
// ============================================

fn analyze_hydration<Tz: TimeZone>(sessions: &[Session], now: &DateTime<Tz>) -> Vec<HealthInsight> {
    let mut insights = Vec::new();
    let week_sessions = trailing_days(sessions, now, 7);
    let tz = now.timezone();

    let avg_duration = stats::average_duration(&week_sessions);
    if avg_duration < 5.0 {
        insights.push(HealthInsight {
            title: "Short Duration Sessions".to_string(),
            description: format!(
                "Your sessions are averaging only {} seconds, which might indicate inadequate \
                 hydration or bladder irritation.",
                avg_duration as i64
            ),
            recommendation: "Ensure you're drinking enough water throughout the day. Aim for \
                             clear to pale yellow urine color."
                .to_string(),
            priority: Priority::Low,
            category: Category::Hydration,
        });
    }

    // A single cluster holding the majority of the week suggests uneven intake
    let clusters = stats::time_of_day_clustering(&week_sessions, &tz);
    let max_cluster = TimeCluster::ALL
        .iter()
        .map(|c| (*c, clusters[c.index()]))
        .max_by_key(|(_, count)| *count);
    if let Some((cluster, count)) = max_cluster {
        if !week_sessions.is_empty() && count as f64 / week_sessions.len() as f64 > 0.5 {
            insights.push(HealthInsight {
                title: "Uneven Hydration Pattern".to_string(),
                description: format!(
                    "Most of your sessions occur during {}.",
                    cluster.label().to_lowercase()
                ),
                recommendation: "Try to distribute your fluid intake more evenly throughout the \
                                 day for better bladder health."
                    .to_string(),
                priority: Priority::Medium,
                category: Category::Patterns,
            });
        }
    }

    insights
}

// ============================================
// Trends (month over month)
// ============================================

fn analyze_trends<Tz: TimeZone>(sessions: &[Session], now: &DateTime<Tz>) -> Vec<HealthInsight> {
    let mut insights = Vec::new();

    match trend::detect_frequency_trend(sessions, now, TrendPeriod::Month) {
        Trend::Increasing { percentage } if percentage > 30.0 => {
            insights.push(HealthInsight {
                title: "Increasing Frequency Trend".to_string(),
                description: format!(
                    "Your urination frequency has increased by {:.0}% over the past month.",
                    percentage
                ),
                recommendation: "This significant increase warrants medical evaluation. Track \
                                 any new medications, dietary changes, or other symptoms to \
                                 discuss with your doctor."
                    .to_string(),
                priority: Priority::High,
                category: Category::Trends,
            });
        }
        Trend::Decreasing { percentage } if percentage > 30.0 => {
            insights.push(HealthInsight {
                title: "Decreasing Frequency Trend".to_string(),
                description: format!(
                    "Your urination frequency has decreased by {:.0}% over the past month.",
                    percentage
                ),
                recommendation: "Ensure you're maintaining adequate hydration. If accompanied by \
                                 dark urine or other symptoms, consult a healthcare provider."
                    .to_string(),
                priority: Priority::Medium,
                category: Category::Trends,
            });
        }
        _ => {}
    }

    for symptom in Symptom::ALL {
        if let Trend::Increasing { percentage } =
            trend::detect_symptom_trend(sessions, symptom, now, TrendPeriod::Month)
        {
            if percentage > 50.0 {
                insights.push(HealthInsight {
                    title: format!("Worsening {}", symptom.label()),
                    description: format!(
                        "Your {} symptoms have increased by {:.0}% this month.",
                        symptom.label().to_lowercase(),
                        percentage
                    ),
                    recommendation: "Schedule an appointment with your healthcare provider to \
                                     evaluate this worsening symptom."
                        .to_string(),
                    priority: Priority::High,
                    category: Category::Symptoms,
                });
            }
        }
    }

    insights
}
