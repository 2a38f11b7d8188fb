//! Integration tests for the uritrace decode and analytics pipeline
//!
//! These tests feed wire records through the full flow: JSON decode,
//! weekly aggregation, insight generation, and the doctor summary.

use chrono::{DateTime, FixedOffset, Utc};
use uritrace_core::analytics::{generate_weekly_insights, TimeCluster, TrendPeriod};
use uritrace_core::insights::summary::generate_doctor_summary;
use uritrace_core::insights::{generate_insights, Priority};
use uritrace_core::store::{MemoryRepository, NullObserver, SessionTracker};
use uritrace_core::types::{decode_records, Outcome, Session, SessionRecord, Symptom};

fn now() -> DateTime<Utc> {
    "2024-05-15T12:00:00Z".parse().unwrap()
}

/// Wire records as the cloud store returns them: one with legacy symptom
/// labels, one malformed (no start time), one still active.
fn fixture_records() -> Vec<SessionRecord> {
    let json = r#"[
        {
            "id": "11111111-1111-1111-1111-111111111111",
            "start_time": "2024-05-14T23:00:00Z",
            "end_time": "2024-05-14T23:30:00Z",
            "duration": 1800.0,
            "feeling": "Negative",
            "symptoms": ["Blood", "Pain"]
        },
        {
            "id": "22222222-2222-2222-2222-222222222222",
            "start_time": "2024-05-13T08:00:00Z",
            "end_time": "2024-05-13T08:10:00Z",
            "feeling": "Positive",
            "symptoms": []
        },
        {
            "id": "33333333-3333-3333-3333-333333333333",
            "start_time": "2024-05-12T14:00:00Z",
            "end_time": "2024-05-12T14:05:00Z",
            "feeling": "Negative",
            "symptoms": ["Not fully empty"],
            "notes": "after long drive"
        },
        {
            "id": "44444444-4444-4444-4444-444444444444",
            "feeling": "Positive"
        },
        {
            "id": "55555555-5555-5555-5555-555555555555",
            "start_time": "2024-05-15T11:58:00Z",
            "feeling": "Positive"
        }
    ]"#;
    serde_json::from_str(json).unwrap()
}

fn fixture_sessions() -> Vec<Session> {
    decode_records(&fixture_records()).expect("decode should succeed")
}

// ============================================
// Decode Tests
// ============================================

#[test]
fn test_decode_skips_malformed_keeps_active() {
    let sessions = fixture_sessions();

    // Record without a start time is excluded; the active one survives
    assert_eq!(sessions.len(), 4);
    assert!(sessions[3].is_active());

    // Legacy labels normalize to the current vocabulary
    assert_eq!(sessions[0].symptoms(), &[Symptom::Blood, Symptom::Pain]);
    assert_eq!(sessions[2].symptoms(), &[Symptom::Incomplete]);
    assert_eq!(sessions[2].notes.as_deref(), Some("after long drive"));
}

#[test]
fn test_decode_fails_on_unknown_label() {
    let mut records = fixture_records();
    records[0].symptoms = Some(vec!["Glowing".to_string()]);

    assert!(decode_records(&records).is_err());
}

#[test]
fn test_encode_canonicalizes_legacy_labels() {
    let sessions = fixture_sessions();
    let record = SessionRecord::encode(&sessions[0]);

    assert_eq!(
        record.symptoms.as_deref(),
        Some(&["Blood present".to_string(), "Pain/Discomfort".to_string()][..])
    );
    assert_eq!(record.duration, Some(1800.0));
    assert_eq!(record.feeling.as_deref(), Some("Negative"));
}

// ============================================
// Weekly Aggregation Tests
// ============================================

#[test]
fn test_weekly_insights_over_fixture() {
    let sessions = fixture_sessions();
    let weekly = generate_weekly_insights(&sessions, &now());

    // The active session never counts
    assert_eq!(weekly.total_sessions, 3);
    assert!((weekly.average_per_day - 3.0 / 7.0).abs() < 1e-9);

    // One symptom each; order follows first appearance in the history
    assert_eq!(
        weekly.most_common_symptoms,
        vec![
            (Symptom::Blood, 1),
            (Symptom::Pain, 1),
            (Symptom::Incomplete, 1)
        ]
    );

    // Morning, Afternoon, and Evening each saw one session
    assert_eq!(weekly.most_active_cluster, TimeCluster::Morning);
    assert_eq!(weekly.nighttime_sessions, 1);
    assert!((weekly.negative_percentage - 200.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_weekly_clustering_follows_reference_timezone() {
    let sessions = fixture_sessions();

    // Shift the calendar two hours east: the 23:00 UTC session starts at
    // 01:00 local, moving it into the early-morning cluster
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let local_now = now().with_timezone(&offset);
    let weekly = generate_weekly_insights(&sessions, &local_now);

    assert_eq!(weekly.most_active_cluster, TimeCluster::EarlyMorning);
}

// ============================================
// Insight Engine Tests
// ============================================

#[test]
fn test_blood_insight_leads_the_report() {
    let sessions = fixture_sessions();
    let insights = generate_insights(&sessions, &now());

    assert!(!insights.is_empty());
    assert_eq!(insights[0].title, "⚠️ Blood Detected");
    assert_eq!(insights[0].priority, Priority::Critical);

    // Priorities never increase down the list
    for pair in insights.windows(2) {
        assert!(pair[0].priority >= pair[1].priority);
    }
}

// ============================================
// Doctor Summary Tests
// ============================================

#[test]
fn test_doctor_summary_over_fixture() {
    let sessions = fixture_sessions();
    let summary = generate_doctor_summary(&sessions, &now(), TrendPeriod::Week);

    assert!(summary.starts_with(
        "URINARY HEALTH SUMMARY\nPeriod: May 8, 2024 - May 15, 2024"
    ));
    assert!(summary.contains("• Total sessions: 3"));
    assert!(summary.contains("• Nighttime sessions: 1"));
    assert!(summary.contains("• Average duration: 900 seconds"));
    assert!(summary.contains("• Sessions with issues: 67%"));
    assert!(summary.contains("  - Blood present: 1 times (33%)"));
    assert!(summary.contains("• Frequency trend: ↑ 300.0%"));
}

// ============================================
// Tracker Round Trip
// ============================================

#[test]
fn test_tracked_sessions_flow_into_analytics() {
    let mut tracker = SessionTracker::new(MemoryRepository::new(), NullObserver);
    let start: DateTime<Utc> = "2024-05-15T09:00:00Z".parse().unwrap();

    tracker.start_session(start).unwrap();
    tracker
        .complete_session(
            start + chrono::Duration::seconds(45),
            Outcome::negative([Symptom::Urgency]),
            Some("integration".to_string()),
        )
        .unwrap();

    let sessions = tracker.sessions().unwrap();
    let weekly = generate_weekly_insights(&sessions, &now());

    assert_eq!(weekly.total_sessions, 1);
    assert_eq!(weekly.most_common_symptoms, vec![(Symptom::Urgency, 1)]);
    assert_eq!(weekly.negative_percentage, 100.0);

    // And back out through the wire format unchanged
    let records: Vec<SessionRecord> = sessions.iter().map(SessionRecord::encode).collect();
    let decoded = decode_records(&records).unwrap();
    assert_eq!(decoded, sessions);
}
