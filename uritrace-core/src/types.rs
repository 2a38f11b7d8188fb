//! Core domain types for uritrace
//!
//! These types represent the canonical data model: one tracked session per
//! start-to-stop episode, with qualitative outcome data attached at
//! completion.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Session** | One tracked start-to-stop episode with optional outcome metadata |
//! | **Active session** | A session whose `end_time` is not yet set |
//! | **Completed session** | A session whose `end_time` is set; the only kind analytics see |
//! | **Outcome** | How the session felt: positive, or negative with symptoms |
//! | **Symptom** | A tag from the current vocabulary; legacy labels normalize on decode |
//!
//! ## Lifecycle
//!
//! A session is created active, mutated exactly once at completion
//! (outcome/notes attached, `end_time` fixed), and may be deleted at any
//! time. Completion is a one-way transition: re-completing an already
//! completed session is a no-op reported as a conflict. Cancelled sessions
//! never become completed and never appear in analytics.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

// ============================================
// Session identifier
// ============================================

/// Opaque unique identifier for a session, assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================
// Symptoms
// ============================================

/// Symptom tags in the current (v1.2) vocabulary.
///
/// Historical data may carry labels from older vocabularies; those are
/// normalized through [`Symptom::from_label`] at the decode boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symptom {
    Pain,
    Burning,
    Hesitancy,
    WeakStream,
    Incomplete,
    Urgency,
    Blood,
}

/// Legacy symptom labels from earlier vocabulary versions, mapped to the
/// current tag set. Consulted once at the decode boundary; labels outside
/// this table and the current vocabulary are a data error.
const LEGACY_LABELS: &[(&str, Symptom)] = &[
    // v1.0
    ("Not fully empty", Symptom::Incomplete),
    ("Dripping", Symptom::WeakStream),
    ("Pain", Symptom::Pain),
    ("Blood", Symptom::Blood),
    // v1.1 (all other v1.1 labels are unchanged in v1.2)
    ("Weak stream/Dripping", Symptom::WeakStream),
];

impl Symptom {
    /// All symptoms, in display/enumeration order.
    pub const ALL: [Symptom; 7] = [
        Symptom::Pain,
        Symptom::Burning,
        Symptom::Hesitancy,
        Symptom::WeakStream,
        Symptom::Incomplete,
        Symptom::Urgency,
        Symptom::Blood,
    ];

    /// Canonical label in the current vocabulary.
    pub fn label(&self) -> &'static str {
        match self {
            Symptom::Pain => "Pain/Discomfort",
            Symptom::Burning => "Burning sensation",
            Symptom::Hesitancy => "Difficulty starting",
            Symptom::WeakStream => "Weak stream",
            Symptom::Incomplete => "Incomplete emptying",
            Symptom::Urgency => "Frequent urges",
            Symptom::Blood => "Blood present",
        }
    }

    /// One-line description for display surfaces.
    pub fn description(&self) -> &'static str {
        match self {
            Symptom::Pain => "Any pain or discomfort during urination",
            Symptom::Burning => "Burning or stinging sensation while urinating",
            Symptom::Hesitancy => "Trouble initiating urine flow",
            Symptom::WeakStream => "Weak or slow urine stream",
            Symptom::Incomplete => "Feeling that bladder isn't fully empty",
            Symptom::Urgency => "Sudden, urgent need to urinate",
            Symptom::Blood => "Visible blood in urine (hematuria)",
        }
    }

    /// Resolve a stored label to a symptom, normalizing legacy labels.
    ///
    /// Returns [`Error::UnknownSymptom`] for labels outside the current
    /// vocabulary and the legacy table.
    pub fn from_label(label: &str) -> Result<Self> {
        if let Some(symptom) = Self::ALL.iter().find(|s| s.label() == label) {
            return Ok(*symptom);
        }
        LEGACY_LABELS
            .iter()
            .find(|(legacy, _)| *legacy == label)
            .map(|(_, symptom)| *symptom)
            .ok_or_else(|| Error::UnknownSymptom {
                label: label.to_string(),
            })
    }
}

impl std::fmt::Display for Symptom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for Symptom {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Symptom {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Symptom::from_label(&label).map_err(serde::de::Error::custom)
    }
}

// ============================================
// Outcome
// ============================================

/// How a completed session felt.
///
/// Symptoms only exist on negative sessions; a positive session with
/// symptoms is unrepresentable by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Positive,
    Negative { symptoms: Vec<Symptom> },
}

impl Outcome {
    /// Build a negative outcome, collapsing duplicate symptoms while
    /// preserving first-seen order.
    pub fn negative(symptoms: impl IntoIterator<Item = Symptom>) -> Self {
        let mut deduped: Vec<Symptom> = Vec::new();
        for symptom in symptoms {
            if !deduped.contains(&symptom) {
                deduped.push(symptom);
            }
        }
        Outcome::Negative { symptoms: deduped }
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Outcome::Negative { .. })
    }

    /// Symptoms attached to this outcome (empty for positive).
    pub fn symptoms(&self) -> &[Symptom] {
        match self {
            Outcome::Positive => &[],
            Outcome::Negative { symptoms } => symptoms,
        }
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Outcome::Positive
    }
}

// ============================================
// Session
// ============================================

/// Result of attempting to complete a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The session transitioned from active to completed
    Completed,
    /// The session was already completed; nothing changed
    AlreadyCompleted,
}

/// One tracked start-to-stop episode.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Unique identifier, immutable after creation
    pub id: SessionId,
    /// Set at creation from the caller's clock, immutable
    pub start_time: DateTime<Utc>,
    /// Absent while the session is active; set exactly once at completion
    pub end_time: Option<DateTime<Utc>>,
    /// Meaningful only once completed; defaults to positive
    pub outcome: Outcome,
    /// Free-text notes, optional
    pub notes: Option<String>,
}

impl Session {
    /// Start a new active session at the given instant.
    pub fn start(now: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::new(),
            start_time: now,
            end_time: None,
            outcome: Outcome::Positive,
            notes: None,
        }
    }

    /// A session is active iff its end time is absent.
    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn is_completed(&self) -> bool {
        self.end_time.is_some()
    }

    /// Elapsed time, derived from the two timestamps. `None` while active.
    pub fn duration(&self) -> Option<Duration> {
        self.end_time.map(|end| end - self.start_time)
    }

    /// Elapsed seconds as a float. `None` while active.
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration()
            .map(|d| d.num_milliseconds() as f64 / 1000.0)
    }

    /// Symptoms recorded for this session (empty unless the outcome was
    /// negative).
    pub fn symptoms(&self) -> &[Symptom] {
        self.outcome.symptoms()
    }

    pub fn has_symptom(&self, symptom: Symptom) -> bool {
        self.symptoms().contains(&symptom)
    }

    /// Complete the session: fix the end time and attach the outcome.
    ///
    /// Completion is a one-way transition. Calling this on an already
    /// completed session changes nothing and reports
    /// [`CompletionOutcome::AlreadyCompleted`].
    pub fn complete(
        &mut self,
        at: DateTime<Utc>,
        outcome: Outcome,
        notes: Option<String>,
    ) -> CompletionOutcome {
        if let Some(end) = self.end_time {
            tracing::warn!(session_id = %self.id, end_time = %end, "Session already completed");
            return CompletionOutcome::AlreadyCompleted;
        }

        self.end_time = Some(at);
        self.outcome = outcome;
        self.notes = notes;
        CompletionOutcome::Completed
    }
}

// ============================================
// Wire records
// ============================================

/// A session as stored by the cloud store.
///
/// Every field is optional on the wire (the store's schema does not enforce
/// presence), so decoding validates what the domain model requires. Unknown
/// symptom labels fail the decode; records missing required fields are
/// reported as [`Error::MissingField`] so batch callers can exclude them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Option<Uuid>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Stored for display compatibility; the domain model re-derives it
    pub duration: Option<f64>,
    pub feeling: Option<String>,
    pub symptoms: Option<Vec<String>>,
    pub notes: Option<String>,
}

impl SessionRecord {
    /// Decode a wire record into a domain session.
    pub fn decode(&self) -> Result<Session> {
        let raw_id = self
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());

        let id = self.id.ok_or(Error::MissingField {
            id: raw_id.clone(),
            field: "id",
        })?;
        let start_time = self.start_time.ok_or(Error::MissingField {
            id: raw_id,
            field: "start_time",
        })?;

        let mut symptoms = Vec::new();
        for label in self.symptoms.iter().flatten() {
            symptoms.push(Symptom::from_label(label)?);
        }

        let negative = self.feeling.as_deref() == Some("Negative");
        let outcome = if negative {
            Outcome::negative(symptoms)
        } else {
            if !symptoms.is_empty() {
                tracing::warn!(
                    session_id = %id,
                    count = symptoms.len(),
                    "Dropping symptoms recorded on a positive session"
                );
            }
            Outcome::Positive
        };

        Ok(Session {
            id: SessionId(id),
            start_time,
            end_time: self.end_time,
            outcome,
            notes: self.notes.clone().filter(|n| !n.is_empty()),
        })
    }

    /// Encode a domain session for storage, with canonical symptom labels
    /// and the derived duration.
    pub fn encode(session: &Session) -> Self {
        Self {
            id: Some(session.id.0),
            start_time: Some(session.start_time),
            end_time: session.end_time,
            duration: session.duration_secs(),
            feeling: Some(if session.outcome.is_negative() {
                "Negative".to_string()
            } else {
                "Positive".to_string()
            }),
            symptoms: Some(
                session
                    .symptoms()
                    .iter()
                    .map(|s| s.label().to_string())
                    .collect(),
            ),
            notes: session.notes.clone(),
        }
    }
}

/// Decode a batch of wire records.
///
/// Records missing required fields are excluded with a warning rather than
/// failing the batch; unknown symptom labels are a data error and abort the
/// decode.
pub fn decode_records(records: &[SessionRecord]) -> Result<Vec<Session>> {
    let mut sessions = Vec::with_capacity(records.len());
    for record in records {
        match record.decode() {
            Ok(session) => sessions.push(session),
            Err(err @ Error::MissingField { .. }) => {
                tracing::warn!(error = %err, "Skipping malformed session record");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(sessions)
}
