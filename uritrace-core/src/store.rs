//! Session tracking against an external store.
//!
//! The persistence/sync transport is a collaborator, not part of this crate:
//! [`SessionRepository`] is the save/fetch/delete seam the cloud-backed
//! store implements, and [`SyncObserver`] is the injected status feed the
//! composition root owns (there is no ambient singleton to reach for).
//! [`SessionTracker`] orchestrates the session lifecycle across both.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::{CompletionOutcome, Outcome, Session, SessionId};

/// Persistence seam offered by the backing store.
///
/// The tracker only needs create/update (via `save`), a full snapshot, and
/// delete; sync happens behind this trait, best-effort, out of view.
pub trait SessionRepository {
    fn save(&mut self, session: &Session) -> Result<()>;
    fn fetch_all(&self) -> Result<Vec<Session>>;
    fn delete(&mut self, id: SessionId) -> Result<()>;
}

/// Best-effort sync-status feed, injected by the composition root.
pub trait SyncObserver {
    fn report_start(&self);
    fn report_success(&self);
    fn report_error(&self, message: &str);
    fn log_event(&self, message: &str);
}

/// Observer that discards everything.
pub struct NullObserver;

impl SyncObserver for NullObserver {
    fn report_start(&self) {}
    fn report_success(&self) {}
    fn report_error(&self, _message: &str) {}
    fn log_event(&self, _message: &str) {}
}

/// In-memory repository, used in tests and as a stand-in store.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    sessions: Vec<Session>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRepository for MemoryRepository {
    fn save(&mut self, session: &Session) -> Result<()> {
        match self.sessions.iter_mut().find(|s| s.id == session.id) {
            Some(existing) => *existing = session.clone(),
            None => self.sessions.push(session.clone()),
        }
        Ok(())
    }

    fn fetch_all(&self) -> Result<Vec<Session>> {
        Ok(self.sessions.clone())
    }

    fn delete(&mut self, id: SessionId) -> Result<()> {
        self.sessions.retain(|s| s.id != id);
        Ok(())
    }
}

/// Owns the single active session and drives its lifecycle.
pub struct SessionTracker<R: SessionRepository, O: SyncObserver> {
    repository: R,
    observer: O,
    current: Option<Session>,
}

impl<R: SessionRepository, O: SyncObserver> SessionTracker<R, O> {
    pub fn new(repository: R, observer: O) -> Self {
        Self {
            repository,
            observer,
            current: None,
        }
    }

    /// The active session, if one is being tracked.
    pub fn current_session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Snapshot of every persisted session.
    pub fn sessions(&self) -> Result<Vec<Session>> {
        self.repository.fetch_all()
    }

    /// Start tracking a new session at `now`.
    ///
    /// A no-op while a session is already active (the existing session keeps
    /// tracking).
    pub fn start_session(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.current.is_some() {
            tracing::debug!("Session already in progress, ignoring start");
            return Ok(());
        }

        let session = Session::start(now);
        tracing::info!(session_id = %session.id, start_time = %session.start_time, "Session started");
        self.observer.log_event("Session started");

        self.persist(&session)?;
        self.current = Some(session);
        Ok(())
    }

    /// Complete the active session: fix its end time and attach the outcome.
    ///
    /// Without an active session this does nothing. Re-completion cannot
    /// happen here (the tracker clears the active slot), but the underlying
    /// [`Session::complete`] reports a conflict if it ever does.
    pub fn complete_session(
        &mut self,
        now: DateTime<Utc>,
        outcome: Outcome,
        notes: Option<String>,
    ) -> Result<Option<CompletionOutcome>> {
        let Some(mut session) = self.current.take() else {
            tracing::warn!("No current session to complete");
            return Ok(None);
        };

        let completion = session.complete(now, outcome, notes);
        let duration = session.duration_secs().unwrap_or(0.0);
        tracing::info!(
            session_id = %session.id,
            duration_secs = duration,
            "Session completed"
        );
        self.observer
            .log_event(&format!("Session completed ({:.0}s)", duration));

        self.persist(&session)?;
        Ok(Some(completion))
    }

    /// Discard the active session without completing it. Cancelled sessions
    /// never reach the repository's completed set, so analytics never see
    /// them.
    pub fn cancel_session(&mut self) -> Result<()> {
        let Some(session) = self.current.take() else {
            return Ok(());
        };

        tracing::info!(session_id = %session.id, "Session cancelled");
        self.observer.log_event("Session cancelled");
        self.repository.delete(session.id)
    }

    /// Remove a persisted session.
    pub fn delete_session(&mut self, id: SessionId) -> Result<()> {
        tracing::info!(session_id = %id, "Session deleted");
        self.repository.delete(id)
    }

    fn persist(&mut self, session: &Session) -> Result<()> {
        self.observer.report_start();
        match self.repository.save(session) {
            Ok(()) => {
                self.observer.report_success();
                Ok(())
            }
            Err(err) => {
                tracing::error!(session_id = %session.id, error = %err, "Failed to save session");
                self.observer.report_error(&err.to_string());
                Err(err)
            }
        }
    }
}
