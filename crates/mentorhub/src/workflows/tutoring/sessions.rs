use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::domain::{
    is_blank, SessionId, SessionStatus, TutoringId, TutoringSession, WorkflowError,
};
use super::store::TutoringStore;

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("ses-{id:06}"))
}

/// Appends session records to a live engagement and records their outcomes.
pub struct SessionScheduler<S> {
    store: Arc<S>,
}

impl<S> SessionScheduler<S>
where
    S: TutoringStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn schedule_session(
        &self,
        tutoring_id: &TutoringId,
        scheduled_at: DateTime<Utc>,
        duration_minutes: u32,
        location_link: Option<String>,
        topics: Option<String>,
    ) -> Result<TutoringSession, WorkflowError> {
        let tutoring = self
            .store
            .fetch_tutoring(tutoring_id)?
            .ok_or_else(|| WorkflowError::TutoringNotFound(tutoring_id.clone()))?;

        if tutoring.is_terminal() {
            return Err(WorkflowError::TutoringAlreadyTerminal {
                tutoring: tutoring.tutoring_id,
                status: tutoring.status,
            });
        }
        if duration_minutes < 1 {
            return Err(WorkflowError::InvalidDuration(duration_minutes));
        }

        let session = TutoringSession {
            session_id: next_session_id(),
            tutoring_id: tutoring.tutoring_id,
            scheduled_at,
            duration_minutes,
            location_link,
            topics,
            notes: None,
            status: SessionStatus::Scheduled,
        };

        let stored = self.store.insert_session(session)?;
        Ok(stored)
    }

    /// Overwrite a session's status. No transition table restricts session
    /// statuses; any status may follow any other. Notes are replaced only
    /// when a non-blank value is supplied.
    pub fn update_session_status(
        &self,
        session_id: &SessionId,
        new_status: SessionStatus,
        notes: Option<String>,
    ) -> Result<TutoringSession, WorkflowError> {
        let mut session = self
            .store
            .fetch_session(session_id)?
            .ok_or_else(|| WorkflowError::SessionNotFound(session_id.clone()))?;

        session.status = new_status;
        if let Some(notes) = notes {
            if !is_blank(&notes) {
                session.notes = Some(notes);
            }
        }

        self.store.update_session(session.clone())?;
        Ok(session)
    }

    pub fn sessions_for(
        &self,
        tutoring_id: &TutoringId,
    ) -> Result<Vec<TutoringSession>, WorkflowError> {
        if self.store.fetch_tutoring(tutoring_id)?.is_none() {
            return Err(WorkflowError::TutoringNotFound(tutoring_id.clone()));
        }
        let sessions = self.store.sessions_for(tutoring_id)?;
        Ok(sessions)
    }
}
