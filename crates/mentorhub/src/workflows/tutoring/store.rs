use super::domain::{
    Feedback, MemberId, RequestId, SessionId, Tutoring, TutoringId, TutoringRequest,
    TutoringSession,
};

/// Storage abstraction over the four workflow entities.
///
/// Implementations own the transaction boundary: every method is atomic on
/// its own, `commit_engagement` persists its two rows as a single unit, and
/// concurrent writers against the same row must be serialized (row locking
/// or optimistic versioning), surfacing the losing write as
/// [`StoreError::Conflict`]. The workflow never locks on its own.
pub trait TutoringStore: Send + Sync {
    fn insert_request(&self, request: TutoringRequest) -> Result<TutoringRequest, StoreError>;
    fn update_request(&self, request: TutoringRequest) -> Result<(), StoreError>;
    fn fetch_request(&self, id: &RequestId) -> Result<Option<TutoringRequest>, StoreError>;
    fn requests(&self) -> Result<Vec<TutoringRequest>, StoreError>;

    fn update_tutoring(&self, tutoring: Tutoring) -> Result<(), StoreError>;
    fn fetch_tutoring(&self, id: &TutoringId) -> Result<Option<Tutoring>, StoreError>;
    fn tutorings(&self) -> Result<Vec<Tutoring>, StoreError>;
    /// Number of engagements currently Active for the given tutor.
    fn active_tutoring_count(&self, tutor: &MemberId) -> Result<usize, StoreError>;

    /// Persist a freshly created engagement together with its source request
    /// (already marked Assigned) in one transaction: either both rows land or
    /// neither does. A request row that was assigned by a concurrent writer
    /// in the meantime fails the whole unit with [`StoreError::Conflict`].
    fn commit_engagement(
        &self,
        tutoring: Tutoring,
        request: TutoringRequest,
    ) -> Result<(), StoreError>;

    fn insert_session(&self, session: TutoringSession) -> Result<TutoringSession, StoreError>;
    fn update_session(&self, session: TutoringSession) -> Result<(), StoreError>;
    fn fetch_session(&self, id: &SessionId) -> Result<Option<TutoringSession>, StoreError>;
    fn sessions_for(&self, tutoring: &TutoringId) -> Result<Vec<TutoringSession>, StoreError>;

    fn insert_feedback(&self, feedback: Feedback) -> Result<Feedback, StoreError>;
    fn feedback_for(&self, tutoring: &TutoringId) -> Result<Vec<Feedback>, StoreError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("conflicting write: {0}")]
    Conflict(String),
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
