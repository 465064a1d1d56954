use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::directory::{Clock, MemberDirectory};
use super::domain::{Feedback, FeedbackId, MemberId, TutoringId, WorkflowError};
use super::store::TutoringStore;

static FEEDBACK_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_feedback_id() -> FeedbackId {
    let id = FEEDBACK_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    FeedbackId(format!("fbk-{id:06}"))
}

/// Records evaluations against an engagement.
///
/// Deliberately permissive: no status guard (interim feedback on an Active
/// engagement is allowed) and no one-feedback-per-evaluator uniqueness.
pub struct EvaluationRecorder<S, D, C> {
    store: Arc<S>,
    directory: Arc<D>,
    clock: Arc<C>,
}

impl<S, D, C> EvaluationRecorder<S, D, C>
where
    S: TutoringStore + 'static,
    D: MemberDirectory + 'static,
    C: Clock + 'static,
{
    pub fn new(store: Arc<S>, directory: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            store,
            directory,
            clock,
        }
    }

    /// Attach feedback to an engagement, embedding the engagement as a
    /// resolved snapshot. The evaluation date always comes from the clock,
    /// never from the caller.
    pub fn record_feedback(
        &self,
        evaluator: MemberId,
        tutoring_id: &TutoringId,
        score: u8,
        comments: String,
    ) -> Result<Feedback, WorkflowError> {
        let tutoring = self
            .store
            .fetch_tutoring(tutoring_id)?
            .ok_or_else(|| WorkflowError::TutoringNotFound(tutoring_id.clone()))?;

        if self.directory.member(&evaluator)?.is_none() {
            return Err(WorkflowError::EvaluatorNotFound(evaluator));
        }

        let feedback = Feedback {
            feedback_id: next_feedback_id(),
            evaluator,
            tutoring,
            evaluated_at: self.clock.now(),
            score,
            comments,
        };

        let stored = self.store.insert_feedback(feedback)?;
        Ok(stored)
    }

    pub fn feedback_for(&self, tutoring_id: &TutoringId) -> Result<Vec<Feedback>, WorkflowError> {
        if self.store.fetch_tutoring(tutoring_id)?.is_none() {
            return Err(WorkflowError::TutoringNotFound(tutoring_id.clone()));
        }
        let feedback = self.store.feedback_for(tutoring_id)?;
        Ok(feedback)
    }
}
