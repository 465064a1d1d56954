use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::capacity::{CapacityDecision, CapacityPolicy};
use super::directory::{Clock, MemberDirectory};
use super::domain::{
    MemberId, RequestId, RequestStatus, Tutoring, TutoringId, TutoringStatus, WorkflowError,
};
use super::store::TutoringStore;

static TUTORING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_tutoring_id() -> TutoringId {
    let id = TUTORING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    TutoringId(format!("tut-{id:06}"))
}

/// Converts an accepted request plus a chosen tutor into an Active
/// engagement, consuming the request.
///
/// All preconditions are checked before anything is written; the paired
/// engagement insert and request update go through the store's
/// `commit_engagement` so either both land or neither does.
pub struct EngagementFactory<S, D, C> {
    store: Arc<S>,
    directory: Arc<D>,
    clock: Arc<C>,
    policy: CapacityPolicy,
}

impl<S, D, C> EngagementFactory<S, D, C>
where
    S: TutoringStore + 'static,
    D: MemberDirectory + 'static,
    C: Clock + 'static,
{
    pub fn new(store: Arc<S>, directory: Arc<D>, clock: Arc<C>, policy: CapacityPolicy) -> Self {
        Self {
            store,
            directory,
            clock,
            policy,
        }
    }

    pub fn create_tutoring(
        &self,
        request_id: &RequestId,
        tutor: MemberId,
        objectives: String,
    ) -> Result<Tutoring, WorkflowError> {
        let mut request = self
            .store
            .fetch_request(request_id)?
            .ok_or_else(|| WorkflowError::RequestNotFound(request_id.clone()))?;

        if request.is_assigned() {
            return Err(WorkflowError::RequestAlreadyAssigned(request.request_id));
        }

        match self
            .policy
            .can_accept_engagement(self.store.as_ref(), self.directory.as_ref(), &tutor)?
        {
            CapacityDecision::Accepts { .. } => {}
            CapacityDecision::AtCapacity { active, limit } => {
                return Err(WorkflowError::CapacityExceeded {
                    tutor,
                    active,
                    limit,
                });
            }
            CapacityDecision::NotATutor | CapacityDecision::UnknownMember => {
                return Err(WorkflowError::TutorNotFound(tutor));
            }
        }

        let tutoring = Tutoring {
            tutoring_id: next_tutoring_id(),
            tutor,
            tutee: request.tutee.clone(),
            source_request: request.request_id.clone(),
            objectives,
            status: TutoringStatus::Active,
            created_at: self.clock.now(),
            cancellation_comment: None,
            final_act_link: None,
        };

        request.status = RequestStatus::Assigned;
        request.assigned_tutoring = Some(tutoring.tutoring_id.clone());

        self.store.commit_engagement(tutoring.clone(), request)?;
        Ok(tutoring)
    }

    pub fn get_tutoring(&self, tutoring_id: &TutoringId) -> Result<Tutoring, WorkflowError> {
        self.store
            .fetch_tutoring(tutoring_id)?
            .ok_or_else(|| WorkflowError::TutoringNotFound(tutoring_id.clone()))
    }
}
