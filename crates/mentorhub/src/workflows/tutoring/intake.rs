use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::directory::{Clock, MemberDirectory, SkillDirectory};
use super::domain::{
    is_blank, MemberId, RequestId, RequestStatus, ReviewDecision, SkillId, TutoringRequest,
    WorkflowError,
};
use super::store::TutoringStore;

static REQUEST_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_request_id() -> RequestId {
    let id = REQUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RequestId(format!("req-{id:06}"))
}

/// Intake for tutoring requests plus the program's review decision.
pub struct RequestIntake<S, D, C> {
    store: Arc<S>,
    directory: Arc<D>,
    clock: Arc<C>,
}

impl<S, D, C> RequestIntake<S, D, C>
where
    S: TutoringStore + 'static,
    D: MemberDirectory + SkillDirectory + 'static,
    C: Clock + 'static,
{
    pub fn new(store: Arc<S>, directory: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            store,
            directory,
            clock,
        }
    }

    /// Create a new request in Submitted status, stamped with the clock.
    pub fn submit_request(
        &self,
        tutee: MemberId,
        skills: BTreeSet<SkillId>,
        description: String,
    ) -> Result<TutoringRequest, WorkflowError> {
        if is_blank(&description) {
            return Err(WorkflowError::MissingEvidence {
                field: "description",
            });
        }
        if self.directory.member(&tutee)?.is_none() {
            return Err(WorkflowError::MemberNotFound(tutee));
        }
        for skill in &skills {
            if self.directory.skill(skill)?.is_none() {
                return Err(WorkflowError::SkillNotFound(skill.clone()));
            }
        }

        let request = TutoringRequest {
            request_id: next_request_id(),
            tutee,
            skills,
            description,
            submitted_at: self.clock.now(),
            status: RequestStatus::Submitted,
            assigned_tutoring: None,
        };

        let stored = self.store.insert_request(request)?;
        Ok(stored)
    }

    /// Record the program's approval decision on a submitted request.
    /// Forward-only: a decided or assigned request never re-enters review.
    pub fn review_request(
        &self,
        request_id: &RequestId,
        decision: ReviewDecision,
    ) -> Result<TutoringRequest, WorkflowError> {
        let mut request = self
            .store
            .fetch_request(request_id)?
            .ok_or_else(|| WorkflowError::RequestNotFound(request_id.clone()))?;

        match request.status {
            RequestStatus::Submitted => {}
            RequestStatus::Assigned => {
                return Err(WorkflowError::RequestAlreadyAssigned(request.request_id));
            }
            status => {
                return Err(WorkflowError::RequestAlreadyDecided {
                    request: request.request_id,
                    status,
                });
            }
        }

        request.status = decision.resulting_status();
        self.store.update_request(request.clone())?;
        Ok(request)
    }

    pub fn get_request(&self, request_id: &RequestId) -> Result<TutoringRequest, WorkflowError> {
        self.store
            .fetch_request(request_id)?
            .ok_or_else(|| WorkflowError::RequestNotFound(request_id.clone()))
    }
}
