use std::sync::Arc;

use super::config::TutoringConfig;
use super::directory::MemberDirectory;
use super::domain::{is_blank, MemberId, Tutoring, TutoringId, TutoringStatus, WorkflowError};
use super::store::TutoringStore;

/// State machine for a tutoring engagement.
///
/// Transitions: Active -> CancellationRequested (a party asks out, with a
/// reason), CancellationRequested -> Cancelled (an admin confirms, with a
/// comment), Active -> Completed (a party closes with a final act link).
/// Terminal rows reject every transition. There is no path from
/// CancellationRequested back to Active; a pending cancellation can only
/// be confirmed.
///
/// Guards run in a fixed order per transition: state, then actor
/// authorization, then evidence. A second cancel or complete on the same
/// engagement therefore always reports the terminal state, regardless of
/// who asks or what they attach.
pub struct LifecycleController<S, D> {
    store: Arc<S>,
    directory: Arc<D>,
    config: TutoringConfig,
}

impl<S, D> LifecycleController<S, D>
where
    S: TutoringStore + 'static,
    D: MemberDirectory + 'static,
{
    pub fn new(store: Arc<S>, directory: Arc<D>, config: TutoringConfig) -> Self {
        Self {
            store,
            directory,
            config,
        }
    }

    /// A party to the engagement asks for cancellation. The reason is kept
    /// on the row so the confirming admin sees it.
    pub fn request_cancellation(
        &self,
        tutoring_id: &TutoringId,
        actor: MemberId,
        reason: String,
    ) -> Result<Tutoring, WorkflowError> {
        let mut tutoring = self.fetch_open(tutoring_id)?;

        if tutoring.status != TutoringStatus::Active {
            return Err(WorkflowError::InvalidTransition {
                tutoring: tutoring.tutoring_id,
                status: tutoring.status,
                operation: "request cancellation of",
            });
        }
        if !tutoring.involves(&actor) {
            return Err(WorkflowError::Unauthorized {
                actor,
                action: "request cancellation of this tutoring",
            });
        }
        if is_blank(&reason) {
            return Err(WorkflowError::MissingEvidence { field: "reason" });
        }

        tutoring.status = TutoringStatus::CancellationRequested;
        tutoring.cancellation_comment = Some(reason);
        self.store.update_tutoring(tutoring.clone())?;
        Ok(tutoring)
    }

    /// An admin confirms a pending cancellation. The admin's comment
    /// replaces the requester's reason on the row.
    pub fn cancel_tutoring(
        &self,
        tutoring_id: &TutoringId,
        actor: MemberId,
        comment: String,
    ) -> Result<Tutoring, WorkflowError> {
        let mut tutoring = self.fetch_open(tutoring_id)?;

        if tutoring.status != TutoringStatus::CancellationRequested {
            return Err(WorkflowError::InvalidTransition {
                tutoring: tutoring.tutoring_id,
                status: tutoring.status,
                operation: "cancel",
            });
        }
        // Fails closed: an actor the directory cannot resolve is treated
        // the same as one without the admin role.
        let is_admin = self
            .directory
            .member(&actor)?
            .map(|record| record.role.is_admin())
            .unwrap_or(false);
        if !is_admin {
            return Err(WorkflowError::Unauthorized {
                actor,
                action: "cancel tutorings",
            });
        }
        if is_blank(&comment) {
            return Err(WorkflowError::MissingEvidence { field: "comment" });
        }

        tutoring.status = TutoringStatus::Cancelled;
        tutoring.cancellation_comment = Some(comment);
        self.store.update_tutoring(tutoring.clone())?;
        Ok(tutoring)
    }

    /// A party closes the engagement with a link to the final act.
    pub fn complete_tutoring(
        &self,
        tutoring_id: &TutoringId,
        actor: MemberId,
        final_act_link: String,
    ) -> Result<Tutoring, WorkflowError> {
        let mut tutoring = self.fetch_open(tutoring_id)?;

        if tutoring.status != TutoringStatus::Active {
            return Err(WorkflowError::InvalidTransition {
                tutoring: tutoring.tutoring_id,
                status: tutoring.status,
                operation: "complete",
            });
        }
        if !tutoring.involves(&actor) {
            return Err(WorkflowError::Unauthorized {
                actor,
                action: "complete this tutoring",
            });
        }
        if is_blank(&final_act_link) {
            return Err(WorkflowError::MissingEvidence {
                field: "final act link",
            });
        }
        if !self.link_allowed(&final_act_link) {
            return Err(WorkflowError::FinalActLinkRejected {
                link: final_act_link,
            });
        }

        tutoring.status = TutoringStatus::Completed;
        tutoring.final_act_link = Some(final_act_link);
        self.store.update_tutoring(tutoring.clone())?;
        Ok(tutoring)
    }

    fn fetch_open(&self, tutoring_id: &TutoringId) -> Result<Tutoring, WorkflowError> {
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
        Ok(tutoring)
    }

    /// An empty allow-list accepts any non-blank link.
    fn link_allowed(&self, link: &str) -> bool {
        self.config.final_act_link_prefixes.is_empty()
            || self
                .config
                .final_act_link_prefixes
                .iter()
                .any(|prefix| link.starts_with(prefix))
    }
}
