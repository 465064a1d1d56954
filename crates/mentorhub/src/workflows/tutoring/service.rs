use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::capacity::{CapacityDecision, CapacityPolicy};
use super::config::TutoringConfig;
use super::dashboard::{DashboardAggregator, DashboardSnapshot};
use super::directory::{Clock, MemberDirectory, SkillDirectory};
use super::domain::{
    ChapterId, Feedback, MemberId, RequestId, ReviewDecision, SessionId, SessionStatus, SkillId,
    Tutoring, TutoringId, TutoringRequest, TutoringSession, WorkflowError,
};
use super::engagement::EngagementFactory;
use super::feedback::EvaluationRecorder;
use super::intake::RequestIntake;
use super::lifecycle::LifecycleController;
use super::sessions::SessionScheduler;
use super::store::TutoringStore;

/// Facade composing intake, the engagement factory, the session scheduler,
/// the lifecycle state machine, the evaluation recorder, and the dashboard
/// projection over one shared store/directory/clock triple. The HTTP layer
/// talks only to this type.
pub struct TutoringWorkflowService<S, D, C> {
    intake: RequestIntake<S, D, C>,
    factory: EngagementFactory<S, D, C>,
    scheduler: SessionScheduler<S>,
    lifecycle: LifecycleController<S, D>,
    evaluations: EvaluationRecorder<S, D, C>,
    dashboard: DashboardAggregator<S, D>,
    policy: CapacityPolicy,
    store: Arc<S>,
    directory: Arc<D>,
}

impl<S, D, C> TutoringWorkflowService<S, D, C>
where
    S: TutoringStore + 'static,
    D: MemberDirectory + SkillDirectory + 'static,
    C: Clock + 'static,
{
    pub fn new(store: Arc<S>, directory: Arc<D>, clock: Arc<C>, config: TutoringConfig) -> Self {
        let intake = RequestIntake::new(store.clone(), directory.clone(), clock.clone());
        let factory = EngagementFactory::new(
            store.clone(),
            directory.clone(),
            clock.clone(),
            CapacityPolicy::new(config.clone()),
        );
        let scheduler = SessionScheduler::new(store.clone());
        let lifecycle = LifecycleController::new(store.clone(), directory.clone(), config.clone());
        let evaluations = EvaluationRecorder::new(store.clone(), directory.clone(), clock);
        let dashboard = DashboardAggregator::new(store.clone(), directory.clone());
        let policy = CapacityPolicy::new(config);

        Self {
            intake,
            factory,
            scheduler,
            lifecycle,
            evaluations,
            dashboard,
            policy,
            store,
            directory,
        }
    }

    pub fn submit_request(
        &self,
        tutee: MemberId,
        skills: BTreeSet<SkillId>,
        description: String,
    ) -> Result<TutoringRequest, WorkflowError> {
        self.intake.submit_request(tutee, skills, description)
    }

    pub fn review_request(
        &self,
        request_id: &RequestId,
        decision: ReviewDecision,
    ) -> Result<TutoringRequest, WorkflowError> {
        self.intake.review_request(request_id, decision)
    }

    pub fn get_request(&self, request_id: &RequestId) -> Result<TutoringRequest, WorkflowError> {
        self.intake.get_request(request_id)
    }

    pub fn create_tutoring(
        &self,
        request_id: &RequestId,
        tutor: MemberId,
        objectives: String,
    ) -> Result<Tutoring, WorkflowError> {
        self.factory.create_tutoring(request_id, tutor, objectives)
    }

    pub fn get_tutoring(&self, tutoring_id: &TutoringId) -> Result<Tutoring, WorkflowError> {
        self.factory.get_tutoring(tutoring_id)
    }

    pub fn schedule_session(
        &self,
        tutoring_id: &TutoringId,
        scheduled_at: DateTime<Utc>,
        duration_minutes: u32,
        location_link: Option<String>,
        topics: Option<String>,
    ) -> Result<TutoringSession, WorkflowError> {
        self.scheduler.schedule_session(
            tutoring_id,
            scheduled_at,
            duration_minutes,
            location_link,
            topics,
        )
    }

    pub fn update_session_status(
        &self,
        session_id: &SessionId,
        new_status: SessionStatus,
        notes: Option<String>,
    ) -> Result<TutoringSession, WorkflowError> {
        self.scheduler
            .update_session_status(session_id, new_status, notes)
    }

    pub fn sessions_for(
        &self,
        tutoring_id: &TutoringId,
    ) -> Result<Vec<TutoringSession>, WorkflowError> {
        self.scheduler.sessions_for(tutoring_id)
    }

    pub fn request_cancellation(
        &self,
        tutoring_id: &TutoringId,
        actor: MemberId,
        reason: String,
    ) -> Result<Tutoring, WorkflowError> {
        self.lifecycle.request_cancellation(tutoring_id, actor, reason)
    }

    pub fn cancel_tutoring(
        &self,
        tutoring_id: &TutoringId,
        actor: MemberId,
        comment: String,
    ) -> Result<Tutoring, WorkflowError> {
        self.lifecycle.cancel_tutoring(tutoring_id, actor, comment)
    }

    pub fn complete_tutoring(
        &self,
        tutoring_id: &TutoringId,
        actor: MemberId,
        final_act_link: String,
    ) -> Result<Tutoring, WorkflowError> {
        self.lifecycle
            .complete_tutoring(tutoring_id, actor, final_act_link)
    }

    pub fn record_feedback(
        &self,
        evaluator: MemberId,
        tutoring_id: &TutoringId,
        score: u8,
        comments: String,
    ) -> Result<Feedback, WorkflowError> {
        self.evaluations
            .record_feedback(evaluator, tutoring_id, score, comments)
    }

    pub fn feedback_for(&self, tutoring_id: &TutoringId) -> Result<Vec<Feedback>, WorkflowError> {
        self.evaluations.feedback_for(tutoring_id)
    }

    /// Capacity check exposed for coordinators matching requests to tutors.
    pub fn can_accept_engagement(
        &self,
        tutor: &MemberId,
    ) -> Result<CapacityDecision, WorkflowError> {
        self.policy
            .can_accept_engagement(self.store.as_ref(), self.directory.as_ref(), tutor)
    }

    pub fn dashboard(
        &self,
        chapter: Option<&ChapterId>,
    ) -> Result<DashboardSnapshot, WorkflowError> {
        self.dashboard.dashboard(chapter)
    }
}
