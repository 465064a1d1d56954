use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::directory::{Clock, MemberDirectory, SkillDirectory};
use super::domain::{
    ChapterId, MemberId, RequestId, ReviewDecision, SessionId, SessionStatus, SkillId, TutoringId,
    WorkflowError,
};
use super::service::TutoringWorkflowService;
use super::store::{StoreError, TutoringStore};
use super::views::CapacityView;

/// Router builder exposing the tutoring workflow over HTTP.
pub fn tutoring_router<S, D, C>(service: Arc<TutoringWorkflowService<S, D, C>>) -> Router
where
    S: TutoringStore + 'static,
    D: MemberDirectory + SkillDirectory + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route(
            "/api/v1/tutoring/requests",
            post(submit_request_handler::<S, D, C>),
        )
        .route(
            "/api/v1/tutoring/requests/:request_id",
            get(get_request_handler::<S, D, C>),
        )
        .route(
            "/api/v1/tutoring/requests/:request_id/review",
            post(review_request_handler::<S, D, C>),
        )
        .route(
            "/api/v1/tutoring/engagements",
            post(create_tutoring_handler::<S, D, C>),
        )
        .route(
            "/api/v1/tutoring/engagements/:tutoring_id",
            get(get_tutoring_handler::<S, D, C>),
        )
        .route(
            "/api/v1/tutoring/engagements/:tutoring_id/sessions",
            post(schedule_session_handler::<S, D, C>).get(sessions_handler::<S, D, C>),
        )
        .route(
            "/api/v1/tutoring/sessions/:session_id/status",
            post(update_session_status_handler::<S, D, C>),
        )
        .route(
            "/api/v1/tutoring/engagements/:tutoring_id/cancellation-request",
            post(request_cancellation_handler::<S, D, C>),
        )
        .route(
            "/api/v1/tutoring/engagements/:tutoring_id/cancel",
            post(cancel_tutoring_handler::<S, D, C>),
        )
        .route(
            "/api/v1/tutoring/engagements/:tutoring_id/complete",
            post(complete_tutoring_handler::<S, D, C>),
        )
        .route(
            "/api/v1/tutoring/engagements/:tutoring_id/feedback",
            get(feedback_handler::<S, D, C>),
        )
        .route(
            "/api/v1/tutoring/feedback",
            post(record_feedback_handler::<S, D, C>),
        )
        .route(
            "/api/v1/tutoring/tutors/:tutor_id/capacity",
            get(capacity_handler::<S, D, C>),
        )
        .route(
            "/api/v1/tutoring/dashboard",
            get(dashboard_handler::<S, D, C>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitRequestPayload {
    pub(crate) tutee: MemberId,
    #[serde(default)]
    pub(crate) skills: Vec<SkillId>,
    pub(crate) description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRequestPayload {
    pub(crate) decision: ReviewDecision,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateTutoringPayload {
    pub(crate) request_id: RequestId,
    pub(crate) tutor: MemberId,
    pub(crate) objectives: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScheduleSessionPayload {
    pub(crate) scheduled_at: DateTime<Utc>,
    pub(crate) duration_minutes: u32,
    #[serde(default)]
    pub(crate) location_link: Option<String>,
    #[serde(default)]
    pub(crate) topics: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionStatusPayload {
    pub(crate) status: SessionStatus,
    #[serde(default)]
    pub(crate) notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CancellationRequestPayload {
    pub(crate) actor: MemberId,
    pub(crate) reason: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CancelTutoringPayload {
    pub(crate) actor: MemberId,
    pub(crate) comment: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompleteTutoringPayload {
    pub(crate) actor: MemberId,
    pub(crate) final_act_link: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordFeedbackPayload {
    pub(crate) evaluator: MemberId,
    pub(crate) tutoring_id: TutoringId,
    pub(crate) score: u8,
    #[serde(default)]
    pub(crate) comments: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DashboardQuery {
    pub(crate) chapter: Option<String>,
}

pub(crate) async fn submit_request_handler<S, D, C>(
    State(service): State<Arc<TutoringWorkflowService<S, D, C>>>,
    axum::Json(payload): axum::Json<SubmitRequestPayload>,
) -> Response
where
    S: TutoringStore + 'static,
    D: MemberDirectory + SkillDirectory + 'static,
    C: Clock + 'static,
{
    let SubmitRequestPayload {
        tutee,
        skills,
        description,
    } = payload;
    let skills: BTreeSet<SkillId> = skills.into_iter().collect();

    match service.submit_request(tutee, skills, description) {
        Ok(request) => (StatusCode::CREATED, axum::Json(request.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_request_handler<S, D, C>(
    State(service): State<Arc<TutoringWorkflowService<S, D, C>>>,
    Path(request_id): Path<String>,
) -> Response
where
    S: TutoringStore + 'static,
    D: MemberDirectory + SkillDirectory + 'static,
    C: Clock + 'static,
{
    match service.get_request(&RequestId(request_id)) {
        Ok(request) => (StatusCode::OK, axum::Json(request.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn review_request_handler<S, D, C>(
    State(service): State<Arc<TutoringWorkflowService<S, D, C>>>,
    Path(request_id): Path<String>,
    axum::Json(payload): axum::Json<ReviewRequestPayload>,
) -> Response
where
    S: TutoringStore + 'static,
    D: MemberDirectory + SkillDirectory + 'static,
    C: Clock + 'static,
{
    match service.review_request(&RequestId(request_id), payload.decision) {
        Ok(request) => (StatusCode::OK, axum::Json(request.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_tutoring_handler<S, D, C>(
    State(service): State<Arc<TutoringWorkflowService<S, D, C>>>,
    axum::Json(payload): axum::Json<CreateTutoringPayload>,
) -> Response
where
    S: TutoringStore + 'static,
    D: MemberDirectory + SkillDirectory + 'static,
    C: Clock + 'static,
{
    let CreateTutoringPayload {
        request_id,
        tutor,
        objectives,
    } = payload;

    match service.create_tutoring(&request_id, tutor, objectives) {
        Ok(tutoring) => (StatusCode::CREATED, axum::Json(tutoring.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_tutoring_handler<S, D, C>(
    State(service): State<Arc<TutoringWorkflowService<S, D, C>>>,
    Path(tutoring_id): Path<String>,
) -> Response
where
    S: TutoringStore + 'static,
    D: MemberDirectory + SkillDirectory + 'static,
    C: Clock + 'static,
{
    match service.get_tutoring(&TutoringId(tutoring_id)) {
        Ok(tutoring) => (StatusCode::OK, axum::Json(tutoring.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn schedule_session_handler<S, D, C>(
    State(service): State<Arc<TutoringWorkflowService<S, D, C>>>,
    Path(tutoring_id): Path<String>,
    axum::Json(payload): axum::Json<ScheduleSessionPayload>,
) -> Response
where
    S: TutoringStore + 'static,
    D: MemberDirectory + SkillDirectory + 'static,
    C: Clock + 'static,
{
    let ScheduleSessionPayload {
        scheduled_at,
        duration_minutes,
        location_link,
        topics,
    } = payload;

    match service.schedule_session(
        &TutoringId(tutoring_id),
        scheduled_at,
        duration_minutes,
        location_link,
        topics,
    ) {
        Ok(session) => (StatusCode::CREATED, axum::Json(session.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn sessions_handler<S, D, C>(
    State(service): State<Arc<TutoringWorkflowService<S, D, C>>>,
    Path(tutoring_id): Path<String>,
) -> Response
where
    S: TutoringStore + 'static,
    D: MemberDirectory + SkillDirectory + 'static,
    C: Clock + 'static,
{
    match service.sessions_for(&TutoringId(tutoring_id)) {
        Ok(sessions) => {
            let views: Vec<_> = sessions.iter().map(|session| session.status_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_session_status_handler<S, D, C>(
    State(service): State<Arc<TutoringWorkflowService<S, D, C>>>,
    Path(session_id): Path<String>,
    axum::Json(payload): axum::Json<SessionStatusPayload>,
) -> Response
where
    S: TutoringStore + 'static,
    D: MemberDirectory + SkillDirectory + 'static,
    C: Clock + 'static,
{
    let SessionStatusPayload { status, notes } = payload;

    match service.update_session_status(&SessionId(session_id), status, notes) {
        Ok(session) => (StatusCode::OK, axum::Json(session.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn request_cancellation_handler<S, D, C>(
    State(service): State<Arc<TutoringWorkflowService<S, D, C>>>,
    Path(tutoring_id): Path<String>,
    axum::Json(payload): axum::Json<CancellationRequestPayload>,
) -> Response
where
    S: TutoringStore + 'static,
    D: MemberDirectory + SkillDirectory + 'static,
    C: Clock + 'static,
{
    let CancellationRequestPayload { actor, reason } = payload;

    match service.request_cancellation(&TutoringId(tutoring_id), actor, reason) {
        Ok(tutoring) => (StatusCode::OK, axum::Json(tutoring.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn cancel_tutoring_handler<S, D, C>(
    State(service): State<Arc<TutoringWorkflowService<S, D, C>>>,
    Path(tutoring_id): Path<String>,
    axum::Json(payload): axum::Json<CancelTutoringPayload>,
) -> Response
where
    S: TutoringStore + 'static,
    D: MemberDirectory + SkillDirectory + 'static,
    C: Clock + 'static,
{
    let CancelTutoringPayload { actor, comment } = payload;

    match service.cancel_tutoring(&TutoringId(tutoring_id), actor, comment) {
        Ok(tutoring) => (StatusCode::OK, axum::Json(tutoring.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn complete_tutoring_handler<S, D, C>(
    State(service): State<Arc<TutoringWorkflowService<S, D, C>>>,
    Path(tutoring_id): Path<String>,
    axum::Json(payload): axum::Json<CompleteTutoringPayload>,
) -> Response
where
    S: TutoringStore + 'static,
    D: MemberDirectory + SkillDirectory + 'static,
    C: Clock + 'static,
{
    let CompleteTutoringPayload {
        actor,
        final_act_link,
    } = payload;

    match service.complete_tutoring(&TutoringId(tutoring_id), actor, final_act_link) {
        Ok(tutoring) => (StatusCode::OK, axum::Json(tutoring.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn feedback_handler<S, D, C>(
    State(service): State<Arc<TutoringWorkflowService<S, D, C>>>,
    Path(tutoring_id): Path<String>,
) -> Response
where
    S: TutoringStore + 'static,
    D: MemberDirectory + SkillDirectory + 'static,
    C: Clock + 'static,
{
    match service.feedback_for(&TutoringId(tutoring_id)) {
        Ok(feedback) => {
            let views: Vec<_> = feedback.iter().map(|entry| entry.view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn record_feedback_handler<S, D, C>(
    State(service): State<Arc<TutoringWorkflowService<S, D, C>>>,
    axum::Json(payload): axum::Json<RecordFeedbackPayload>,
) -> Response
where
    S: TutoringStore + 'static,
    D: MemberDirectory + SkillDirectory + 'static,
    C: Clock + 'static,
{
    let RecordFeedbackPayload {
        evaluator,
        tutoring_id,
        score,
        comments,
    } = payload;

    match service.record_feedback(evaluator, &tutoring_id, score, comments) {
        Ok(feedback) => (StatusCode::CREATED, axum::Json(feedback.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn capacity_handler<S, D, C>(
    State(service): State<Arc<TutoringWorkflowService<S, D, C>>>,
    Path(tutor_id): Path<String>,
) -> Response
where
    S: TutoringStore + 'static,
    D: MemberDirectory + SkillDirectory + 'static,
    C: Clock + 'static,
{
    let tutor = MemberId(tutor_id);
    match service.can_accept_engagement(&tutor) {
        Ok(decision) => {
            let view = CapacityView::from_decision(tutor, &decision);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dashboard_handler<S, D, C>(
    State(service): State<Arc<TutoringWorkflowService<S, D, C>>>,
    Query(query): Query<DashboardQuery>,
) -> Response
where
    S: TutoringStore + 'static,
    D: MemberDirectory + SkillDirectory + 'static,
    C: Clock + 'static,
{
    let chapter = query.chapter.map(ChapterId);
    match service.dashboard(chapter.as_ref()) {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Map the workflow failure taxonomy onto HTTP statuses: dangling
/// references 404, forward-only and capacity violations 409, authorization
/// 403, evidence and input problems 422, collaborator outages 500.
pub(crate) fn error_response(error: WorkflowError) -> Response {
    let status = match &error {
        WorkflowError::RequestNotFound(_)
        | WorkflowError::TutoringNotFound(_)
        | WorkflowError::SessionNotFound(_)
        | WorkflowError::MemberNotFound(_)
        | WorkflowError::SkillNotFound(_)
        | WorkflowError::TutorNotFound(_)
        | WorkflowError::EvaluatorNotFound(_)
        | WorkflowError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        WorkflowError::RequestAlreadyAssigned(_)
        | WorkflowError::RequestAlreadyDecided { .. }
        | WorkflowError::TutoringAlreadyTerminal { .. }
        | WorkflowError::InvalidTransition { .. }
        | WorkflowError::CapacityExceeded { .. }
        | WorkflowError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
        WorkflowError::Unauthorized { .. } => StatusCode::FORBIDDEN,
        WorkflowError::MissingEvidence { .. }
        | WorkflowError::FinalActLinkRejected { .. }
        | WorkflowError::InvalidDuration(_) => StatusCode::UNPROCESSABLE_ENTITY,
        WorkflowError::Store(StoreError::Unavailable(_)) | WorkflowError::Directory(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
