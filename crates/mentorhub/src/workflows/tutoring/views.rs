use chrono::{DateTime, Utc};
use serde::Serialize;

use super::capacity::CapacityDecision;
use super::domain::{
    Feedback, FeedbackId, MemberId, RequestId, SessionId, SkillId, Tutoring, TutoringId,
    TutoringRequest, TutoringSession,
};

/// Sanitized representation of a request for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct RequestView {
    pub request_id: RequestId,
    pub tutee: MemberId,
    pub skills: Vec<SkillId>,
    pub description: String,
    pub submitted_at: DateTime<Utc>,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_tutoring: Option<TutoringId>,
}

impl TutoringRequest {
    pub fn status_view(&self) -> RequestView {
        RequestView {
            request_id: self.request_id.clone(),
            tutee: self.tutee.clone(),
            skills: self.skills.iter().cloned().collect(),
            description: self.description.clone(),
            submitted_at: self.submitted_at,
            status: self.status.label(),
            assigned_tutoring: self.assigned_tutoring.clone(),
        }
    }
}

/// Sanitized representation of an engagement for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct TutoringView {
    pub tutoring_id: TutoringId,
    pub tutor: MemberId,
    pub tutee: MemberId,
    pub source_request: RequestId,
    pub objectives: String,
    pub status: &'static str,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_act_link: Option<String>,
}

impl Tutoring {
    pub fn status_view(&self) -> TutoringView {
        TutoringView {
            tutoring_id: self.tutoring_id.clone(),
            tutor: self.tutor.clone(),
            tutee: self.tutee.clone(),
            source_request: self.source_request.clone(),
            objectives: self.objectives.clone(),
            status: self.status.label(),
            created_at: self.created_at,
            cancellation_comment: self.cancellation_comment.clone(),
            final_act_link: self.final_act_link.clone(),
        }
    }
}

/// Sanitized representation of a session for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub tutoring_id: TutoringId,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: &'static str,
}

impl TutoringSession {
    pub fn status_view(&self) -> SessionView {
        SessionView {
            session_id: self.session_id.clone(),
            tutoring_id: self.tutoring_id.clone(),
            scheduled_at: self.scheduled_at,
            duration_minutes: self.duration_minutes,
            location_link: self.location_link.clone(),
            topics: self.topics.clone(),
            notes: self.notes.clone(),
            status: self.status.label(),
        }
    }
}

/// Sanitized representation of a feedback record for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackView {
    pub feedback_id: FeedbackId,
    pub evaluator: MemberId,
    pub tutoring: TutoringView,
    pub evaluated_at: DateTime<Utc>,
    pub score: u8,
    pub comments: String,
}

impl Feedback {
    pub fn view(&self) -> FeedbackView {
        FeedbackView {
            feedback_id: self.feedback_id.clone(),
            evaluator: self.evaluator.clone(),
            tutoring: self.tutoring.status_view(),
            evaluated_at: self.evaluated_at,
            score: self.score,
            comments: self.comments.clone(),
        }
    }
}

/// Capacity check outcome for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct CapacityView {
    pub tutor: MemberId,
    pub accepts: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    pub detail: String,
}

impl CapacityView {
    pub fn from_decision(tutor: MemberId, decision: &CapacityDecision) -> Self {
        let (active, limit) = match decision {
            CapacityDecision::Accepts { active, limit }
            | CapacityDecision::AtCapacity { active, limit } => (Some(*active), Some(*limit)),
            CapacityDecision::NotATutor | CapacityDecision::UnknownMember => (None, None),
        };

        CapacityView {
            tutor,
            accepts: decision.accepts(),
            active,
            limit,
            detail: decision.summary(),
        }
    }
}
