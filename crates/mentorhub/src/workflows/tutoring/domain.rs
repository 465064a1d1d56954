use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for program members (tutees, tutors, admins).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(pub String);

/// Identifier wrapper for skills tracked by the skill directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SkillId(pub String);

/// Identifier wrapper for program chapters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChapterId(pub String);

/// Identifier wrapper for tutoring requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

/// Identifier wrapper for tutoring engagements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TutoringId(pub String);

/// Identifier wrapper for tutoring sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Identifier wrapper for feedback records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedbackId(pub String);

macro_rules! display_as_inner {
    ($($id:ident),+ $(,)?) => {
        $(impl fmt::Display for $id {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        })+
    };
}

display_as_inner!(
    MemberId, SkillId, ChapterId, RequestId, TutoringId, SessionId, FeedbackId
);

/// Lifecycle of a tutee's ask for mentoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Submitted,
    Approved,
    Rejected,
    Assigned,
}

impl RequestStatus {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Submitted,
            Self::Approved,
            Self::Rejected,
            Self::Assigned,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Assigned => "assigned",
        }
    }
}

/// Lifecycle of a tutoring engagement. Cancelled and Completed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TutoringStatus {
    Active,
    CancellationRequested,
    Cancelled,
    Completed,
}

impl TutoringStatus {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Active,
            Self::CancellationRequested,
            Self::Cancelled,
            Self::Completed,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::CancellationRequested => "cancellation_requested",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }
}

/// Session outcomes tracked by the program. No transition table restricts
/// these: any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl SessionStatus {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Scheduled,
            Self::Completed,
            Self::Cancelled,
            Self::NoShow,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }
}

/// External approval decision recorded against a submitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    pub const fn resulting_status(self) -> RequestStatus {
        match self {
            Self::Approved => RequestStatus::Approved,
            Self::Rejected => RequestStatus::Rejected,
        }
    }
}

/// A tutee's ask for mentoring on a set of skills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutoringRequest {
    pub request_id: RequestId,
    pub tutee: MemberId,
    pub skills: BTreeSet<SkillId>,
    pub description: String,
    pub submitted_at: DateTime<Utc>,
    pub status: RequestStatus,
    pub assigned_tutoring: Option<TutoringId>,
}

impl TutoringRequest {
    pub fn is_assigned(&self) -> bool {
        self.status == RequestStatus::Assigned
    }
}

/// An engagement linking one tutor and one tutee. Terminal rows are kept
/// for history and dashboard counting; nothing is ever deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tutoring {
    pub tutoring_id: TutoringId,
    pub tutor: MemberId,
    pub tutee: MemberId,
    pub source_request: RequestId,
    pub objectives: String,
    pub status: TutoringStatus,
    pub created_at: DateTime<Utc>,
    pub cancellation_comment: Option<String>,
    pub final_act_link: Option<String>,
}

impl Tutoring {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whether the given member is a party (tutor or tutee) to this engagement.
    pub fn involves(&self, member: &MemberId) -> bool {
        &self.tutor == member || &self.tutee == member
    }
}

/// A scheduled meeting under an engagement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutoringSession {
    pub session_id: SessionId,
    pub tutoring_id: TutoringId,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub location_link: Option<String>,
    pub topics: Option<String>,
    pub notes: Option<String>,
    pub status: SessionStatus,
}

/// Closing (or interim) evaluation of an engagement. The evaluated tutoring
/// is embedded as a resolved snapshot rather than a bare id; the record is
/// immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub feedback_id: FeedbackId,
    pub evaluator: MemberId,
    pub tutoring: Tutoring,
    pub evaluated_at: DateTime<Utc>,
    pub score: u8,
    pub comments: String,
}

/// Failure taxonomy shared by every workflow operation. All variants are
/// recoverable from the caller's perspective.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("tutoring request {0} not found")]
    RequestNotFound(RequestId),
    #[error("tutoring {0} not found")]
    TutoringNotFound(TutoringId),
    #[error("session {0} not found")]
    SessionNotFound(SessionId),
    #[error("member {0} not found in the member directory")]
    MemberNotFound(MemberId),
    #[error("skill {0} not found in the skill directory")]
    SkillNotFound(SkillId),
    #[error("member {0} is not registered as a tutor")]
    TutorNotFound(MemberId),
    #[error("member {0} not found to record an evaluation")]
    EvaluatorNotFound(MemberId),
    #[error("request {0} is already assigned to an engagement")]
    RequestAlreadyAssigned(RequestId),
    #[error("request {request} was already decided ({})", .status.label())]
    RequestAlreadyDecided {
        request: RequestId,
        status: RequestStatus,
    },
    #[error("tutoring {tutoring} is already terminal ({})", .status.label())]
    TutoringAlreadyTerminal {
        tutoring: TutoringId,
        status: TutoringStatus,
    },
    #[error("tutoring {tutoring} cannot {operation} while {}", .status.label())]
    InvalidTransition {
        tutoring: TutoringId,
        status: TutoringStatus,
        operation: &'static str,
    },
    #[error("tutor {tutor} already has {active} active engagements (limit {limit})")]
    CapacityExceeded {
        tutor: MemberId,
        active: usize,
        limit: u32,
    },
    #[error("member {actor} may not {action}")]
    Unauthorized {
        actor: MemberId,
        action: &'static str,
    },
    #[error("{field} must not be blank")]
    MissingEvidence { field: &'static str },
    #[error("final act link {link:?} does not match an allowed prefix")]
    FinalActLinkRejected { link: String },
    #[error("session duration must be at least one minute (got {0})")]
    InvalidDuration(u32),
    #[error(transparent)]
    Store(#[from] super::store::StoreError),
    #[error(transparent)]
    Directory(#[from] super::directory::DirectoryError),
}

/// Trim-based blank check shared by the evidence guards.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
