//! Tutoring lifecycle workflow: request intake, engagement creation under a
//! capacity cap, session scheduling, the engagement state machine, feedback
//! recording, and the coordinator dashboard projection.
//!
//! Every component consumes storage, the member/skill directories, and the
//! clock through the traits in [`store`] and [`directory`], so the whole
//! workflow runs against in-memory fakes in tests. Rows are never deleted;
//! all lifecycle changes are forward-only status writes.

pub(crate) mod capacity;
pub mod config;
pub(crate) mod dashboard;
pub mod directory;
pub mod domain;
pub(crate) mod engagement;
pub(crate) mod feedback;
pub(crate) mod intake;
pub(crate) mod lifecycle;
pub mod router;
pub mod service;
pub(crate) mod sessions;
pub mod store;
pub mod views;

#[cfg(test)]
mod tests;

pub use capacity::{CapacityDecision, CapacityPolicy};
pub use config::TutoringConfig;
pub use dashboard::DashboardSnapshot;
pub use directory::{
    Clock, DirectoryError, DirectoryRole, MemberDirectory, MemberRecord, SkillDirectory,
    SkillRecord, SystemClock, TutorProfile,
};
pub use domain::{
    ChapterId, Feedback, FeedbackId, MemberId, RequestId, RequestStatus, ReviewDecision,
    SessionId, SessionStatus, SkillId, Tutoring, TutoringId, TutoringRequest, TutoringSession,
    TutoringStatus, WorkflowError,
};
pub use router::tutoring_router;
pub use service::TutoringWorkflowService;
pub use store::{StoreError, TutoringStore};
pub use views::{CapacityView, FeedbackView, RequestView, SessionView, TutoringView};
