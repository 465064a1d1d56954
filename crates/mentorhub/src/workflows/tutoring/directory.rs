use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ChapterId, MemberId, SkillId};

/// Read-side port onto the community member registry.
///
/// The workflow treats the directory as authoritative: whoever it does not
/// resolve does not exist, and role checks fail closed when a lookup returns
/// `None` or errors out.
pub trait MemberDirectory: Send + Sync {
    fn member(&self, id: &MemberId) -> Result<Option<MemberRecord>, DirectoryError>;
}

/// Read-side port onto the skill catalog.
pub trait SkillDirectory: Send + Sync {
    fn skill(&self, id: &SkillId) -> Result<Option<SkillRecord>, DirectoryError>;
}

/// Wall-clock source so timestamps stay deterministic under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Directory view of a community member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub member_id: MemberId,
    pub display_name: String,
    pub chapter: Option<ChapterId>,
    pub role: DirectoryRole,
    /// Present only for members onboarded as tutors.
    pub tutor_profile: Option<TutorProfile>,
}

impl MemberRecord {
    pub fn is_tutor(&self) -> bool {
        self.tutor_profile.is_some()
    }
}

/// Role the directory assigns to a member within the mentoring program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryRole {
    Member,
    ProgramAdmin,
}

impl DirectoryRole {
    pub const fn is_admin(self) -> bool {
        matches!(self, DirectoryRole::ProgramAdmin)
    }
}

/// Tutor-specific directory attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorProfile {
    /// Per-tutor override of the configured active engagement limit.
    pub active_tutoring_limit: Option<u32>,
}

/// Catalog entry for a teachable skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub skill_id: SkillId,
    pub name: String,
}

/// Raised when a directory backend cannot answer.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}
