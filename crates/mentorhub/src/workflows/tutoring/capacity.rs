use serde::{Deserialize, Serialize};

use super::config::TutoringConfig;
use super::directory::{MemberDirectory, TutorProfile};
use super::domain::{MemberId, WorkflowError};
use super::store::TutoringStore;

/// Answer to "may this tutor accept one more engagement?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapacityDecision {
    Accepts { active: usize, limit: u32 },
    AtCapacity { active: usize, limit: u32 },
    NotATutor,
    UnknownMember,
}

impl CapacityDecision {
    pub fn accepts(&self) -> bool {
        matches!(self, CapacityDecision::Accepts { .. })
    }

    pub fn summary(&self) -> String {
        match self {
            CapacityDecision::Accepts { active, limit } => {
                format!("accepting ({active} of {limit} active)")
            }
            CapacityDecision::AtCapacity { active, limit } => {
                format!("at capacity ({active} of {limit} active)")
            }
            CapacityDecision::NotATutor => "member is not onboarded as a tutor".to_string(),
            CapacityDecision::UnknownMember => "member not found in directory".to_string(),
        }
    }
}

/// Policy deciding whether a tutor may take on one more active engagement.
///
/// Limits come from an explicit configuration struct handed in at
/// construction; a per-tutor override in the directory profile wins over
/// the configured default. Unresolvable members and members without a
/// tutor profile fail closed.
pub struct CapacityPolicy {
    config: TutoringConfig,
}

impl CapacityPolicy {
    pub fn new(config: TutoringConfig) -> Self {
        Self { config }
    }

    pub fn effective_limit(&self, profile: &TutorProfile) -> u32 {
        profile
            .active_tutoring_limit
            .unwrap_or(self.config.default_active_tutoring_limit)
    }

    /// Pure comparison used by the factory once counts are resolved.
    pub fn admits(&self, active: usize, limit: u32) -> bool {
        active < limit as usize
    }

    pub fn can_accept_engagement<S, D>(
        &self,
        store: &S,
        directory: &D,
        tutor: &MemberId,
    ) -> Result<CapacityDecision, WorkflowError>
    where
        S: TutoringStore,
        D: MemberDirectory,
    {
        let record = match directory.member(tutor)? {
            Some(record) => record,
            None => return Ok(CapacityDecision::UnknownMember),
        };
        let profile = match &record.tutor_profile {
            Some(profile) => profile,
            None => return Ok(CapacityDecision::NotATutor),
        };

        let limit = self.effective_limit(profile);
        let active = store.active_tutoring_count(tutor)?;

        if self.admits(active, limit) {
            Ok(CapacityDecision::Accepts { active, limit })
        } else {
            Ok(CapacityDecision::AtCapacity { active, limit })
        }
    }
}
