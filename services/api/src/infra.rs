use mentorhub::workflows::tutoring::{
    DirectoryError, Feedback, MemberDirectory, MemberId, MemberRecord, RequestId, RequestStatus,
    SessionId, SkillDirectory, SkillId, SkillRecord, StoreError, Tutoring, TutoringId,
    TutoringRequest, TutoringSession, TutoringStatus, TutoringStore,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct StoreState {
    requests: HashMap<RequestId, TutoringRequest>,
    tutorings: HashMap<TutoringId, Tutoring>,
    sessions: HashMap<SessionId, TutoringSession>,
    feedback: Vec<Feedback>,
}

/// Development store backing `serve` and the demo. One mutex over all four
/// tables keeps the engagement commit atomic.
#[derive(Default, Clone)]
pub(crate) struct InMemoryTutoringStore {
    state: Arc<Mutex<StoreState>>,
}

impl TutoringStore for InMemoryTutoringStore {
    fn insert_request(&self, request: TutoringRequest) -> Result<TutoringRequest, StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        if state.requests.contains_key(&request.request_id) {
            return Err(StoreError::Conflict(format!(
                "request {} already exists",
                request.request_id
            )));
        }
        state
            .requests
            .insert(request.request_id.clone(), request.clone());
        Ok(request)
    }

    fn update_request(&self, request: TutoringRequest) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        if !state.requests.contains_key(&request.request_id) {
            return Err(StoreError::NotFound);
        }
        state.requests.insert(request.request_id.clone(), request);
        Ok(())
    }

    fn fetch_request(&self, id: &RequestId) -> Result<Option<TutoringRequest>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.requests.get(id).cloned())
    }

    fn requests(&self) -> Result<Vec<TutoringRequest>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.requests.values().cloned().collect())
    }

    fn update_tutoring(&self, tutoring: Tutoring) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        if !state.tutorings.contains_key(&tutoring.tutoring_id) {
            return Err(StoreError::NotFound);
        }
        state.tutorings.insert(tutoring.tutoring_id.clone(), tutoring);
        Ok(())
    }

    fn fetch_tutoring(&self, id: &TutoringId) -> Result<Option<Tutoring>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.tutorings.get(id).cloned())
    }

    fn tutorings(&self) -> Result<Vec<Tutoring>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.tutorings.values().cloned().collect())
    }

    fn active_tutoring_count(&self, tutor: &MemberId) -> Result<usize, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .tutorings
            .values()
            .filter(|tutoring| {
                &tutoring.tutor == tutor && tutoring.status == TutoringStatus::Active
            })
            .count())
    }

    fn commit_engagement(
        &self,
        tutoring: Tutoring,
        request: TutoringRequest,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        match state.requests.get(&request.request_id) {
            None => return Err(StoreError::NotFound),
            Some(existing) if existing.status == RequestStatus::Assigned => {
                return Err(StoreError::Conflict(format!(
                    "request {} already assigned",
                    request.request_id
                )));
            }
            Some(_) => {}
        }
        if state.tutorings.contains_key(&tutoring.tutoring_id) {
            return Err(StoreError::Conflict(format!(
                "tutoring {} already exists",
                tutoring.tutoring_id
            )));
        }

        state.requests.insert(request.request_id.clone(), request);
        state
            .tutorings
            .insert(tutoring.tutoring_id.clone(), tutoring);
        Ok(())
    }

    fn insert_session(&self, session: TutoringSession) -> Result<TutoringSession, StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        if state.sessions.contains_key(&session.session_id) {
            return Err(StoreError::Conflict(format!(
                "session {} already exists",
                session.session_id
            )));
        }
        state
            .sessions
            .insert(session.session_id.clone(), session.clone());
        Ok(session)
    }

    fn update_session(&self, session: TutoringSession) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        if !state.sessions.contains_key(&session.session_id) {
            return Err(StoreError::NotFound);
        }
        state.sessions.insert(session.session_id.clone(), session);
        Ok(())
    }

    fn fetch_session(&self, id: &SessionId) -> Result<Option<TutoringSession>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.sessions.get(id).cloned())
    }

    fn sessions_for(&self, tutoring: &TutoringId) -> Result<Vec<TutoringSession>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        let mut sessions: Vec<_> = state
            .sessions
            .values()
            .filter(|session| &session.tutoring_id == tutoring)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at));
        Ok(sessions)
    }

    fn insert_feedback(&self, feedback: Feedback) -> Result<Feedback, StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.feedback.push(feedback.clone());
        Ok(feedback)
    }

    fn feedback_for(&self, tutoring: &TutoringId) -> Result<Vec<Feedback>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .feedback
            .iter()
            .filter(|entry| &entry.tutoring.tutoring_id == tutoring)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryMemberDirectory {
    members: Arc<Mutex<HashMap<MemberId, MemberRecord>>>,
    skills: Arc<Mutex<HashMap<SkillId, SkillRecord>>>,
}

impl InMemoryMemberDirectory {
    pub(crate) fn insert_member(&self, record: MemberRecord) {
        self.members
            .lock()
            .expect("directory mutex poisoned")
            .insert(record.member_id.clone(), record);
    }

    pub(crate) fn insert_skill(&self, record: SkillRecord) {
        self.skills
            .lock()
            .expect("directory mutex poisoned")
            .insert(record.skill_id.clone(), record);
    }
}

impl MemberDirectory for InMemoryMemberDirectory {
    fn member(&self, id: &MemberId) -> Result<Option<MemberRecord>, DirectoryError> {
        let members = self.members.lock().expect("directory mutex poisoned");
        Ok(members.get(id).cloned())
    }
}

impl SkillDirectory for InMemoryMemberDirectory {
    fn skill(&self, id: &SkillId) -> Result<Option<SkillRecord>, DirectoryError> {
        let skills = self.skills.lock().expect("directory mutex poisoned");
        Ok(skills.get(id).cloned())
    }
}

/// Skill catalog seeded into the in-memory directory at startup.
pub(crate) fn default_skill_catalog() -> Vec<SkillRecord> {
    [
        ("rust", "Rust fundamentals"),
        ("ownership", "Ownership and borrowing"),
        ("async", "Async and Tokio"),
        ("testing", "Test design"),
        ("web-services", "Web service architecture"),
    ]
    .into_iter()
    .map(|(id, name)| SkillRecord {
        skill_id: SkillId(id.to_string()),
        name: name.to_string(),
    })
    .collect()
}
