use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::tutoring::config::TutoringConfig;
use crate::workflows::tutoring::directory::{
    Clock, DirectoryError, DirectoryRole, MemberDirectory, MemberRecord, SkillDirectory,
    SkillRecord, TutorProfile,
};
use crate::workflows::tutoring::domain::{
    ChapterId, Feedback, MemberId, RequestId, RequestStatus, SessionId, SkillId, Tutoring,
    TutoringId, TutoringRequest, TutoringSession, TutoringStatus,
};
use crate::workflows::tutoring::router::tutoring_router;
use crate::workflows::tutoring::service::TutoringWorkflowService;
use crate::workflows::tutoring::store::{StoreError, TutoringStore};

pub(super) type TestService = TutoringWorkflowService<InMemoryStore, InMemoryDirectory, FixedClock>;

#[derive(Default)]
struct StoreState {
    requests: HashMap<RequestId, TutoringRequest>,
    tutorings: HashMap<TutoringId, Tutoring>,
    sessions: HashMap<SessionId, TutoringSession>,
    feedback: Vec<Feedback>,
}

/// Single-mutex store so the compound engagement commit is atomic the way
/// the production store contract demands.
#[derive(Default, Clone)]
pub(super) struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl TutoringStore for InMemoryStore {
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
pub(super) struct InMemoryDirectory {
    members: Arc<Mutex<HashMap<MemberId, MemberRecord>>>,
    skills: Arc<Mutex<HashMap<SkillId, SkillRecord>>>,
}

impl InMemoryDirectory {
    pub(super) fn insert_member(&self, record: MemberRecord) {
        self.members
            .lock()
            .expect("directory mutex poisoned")
            .insert(record.member_id.clone(), record);
    }

    pub(super) fn insert_skill(&self, record: SkillRecord) {
        self.skills
            .lock()
            .expect("directory mutex poisoned")
            .insert(record.skill_id.clone(), record);
    }
}

impl MemberDirectory for InMemoryDirectory {
    fn member(&self, id: &MemberId) -> Result<Option<MemberRecord>, DirectoryError> {
        let members = self.members.lock().expect("directory mutex poisoned");
        Ok(members.get(id).cloned())
    }
}

impl SkillDirectory for InMemoryDirectory {
    fn skill(&self, id: &SkillId) -> Result<Option<SkillRecord>, DirectoryError> {
        let skills = self.skills.lock().expect("directory mutex poisoned");
        Ok(skills.get(id).cloned())
    }
}

/// Clock pinned to a constant instant so transition timestamps are exact.
#[derive(Debug, Clone, Copy)]
pub(super) struct FixedClock(pub(super) DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(super) fn test_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 3, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(test_instant()))
}

/// Fake that refuses every call, for collaborator-outage paths.
pub(super) struct UnavailableStore;

impl TutoringStore for UnavailableStore {
    fn insert_request(&self, _request: TutoringRequest) -> Result<TutoringRequest, StoreError> {
        Err(offline())
    }

    fn update_request(&self, _request: TutoringRequest) -> Result<(), StoreError> {
        Err(offline())
    }

    fn fetch_request(&self, _id: &RequestId) -> Result<Option<TutoringRequest>, StoreError> {
        Err(offline())
    }

    fn requests(&self) -> Result<Vec<TutoringRequest>, StoreError> {
        Err(offline())
    }

    fn update_tutoring(&self, _tutoring: Tutoring) -> Result<(), StoreError> {
        Err(offline())
    }

    fn fetch_tutoring(&self, _id: &TutoringId) -> Result<Option<Tutoring>, StoreError> {
        Err(offline())
    }

    fn tutorings(&self) -> Result<Vec<Tutoring>, StoreError> {
        Err(offline())
    }

    fn active_tutoring_count(&self, _tutor: &MemberId) -> Result<usize, StoreError> {
        Err(offline())
    }

    fn commit_engagement(
        &self,
        _tutoring: Tutoring,
        _request: TutoringRequest,
    ) -> Result<(), StoreError> {
        Err(offline())
    }

    fn insert_session(&self, _session: TutoringSession) -> Result<TutoringSession, StoreError> {
        Err(offline())
    }

    fn update_session(&self, _session: TutoringSession) -> Result<(), StoreError> {
        Err(offline())
    }

    fn fetch_session(&self, _id: &SessionId) -> Result<Option<TutoringSession>, StoreError> {
        Err(offline())
    }

    fn sessions_for(&self, _tutoring: &TutoringId) -> Result<Vec<TutoringSession>, StoreError> {
        Err(offline())
    }

    fn insert_feedback(&self, _feedback: Feedback) -> Result<Feedback, StoreError> {
        Err(offline())
    }

    fn feedback_for(&self, _tutoring: &TutoringId) -> Result<Vec<Feedback>, StoreError> {
        Err(offline())
    }
}

fn offline() -> StoreError {
    StoreError::Unavailable("database offline".to_string())
}

pub(super) fn member_id(id: &str) -> MemberId {
    MemberId(id.to_string())
}

pub(super) fn chapter_id(id: &str) -> ChapterId {
    ChapterId(id.to_string())
}

pub(super) fn skill_set(ids: &[&str]) -> BTreeSet<SkillId> {
    ids.iter().map(|id| SkillId(id.to_string())).collect()
}

pub(super) fn member(id: &str, chapter: Option<&str>) -> MemberRecord {
    MemberRecord {
        member_id: member_id(id),
        display_name: format!("Member {id}"),
        chapter: chapter.map(|chapter| ChapterId(chapter.to_string())),
        role: DirectoryRole::Member,
        tutor_profile: None,
    }
}

pub(super) fn tutor(id: &str, chapter: Option<&str>, limit: Option<u32>) -> MemberRecord {
    MemberRecord {
        tutor_profile: Some(TutorProfile {
            active_tutoring_limit: limit,
        }),
        ..member(id, chapter)
    }
}

pub(super) fn admin(id: &str) -> MemberRecord {
    MemberRecord {
        role: DirectoryRole::ProgramAdmin,
        ..member(id, None)
    }
}

pub(super) fn skill(id: &str) -> SkillRecord {
    SkillRecord {
        skill_id: SkillId(id.to_string()),
        name: id.to_string(),
    }
}

pub(super) fn test_config() -> TutoringConfig {
    TutoringConfig {
        default_active_tutoring_limit: 3,
        final_act_link_prefixes: vec!["https://github.com/".to_string()],
    }
}

pub(super) fn seeded_directory() -> Arc<InMemoryDirectory> {
    let directory = Arc::new(InMemoryDirectory::default());
    directory.insert_member(member("tutee-ada", Some("des-moines")));
    directory.insert_member(member("tutee-lin", Some("ames")));
    directory.insert_member(tutor("tutor-grace", Some("des-moines"), None));
    directory.insert_member(tutor("tutor-joan", Some("ames"), Some(1)));
    directory.insert_member(admin("admin-sam"));
    directory.insert_skill(skill("rust"));
    directory.insert_skill(skill("ownership"));
    directory
}

pub(super) fn build_service() -> (Arc<TestService>, Arc<InMemoryStore>, Arc<InMemoryDirectory>) {
    build_service_with_config(test_config())
}

pub(super) fn build_service_with_config(
    config: TutoringConfig,
) -> (Arc<TestService>, Arc<InMemoryStore>, Arc<InMemoryDirectory>) {
    let store = Arc::new(InMemoryStore::default());
    let directory = seeded_directory();
    let service = Arc::new(TutoringWorkflowService::new(
        store.clone(),
        directory.clone(),
        fixed_clock(),
        config,
    ));
    (service, store, directory)
}

pub(super) fn submitted_request(service: &TestService) -> TutoringRequest {
    service
        .submit_request(
            member_id("tutee-ada"),
            skill_set(&["rust"]),
            "Learn ownership and borrowing".to_string(),
        )
        .expect("request submits")
}

pub(super) fn active_tutoring(service: &TestService) -> Tutoring {
    let request = submitted_request(service);
    service
        .create_tutoring(
            &request.request_id,
            member_id("tutor-grace"),
            "Weekly pairing on the borrow checker".to_string(),
        )
        .expect("tutoring created")
}

pub(super) fn tutoring_router_with_service(service: Arc<TestService>) -> axum::Router {
    tutoring_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 65536)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
