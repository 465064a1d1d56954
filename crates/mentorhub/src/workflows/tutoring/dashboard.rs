use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;

use super::directory::{MemberDirectory, MemberRecord};
use super::domain::{ChapterId, MemberId, TutoringStatus, WorkflowError};
use super::store::TutoringStore;

/// Program-wide (or chapter-filtered) counts for the coordinator dashboard.
/// Absent statuses are omitted rather than zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub requests_by_status: BTreeMap<&'static str, usize>,
    pub tutorings_by_status: BTreeMap<&'static str, usize>,
    pub active_tutors_by_chapter: BTreeMap<String, usize>,
}

/// Read-only projection over the store; mutates nothing.
///
/// Chapter attribution: a request counts toward its tutee's chapter, an
/// engagement toward its tutor's. Under a chapter filter, rows whose
/// member the directory cannot resolve are excluded; without a filter the
/// totals are program-wide and such rows still count toward the status
/// maps. Reads are not required to be linearizable with concurrent writes.
pub struct DashboardAggregator<S, D> {
    store: Arc<S>,
    directory: Arc<D>,
}

impl<S, D> DashboardAggregator<S, D>
where
    S: TutoringStore + 'static,
    D: MemberDirectory + 'static,
{
    pub fn new(store: Arc<S>, directory: Arc<D>) -> Self {
        Self { store, directory }
    }

    pub fn dashboard(
        &self,
        chapter: Option<&ChapterId>,
    ) -> Result<DashboardSnapshot, WorkflowError> {
        let requests = self.store.requests()?;
        let tutorings = self.store.tutorings()?;

        let mut records: BTreeMap<MemberId, Option<MemberRecord>> = BTreeMap::new();
        for request in &requests {
            if !records.contains_key(&request.tutee) {
                records.insert(request.tutee.clone(), self.directory.member(&request.tutee)?);
            }
        }
        for tutoring in &tutorings {
            if !records.contains_key(&tutoring.tutor) {
                records.insert(
                    tutoring.tutor.clone(),
                    self.directory.member(&tutoring.tutor)?,
                );
            }
        }

        let included = |member: &MemberId| match chapter {
            None => true,
            Some(filter) => records
                .get(member)
                .and_then(|record| record.as_ref())
                .map(|record| record.chapter.as_ref() == Some(filter))
                .unwrap_or(false),
        };
        let chapter_of = |member: &MemberId| {
            records
                .get(member)
                .and_then(|record| record.as_ref())
                .and_then(|record| record.chapter.clone())
        };

        let mut requests_by_status: BTreeMap<&'static str, usize> = BTreeMap::new();
        for request in &requests {
            if !included(&request.tutee) {
                continue;
            }
            *requests_by_status.entry(request.status.label()).or_insert(0) += 1;
        }

        let mut tutorings_by_status: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut active_tutors: BTreeMap<String, BTreeSet<MemberId>> = BTreeMap::new();
        for tutoring in &tutorings {
            if !included(&tutoring.tutor) {
                continue;
            }
            *tutorings_by_status
                .entry(tutoring.status.label())
                .or_insert(0) += 1;

            if tutoring.status == TutoringStatus::Active {
                if let Some(chapter_id) = chapter_of(&tutoring.tutor) {
                    active_tutors
                        .entry(chapter_id.0)
                        .or_default()
                        .insert(tutoring.tutor.clone());
                }
            }
        }

        let active_tutors_by_chapter = active_tutors
            .into_iter()
            .map(|(chapter, tutors)| (chapter, tutors.len()))
            .collect();

        Ok(DashboardSnapshot {
            requests_by_status,
            tutorings_by_status,
            active_tutors_by_chapter,
        })
    }
}
