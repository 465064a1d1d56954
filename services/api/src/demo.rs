use crate::infra::{default_skill_catalog, InMemoryMemberDirectory, InMemoryTutoringStore};
use chrono::{Duration, Utc};
use clap::Args;
use mentorhub::error::AppError;
use mentorhub::workflows::roster::RosterImporter;
use mentorhub::workflows::tutoring::{
    ChapterId, DirectoryRole, MemberId, MemberRecord, ReviewDecision, SessionStatus, SkillId,
    SystemClock, TutorProfile, TutoringConfig, TutoringWorkflowService,
};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Seed the member directory from a roster CSV export instead of the
    /// built-in demo roster.
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
    /// Focus the closing dashboard on a single chapter.
    #[arg(long)]
    pub(crate) chapter: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct RosterCheckArgs {
    /// Path to the roster CSV export
    pub(crate) roster: PathBuf,
}

pub(crate) fn run_roster_check(args: RosterCheckArgs) -> Result<(), AppError> {
    let records = RosterImporter::from_path(&args.roster)?;

    let tutors = records.iter().filter(|record| record.is_tutor()).count();
    let admins = records
        .iter()
        .filter(|record| record.role.is_admin())
        .count();
    let chapters: BTreeSet<&ChapterId> = records
        .iter()
        .filter_map(|record| record.chapter.as_ref())
        .collect();

    println!("Roster export {} is valid", args.roster.display());
    println!(
        "- {} members ({} tutors, {} program admins)",
        records.len(),
        tutors,
        admins
    );
    for chapter in &chapters {
        let count = records
            .iter()
            .filter(|record| record.chapter.as_ref() == Some(chapter))
            .count();
        println!("- {}: {} members", chapter, count);
    }

    let unassigned = records
        .iter()
        .filter(|record| record.chapter.is_none())
        .count();
    if unassigned > 0 {
        println!("- {} members without a chapter", unassigned);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { roster, chapter } = args;

    println!("Tutoring workflow demo");

    let members = match roster {
        Some(path) => {
            let records = RosterImporter::from_path(&path)?;
            println!(
                "Member directory seeded from {} ({} members)",
                path.display(),
                records.len()
            );
            records
        }
        None => {
            println!("Member directory seeded from the built-in demo roster");
            demo_roster()
        }
    };

    let tutee = match members
        .iter()
        .find(|record| !record.is_tutor() && !record.role.is_admin())
    {
        Some(record) => record.clone(),
        None => {
            println!("Roster has no member eligible to act as tutee; nothing to demonstrate");
            return Ok(());
        }
    };
    let tutor = match members.iter().find(|record| record.is_tutor()) {
        Some(record) => record,
        None => {
            println!("Roster has no tutor; nothing to demonstrate");
            return Ok(());
        }
    };
    let backup_tutor = members
        .iter()
        .find(|record| record.is_tutor() && record.member_id != tutor.member_id)
        .unwrap_or(tutor)
        .clone();
    let tutor = tutor.clone();
    let admin = members
        .iter()
        .find(|record| record.role.is_admin())
        .cloned();

    let directory = Arc::new(InMemoryMemberDirectory::default());
    for skill in default_skill_catalog() {
        directory.insert_skill(skill);
    }
    for member in members {
        directory.insert_member(member);
    }

    let store = Arc::new(InMemoryTutoringStore::default());
    let service = TutoringWorkflowService::new(
        store,
        directory,
        Arc::new(SystemClock),
        TutoringConfig::default(),
    );

    println!("\nRequest intake");
    let request = match service.submit_request(
        tutee.member_id.clone(),
        skills(&["rust", "ownership"]),
        "Level up from working syntax to idiomatic ownership".to_string(),
    ) {
        Ok(request) => request,
        Err(err) => {
            println!("  Submission rejected: {}", err);
            return Ok(());
        }
    };
    println!(
        "- {} submitted request {} -> {}",
        tutee.display_name,
        request.request_id,
        request.status.label()
    );

    let request = match service.review_request(&request.request_id, ReviewDecision::Approved) {
        Ok(request) => request,
        Err(err) => {
            println!("  Review failed: {}", err);
            return Ok(());
        }
    };
    println!("- Review outcome: {}", request.status.label());

    println!("\nMatching");
    match service.can_accept_engagement(&tutor.member_id) {
        Ok(decision) => println!("- {} is {}", tutor.display_name, decision.summary()),
        Err(err) => {
            println!("  Capacity check failed: {}", err);
            return Ok(());
        }
    }

    let tutoring = match service.create_tutoring(
        &request.request_id,
        tutor.member_id.clone(),
        "Weekly pairing on ownership and the borrow checker".to_string(),
    ) {
        Ok(tutoring) => tutoring,
        Err(err) => {
            println!("  Engagement creation declined: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Engagement {} pairs {} with {} ({})",
        tutoring.tutoring_id,
        tutee.display_name,
        tutor.display_name,
        tutoring.status.label()
    );

    println!("\nSessions");
    let session = match service.schedule_session(
        &tutoring.tutoring_id,
        Utc::now() + Duration::days(3),
        60,
        Some("https://meet.example.org/rust-pairing".to_string()),
        Some("Move semantics and shared borrows".to_string()),
    ) {
        Ok(session) => session,
        Err(err) => {
            println!("  Scheduling failed: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Session {} scheduled for {} ({} minutes)",
        session.session_id,
        session.scheduled_at.format("%Y-%m-%d %H:%M"),
        session.duration_minutes
    );

    let session = match service.update_session_status(
        &session.session_id,
        SessionStatus::Completed,
        Some("Worked through aliasing and exclusive borrows".to_string()),
    ) {
        Ok(session) => session,
        Err(err) => {
            println!("  Session update failed: {}", err);
            return Ok(());
        }
    };
    println!("- Session {} -> {}", session.session_id, session.status.label());

    println!("\nCompletion");
    let tutoring = match service.complete_tutoring(
        &tutoring.tutoring_id,
        tutee.member_id.clone(),
        "https://github.com/chapter-mentoring/final-acts/pull/42".to_string(),
    ) {
        Ok(tutoring) => tutoring,
        Err(err) => {
            println!("  Completion rejected: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Engagement {} -> {}",
        tutoring.tutoring_id,
        tutoring.status.label()
    );

    let feedback = match service.record_feedback(
        tutee.member_id.clone(),
        &tutoring.tutoring_id,
        5,
        "Sessions were focused and the final project shipped".to_string(),
    ) {
        Ok(feedback) => feedback,
        Err(err) => {
            println!("  Feedback rejected: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Feedback {} recorded (score {}/5)",
        feedback.feedback_id, feedback.score
    );

    println!("\nCancellation");
    run_cancellation_leg(&service, &tutee, &backup_tutor, admin.as_ref());

    match serde_json::to_string_pretty(&tutoring.status_view()) {
        Ok(json) => println!("\nCompleted engagement payload:\n{}", json),
        Err(err) => println!("\nCompleted engagement payload unavailable: {}", err),
    }

    let chapter_filter = chapter.map(ChapterId);
    let snapshot = match service.dashboard(chapter_filter.as_ref()) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            println!("  Dashboard unavailable: {}", err);
            return Ok(());
        }
    };

    match &chapter_filter {
        Some(chapter) => println!("\nCoordinator dashboard for chapter {}", chapter),
        None => println!("\nCoordinator dashboard (program-wide)"),
    }
    render_status_counts("Requests", &snapshot.requests_by_status);
    render_status_counts("Engagements", &snapshot.tutorings_by_status);
    if snapshot.active_tutors_by_chapter.is_empty() {
        println!("Active tutors by chapter: none");
    } else {
        println!("Active tutors by chapter:");
        for (chapter, tutors) in &snapshot.active_tutors_by_chapter {
            println!("  - {}: {}", chapter, tutors);
        }
    }

    Ok(())
}

type Service =
    TutoringWorkflowService<InMemoryTutoringStore, InMemoryMemberDirectory, SystemClock>;

/// Second engagement driven into the cancellation path, confirmed by the
/// roster's program admin when one exists.
fn run_cancellation_leg(
    service: &Service,
    tutee: &MemberRecord,
    tutor: &MemberRecord,
    admin: Option<&MemberRecord>,
) {
    let request = match service.submit_request(
        tutee.member_id.clone(),
        skills(&["async"]),
        "Take the ownership work into async Rust".to_string(),
    ) {
        Ok(request) => request,
        Err(err) => {
            println!("  Follow-up submission rejected: {}", err);
            return;
        }
    };

    let engagement = match service.create_tutoring(
        &request.request_id,
        tutor.member_id.clone(),
        "Async executors and cancellation safety".to_string(),
    ) {
        Ok(engagement) => engagement,
        Err(err) => {
            println!("  Follow-up engagement declined: {}", err);
            return;
        }
    };

    let engagement = match service.request_cancellation(
        &engagement.tutoring_id,
        tutee.member_id.clone(),
        "Travel schedule changed for the quarter".to_string(),
    ) {
        Ok(engagement) => engagement,
        Err(err) => {
            println!("  Cancellation request failed: {}", err);
            return;
        }
    };
    println!(
        "- {} asked to cancel engagement {} ({})",
        tutee.display_name,
        engagement.tutoring_id,
        engagement.status.label()
    );

    match admin {
        Some(admin) => {
            match service.cancel_tutoring(
                &engagement.tutoring_id,
                admin.member_id.clone(),
                "Confirmed with both parties; re-match next quarter".to_string(),
            ) {
                Ok(engagement) => println!(
                    "- {} confirmed the cancellation ({})",
                    admin.display_name,
                    engagement.status.label()
                ),
                Err(err) => println!("  Cancellation confirmation failed: {}", err),
            }
        }
        None => println!("- No program admin in the roster; the cancellation stays pending"),
    }
}

fn render_status_counts(heading: &str, counts: &BTreeMap<&'static str, usize>) {
    println!("{}:", heading);
    if counts.is_empty() {
        println!("  - none");
    }
    for (status, count) in counts {
        println!("  - {}: {}", status, count);
    }
}

fn skills(ids: &[&str]) -> BTreeSet<SkillId> {
    ids.iter().map(|id| SkillId(id.to_string())).collect()
}

fn demo_roster() -> Vec<MemberRecord> {
    vec![
        demo_member("ada-lovelace", "Ada Lovelace", Some("des-moines"), None),
        demo_member(
            "grace-hopper",
            "Grace Hopper",
            Some("des-moines"),
            Some(TutorProfile {
                active_tutoring_limit: Some(2),
            }),
        ),
        demo_member(
            "joan-clarke",
            "Joan Clarke",
            Some("ames"),
            Some(TutorProfile {
                active_tutoring_limit: None,
            }),
        ),
        MemberRecord {
            role: DirectoryRole::ProgramAdmin,
            ..demo_member("sam-reyes", "Sam Reyes", None, None)
        },
    ]
}

fn demo_member(
    id: &str,
    name: &str,
    chapter: Option<&str>,
    tutor_profile: Option<TutorProfile>,
) -> MemberRecord {
    MemberRecord {
        member_id: MemberId(id.to_string()),
        display_name: name.to_string(),
        chapter: chapter.map(|chapter| ChapterId(chapter.to_string())),
        role: DirectoryRole::Member,
        tutor_profile,
    }
}
