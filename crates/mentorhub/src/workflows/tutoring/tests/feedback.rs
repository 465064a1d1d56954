use super::common::*;

use crate::workflows::tutoring::domain::{TutoringId, TutoringStatus, WorkflowError};

#[test]
fn record_feedback_embeds_the_engagement_snapshot() {
    let (service, _, _) = build_service();
    let tutoring = active_tutoring(&service);
    service
        .complete_tutoring(
            &tutoring.tutoring_id,
            member_id("tutee-ada"),
            "https://github.com/tutee-ada/final-act".to_string(),
        )
        .expect("completion succeeds");

    let feedback = service
        .record_feedback(
            member_id("tutee-ada"),
            &tutoring.tutoring_id,
            5,
            "Grace explained lifetimes until they finally clicked".to_string(),
        )
        .expect("feedback recorded");

    assert!(feedback.feedback_id.0.starts_with("fbk-"));
    assert_eq!(feedback.evaluator, member_id("tutee-ada"));
    assert_eq!(feedback.tutoring.tutoring_id, tutoring.tutoring_id);
    assert_eq!(feedback.tutoring.status, TutoringStatus::Completed);
    assert_eq!(feedback.evaluated_at, test_instant());
    assert_eq!(feedback.score, 5);

    let listed = service
        .feedback_for(&tutoring.tutoring_id)
        .expect("listing succeeds");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].feedback_id, feedback.feedback_id);
}

#[test]
fn record_feedback_fails_for_unknown_tutorings() {
    let (service, _, _) = build_service();

    match service.record_feedback(
        member_id("tutee-ada"),
        &TutoringId("tut-missing".to_string()),
        4,
        "Great".to_string(),
    ) {
        Err(WorkflowError::TutoringNotFound(_)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn record_feedback_fails_for_unknown_evaluators() {
    let (service, _, _) = build_service();
    let tutoring = active_tutoring(&service);

    match service.record_feedback(member_id("ghost"), &tutoring.tutoring_id, 4, "Great".to_string())
    {
        Err(WorkflowError::EvaluatorNotFound(member)) => {
            assert_eq!(member, member_id("ghost"));
        }
        other => panic!("expected unknown evaluator, got {other:?}"),
    }
}

#[test]
fn interim_feedback_on_an_active_engagement_is_allowed() {
    let (service, _, _) = build_service();
    let tutoring = active_tutoring(&service);

    let feedback = service
        .record_feedback(
            member_id("tutor-grace"),
            &tutoring.tutoring_id,
            4,
            "Good progress at the halfway point".to_string(),
        )
        .expect("feedback recorded");

    assert_eq!(feedback.tutoring.status, TutoringStatus::Active);
}

#[test]
fn any_directory_member_may_evaluate() {
    let (service, _, _) = build_service();
    let tutoring = active_tutoring(&service);

    let feedback = service
        .record_feedback(
            member_id("admin-sam"),
            &tutoring.tutoring_id,
            3,
            "Spot check during the chapter review".to_string(),
        )
        .expect("feedback recorded");

    assert_eq!(feedback.evaluator, member_id("admin-sam"));
}

#[test]
fn repeat_feedback_from_the_same_evaluator_is_allowed() {
    let (service, _, _) = build_service();
    let tutoring = active_tutoring(&service);

    let first = service
        .record_feedback(
            member_id("tutee-ada"),
            &tutoring.tutoring_id,
            3,
            "Midpoint check-in".to_string(),
        )
        .expect("first feedback recorded");
    let second = service
        .record_feedback(
            member_id("tutee-ada"),
            &tutoring.tutoring_id,
            5,
            "Final verdict".to_string(),
        )
        .expect("second feedback recorded");

    assert_ne!(first.feedback_id, second.feedback_id);
    let listed = service
        .feedback_for(&tutoring.tutoring_id)
        .expect("listing succeeds");
    assert_eq!(listed.len(), 2);
}

#[test]
fn the_snapshot_is_frozen_at_recording_time() {
    let (service, _, _) = build_service();
    let tutoring = active_tutoring(&service);
    service
        .record_feedback(
            member_id("tutee-ada"),
            &tutoring.tutoring_id,
            4,
            "Still running".to_string(),
        )
        .expect("feedback recorded");

    service
        .complete_tutoring(
            &tutoring.tutoring_id,
            member_id("tutee-ada"),
            "https://github.com/tutee-ada/final-act".to_string(),
        )
        .expect("completion succeeds");

    let listed = service
        .feedback_for(&tutoring.tutoring_id)
        .expect("listing succeeds");
    assert_eq!(listed[0].tutoring.status, TutoringStatus::Active);
}

#[test]
fn listing_feedback_for_unknown_tutorings_fails() {
    let (service, _, _) = build_service();

    match service.feedback_for(&TutoringId("tut-missing".to_string())) {
        Err(WorkflowError::TutoringNotFound(_)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}
