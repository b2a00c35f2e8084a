// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    AUTHOR, actor, after_evaluation_deadline, author, create_active_challenge,
    create_challenge_submission, create_idea, create_test_cause, create_test_persistence,
    manager, outsider, service, submit,
};
use crate::{
    ApiError, Capability, SubmitReviewRequest, TransitionSubmissionRequest, get_challenge,
    get_submission, run_deadline_sweep, submit_review, transition_submission,
};
use ideaflow::{DenyRule, SubmissionStore, TransitionRequest, WorkflowConfig, WorkflowService};
use ideaflow_domain::{Role, UserId, WorkflowAction};

fn request(submission_id: i64, action: &str) -> TransitionSubmissionRequest {
    TransitionSubmissionRequest {
        submission_id,
        action: action.to_string(),
        expected_stage: None,
    }
}

#[test]
fn test_transition_submission_reports_both_stages() {
    let persistence = create_test_persistence();
    let workflow = service(&persistence);
    let idea = create_idea(&workflow);

    let response = transition_submission(
        &workflow,
        &author(),
        &request(idea.id().value(), "submit"),
        &create_test_cause(),
    )
    .unwrap();

    assert_eq!(response.from_stage, "draft");
    assert_eq!(response.to_stage, "submitted");
    assert_eq!(response.action, "submit");
    assert_eq!(response.version, 2);
    assert_eq!(response.evaluation_outcome, None);
}

#[test]
fn test_unknown_action_is_invalid_input() {
    let persistence = create_test_persistence();
    let workflow = service(&persistence);
    let idea = create_idea(&workflow);

    let result = transition_submission(
        &workflow,
        &author(),
        &request(idea.id().value(), "promote"),
        &create_test_cause(),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "action"
    ));
}

#[test]
fn test_denied_transition_hides_the_rule() {
    let persistence = create_test_persistence();
    let workflow = service(&persistence);
    let idea = create_idea(&workflow);

    let err = transition_submission(
        &workflow,
        &outsider(),
        &request(idea.id().value(), "submit"),
        &create_test_cause(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        ApiError::Unauthorized {
            action: String::from("submit")
        }
    );
    let message: String = err.to_string();
    assert!(!message.contains(DenyRule::NotOwner.as_str()));
    assert_eq!(
        persistence.load_submission(idea.id()).unwrap().stage,
        "draft"
    );
}

#[test]
fn test_stale_expected_stage_is_conflict() {
    let persistence = create_test_persistence();
    let workflow = service(&persistence);
    let idea = create_idea(&workflow);
    submit(&workflow, &idea);

    let stale = TransitionSubmissionRequest {
        submission_id: idea.id().value(),
        action: String::from("archive"),
        expected_stage: Some(String::from("draft")),
    };
    let result = transition_submission(
        &workflow,
        &actor(UserId::new(40), &[Role::Developer]),
        &stale,
        &create_test_cause(),
    );

    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_expected_stage_must_belong_to_the_submission_kind() {
    let persistence = create_test_persistence();
    let workflow = service(&persistence);
    let idea = create_idea(&workflow);

    let result = transition_submission(
        &workflow,
        &author(),
        &TransitionSubmissionRequest {
            submission_id: idea.id().value(),
            action: String::from("submit"),
            expected_stage: Some(String::from("under_review")),
        },
        &create_test_cause(),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "stage"
    ));
}

#[test]
fn test_missing_submission_is_not_found() {
    let persistence = create_test_persistence();
    let workflow = service(&persistence);

    let result = get_submission(&workflow, &author(), 999);

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Submission"
    ));
}

#[test]
fn test_review_moves_idea_to_next_review_stage() {
    let persistence = create_test_persistence();
    let workflow = service(&persistence);
    let idea = create_idea(&workflow);
    submit(&workflow, &idea);
    workflow
        .request_transition(
            &manager(),
            &TransitionRequest::new(idea.id(), WorkflowAction::Approve),
            &create_test_cause(),
        )
        .unwrap();

    let response = submit_review(
        &workflow,
        &manager(),
        &SubmitReviewRequest {
            submission_id: idea.id().value(),
            review_stage: None,
            decision: String::from("approved"),
            score: Some(85),
            comment: Some(String::from("Clear savings")),
        },
        &create_test_cause(),
    )
    .unwrap();

    assert_eq!(response.new_stage.as_deref(), Some("sme_review"));
    assert!(response.review_id > 0);

    let shown = get_submission(&workflow, &author(), idea.id().value()).unwrap();
    assert_eq!(shown.reviews.len(), 1);
    assert_eq!(shown.reviews[0].decision, "approved");
    assert_eq!(shown.reviews[0].score, Some(85));
}

#[test]
fn test_author_cannot_review_own_idea() {
    let persistence = create_test_persistence();
    let workflow = service(&persistence);
    let idea = create_idea(&workflow);
    submit(&workflow, &idea);
    workflow
        .request_transition(
            &manager(),
            &TransitionRequest::new(idea.id(), WorkflowAction::Approve),
            &create_test_cause(),
        )
        .unwrap();

    let self_review = actor(AUTHOR, &[Role::Manager]);
    let result = submit_review(
        &workflow,
        &self_review,
        &SubmitReviewRequest {
            submission_id: idea.id().value(),
            review_stage: None,
            decision: String::from("approved"),
            score: None,
            comment: None,
        },
        &create_test_cause(),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_unknown_review_decision_is_invalid_input() {
    let persistence = create_test_persistence();
    let workflow = service(&persistence);
    let idea = create_idea(&workflow);

    let result = submit_review(
        &workflow,
        &manager(),
        &SubmitReviewRequest {
            submission_id: idea.id().value(),
            review_stage: None,
            decision: String::from("maybe"),
            score: None,
            comment: None,
        },
        &create_test_cause(),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "decision"
    ));
}

#[test]
fn test_get_submission_reports_author_capabilities() {
    let persistence = create_test_persistence();
    let workflow = service(&persistence);
    let idea = create_idea(&workflow);

    let shown = get_submission(&workflow, &author(), idea.id().value()).unwrap();

    assert_eq!(shown.submission.stage, "draft");
    assert_eq!(shown.submission.kind, "idea");
    assert_eq!(shown.submission.version, 1);
    assert_eq!(shown.submission.capabilities.can_update, Capability::Allowed);
    assert_eq!(shown.submission.capabilities.can_submit, Capability::Allowed);
    assert_eq!(shown.submission.capabilities.can_review, Capability::Denied);
    assert_eq!(shown.submission.capabilities.can_archive, Capability::Denied);
    assert_eq!(shown.submission.capabilities.can_mark_winner, Capability::Denied);
}

#[test]
fn test_get_challenge_reports_submission_count() {
    let persistence = create_test_persistence();
    let workflow = service(&persistence);
    let challenge = create_active_challenge(&workflow);
    create_challenge_submission(&workflow, &challenge, &author(), "Route batching");

    let shown = get_challenge(&workflow, &author(), challenge.id.value()).unwrap();

    assert_eq!(shown.status, "active");
    assert_eq!(shown.submission_count, 1);
    assert_eq!(shown.capabilities.can_update, Capability::Denied);
    assert_eq!(shown.capabilities.can_participate, Capability::Allowed);
}

#[test]
fn test_deadline_sweep_archives_expired_submissions() {
    let persistence = create_test_persistence();
    let workflow = service(&persistence);
    let challenge = create_active_challenge(&workflow);
    let draft = create_challenge_submission(&workflow, &challenge, &author(), "Route batching");
    let submitted =
        create_challenge_submission(&workflow, &challenge, &outsider(), "Depot consolidation");
    workflow
        .request_transition(
            &outsider(),
            &TransitionRequest::new(submitted.id(), WorkflowAction::Submit),
            &create_test_cause(),
        )
        .unwrap();

    let late = WorkflowService::new(&persistence, &persistence, WorkflowConfig::default())
        .unwrap()
        .with_clock(after_evaluation_deadline);
    let response = run_deadline_sweep(&late, &create_test_cause()).unwrap();

    let mut archived: Vec<i64> = response.archived.clone();
    archived.sort_unstable();
    let mut expected: Vec<i64> = vec![draft.id().value(), submitted.id().value()];
    expected.sort_unstable();
    assert_eq!(archived, expected);
    assert!(response.failed.is_empty());
    assert_eq!(
        persistence.load_submission(draft.id()).unwrap().stage,
        "archived"
    );
}

#[test]
fn test_deadline_sweep_before_deadlines_changes_nothing() {
    let persistence = create_test_persistence();
    let workflow = service(&persistence);
    let challenge = create_active_challenge(&workflow);
    create_challenge_submission(&workflow, &challenge, &author(), "Route batching");

    let response = run_deadline_sweep(&workflow, &create_test_cause()).unwrap();

    assert!(response.archived.is_empty());
    assert!(response.failed.is_empty());
}
