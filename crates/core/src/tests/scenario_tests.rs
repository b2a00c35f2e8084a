// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    AUTHOR, BOARD, MANAGER, MemoryRepo, OUTSIDER, RecordingSink, SME, actor,
    after_submission_deadline, create_test_cause,
};
use super::{seed_idea, workflow};
use crate::{
    ChallengeService, CoreError, DenyRule, ReviewInput, ReviewService, SubmissionDraft,
    SubmissionService, TransitionRequest,
};
use ideaflow_domain::{
    ChallengeStatus, DomainError, IdeaStage, NewChallenge, ReviewDecision, Role, Stage, UserId,
    WorkflowAction,
};
use time::macros::datetime;

#[test]
fn test_rejected_idea_returns_to_draft_and_cannot_be_deleted() {
    let repo = MemoryRepo::new();
    let sink = RecordingSink::default();
    let service = workflow(&repo, &sink);
    let submissions = SubmissionService::new(&service);
    let reviews = ReviewService::new(&service);
    let cause = create_test_cause();
    let author = actor(AUTHOR, &[Role::User]);
    let manager = actor(MANAGER, &[Role::Manager]);

    let idea = submissions
        .create_idea(&author, &SubmissionDraft::titled("Paperless expense claims"), &cause)
        .unwrap();
    let id = idea.id();

    service
        .request_transition(&author, &TransitionRequest::new(id, WorkflowAction::Submit), &cause)
        .unwrap();
    let in_review = service
        .request_transition(&manager, &TransitionRequest::new(id, WorkflowAction::Approve), &cause)
        .unwrap();
    assert_eq!(in_review.submission.stage(), Stage::Idea(IdeaStage::ManagerReview));

    let approved = reviews
        .submit_review(&manager, id, &ReviewInput::new(ReviewDecision::Approved), &cause)
        .unwrap();
    assert_eq!(
        approved.transition.unwrap().submission.stage(),
        Stage::Idea(IdeaStage::SmeReview)
    );

    let rejected = reviews
        .submit_review(
            &actor(SME, &[Role::Sme]),
            id,
            &ReviewInput::new(ReviewDecision::Rejected),
            &cause,
        )
        .unwrap();
    assert_eq!(
        rejected.transition.unwrap().submission.stage(),
        Stage::Idea(IdeaStage::Draft)
    );

    submissions
        .update_details(&author, id, &SubmissionDraft::titled("Paperless expense claims v2"), &cause)
        .unwrap();

    let err = submissions.delete(&author, id, &cause).unwrap_err();
    assert!(matches!(
        err,
        CoreError::Unauthorized {
            rule: DenyRule::AttachedRecordsExist,
            ..
        }
    ));
}

#[test]
fn test_needs_changes_at_any_review_stage_allows_resubmission() {
    for (stage, reviewer, role) in [
        (IdeaStage::ManagerReview, MANAGER, Role::Manager),
        (IdeaStage::SmeReview, SME, Role::Sme),
        (IdeaStage::BoardReview, BOARD, Role::BoardMember),
    ] {
        let repo = MemoryRepo::new();
        let sink = RecordingSink::default();
        let service = workflow(&repo, &sink);
        let id = seed_idea(&repo, Stage::Idea(stage));
        let cause = create_test_cause();

        let outcome = ReviewService::new(&service)
            .submit_review(
                &actor(reviewer, &[role]),
                id,
                &ReviewInput::new(ReviewDecision::NeedsChanges),
                &cause,
            )
            .unwrap();
        assert_eq!(
            outcome.transition.unwrap().submission.stage(),
            Stage::Idea(IdeaStage::Draft),
            "needs changes at {stage}"
        );

        let resubmitted = service
            .request_transition(
                &actor(AUTHOR, &[Role::User]),
                &TransitionRequest::new(id, WorkflowAction::Submit),
                &cause,
            )
            .unwrap();
        assert_eq!(resubmitted.submission.stage(), Stage::Idea(IdeaStage::Submitted));
    }
}

#[test]
fn test_submission_after_challenge_deadline_is_a_precondition_failure() {
    let repo = MemoryRepo::new();
    let sink = RecordingSink::default();
    let service = workflow(&repo, &sink);
    let cause = create_test_cause();
    let manager = actor(MANAGER, &[Role::Manager]);

    let challenges = ChallengeService::new(&service);
    let challenge = challenges
        .create_challenge(
            &manager,
            &NewChallenge::new(
                "Reduce printer waste",
                MANAGER,
                datetime!(2026-04-01 00:00 UTC),
                datetime!(2026-05-01 00:00 UTC),
            )
            .unwrap(),
            &cause,
        )
        .unwrap();
    challenges
        .change_status(&manager, challenge.id, ChallengeStatus::Active, &cause)
        .unwrap();

    SubmissionService::new(&service)
        .create_challenge_submission(
            &actor(OUTSIDER, &[Role::User]),
            challenge.id,
            &SubmissionDraft::titled("Default duplex printing"),
            &cause,
        )
        .unwrap();

    let late_service = workflow(&repo, &sink).with_clock(after_submission_deadline);
    let err = SubmissionService::new(&late_service)
        .create_challenge_submission(
            &actor(UserId::new(77), &[Role::User]),
            challenge.id,
            &SubmissionDraft::titled("Toner recycling"),
            &cause,
        )
        .unwrap_err();

    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::SubmissionDeadlinePassed { .. })
    ));
}
