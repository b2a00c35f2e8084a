// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{AUTHOR, OUTSIDER, TEAMMATE, challenge_submission_at, idea_at};
use crate::{
    ChallengeSubmissionStatus, DomainError, EvaluationOutcome, IdeaStage, NewSubmission, Origin,
    Stage, StageMachine, Submission, SubmissionId, SubmissionKind, SubmissionParts, UserId,
    WorkflowAction,
};
use std::collections::BTreeSet;
use time::macros::datetime;

#[test]
fn test_new_submission_starts_in_draft() {
    let draft: NewSubmission = NewSubmission::new(
        "  Shared parking rota  ",
        AUTHOR,
        Origin::Standalone,
        datetime!(2026-03-01 09:00 UTC),
    )
    .unwrap()
    .with_team([AUTHOR, TEAMMATE]);

    let submission: Submission = draft.into_submission(SubmissionId::new(5));
    assert_eq!(submission.title(), "Shared parking rota");
    assert_eq!(submission.stage(), Stage::Idea(IdeaStage::Draft));
    assert_eq!(submission.team_members(), &BTreeSet::from([TEAMMATE]));
    assert_eq!(submission.last_stage_change(), submission.created_at());
}

#[test]
fn test_blank_title_is_refused() {
    let result = NewSubmission::new(
        "   ",
        AUTHOR,
        Origin::Standalone,
        datetime!(2026-03-01 09:00 UTC),
    );
    assert!(matches!(result, Err(DomainError::InvalidTitle(_))));
}

#[test]
fn test_system_actor_cannot_author() {
    let result = NewSubmission::new(
        "Shared parking rota",
        UserId::SYSTEM,
        Origin::Standalone,
        datetime!(2026-03-01 09:00 UTC),
    );
    assert_eq!(result, Err(DomainError::ReservedUserId(UserId::SYSTEM)));
    assert!(!crate::Actor::system().id().is_account());
    assert!(AUTHOR.is_account());
}

#[test]
fn test_hydrate_rejects_stage_from_other_lifecycle() {
    let result = Submission::hydrate(SubmissionParts {
        id: SubmissionId::new(1),
        title: String::from("Mixed"),
        author_id: AUTHOR,
        team_members: BTreeSet::new(),
        origin: Origin::Standalone,
        stage: Stage::Challenge(ChallengeSubmissionStatus::UnderReview),
        collaboration_enabled: false,
        created_at: datetime!(2026-03-01 09:00 UTC),
        last_stage_change: datetime!(2026-03-01 09:00 UTC),
        assigned_reviewer: None,
        evaluation_outcome: None,
        review_count: 0,
    });
    assert!(matches!(
        result,
        Err(DomainError::InvalidStage {
            kind: SubmissionKind::Idea,
            ..
        })
    ));
}

#[test]
fn test_apply_moves_stage_and_clears_assignment() {
    let machine: &StageMachine = StageMachine::standard().unwrap();
    let submission: Submission =
        idea_at(IdeaStage::ManagerReview).with_assigned_reviewer(OUTSIDER);
    let at = datetime!(2026-03-05 12:00 UTC);

    let moved: Submission = machine
        .apply(&submission, WorkflowAction::Approve, at)
        .unwrap();
    assert_eq!(moved.stage(), Stage::Idea(IdeaStage::SmeReview));
    assert_eq!(moved.last_stage_change(), at);
    assert_eq!(moved.assigned_reviewer(), None);
    assert_eq!(moved.author_id(), submission.author_id());
}

#[test]
fn test_apply_refuses_missing_edge() {
    let machine: &StageMachine = StageMachine::standard().unwrap();
    let submission: Submission = idea_at(IdeaStage::Completed);
    assert!(
        machine
            .apply(&submission, WorkflowAction::Approve, datetime!(2026-03-05 12:00 UTC))
            .is_none()
    );
}

#[test]
fn test_outcome_only_recorded_when_evaluated() {
    let under_review = challenge_submission_at(ChallengeSubmissionStatus::UnderReview);
    assert!(
        under_review
            .with_evaluation_outcome(EvaluationOutcome::Approved)
            .is_err()
    );

    let evaluated = challenge_submission_at(ChallengeSubmissionStatus::Evaluated);
    let recorded = evaluated
        .with_evaluation_outcome(EvaluationOutcome::Recommended)
        .unwrap();
    assert_eq!(
        recorded.evaluation_outcome(),
        Some(EvaluationOutcome::Recommended)
    );
}

#[test]
fn test_team_membership_changes() {
    let submission: Submission = idea_at(IdeaStage::Submitted);
    let joined: Submission = submission.with_team_member(OUTSIDER);
    assert!(joined.is_owner(OUTSIDER));
    let left: Submission = joined.without_team_member(OUTSIDER);
    assert!(!left.is_owner(OUTSIDER));
    assert!(left.with_team_member(AUTHOR).team_members().len() == 1);
}
