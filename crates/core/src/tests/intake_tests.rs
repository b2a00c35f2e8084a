// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    AUTHOR, MemoryRepo, OUTSIDER, RecordingSink, TEAMMATE, actor, create_test_cause,
};
use super::{seed_idea, workflow};
use crate::{CoreError, DenyRule, SubmissionDraft, SubmissionService};
use ideaflow_domain::{
    ChallengeStatus, DomainError, IdeaStage, Role, Stage, SubmissionKind,
};

#[test]
fn test_create_idea_starts_in_draft() {
    let repo = MemoryRepo::new();
    let sink = RecordingSink::default();
    let service = workflow(&repo, &sink);
    let draft = SubmissionDraft {
        title: String::from("  Shared parking rota  "),
        team_members: vec![TEAMMATE, AUTHOR],
        collaboration_enabled: true,
    };

    let submission = SubmissionService::new(&service)
        .create_idea(&actor(AUTHOR, &[Role::User]), &draft, &create_test_cause())
        .unwrap();

    assert_eq!(submission.kind(), SubmissionKind::Idea);
    assert_eq!(submission.stage(), Stage::Idea(IdeaStage::Draft));
    assert_eq!(submission.title(), "Shared parking rota");
    assert_eq!(submission.team_members().len(), 1);
    assert_eq!(sink.audit_actions(), vec![String::from("CreateSubmission")]);
}

#[test]
fn test_blank_title_is_rejected() {
    let repo = MemoryRepo::new();
    let sink = RecordingSink::default();
    let service = workflow(&repo, &sink);

    let err = SubmissionService::new(&service)
        .create_idea(
            &actor(AUTHOR, &[Role::User]),
            &SubmissionDraft::titled("   "),
            &create_test_cause(),
        )
        .unwrap_err();

    assert!(matches!(err, CoreError::DomainViolation(DomainError::InvalidTitle(_))));
}

#[test]
fn test_second_submission_to_a_challenge_is_rejected_first() {
    let repo = MemoryRepo::new();
    let sink = RecordingSink::default();
    let service = workflow(&repo, &sink);
    let submissions = SubmissionService::new(&service);
    let challenge_id = repo.seed_challenge();
    let participant = actor(OUTSIDER, &[Role::User]);
    let cause = create_test_cause();

    submissions
        .create_challenge_submission(&participant, challenge_id, &SubmissionDraft::titled("First"), &cause)
        .unwrap();

    // Closing the challenge must not change which rule rejects the duplicate.
    repo.set_challenge_status(challenge_id, ChallengeStatus::Closed);
    let err = submissions
        .create_challenge_submission(&participant, challenge_id, &SubmissionDraft::titled("Second"), &cause)
        .unwrap_err();

    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::DuplicateParticipant {
            challenge_id,
            user_id: OUTSIDER,
        })
    );
}

#[test]
fn test_inactive_challenge_takes_no_submissions() {
    let repo = MemoryRepo::new();
    let sink = RecordingSink::default();
    let service = workflow(&repo, &sink);
    let challenge_id = repo.seed_challenge();
    repo.set_challenge_status(challenge_id, ChallengeStatus::Closed);

    let err = SubmissionService::new(&service)
        .create_challenge_submission(
            &actor(OUTSIDER, &[Role::User]),
            challenge_id,
            &SubmissionDraft::titled("Late idea"),
            &create_test_cause(),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::ChallengeNotActive { .. })
    ));
}

#[test]
fn test_owner_edits_only_while_editable() {
    let repo = MemoryRepo::new();
    let sink = RecordingSink::default();
    let service = workflow(&repo, &sink);
    let submissions = SubmissionService::new(&service);
    let draft_id = seed_idea(&repo, Stage::Idea(IdeaStage::Draft));
    let review_id = seed_idea(&repo, Stage::Idea(IdeaStage::ManagerReview));
    let author = actor(AUTHOR, &[Role::User]);
    let cause = create_test_cause();
    let edit = SubmissionDraft::titled("Self-service resets, phase two");

    let updated = submissions.update_details(&author, draft_id, &edit, &cause).unwrap();
    assert_eq!(updated.title(), "Self-service resets, phase two");
    assert!(!updated.collaboration_enabled());

    let err = submissions
        .update_details(&author, review_id, &edit, &cause)
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Unauthorized {
            rule: DenyRule::StageNotEditable,
            ..
        }
    ));
}

#[test]
fn test_delete_removes_an_unreviewed_draft() {
    let repo = MemoryRepo::new();
    let sink = RecordingSink::default();
    let service = workflow(&repo, &sink);
    let id = seed_idea(&repo, Stage::Idea(IdeaStage::Draft));

    SubmissionService::new(&service)
        .delete(&actor(TEAMMATE, &[Role::User]), id, &create_test_cause())
        .unwrap();

    assert!(matches!(service.load(id), Err(CoreError::NotFound { .. })));
    assert_eq!(sink.audit_actions(), vec![String::from("DeleteSubmission")]);
}
