// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    MemoryRepo, RecordingSink, after_evaluation_deadline, after_submission_deadline,
    create_test_cause,
};
use super::{seed_challenge_submission, seed_idea, workflow};
use crate::SubmissionStore;
use ideaflow_domain::{ChallengeSubmissionStatus, IdeaStage, Stage};

#[test]
fn test_drafts_expire_at_the_submission_deadline() {
    let repo = MemoryRepo::new();
    let sink = RecordingSink::default();
    let service = workflow(&repo, &sink).with_clock(after_submission_deadline);
    let draft = seed_challenge_submission(&repo, Stage::Challenge(ChallengeSubmissionStatus::Draft));
    let submitted =
        seed_challenge_submission(&repo, Stage::Challenge(ChallengeSubmissionStatus::Submitted));
    let idea = seed_idea(&repo, Stage::Idea(IdeaStage::Draft));

    let report = service.sweep_expired(&create_test_cause()).unwrap();

    assert_eq!(report.archived, vec![draft]);
    assert!(report.failed.is_empty());
    assert_eq!(repo.load_submission(draft).unwrap().stage, "archived");
    assert_eq!(repo.load_submission(submitted).unwrap().stage, "submitted");
    assert_eq!(repo.load_submission(idea).unwrap().stage, "draft");
    assert_eq!(sink.events()[0].actor_id.value(), 0);
}

#[test]
fn test_open_submissions_expire_at_the_evaluation_deadline() {
    let repo = MemoryRepo::new();
    let sink = RecordingSink::default();
    let service = workflow(&repo, &sink).with_clock(after_evaluation_deadline);
    let under_review =
        seed_challenge_submission(&repo, Stage::Challenge(ChallengeSubmissionStatus::UnderReview));
    let winner = seed_challenge_submission(&repo, Stage::Challenge(ChallengeSubmissionStatus::Winner));

    let report = service.sweep_expired(&create_test_cause()).unwrap();

    assert_eq!(report.archived, vec![under_review]);
    assert_eq!(repo.load_submission(winner).unwrap().stage, "winner");
}

#[test]
fn test_evaluated_submissions_stay_eligible_for_winner_selection() {
    let repo = MemoryRepo::new();
    let sink = RecordingSink::default();
    let service = workflow(&repo, &sink).with_clock(after_evaluation_deadline);
    let evaluated =
        seed_challenge_submission(&repo, Stage::Challenge(ChallengeSubmissionStatus::Evaluated));
    let submitted =
        seed_challenge_submission(&repo, Stage::Challenge(ChallengeSubmissionStatus::Submitted));

    let report = service.sweep_expired(&create_test_cause()).unwrap();

    assert_eq!(report.archived, vec![submitted]);
    assert!(report.failed.is_empty());
    assert_eq!(repo.load_submission(evaluated).unwrap().stage, "evaluated");
}

#[test]
fn test_unreadable_submissions_are_reported_not_skipped() {
    let repo = MemoryRepo::new();
    let sink = RecordingSink::default();
    let service = workflow(&repo, &sink).with_clock(after_evaluation_deadline);
    let broken =
        seed_challenge_submission(&repo, Stage::Challenge(ChallengeSubmissionStatus::Submitted));
    let healthy =
        seed_challenge_submission(&repo, Stage::Challenge(ChallengeSubmissionStatus::Submitted));
    repo.corrupt_stage(broken, "judging");

    let report = service.sweep_expired(&create_test_cause()).unwrap();

    assert_eq!(report.archived, vec![healthy]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, broken);
}

#[test]
fn test_nothing_expires_before_the_deadlines() {
    let repo = MemoryRepo::new();
    let sink = RecordingSink::default();
    let service = workflow(&repo, &sink);
    seed_challenge_submission(&repo, Stage::Challenge(ChallengeSubmissionStatus::Draft));

    let report = service.sweep_expired(&create_test_cause()).unwrap();

    assert!(report.archived.is_empty());
    assert!(sink.events().is_empty());
}
