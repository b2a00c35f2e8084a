// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod audit_tests;
mod review_tests;

use crate::Persistence;
use ideaflow::{ChallengeStore, SubmissionStore};
use ideaflow_audit::{Action, Actor, AuditEvent, Cause, Snapshot};
use ideaflow_domain::{
    ChallengeId, NewChallenge, NewSubmission, Origin, SubmissionId, UserId,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub const AUTHOR: UserId = UserId::new(1);
pub const TEAMMATE: UserId = UserId::new(2);
pub const CHALLENGE_OWNER: UserId = UserId::new(3);
pub const MANAGER: UserId = UserId::new(10);

pub fn fixed_now() -> OffsetDateTime {
    datetime!(2026-03-10 12:00 UTC)
}

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("1"), String::from("user"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn create_test_audit_event(submission_id: Option<SubmissionId>, name: &str) -> AuditEvent {
    AuditEvent::new(
        submission_id,
        None,
        create_test_actor(),
        create_test_cause(),
        Action::new(name.to_string(), Some(format!("{name} details"))),
        Snapshot::new(String::from("stage=draft version=1")),
        Snapshot::new(String::from("stage=submitted version=2")),
        fixed_now(),
    )
}

pub fn insert_test_idea(persistence: &Persistence) -> SubmissionId {
    let new_submission: NewSubmission = NewSubmission::new(
        "Self-service password resets",
        AUTHOR,
        Origin::Standalone,
        fixed_now(),
    )
    .unwrap()
    .with_team([TEAMMATE])
    .with_collaboration(true);
    persistence.insert_submission(&new_submission).unwrap()
}

pub fn insert_test_challenge(persistence: &Persistence) -> ChallengeId {
    let new_challenge: NewChallenge = NewChallenge::new(
        "Reduce delivery costs",
        CHALLENGE_OWNER,
        datetime!(2026-04-01 00:00 UTC),
        datetime!(2026-05-01 00:00 UTC),
    )
    .unwrap();
    persistence.insert_challenge(&new_challenge).unwrap()
}

pub fn insert_test_challenge_submission(
    persistence: &Persistence,
    challenge_id: ChallengeId,
    author: UserId,
) -> SubmissionId {
    let new_submission: NewSubmission = NewSubmission::new(
        "Route batching",
        author,
        Origin::Challenge {
            challenge_id,
            challenge_owner: CHALLENGE_OWNER,
        },
        fixed_now(),
    )
    .unwrap();
    persistence.insert_submission(&new_submission).unwrap()
}
