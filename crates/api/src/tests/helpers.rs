// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use ideaflow::{
    ChallengeService, SubmissionDraft, SubmissionService, TransitionRequest, WorkflowConfig,
    WorkflowService,
};
use ideaflow_audit::Cause;
use ideaflow_domain::{
    AccountStatus, Actor, Challenge, ChallengeStatus, NewChallenge, Role, Submission, UserId,
    WorkflowAction,
};
use ideaflow_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

pub const AUTHOR: UserId = UserId::new(1);
pub const OUTSIDER: UserId = UserId::new(2);
pub const CHALLENGE_OWNER: UserId = UserId::new(3);
pub const MANAGER: UserId = UserId::new(10);
pub const ADMIN: UserId = UserId::new(20);

pub fn fixed_now() -> OffsetDateTime {
    datetime!(2026-03-10 12:00 UTC)
}

pub fn after_evaluation_deadline() -> OffsetDateTime {
    datetime!(2026-05-02 12:00 UTC)
}

pub fn actor(id: UserId, roles: &[Role]) -> Actor {
    Actor::new(id, roles.iter().copied(), AccountStatus::Active, true)
}

pub fn author() -> Actor {
    actor(AUTHOR, &[Role::User])
}

pub fn outsider() -> Actor {
    actor(OUTSIDER, &[Role::User])
}

pub fn manager() -> Actor {
    actor(MANAGER, &[Role::Manager])
}

pub fn challenge_owner() -> Actor {
    actor(CHALLENGE_OWNER, &[Role::Manager])
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-test"), String::from("API test request"))
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn service(persistence: &Persistence) -> WorkflowService<'_, Persistence, Persistence> {
    WorkflowService::new(persistence, persistence, WorkflowConfig::default())
        .unwrap()
        .with_clock(fixed_now)
}

pub fn create_idea(workflow: &WorkflowService<'_, Persistence, Persistence>) -> Submission {
    SubmissionService::new(workflow)
        .create_idea(
            &author(),
            &SubmissionDraft::titled("Shared parking calendar"),
            &create_test_cause(),
        )
        .unwrap()
}

pub fn submit(workflow: &WorkflowService<'_, Persistence, Persistence>, submission: &Submission) {
    workflow
        .request_transition(
            &author(),
            &TransitionRequest::new(submission.id(), WorkflowAction::Submit),
            &create_test_cause(),
        )
        .unwrap();
}

/// Creates a challenge owned by `CHALLENGE_OWNER` and opens it.
pub fn create_active_challenge(
    workflow: &WorkflowService<'_, Persistence, Persistence>,
) -> Challenge {
    let challenges = ChallengeService::new(workflow);
    let new_challenge: NewChallenge = NewChallenge::new(
        "Reduce delivery costs",
        CHALLENGE_OWNER,
        datetime!(2026-04-01 00:00 UTC),
        datetime!(2026-05-01 00:00 UTC),
    )
    .unwrap();
    let challenge: Challenge = challenges
        .create_challenge(&challenge_owner(), &new_challenge, &create_test_cause())
        .unwrap();
    challenges
        .change_status(
            &challenge_owner(),
            challenge.id,
            ChallengeStatus::Active,
            &create_test_cause(),
        )
        .unwrap()
}

pub fn create_challenge_submission(
    workflow: &WorkflowService<'_, Persistence, Persistence>,
    challenge: &Challenge,
    author: &Actor,
    title: &str,
) -> Submission {
    SubmissionService::new(workflow)
        .create_challenge_submission(
            author,
            challenge.id,
            &SubmissionDraft::titled(title),
            &create_test_cause(),
        )
        .unwrap()
}
