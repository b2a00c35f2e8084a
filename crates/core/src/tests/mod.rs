// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod helpers;
mod intake_tests;
mod scenario_tests;
mod sweep_tests;

use crate::{WorkflowConfig, WorkflowService};
use helpers::{AUTHOR, CHALLENGE_OWNER, MemoryRepo, RecordingSink, TEAMMATE, fixed_now};
use ideaflow_domain::{NewSubmission, Origin, Stage, SubmissionId};

fn workflow<'a>(
    repo: &'a MemoryRepo,
    sink: &'a RecordingSink,
) -> WorkflowService<'a, MemoryRepo, RecordingSink> {
    WorkflowService::new(repo, sink, WorkflowConfig::default())
        .unwrap()
        .with_clock(fixed_now)
}

/// Stores an idea by `AUTHOR` with `TEAMMATE` on the team, then forces its stage.
fn seed_idea(repo: &MemoryRepo, stage: Stage) -> SubmissionId {
    use crate::SubmissionStore;

    let new_submission = NewSubmission::new(
        "Self-service password resets",
        AUTHOR,
        Origin::Standalone,
        fixed_now(),
    )
    .unwrap()
    .with_team([TEAMMATE])
    .with_collaboration(true);
    let id = repo.insert_submission(&new_submission).unwrap();
    if stage != new_submission.initial_stage() {
        repo.set_stage(id, stage);
    }
    id
}

/// Stores a challenge submission by `AUTHOR` against a fresh challenge, then
/// forces its stage.
fn seed_challenge_submission(repo: &MemoryRepo, stage: Stage) -> SubmissionId {
    use crate::SubmissionStore;

    let challenge_id = repo.seed_challenge();
    let new_submission = NewSubmission::new(
        "Route batching",
        AUTHOR,
        Origin::Challenge {
            challenge_id,
            challenge_owner: CHALLENGE_OWNER,
        },
        fixed_now(),
    )
    .unwrap();
    let id = repo.insert_submission(&new_submission).unwrap();
    if stage != new_submission.initial_stage() {
        repo.set_stage(id, stage);
    }
    id
}
