// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod submission_tests;

use crate::{
    ChallengeId, ChallengeSubmissionStatus, IdeaStage, Origin, Stage, Submission, SubmissionId,
    SubmissionParts, UserId,
};
use std::collections::BTreeSet;
use time::macros::datetime;

pub const AUTHOR: UserId = UserId::new(1);
pub const TEAMMATE: UserId = UserId::new(2);
pub const CHALLENGE_OWNER: UserId = UserId::new(3);
pub const OUTSIDER: UserId = UserId::new(4);

pub fn idea_at(stage: IdeaStage) -> Submission {
    Submission::hydrate(SubmissionParts {
        id: SubmissionId::new(100),
        title: String::from("Self-service password resets"),
        author_id: AUTHOR,
        team_members: BTreeSet::from([TEAMMATE]),
        origin: Origin::Standalone,
        stage: Stage::Idea(stage),
        collaboration_enabled: true,
        created_at: datetime!(2026-03-01 09:00 UTC),
        last_stage_change: datetime!(2026-03-01 09:00 UTC),
        assigned_reviewer: None,
        evaluation_outcome: None,
        review_count: 0,
    })
    .expect("idea parts are consistent")
}

pub fn challenge_submission_at(status: ChallengeSubmissionStatus) -> Submission {
    Submission::hydrate(SubmissionParts {
        id: SubmissionId::new(200),
        title: String::from("Route batching"),
        author_id: AUTHOR,
        team_members: BTreeSet::new(),
        origin: Origin::Challenge {
            challenge_id: ChallengeId::new(9),
            challenge_owner: CHALLENGE_OWNER,
        },
        stage: Stage::Challenge(status),
        collaboration_enabled: false,
        created_at: datetime!(2026-03-01 09:00 UTC),
        last_stage_change: datetime!(2026-03-01 09:00 UTC),
        assigned_reviewer: None,
        evaluation_outcome: None,
        review_count: 0,
    })
    .expect("challenge submission parts are consistent")
}
