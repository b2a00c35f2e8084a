// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod challenge;
mod collaboration;
mod conflict;
mod error;
mod review;
mod role;
mod stage;
mod stage_machine;
mod submission;
mod types;

#[cfg(test)]
mod tests;

pub use challenge::{Challenge, ChallengeStatus, NewChallenge};
pub use collaboration::{Collaboration, CollaborationKind, CollaborationStatus};
pub use conflict::is_conflicted;
pub use error::DomainError;
pub use review::{
    EvaluationOutcome, Review, ReviewDecision, ReviewResolution, ReviewStage, resolve_reviews,
};
pub use role::{Actor, CapabilitySet, Permission, Role};
pub use stage::{ChallengeSubmissionStatus, IdeaStage, Stage, SubmissionKind, WorkflowAction};
pub use stage_machine::StageMachine;
pub use submission::{NewSubmission, Origin, Submission, SubmissionParts};
pub use types::{AccountStatus, ChallengeId, CollaborationId, ReviewId, SubmissionId, UserId};
