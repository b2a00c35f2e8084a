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

mod apply;
mod challenges;
mod collaboration;
mod command;
mod config;
mod error;
mod event;
mod policy;
mod ports;
mod reviews;
mod state;
mod submissions;
mod workflow;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::apply_transition;
pub use challenges::ChallengeService;
pub use collaboration::CollaborationService;
pub use command::{ReviewInput, SubmissionDraft, TransitionRequest};
pub use config::{DEFAULT_MAX_CONFLICT_RETRIES, WorkflowConfig};
pub use error::CoreError;
pub use event::StageChanged;
pub use policy::{AuthorizationPolicy, Decision, DenyRule, ResourceKind};
pub use ports::{
    ChallengeStore, CollaborationStore, EventSink, Repository, ReviewStore, StoreError,
    SubmissionRecord, SubmissionStore,
};
pub use reviews::ReviewService;
pub use state::{ReviewOutcome, SweepReport, TransitionResult};
pub use submissions::SubmissionService;
pub use workflow::WorkflowService;
