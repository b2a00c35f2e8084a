// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use ideaflow_domain::{Actor, ReviewStage};

/// Default number of retries after an optimistic-concurrency conflict.
pub const DEFAULT_MAX_CONFLICT_RETRIES: u32 = 3;

/// Tunables for the workflow services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Retries after a version conflict when the stage has not moved.
    pub max_conflict_retries: u32,
    /// The actor used for deadline sweeps and review-driven evaluation.
    pub system_actor: Actor,
    /// Review stages that must be decided before a challenge submission
    /// can be evaluated.
    pub required_challenge_reviews: Vec<ReviewStage>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: DEFAULT_MAX_CONFLICT_RETRIES,
            system_actor: Actor::system(),
            required_challenge_reviews: vec![ReviewStage::ManagerReview, ReviewStage::SmeReview],
        }
    }
}

impl WorkflowConfig {
    #[must_use]
    pub const fn with_max_conflict_retries(mut self, retries: u32) -> Self {
        self.max_conflict_retries = retries;
        self
    }

    /// Replaces the system actor. Its id must lie outside the account range.
    #[must_use]
    pub fn with_system_actor(mut self, actor: Actor) -> Self {
        self.system_actor = actor;
        self
    }

    #[must_use]
    pub fn with_required_challenge_reviews(mut self, stages: Vec<ReviewStage>) -> Self {
        self.required_challenge_reviews = stages;
        self
    }
}
