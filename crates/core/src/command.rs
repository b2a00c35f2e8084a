// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use ideaflow_domain::{ReviewDecision, ReviewStage, Stage, SubmissionId, UserId, WorkflowAction};

/// A request to move a submission along one edge.
///
/// `expected_stage` is the stage the caller saw. When set, the request is
/// refused with a conflict if the submission has moved since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRequest {
    pub submission_id: SubmissionId,
    pub action: WorkflowAction,
    pub expected_stage: Option<Stage>,
}

impl TransitionRequest {
    #[must_use]
    pub const fn new(submission_id: SubmissionId, action: WorkflowAction) -> Self {
        Self {
            submission_id,
            action,
            expected_stage: None,
        }
    }

    #[must_use]
    pub const fn expecting(mut self, stage: Stage) -> Self {
        self.expected_stage = Some(stage);
        self
    }
}

/// Editable content of a new submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionDraft {
    pub title: String,
    pub team_members: Vec<UserId>,
    pub collaboration_enabled: bool,
}

impl SubmissionDraft {
    #[must_use]
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }
}

/// A reviewer's decision on a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewInput {
    /// Required for challenge submissions. For ideas the stage is taken from
    /// the submission when omitted.
    pub stage: Option<ReviewStage>,
    pub decision: ReviewDecision,
    pub score: Option<u8>,
    pub comment: Option<String>,
}

impl ReviewInput {
    #[must_use]
    pub const fn new(decision: ReviewDecision) -> Self {
        Self {
            stage: None,
            decision,
            score: None,
            comment: None,
        }
    }

    #[must_use]
    pub const fn at_stage(mut self, stage: ReviewStage) -> Self {
        self.stage = Some(stage);
        self
    }

    #[must_use]
    pub const fn with_score(mut self, score: u8) -> Self {
        self.score = Some(score);
        self
    }
}
