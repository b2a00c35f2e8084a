// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Review records and how they resolve into an evaluation outcome.

use crate::conflict::is_conflicted;
use crate::error::DomainError;
use crate::role::Permission;
use crate::stage::WorkflowAction;
use crate::submission::Submission;
use crate::types::{ReviewId, SubmissionId, UserId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// The reviewing body a review is recorded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStage {
    ManagerReview,
    SmeReview,
    BoardReview,
    ChallengeReview,
}

impl ReviewStage {
    pub const ALL: [Self; 4] = [
        Self::ManagerReview,
        Self::SmeReview,
        Self::BoardReview,
        Self::ChallengeReview,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ManagerReview => "manager_review",
            Self::SmeReview => "sme_review",
            Self::BoardReview => "board_review",
            Self::ChallengeReview => "challenge_review",
        }
    }

    /// Returns the permission a reviewer needs to act at this stage.
    #[must_use]
    pub const fn required_permission(&self) -> Permission {
        match self {
            Self::ManagerReview => Permission::ReviewManagerStage,
            Self::SmeReview => Permission::ReviewSmeStage,
            Self::BoardReview => Permission::ReviewBoardStage,
            Self::ChallengeReview => Permission::ReviewChallengeStage,
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| DomainError::InvalidReviewStage(s.to_string()))
    }
}

impl FromStr for ReviewStage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for ReviewStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reviewer's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    /// The reviewer has claimed the review but not decided.
    Pending,
    Approved,
    Rejected,
    NeedsChanges,
}

impl ReviewDecision {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::NeedsChanges => "needs_changes",
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns the workflow action an idea review decision triggers.
    #[must_use]
    pub const fn workflow_action(&self) -> Option<WorkflowAction> {
        match self {
            Self::Pending => None,
            Self::Approved => Some(WorkflowAction::Approve),
            Self::Rejected => Some(WorkflowAction::Reject),
            Self::NeedsChanges => Some(WorkflowAction::RequestChanges),
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "needs_changes" => Ok(Self::NeedsChanges),
            _ => Err(DomainError::InvalidReviewDecision(s.to_string())),
        }
    }
}

impl FromStr for ReviewDecision {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The aggregate verdict on an evaluated challenge submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationOutcome {
    Approved,
    Recommended,
    Rejected,
}

impl EvaluationOutcome {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Recommended => "recommended",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true if the submission may be selected as a winner.
    #[must_use]
    pub const fn is_shortlisted(&self) -> bool {
        matches!(self, Self::Approved | Self::Recommended)
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "approved" => Ok(Self::Approved),
            "recommended" => Ok(Self::Recommended),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidEvaluationOutcome(s.to_string())),
        }
    }
}

impl FromStr for EvaluationOutcome {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for EvaluationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single reviewer's record against a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// `None` until the review has been stored.
    pub id: Option<ReviewId>,
    pub submission_id: SubmissionId,
    pub reviewer_id: UserId,
    pub stage: ReviewStage,
    pub decision: ReviewDecision,
    /// Optional score in the range 0-100.
    pub score: Option<u8>,
    pub comment: Option<String>,
    pub created_at: OffsetDateTime,
}

impl Review {
    /// Creates an unsaved review, enforcing reviewer independence.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ConflictedReviewer` if the reviewer authored,
    /// co-authored, or owns the challenge of the submission, and
    /// `DomainError::InvalidScore` if the score exceeds 100.
    pub fn new(
        submission: &Submission,
        reviewer_id: UserId,
        stage: ReviewStage,
        decision: ReviewDecision,
        score: Option<u8>,
        comment: Option<String>,
        created_at: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        if is_conflicted(reviewer_id, submission) {
            return Err(DomainError::ConflictedReviewer {
                submission_id: submission.id(),
                reviewer_id,
            });
        }
        if let Some(score) = score
            && score > 100
        {
            return Err(DomainError::InvalidScore(score));
        }

        Ok(Self {
            id: None,
            submission_id: submission.id(),
            reviewer_id,
            stage,
            decision,
            score,
            comment,
            created_at,
        })
    }
}

/// Whether the required reviews for a submission are complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewResolution {
    /// Some required review stages have no decided review yet.
    Pending { missing: Vec<ReviewStage> },
    /// Every required stage is decided.
    Resolved(EvaluationOutcome),
}

/// Resolves the reviews on a submission against the required review stages.
///
/// A stage is decided when it has at least one review and none of its reviews
/// are still pending. Once every required stage is decided, any rejection
/// yields `Rejected`, otherwise any request for changes yields `Recommended`,
/// otherwise the outcome is `Approved`.
#[must_use]
pub fn resolve_reviews(required: &[ReviewStage], reviews: &[Review]) -> ReviewResolution {
    let missing: Vec<ReviewStage> = required
        .iter()
        .copied()
        .filter(|stage| {
            let mut at_stage = reviews.iter().filter(|review| review.stage == *stage).peekable();
            at_stage.peek().is_none() || at_stage.any(|review| !review.decision.is_resolved())
        })
        .collect();

    if !missing.is_empty() {
        return ReviewResolution::Pending { missing };
    }

    let counted = reviews.iter().filter(|review| required.contains(&review.stage));
    let mut outcome: EvaluationOutcome = EvaluationOutcome::Approved;
    for review in counted {
        match review.decision {
            ReviewDecision::Rejected => return ReviewResolution::Resolved(EvaluationOutcome::Rejected),
            ReviewDecision::NeedsChanges => outcome = EvaluationOutcome::Recommended,
            ReviewDecision::Approved | ReviewDecision::Pending => {}
        }
    }
    ReviewResolution::Resolved(outcome)
}
