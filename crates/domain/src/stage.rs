// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Submission stages and the actions that move between them.
//!
//! Standalone ideas and challenge submissions run through different stage
//! sets. A `Stage` always carries its kind, so an idea can never be put
//! into a challenge status or the reverse.

use crate::error::DomainError;
use crate::review::ReviewStage;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which of the two lifecycles a submission follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    Idea,
    ChallengeSubmission,
}

impl SubmissionKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idea => "idea",
            Self::ChallengeSubmission => "challenge_submission",
        }
    }
}

impl std::fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stages of a standalone idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeaStage {
    Draft,
    Submitted,
    ManagerReview,
    SmeReview,
    Collaboration,
    BoardReview,
    Implementation,
    Completed,
    Archived,
}

impl IdeaStage {
    pub const ALL: [Self; 9] = [
        Self::Draft,
        Self::Submitted,
        Self::ManagerReview,
        Self::SmeReview,
        Self::Collaboration,
        Self::BoardReview,
        Self::Implementation,
        Self::Completed,
        Self::Archived,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::ManagerReview => "manager_review",
            Self::SmeReview => "sme_review",
            Self::Collaboration => "collaboration",
            Self::BoardReview => "board_review",
            Self::Implementation => "implementation",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }

    fn parse_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.as_str() == s)
    }
}

/// Statuses of a submission made against a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeSubmissionStatus {
    Draft,
    Submitted,
    UnderReview,
    Evaluated,
    Winner,
    Archived,
}

impl ChallengeSubmissionStatus {
    pub const ALL: [Self; 6] = [
        Self::Draft,
        Self::Submitted,
        Self::UnderReview,
        Self::Evaluated,
        Self::Winner,
        Self::Archived,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::Evaluated => "evaluated",
            Self::Winner => "winner",
            Self::Archived => "archived",
        }
    }

    fn parse_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

impl std::fmt::Display for IdeaStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for ChallengeSubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A position in either submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idea(IdeaStage),
    Challenge(ChallengeSubmissionStatus),
}

impl Stage {
    /// Returns every stage of both lifecycles.
    #[must_use]
    pub fn all() -> Vec<Self> {
        IdeaStage::ALL
            .into_iter()
            .map(Self::Idea)
            .chain(ChallengeSubmissionStatus::ALL.into_iter().map(Self::Challenge))
            .collect()
    }

    /// Returns the stage a new submission of the given kind starts in.
    #[must_use]
    pub const fn initial(kind: SubmissionKind) -> Self {
        match kind {
            SubmissionKind::Idea => Self::Idea(IdeaStage::Draft),
            SubmissionKind::ChallengeSubmission => {
                Self::Challenge(ChallengeSubmissionStatus::Draft)
            }
        }
    }

    /// Parses a persisted stage value for a submission of the given kind.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStage` if the value does not name a stage
    /// of that kind.
    pub fn parse(kind: SubmissionKind, value: &str) -> Result<Self, DomainError> {
        let parsed: Option<Self> = match kind {
            SubmissionKind::Idea => IdeaStage::parse_str(value).map(Self::Idea),
            SubmissionKind::ChallengeSubmission => {
                ChallengeSubmissionStatus::parse_str(value).map(Self::Challenge)
            }
        };
        parsed.ok_or_else(|| DomainError::InvalidStage {
            kind,
            stage: value.to_string(),
        })
    }

    #[must_use]
    pub const fn kind(&self) -> SubmissionKind {
        match self {
            Self::Idea(_) => SubmissionKind::Idea,
            Self::Challenge(_) => SubmissionKind::ChallengeSubmission,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idea(stage) => stage.as_str(),
            Self::Challenge(status) => status.as_str(),
        }
    }

    /// Returns true for stages with no outgoing edges.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Idea(IdeaStage::Completed | IdeaStage::Archived)
                | Self::Challenge(
                    ChallengeSubmissionStatus::Winner | ChallengeSubmissionStatus::Archived
                )
        )
    }

    /// Returns true if owners may still edit content in this stage.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(
            self,
            Self::Idea(IdeaStage::Draft)
                | Self::Challenge(
                    ChallengeSubmissionStatus::Draft | ChallengeSubmissionStatus::Submitted
                )
        )
    }

    /// Returns the review stage an idea is waiting on, if any.
    ///
    /// Challenge submissions are reviewed while `UnderReview` against several
    /// review stages at once, so they have no single review stage.
    #[must_use]
    pub const fn review_stage(&self) -> Option<ReviewStage> {
        match self {
            Self::Idea(IdeaStage::ManagerReview) => Some(ReviewStage::ManagerReview),
            Self::Idea(IdeaStage::SmeReview) => Some(ReviewStage::SmeReview),
            Self::Idea(IdeaStage::BoardReview) => Some(ReviewStage::BoardReview),
            Self::Idea(_) | Self::Challenge(_) => None,
        }
    }

    /// Returns true if the stage accepts a review at the given review stage.
    #[must_use]
    pub fn accepts_review(&self, review_stage: ReviewStage) -> bool {
        match self {
            Self::Idea(_) => self.review_stage() == Some(review_stage),
            Self::Challenge(ChallengeSubmissionStatus::UnderReview) => matches!(
                review_stage,
                ReviewStage::ManagerReview | ReviewStage::SmeReview | ReviewStage::ChallengeReview
            ),
            Self::Challenge(_) => false,
        }
    }

    /// Returns true if new collaborators may join in this stage.
    #[must_use]
    pub const fn is_collaboration_eligible(&self) -> bool {
        matches!(
            self,
            Self::Idea(
                IdeaStage::Submitted
                    | IdeaStage::ManagerReview
                    | IdeaStage::SmeReview
                    | IdeaStage::Collaboration
            ) | Self::Challenge(
                ChallengeSubmissionStatus::Draft | ChallengeSubmissionStatus::Submitted
            )
        )
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named request to move a submission along an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    Submit,
    Approve,
    Reject,
    RequestChanges,
    StartReview,
    Evaluate,
    MarkWinner,
    Archive,
}

impl WorkflowAction {
    pub const ALL: [Self; 8] = [
        Self::Submit,
        Self::Approve,
        Self::Reject,
        Self::RequestChanges,
        Self::StartReview,
        Self::Evaluate,
        Self::MarkWinner,
        Self::Archive,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::RequestChanges => "request_changes",
            Self::StartReview => "start_review",
            Self::Evaluate => "evaluate",
            Self::MarkWinner => "mark_winner",
            Self::Archive => "archive",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| DomainError::InvalidAction(s.to_string()))
    }

    /// Returns true for actions that advance along the happy path.
    #[must_use]
    pub const fn is_forward(&self) -> bool {
        matches!(
            self,
            Self::Submit | Self::Approve | Self::StartReview | Self::Evaluate | Self::MarkWinner
        )
    }

    /// Returns true for actions that record a reviewer's decision.
    #[must_use]
    pub const fn is_review_decision(&self) -> bool {
        matches!(self, Self::Approve | Self::Reject | Self::RequestChanges)
    }
}

impl FromStr for WorkflowAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
