// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The submission aggregate.
//!
//! A `Submission` can be built in two ways: as a fresh draft through
//! `NewSubmission::into_submission`, or hydrated from stored parts. Its stage
//! only changes through `StageMachine::apply`.

use crate::error::DomainError;
use crate::review::EvaluationOutcome;
use crate::stage::{ChallengeSubmissionStatus, Stage, SubmissionKind};
use crate::types::{ChallengeId, SubmissionId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use time::OffsetDateTime;

/// Where a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Standalone,
    Challenge {
        challenge_id: ChallengeId,
        challenge_owner: UserId,
    },
}

impl Origin {
    #[must_use]
    pub const fn kind(&self) -> SubmissionKind {
        match self {
            Self::Standalone => SubmissionKind::Idea,
            Self::Challenge { .. } => SubmissionKind::ChallengeSubmission,
        }
    }
}

/// Input for a submission that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub title: String,
    pub author_id: UserId,
    pub team_members: BTreeSet<UserId>,
    pub origin: Origin,
    pub collaboration_enabled: bool,
    pub created_at: OffsetDateTime,
}

impl NewSubmission {
    /// Creates a new draft input.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTitle` if the title is blank, or
    /// `DomainError::ReservedUserId` if the author id is not an account id.
    pub fn new(
        title: &str,
        author_id: UserId,
        origin: Origin,
        created_at: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        let title: &str = title.trim();
        if title.is_empty() {
            return Err(DomainError::InvalidTitle(String::from(
                "title must not be blank",
            )));
        }
        if !author_id.is_account() {
            return Err(DomainError::ReservedUserId(author_id));
        }
        Ok(Self {
            title: title.to_string(),
            author_id,
            team_members: BTreeSet::new(),
            origin,
            collaboration_enabled: false,
            created_at,
        })
    }

    /// Adds co-authors. The author is never listed as their own team member.
    #[must_use]
    pub fn with_team<I>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = UserId>,
    {
        let author: UserId = self.author_id;
        self.team_members
            .extend(members.into_iter().filter(|member| *member != author));
        self
    }

    #[must_use]
    pub const fn with_collaboration(mut self, enabled: bool) -> Self {
        self.collaboration_enabled = enabled;
        self
    }

    /// The stage this submission will start in.
    #[must_use]
    pub const fn initial_stage(&self) -> Stage {
        Stage::initial(self.origin.kind())
    }

    /// Builds the draft once the store has assigned an identifier.
    #[must_use]
    pub fn into_submission(self, id: SubmissionId) -> Submission {
        let stage: Stage = self.initial_stage();
        Submission {
            id,
            title: self.title,
            author_id: self.author_id,
            team_members: self.team_members,
            origin: self.origin,
            stage,
            collaboration_enabled: self.collaboration_enabled,
            created_at: self.created_at,
            last_stage_change: self.created_at,
            assigned_reviewer: None,
            evaluation_outcome: None,
            review_count: 0,
        }
    }
}

/// Stored fields of a submission, used to rebuild the aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionParts {
    pub id: SubmissionId,
    pub title: String,
    pub author_id: UserId,
    pub team_members: BTreeSet<UserId>,
    pub origin: Origin,
    pub stage: Stage,
    pub collaboration_enabled: bool,
    pub created_at: OffsetDateTime,
    pub last_stage_change: OffsetDateTime,
    pub assigned_reviewer: Option<UserId>,
    pub evaluation_outcome: Option<EvaluationOutcome>,
    pub review_count: u32,
}

/// An idea or challenge submission moving through its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    id: SubmissionId,
    title: String,
    author_id: UserId,
    team_members: BTreeSet<UserId>,
    origin: Origin,
    stage: Stage,
    collaboration_enabled: bool,
    created_at: OffsetDateTime,
    last_stage_change: OffsetDateTime,
    assigned_reviewer: Option<UserId>,
    evaluation_outcome: Option<EvaluationOutcome>,
    review_count: u32,
}

impl Submission {
    /// Rebuilds a submission from stored parts.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStage` if the stage belongs to the other
    /// lifecycle than the origin implies.
    pub fn hydrate(parts: SubmissionParts) -> Result<Self, DomainError> {
        if parts.stage.kind() != parts.origin.kind() {
            return Err(DomainError::InvalidStage {
                kind: parts.origin.kind(),
                stage: parts.stage.as_str().to_string(),
            });
        }
        let mut team_members: BTreeSet<UserId> = parts.team_members;
        team_members.remove(&parts.author_id);
        Ok(Self {
            id: parts.id,
            title: parts.title,
            author_id: parts.author_id,
            team_members,
            origin: parts.origin,
            stage: parts.stage,
            collaboration_enabled: parts.collaboration_enabled,
            created_at: parts.created_at,
            last_stage_change: parts.last_stage_change,
            assigned_reviewer: parts.assigned_reviewer,
            evaluation_outcome: parts.evaluation_outcome,
            review_count: parts.review_count,
        })
    }

    #[must_use]
    pub const fn id(&self) -> SubmissionId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub const fn author_id(&self) -> UserId {
        self.author_id
    }

    #[must_use]
    pub const fn team_members(&self) -> &BTreeSet<UserId> {
        &self.team_members
    }

    #[must_use]
    pub const fn origin(&self) -> Origin {
        self.origin
    }

    #[must_use]
    pub const fn kind(&self) -> SubmissionKind {
        self.origin.kind()
    }

    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub const fn collaboration_enabled(&self) -> bool {
        self.collaboration_enabled
    }

    #[must_use]
    pub const fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    #[must_use]
    pub const fn last_stage_change(&self) -> OffsetDateTime {
        self.last_stage_change
    }

    #[must_use]
    pub const fn assigned_reviewer(&self) -> Option<UserId> {
        self.assigned_reviewer
    }

    #[must_use]
    pub const fn evaluation_outcome(&self) -> Option<EvaluationOutcome> {
        self.evaluation_outcome
    }

    #[must_use]
    pub const fn review_count(&self) -> u32 {
        self.review_count
    }

    #[must_use]
    pub const fn challenge_id(&self) -> Option<ChallengeId> {
        match self.origin {
            Origin::Standalone => None,
            Origin::Challenge { challenge_id, .. } => Some(challenge_id),
        }
    }

    #[must_use]
    pub const fn challenge_owner(&self) -> Option<UserId> {
        match self.origin {
            Origin::Standalone => None,
            Origin::Challenge {
                challenge_owner, ..
            } => Some(challenge_owner),
        }
    }

    /// Returns true if the user is the author or a team member.
    #[must_use]
    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.author_id == user_id || self.team_members.contains(&user_id)
    }

    /// Returns a copy with new editable details. Stage is untouched.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTitle` if the title is blank.
    pub fn with_details(&self, title: &str, collaboration_enabled: bool) -> Result<Self, DomainError> {
        let title: &str = title.trim();
        if title.is_empty() {
            return Err(DomainError::InvalidTitle(String::from(
                "title must not be blank",
            )));
        }
        let mut updated: Self = self.clone();
        title.clone_into(&mut updated.title);
        updated.collaboration_enabled = collaboration_enabled;
        Ok(updated)
    }

    /// Returns a copy with the collaborator added to the team.
    #[must_use]
    pub fn with_team_member(&self, user_id: UserId) -> Self {
        let mut updated: Self = self.clone();
        if user_id != updated.author_id {
            updated.team_members.insert(user_id);
        }
        updated
    }

    /// Returns a copy with the collaborator removed from the team.
    #[must_use]
    pub fn without_team_member(&self, user_id: UserId) -> Self {
        let mut updated: Self = self.clone();
        updated.team_members.remove(&user_id);
        updated
    }

    /// Returns a copy with a stage-scoped reviewer assignment.
    #[must_use]
    pub fn with_assigned_reviewer(&self, reviewer: UserId) -> Self {
        let mut updated: Self = self.clone();
        updated.assigned_reviewer = Some(reviewer);
        updated
    }

    /// Records the evaluation outcome on an evaluated challenge submission.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` unless the submission is
    /// in the `evaluated` status.
    pub fn with_evaluation_outcome(&self, outcome: EvaluationOutcome) -> Result<Self, DomainError> {
        if self.stage != Stage::Challenge(ChallengeSubmissionStatus::Evaluated) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.stage.as_str().to_string(),
                to: ChallengeSubmissionStatus::Evaluated.as_str().to_string(),
                reason: String::from("outcomes are only recorded on evaluated submissions"),
            });
        }
        let mut updated: Self = self.clone();
        updated.evaluation_outcome = Some(outcome);
        Ok(updated)
    }

    /// Moves to a new stage. Only the stage machine calls this.
    pub(crate) fn moved_to(&self, stage: Stage, at: OffsetDateTime) -> Self {
        let mut updated: Self = self.clone();
        updated.stage = stage;
        updated.last_stage_change = at;
        updated.assigned_reviewer = None;
        updated
    }
}
