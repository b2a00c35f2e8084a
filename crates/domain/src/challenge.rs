// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Challenges and their lifecycle.

use crate::error::DomainError;
use crate::types::{ChallengeId, UserId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Lifecycle of a challenge.
///
/// Valid transitions are:
/// - `Draft` → `Active`
/// - `Active` → `Closed`
/// - `Closed` → `Judging`
/// - `Judging` → `ReviewCompleted`
/// - `ReviewCompleted` → `Completed`
/// - any non-archived status → `Archived`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeStatus {
    #[default]
    Draft,
    Active,
    Closed,
    Judging,
    ReviewCompleted,
    Completed,
    Archived,
}

impl ChallengeStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Closed => "closed",
            Self::Judging => "judging",
            Self::ReviewCompleted => "review_completed",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            "judging" => Ok(Self::Judging),
            "review_completed" => Ok(Self::ReviewCompleted),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            _ => Err(DomainError::InvalidChallengeStatus(s.to_string())),
        }
    }

    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Active)
                | (Self::Active, Self::Closed)
                | (Self::Closed, Self::Judging)
                | (Self::Judging, Self::ReviewCompleted)
                | (Self::ReviewCompleted, Self::Completed)
                | (
                    Self::Draft
                        | Self::Active
                        | Self::Closed
                        | Self::Judging
                        | Self::ReviewCompleted
                        | Self::Completed,
                    Self::Archived
                )
        )
    }

    /// Validates a challenge status change.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the edge does not exist.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
                reason: String::from("transition not permitted by challenge lifecycle"),
            })
        }
    }

    /// Returns true once judging has started, which is when winners may be picked.
    #[must_use]
    pub const fn allows_winner_selection(&self) -> bool {
        matches!(
            self,
            Self::Judging | Self::ReviewCompleted | Self::Completed
        )
    }
}

impl FromStr for ChallengeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for a challenge that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChallenge {
    pub title: String,
    pub created_by: UserId,
    pub submission_deadline: OffsetDateTime,
    pub evaluation_deadline: OffsetDateTime,
}

impl NewChallenge {
    /// Creates a challenge input.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is blank or the evaluation deadline is
    /// earlier than the submission deadline.
    pub fn new(
        title: &str,
        created_by: UserId,
        submission_deadline: OffsetDateTime,
        evaluation_deadline: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        let title: &str = title.trim();
        if title.is_empty() {
            return Err(DomainError::InvalidTitle(String::from(
                "challenge title must not be blank",
            )));
        }
        if evaluation_deadline < submission_deadline {
            return Err(DomainError::InvalidDeadlines {
                submission_deadline,
                evaluation_deadline,
            });
        }
        Ok(Self {
            title: title.to_string(),
            created_by,
            submission_deadline,
            evaluation_deadline,
        })
    }
}

/// A themed call for submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub title: String,
    pub created_by: UserId,
    pub status: ChallengeStatus,
    pub submission_deadline: OffsetDateTime,
    pub evaluation_deadline: OffsetDateTime,
    /// Number of submissions made against the challenge.
    pub submission_count: u32,
}

impl Challenge {
    #[must_use]
    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.created_by == user_id
    }

    /// Checks that the challenge is open for new submissions at `now`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ChallengeNotActive` if the challenge is not
    /// active, or `DomainError::SubmissionDeadlinePassed` once the deadline
    /// has been reached.
    pub fn accepts_submissions(&self, now: OffsetDateTime) -> Result<(), DomainError> {
        if self.status != ChallengeStatus::Active {
            return Err(DomainError::ChallengeNotActive {
                challenge_id: self.id,
                status: self.status.as_str().to_string(),
            });
        }
        if now >= self.submission_deadline {
            return Err(DomainError::SubmissionDeadlinePassed {
                challenge_id: self.id,
                deadline: self.submission_deadline,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn active_challenge() -> Challenge {
        Challenge {
            id: ChallengeId::new(1),
            title: String::from("Cut onboarding time"),
            created_by: UserId::new(10),
            status: ChallengeStatus::Active,
            submission_deadline: datetime!(2026-06-01 00:00 UTC),
            evaluation_deadline: datetime!(2026-07-01 00:00 UTC),
            submission_count: 0,
        }
    }

    #[test]
    fn test_lifecycle_edges() {
        assert!(ChallengeStatus::Draft.can_transition_to(ChallengeStatus::Active));
        assert!(ChallengeStatus::Judging.can_transition_to(ChallengeStatus::ReviewCompleted));
        assert!(ChallengeStatus::Completed.can_transition_to(ChallengeStatus::Archived));
        assert!(!ChallengeStatus::Archived.can_transition_to(ChallengeStatus::Archived));
        assert!(!ChallengeStatus::Draft.can_transition_to(ChallengeStatus::Judging));
        assert!(
            ChallengeStatus::Closed
                .validate_transition(ChallengeStatus::Active)
                .is_err()
        );
    }

    #[test]
    fn test_accepts_submissions_before_deadline() {
        let challenge: Challenge = active_challenge();
        assert_eq!(
            challenge.accepts_submissions(datetime!(2026-05-31 23:59 UTC)),
            Ok(())
        );
    }

    #[test]
    fn test_rejects_submissions_at_deadline() {
        let challenge: Challenge = active_challenge();
        assert!(matches!(
            challenge.accepts_submissions(datetime!(2026-06-01 00:00 UTC)),
            Err(DomainError::SubmissionDeadlinePassed { .. })
        ));
    }

    #[test]
    fn test_rejects_submissions_when_not_active() {
        let mut challenge: Challenge = active_challenge();
        challenge.status = ChallengeStatus::Closed;
        assert!(matches!(
            challenge.accepts_submissions(datetime!(2026-05-01 00:00 UTC)),
            Err(DomainError::ChallengeNotActive { .. })
        ));
    }

    #[test]
    fn test_new_challenge_rejects_inverted_deadlines() {
        let result = NewChallenge::new(
            "Greener logistics",
            UserId::new(3),
            datetime!(2026-06-01 00:00 UTC),
            datetime!(2026-05-01 00:00 UTC),
        );
        assert!(matches!(result, Err(DomainError::InvalidDeadlines { .. })));
    }
}
