// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{CollaborationId, SubmissionId, UserId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Who opened the collaboration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaborationKind {
    /// The owner invited the collaborator.
    Invitation,
    /// The collaborator asked to join.
    JoinRequest,
}

impl CollaborationKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Invitation => "invitation",
            Self::JoinRequest => "join_request",
        }
    }
}

impl FromStr for CollaborationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invitation" => Ok(Self::Invitation),
            "join_request" => Ok(Self::JoinRequest),
            _ => Err(DomainError::InvalidCollaborationStatus(s.to_string())),
        }
    }
}

/// State of a collaboration record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaborationStatus {
    Pending,
    Accepted,
    Declined,
    Removed,
}

impl CollaborationStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Removed => "removed",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            "removed" => Ok(Self::Removed),
            _ => Err(DomainError::InvalidCollaborationStatus(s.to_string())),
        }
    }

    /// Returns true while the record blocks a second request from the same user.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Accepted)
    }

    /// Validates a collaboration status change.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` for any edge other than
    /// pending to accepted or declined, accepted to removed, and removed back
    /// to accepted.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        let valid: bool = matches!(
            (self, target),
            (Self::Pending, Self::Accepted | Self::Declined)
                | (Self::Accepted, Self::Removed)
                | (Self::Removed, Self::Accepted)
        );
        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
                reason: String::from("transition not permitted by collaboration lifecycle"),
            })
        }
    }
}

impl FromStr for CollaborationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for CollaborationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request or invitation for a user to join a submission's team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaboration {
    pub id: Option<CollaborationId>,
    pub submission_id: SubmissionId,
    pub collaborator_id: UserId,
    pub initiated_by: UserId,
    pub kind: CollaborationKind,
    pub status: CollaborationStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Collaboration {
    /// Creates a pending, unsaved collaboration.
    #[must_use]
    pub const fn pending(
        submission_id: SubmissionId,
        collaborator_id: UserId,
        initiated_by: UserId,
        kind: CollaborationKind,
        at: OffsetDateTime,
    ) -> Self {
        Self {
            id: None,
            submission_id,
            collaborator_id,
            initiated_by,
            kind,
            status: CollaborationStatus::Pending,
            created_at: at,
            updated_at: at,
        }
    }

    /// Returns a copy moved to a new status.
    ///
    /// # Errors
    ///
    /// Returns an error if the status change is not permitted.
    pub fn transition(&self, target: CollaborationStatus, at: OffsetDateTime) -> Result<Self, DomainError> {
        self.status.validate_transition(target)?;
        let mut updated: Self = self.clone();
        updated.status = target;
        updated.updated_at = at;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collaboration_edges() {
        use CollaborationStatus as S;
        assert!(S::Pending.validate_transition(S::Accepted).is_ok());
        assert!(S::Pending.validate_transition(S::Declined).is_ok());
        assert!(S::Accepted.validate_transition(S::Removed).is_ok());
        assert!(S::Removed.validate_transition(S::Accepted).is_ok());
        assert!(S::Declined.validate_transition(S::Accepted).is_err());
        assert!(S::Pending.validate_transition(S::Removed).is_err());
    }

    #[test]
    fn test_open_statuses() {
        assert!(CollaborationStatus::Pending.is_open());
        assert!(CollaborationStatus::Accepted.is_open());
        assert!(!CollaborationStatus::Declined.is_open());
        assert!(!CollaborationStatus::Removed.is_open());
    }
}
