// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::policy::DenyRule;
use crate::ports::StoreError;
use ideaflow_domain::{DomainError, Stage, SubmissionId, WorkflowAction};

/// Errors that can occur while handling a workflow request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The policy denied the request. Nothing was changed.
    Unauthorized {
        /// The operation that was attempted.
        action: String,
        /// The rule that denied it.
        rule: DenyRule,
    },
    /// The stage table has no edge for this action from the current stage.
    InvalidTransition {
        /// The stage the submission is in.
        from: Stage,
        /// The requested action.
        action: WorkflowAction,
    },
    /// The submission changed underneath the request.
    Conflict {
        /// The contested submission.
        submission_id: SubmissionId,
    },
    /// A stored submission could not be read back into a valid state.
    CorruptState {
        /// The unreadable submission.
        submission_id: SubmissionId,
        /// What could not be read.
        detail: String,
    },
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// A referenced record does not exist.
    NotFound {
        /// The kind of record.
        entity: &'static str,
        /// Its identifier.
        id: i64,
    },
    /// The store failed for a reason unrelated to the request.
    Storage(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized { action, rule } => {
                write!(f, "Not authorized to {action}: {rule}")
            }
            Self::InvalidTransition { from, action } => {
                write!(f, "Cannot {action} from stage {from}")
            }
            Self::Conflict { submission_id } => {
                write!(f, "Submission {submission_id} was modified concurrently")
            }
            Self::CorruptState {
                submission_id,
                detail,
            } => write!(f, "Submission {submission_id} is in a corrupt state: {detail}"),
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            Self::Storage(msg) => write!(f, "Storage error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            StoreError::VersionConflict { id } => Self::Conflict {
                submission_id: SubmissionId::new(id),
            },
            StoreError::Duplicate(msg) | StoreError::Backend(msg) => Self::Storage(msg),
        }
    }
}
