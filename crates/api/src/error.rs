// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API-level error types and translation from core and domain errors.
//!
//! Authorization denials are reported to callers with a generic message.
//! The denying rule is logged, never returned.

use ideaflow::CoreError;
use ideaflow_domain::DomainError;
use thiserror::Error;
use tracing::{error, warn};

/// API-level errors.
///
/// These errors are distinct from domain and core errors and represent
/// the public API contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The actor is not allowed to perform the requested operation.
    #[error("You are not allowed to {action}")]
    Unauthorized {
        /// The operation that was attempted.
        action: String,
    },

    /// A domain rule was violated.
    #[error("Domain rule violation ({rule}): {message}")]
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },

    /// The request is invalid.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that is invalid.
        field: String,
        /// A description of why the input is invalid.
        message: String,
    },

    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A description of what was not found.
        message: String,
    },

    /// The resource changed while the request was being handled.
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflict.
        message: String,
    },

    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the error.
        message: String,
    },
}

/// Translates a core error into an API error.
///
/// Denials keep the attempted operation but drop the rule that denied it.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::Unauthorized { action, rule } => {
            warn!(action = %action, rule = %rule, "Denial hidden from caller");
            ApiError::Unauthorized { action }
        }
        CoreError::InvalidTransition { from, action } => ApiError::DomainRuleViolation {
            rule: String::from("stage_transition"),
            message: format!("Cannot {action} a submission in stage {from}"),
        },
        CoreError::Conflict { submission_id } => ApiError::Conflict {
            message: format!(
                "Submission {submission_id} was changed by another request; reload and try again"
            ),
        },
        CoreError::CorruptState {
            submission_id,
            detail,
        } => {
            error!(submission_id = %submission_id, detail = %detail, "Submission needs operator attention");
            ApiError::Internal {
                message: format!("Submission {submission_id} cannot be processed"),
            }
        }
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::NotFound { entity, id } => ApiError::ResourceNotFound {
            resource_type: capitalize(entity),
            message: format!("{entity} {id} does not exist"),
        },
        CoreError::Storage(msg) => {
            error!(error = %msg, "Storage failure");
            ApiError::Internal {
                message: String::from("The request could not be stored"),
            }
        }
    }
}

/// Translates a domain error into an API error.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidRole(msg) => ApiError::InvalidInput {
            field: String::from("role"),
            message: format!("Unknown role '{msg}'"),
        },
        DomainError::InvalidAccountStatus(msg) => ApiError::InvalidInput {
            field: String::from("account_status"),
            message: format!("Unknown account status '{msg}'"),
        },
        DomainError::InvalidStage { kind, stage } => ApiError::InvalidInput {
            field: String::from("stage"),
            message: format!("'{stage}' is not a {} stage", kind.as_str()),
        },
        DomainError::InvalidAction(msg) => ApiError::InvalidInput {
            field: String::from("action"),
            message: format!("Unknown workflow action '{msg}'"),
        },
        DomainError::InvalidChallengeStatus(msg) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown challenge status '{msg}'"),
        },
        DomainError::InvalidReviewDecision(msg) => ApiError::InvalidInput {
            field: String::from("decision"),
            message: format!("Unknown review decision '{msg}'"),
        },
        DomainError::InvalidReviewStage(msg) => ApiError::InvalidInput {
            field: String::from("review_stage"),
            message: format!("Unknown review stage '{msg}'"),
        },
        DomainError::InvalidEvaluationOutcome(msg) => ApiError::InvalidInput {
            field: String::from("evaluation_outcome"),
            message: format!("Unknown evaluation outcome '{msg}'"),
        },
        DomainError::InvalidCollaborationStatus(msg) => ApiError::InvalidInput {
            field: String::from("collaboration_status"),
            message: format!("Unknown collaboration status '{msg}'"),
        },
        DomainError::InvalidStatusTransition { from, to, reason } => {
            ApiError::DomainRuleViolation {
                rule: String::from("status_transition"),
                message: format!("Cannot move from {from} to {to}: {reason}"),
            }
        }
        DomainError::StageMachineIncomplete { stage, reason } => {
            error!(stage = %stage, reason = %reason, "Stage table is inconsistent");
            ApiError::Internal {
                message: String::from("The workflow is misconfigured"),
            }
        }
        DomainError::ChallengeNotActive {
            challenge_id,
            status,
        } => ApiError::DomainRuleViolation {
            rule: String::from("challenge_active"),
            message: format!("Challenge {challenge_id} is {status} and not accepting submissions"),
        },
        DomainError::SubmissionDeadlinePassed {
            challenge_id,
            deadline,
        } => ApiError::DomainRuleViolation {
            rule: String::from("submission_deadline"),
            message: format!("The submission deadline for challenge {challenge_id} passed at {deadline}"),
        },
        DomainError::DuplicateParticipant {
            challenge_id,
            user_id,
        } => ApiError::DomainRuleViolation {
            rule: String::from("one_submission_per_participant"),
            message: format!("User {user_id} already has a submission for challenge {challenge_id}"),
        },
        DomainError::ReviewsUnresolved {
            submission_id,
            missing,
        } => ApiError::DomainRuleViolation {
            rule: String::from("reviews_resolved"),
            message: format!(
                "Submission {submission_id} is waiting on: {}",
                missing.join(", ")
            ),
        },
        DomainError::ReviewStageRequired(submission_id) => ApiError::InvalidInput {
            field: String::from("review_stage"),
            message: format!("A review stage is required for challenge submission {submission_id}"),
        },
        DomainError::InvalidScore(score) => ApiError::InvalidInput {
            field: String::from("score"),
            message: format!("Score {score} must be between 0 and 100"),
        },
        DomainError::ConflictedReviewer { submission_id, .. } => {
            warn!(submission_id = %submission_id, "Conflicted reviewer rejected");
            ApiError::Unauthorized {
                action: String::from("review the submission"),
            }
        }
        DomainError::DuplicateCollaboration {
            submission_id,
            user_id,
        } => ApiError::DomainRuleViolation {
            rule: String::from("one_open_collaboration"),
            message: format!(
                "User {user_id} already has an open collaboration on submission {submission_id}"
            ),
        },
        DomainError::AlreadyParticipant {
            submission_id,
            user_id,
        } => ApiError::DomainRuleViolation {
            rule: String::from("already_participant"),
            message: format!("User {user_id} already works on submission {submission_id}"),
        },
        DomainError::MismatchedChallenge {
            submission_id,
            challenge_id,
        } => ApiError::InvalidInput {
            field: String::from("challenge_id"),
            message: format!("Submission {submission_id} does not belong to challenge {challenge_id}"),
        },
        DomainError::MissingChallenge(submission_id) => ApiError::InvalidInput {
            field: String::from("submission_id"),
            message: format!("Submission {submission_id} is not part of a challenge"),
        },
        DomainError::InvalidTitle(msg) => ApiError::InvalidInput {
            field: String::from("title"),
            message: msg,
        },
        DomainError::ReservedUserId(user_id) => ApiError::InvalidInput {
            field: String::from("user_id"),
            message: format!("User id {user_id} is reserved and cannot name an account"),
        },
        DomainError::SystemActorIsAccount(user_id) => {
            error!(user_id = %user_id, "System actor id collides with account ids");
            ApiError::Internal {
                message: String::from("The workflow is misconfigured"),
            }
        }
        DomainError::InvalidDeadlines {
            submission_deadline,
            evaluation_deadline,
        } => ApiError::InvalidInput {
            field: String::from("evaluation_deadline"),
            message: format!(
                "Evaluation deadline {evaluation_deadline} is before submission deadline {submission_deadline}"
            ),
        },
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
