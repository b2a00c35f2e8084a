// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::stage::SubmissionKind;
use crate::types::{ChallengeId, SubmissionId, UserId};
use time::OffsetDateTime;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Role name is not recognized.
    InvalidRole(String),
    /// Account status is not recognized.
    InvalidAccountStatus(String),
    /// A stage string does not name a stage of the given submission kind.
    InvalidStage {
        /// The kind of submission the stage was parsed for.
        kind: SubmissionKind,
        /// The unparseable stage value.
        stage: String,
    },
    /// Workflow action name is not recognized.
    InvalidAction(String),
    /// Challenge status is not recognized.
    InvalidChallengeStatus(String),
    /// Review decision is not recognized.
    InvalidReviewDecision(String),
    /// Review stage is not recognized.
    InvalidReviewStage(String),
    /// Evaluation outcome is not recognized.
    InvalidEvaluationOutcome(String),
    /// Collaboration status or kind is not recognized.
    InvalidCollaborationStatus(String),
    /// A lifecycle transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition is rejected.
        reason: String,
    },
    /// The stage table leaves a non-terminal stage without an exit, or
    /// gives a terminal stage one.
    StageMachineIncomplete {
        /// The offending stage.
        stage: String,
        /// What is wrong with it.
        reason: String,
    },
    /// The challenge is not accepting submissions.
    ChallengeNotActive {
        /// The challenge.
        challenge_id: ChallengeId,
        /// Its current status.
        status: String,
    },
    /// The challenge submission deadline has passed.
    SubmissionDeadlinePassed {
        /// The challenge.
        challenge_id: ChallengeId,
        /// The deadline that was missed.
        deadline: OffsetDateTime,
    },
    /// The participant already has a submission for this challenge.
    DuplicateParticipant {
        /// The challenge.
        challenge_id: ChallengeId,
        /// The participant.
        user_id: UserId,
    },
    /// Evaluation was requested before every required review resolved.
    ReviewsUnresolved {
        /// The submission being evaluated.
        submission_id: SubmissionId,
        /// Review stages still missing a resolved decision.
        missing: Vec<String>,
    },
    /// A challenge submission review needs an explicit review stage.
    ReviewStageRequired(SubmissionId),
    /// Review score outside the accepted range.
    InvalidScore(u8),
    /// The reviewer is the author, a team member, or the challenge owner.
    ConflictedReviewer {
        /// The submission.
        submission_id: SubmissionId,
        /// The conflicted reviewer.
        reviewer_id: UserId,
    },
    /// An open collaboration already exists for this user.
    DuplicateCollaboration {
        /// The submission.
        submission_id: SubmissionId,
        /// The collaborator.
        user_id: UserId,
    },
    /// The user is already the author or a team member.
    AlreadyParticipant {
        /// The submission.
        submission_id: SubmissionId,
        /// The user.
        user_id: UserId,
    },
    /// The submission does not belong to the supplied challenge.
    MismatchedChallenge {
        /// The submission.
        submission_id: SubmissionId,
        /// The challenge that was supplied.
        challenge_id: ChallengeId,
    },
    /// A challenge-scoped operation was given a submission with no challenge.
    MissingChallenge(SubmissionId),
    /// Submission title is empty.
    InvalidTitle(String),
    /// The id is outside the account range and cannot name a user.
    ReservedUserId(UserId),
    /// The configured system actor uses an id from the account range.
    SystemActorIsAccount(UserId),
    /// Evaluation deadline precedes the submission deadline.
    InvalidDeadlines {
        /// The submission deadline.
        submission_deadline: OffsetDateTime,
        /// The evaluation deadline.
        evaluation_deadline: OffsetDateTime,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRole(msg) => write!(f, "Invalid role: {msg}"),
            Self::InvalidAccountStatus(msg) => write!(f, "Invalid account status: {msg}"),
            Self::InvalidStage { kind, stage } => {
                write!(f, "Invalid {} stage: '{stage}'", kind.as_str())
            }
            Self::InvalidAction(msg) => write!(f, "Invalid workflow action: {msg}"),
            Self::InvalidChallengeStatus(msg) => write!(f, "Invalid challenge status: {msg}"),
            Self::InvalidReviewDecision(msg) => write!(f, "Invalid review decision: {msg}"),
            Self::InvalidReviewStage(msg) => write!(f, "Invalid review stage: {msg}"),
            Self::InvalidEvaluationOutcome(msg) => {
                write!(f, "Invalid evaluation outcome: {msg}")
            }
            Self::InvalidCollaborationStatus(msg) => {
                write!(f, "Invalid collaboration status: {msg}")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Invalid status transition from {from} to {to}: {reason}")
            }
            Self::StageMachineIncomplete { stage, reason } => {
                write!(f, "Stage table is inconsistent at '{stage}': {reason}")
            }
            Self::ChallengeNotActive {
                challenge_id,
                status,
            } => write!(
                f,
                "Challenge {challenge_id} is not accepting submissions (status: {status})"
            ),
            Self::SubmissionDeadlinePassed {
                challenge_id,
                deadline,
            } => write!(
                f,
                "Submission deadline for challenge {challenge_id} passed at {deadline}"
            ),
            Self::DuplicateParticipant {
                challenge_id,
                user_id,
            } => write!(
                f,
                "User {user_id} already has a submission for challenge {challenge_id}"
            ),
            Self::ReviewsUnresolved {
                submission_id,
                missing,
            } => write!(
                f,
                "Submission {submission_id} is missing resolved reviews for: {}",
                missing.join(", ")
            ),
            Self::ReviewStageRequired(submission_id) => write!(
                f,
                "A review stage must be given when reviewing challenge submission {submission_id}"
            ),
            Self::InvalidScore(score) => {
                write!(f, "Review score {score} is outside the range 0-100")
            }
            Self::ConflictedReviewer {
                submission_id,
                reviewer_id,
            } => write!(
                f,
                "User {reviewer_id} has a conflict of interest with submission {submission_id}"
            ),
            Self::DuplicateCollaboration {
                submission_id,
                user_id,
            } => write!(
                f,
                "User {user_id} already has an open collaboration on submission {submission_id}"
            ),
            Self::AlreadyParticipant {
                submission_id,
                user_id,
            } => write!(
                f,
                "User {user_id} is already a participant in submission {submission_id}"
            ),
            Self::MismatchedChallenge {
                submission_id,
                challenge_id,
            } => write!(
                f,
                "Submission {submission_id} does not belong to challenge {challenge_id}"
            ),
            Self::MissingChallenge(submission_id) => {
                write!(f, "Submission {submission_id} is not part of a challenge")
            }
            Self::InvalidTitle(msg) => write!(f, "Invalid title: {msg}"),
            Self::ReservedUserId(id) => write!(f, "User id {id} is reserved"),
            Self::SystemActorIsAccount(id) => {
                write!(f, "System actor id {id} collides with account ids")
            }
            Self::InvalidDeadlines {
                submission_deadline,
                evaluation_deadline,
            } => write!(
                f,
                "Evaluation deadline {evaluation_deadline} precedes submission deadline {submission_deadline}"
            ),
        }
    }
}

impl std::error::Error for DomainError {}
