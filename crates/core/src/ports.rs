// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage and event ports.
//!
//! The workflow never talks to a database directly. It reads and writes
//! through these traits, which the persistence crate implements on top of
//! `SQLite` and the tests implement in memory.

use crate::error::CoreError;
use crate::event::StageChanged;
use ideaflow_audit::AuditEvent;
use ideaflow_domain::{
    Challenge, ChallengeId, Collaboration, CollaborationId, CollaborationStatus,
    EvaluationOutcome, NewChallenge, NewSubmission, Origin, Review, ReviewId, Stage, Submission,
    SubmissionId, SubmissionKind, SubmissionParts, UserId,
};
use std::collections::BTreeSet;
use time::OffsetDateTime;

/// Errors reported by a store implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The record does not exist.
    NotFound { entity: &'static str, id: i64 },
    /// The stored version no longer matches the expected version.
    VersionConflict { id: i64 },
    /// A uniqueness constraint rejected the write.
    Duplicate(String),
    /// Any other backend failure.
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            Self::VersionConflict { id } => write!(f, "Version conflict on record {id}"),
            Self::Duplicate(msg) => write!(f, "Duplicate record: {msg}"),
            Self::Backend(msg) => write!(f, "Backend failure: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// A submission as stored, with its stage still in raw form.
///
/// `version` increases by one on every successful save and is the basis of
/// optimistic concurrency control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub title: String,
    pub author_id: UserId,
    pub team_members: Vec<UserId>,
    pub challenge_id: Option<ChallengeId>,
    pub challenge_owner: Option<UserId>,
    pub stage: String,
    pub collaboration_enabled: bool,
    pub created_at: OffsetDateTime,
    pub last_stage_change: OffsetDateTime,
    pub assigned_reviewer: Option<UserId>,
    pub evaluation_outcome: Option<String>,
    /// Number of reviews attached; maintained by the store.
    pub review_count: u32,
    pub version: i64,
}

impl SubmissionRecord {
    /// Captures a submission for saving against `version`.
    #[must_use]
    pub fn from_submission(submission: &Submission, version: i64) -> Self {
        Self {
            id: submission.id(),
            title: submission.title().to_string(),
            author_id: submission.author_id(),
            team_members: submission.team_members().iter().copied().collect(),
            challenge_id: submission.challenge_id(),
            challenge_owner: submission.challenge_owner(),
            stage: submission.stage().as_str().to_string(),
            collaboration_enabled: submission.collaboration_enabled(),
            created_at: submission.created_at(),
            last_stage_change: submission.last_stage_change(),
            assigned_reviewer: submission.assigned_reviewer(),
            evaluation_outcome: submission
                .evaluation_outcome()
                .map(|outcome| outcome.as_str().to_string()),
            review_count: submission.review_count(),
            version,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> SubmissionKind {
        if self.challenge_id.is_some() {
            SubmissionKind::ChallengeSubmission
        } else {
            SubmissionKind::Idea
        }
    }

    /// Parses the record into a submission.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::CorruptState` if the stage or outcome cannot be
    /// parsed, or a challenge submission is missing its challenge owner.
    pub fn into_submission(self) -> Result<Submission, CoreError> {
        let id: SubmissionId = self.id;
        let corrupt = |detail: String| CoreError::CorruptState {
            submission_id: id,
            detail,
        };

        let stage: Stage =
            Stage::parse(self.kind(), &self.stage).map_err(|err| corrupt(err.to_string()))?;
        let origin: Origin = match (self.challenge_id, self.challenge_owner) {
            (None, _) => Origin::Standalone,
            (Some(challenge_id), Some(challenge_owner)) => Origin::Challenge {
                challenge_id,
                challenge_owner,
            },
            (Some(challenge_id), None) => {
                return Err(corrupt(format!(
                    "challenge {challenge_id} has no recorded owner"
                )));
            }
        };
        let evaluation_outcome: Option<EvaluationOutcome> = self
            .evaluation_outcome
            .as_deref()
            .map(str::parse::<EvaluationOutcome>)
            .transpose()
            .map_err(|err| corrupt(err.to_string()))?;

        Submission::hydrate(SubmissionParts {
            id,
            title: self.title,
            author_id: self.author_id,
            team_members: self.team_members.into_iter().collect::<BTreeSet<UserId>>(),
            origin,
            stage,
            collaboration_enabled: self.collaboration_enabled,
            created_at: self.created_at,
            last_stage_change: self.last_stage_change,
            assigned_reviewer: self.assigned_reviewer,
            evaluation_outcome,
            review_count: self.review_count,
        })
        .map_err(|err| corrupt(err.to_string()))
    }
}

/// Access to stored submissions.
pub trait SubmissionStore {
    /// Loads a submission with its current version.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the submission does not exist.
    fn load_submission(&self, id: SubmissionId) -> Result<SubmissionRecord, StoreError>;

    /// Stores a new draft and returns its identifier. The version starts at 1.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Duplicate` if the participant already has a
    /// submission for the same challenge.
    fn insert_submission(&self, submission: &NewSubmission) -> Result<SubmissionId, StoreError>;

    /// Saves a submission if its stored version still equals `record.version`.
    ///
    /// Returns the new version.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::VersionConflict` if the version moved.
    fn save_submission(&self, record: &SubmissionRecord) -> Result<i64, StoreError>;

    /// Deletes a submission if its stored version still equals `version`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::VersionConflict` if the version moved.
    fn delete_submission(&self, id: SubmissionId, version: i64) -> Result<(), StoreError>;

    /// Finds the submission a participant authored for a challenge.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn find_participant_submission(
        &self,
        challenge_id: ChallengeId,
        author_id: UserId,
    ) -> Result<Option<SubmissionId>, StoreError>;

    /// Lists every submission made against a challenge.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn list_challenge_submissions(
        &self,
        challenge_id: ChallengeId,
    ) -> Result<Vec<SubmissionRecord>, StoreError>;

    /// Lists challenge submissions that are not in a terminal stage.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn list_open_challenge_submissions(&self) -> Result<Vec<SubmissionRecord>, StoreError>;
}

/// Access to stored challenges.
pub trait ChallengeStore {
    /// Loads a challenge with its submission count.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the challenge does not exist.
    fn load_challenge(&self, id: ChallengeId) -> Result<Challenge, StoreError>;

    /// Stores a new challenge in the draft status.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn insert_challenge(&self, challenge: &NewChallenge) -> Result<ChallengeId, StoreError>;

    /// Saves a challenge's title, status, and deadlines.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the challenge does not exist.
    fn save_challenge(&self, challenge: &Challenge) -> Result<(), StoreError>;

    /// Deletes a challenge.
    ///
    /// # Errors
    ///
    /// Returns an error if the challenge is missing or still referenced.
    fn delete_challenge(&self, id: ChallengeId) -> Result<(), StoreError>;
}

/// Access to stored reviews.
pub trait ReviewStore {
    /// Lists the reviews of a submission in the order they were recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn list_reviews(&self, submission_id: SubmissionId) -> Result<Vec<Review>, StoreError>;

    /// Stores a review and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn insert_review(&self, review: &Review) -> Result<ReviewId, StoreError>;

    /// Removes a review whose decision could not be applied.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the review does not exist.
    fn delete_review(&self, id: ReviewId) -> Result<(), StoreError>;
}

/// Access to stored collaboration records.
pub trait CollaborationStore {
    /// Loads a collaboration record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if it does not exist.
    fn load_collaboration(&self, id: CollaborationId) -> Result<Collaboration, StoreError>;

    /// Returns the most recent collaboration of a user on a submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn find_collaboration(
        &self,
        submission_id: SubmissionId,
        collaborator_id: UserId,
    ) -> Result<Option<Collaboration>, StoreError>;

    /// Stores a new collaboration record.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn insert_collaboration(
        &self,
        collaboration: &Collaboration,
    ) -> Result<CollaborationId, StoreError>;

    /// Saves a collaboration's status, provided the stored status is still
    /// `expected`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if it does not exist, or
    /// `StoreError::VersionConflict` if its status is no longer `expected`.
    fn save_collaboration(
        &self,
        collaboration: &Collaboration,
        expected: CollaborationStatus,
    ) -> Result<(), StoreError>;
}

/// Everything the workflow reads and writes.
pub trait Repository: SubmissionStore + ChallengeStore + ReviewStore + CollaborationStore {}

impl<T> Repository for T where T: SubmissionStore + ChallengeStore + ReviewStore + CollaborationStore
{}

/// Receives committed changes.
///
/// Failures here never undo the change that was already committed.
pub trait EventSink {
    /// Publishes a committed stage change with its audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be delivered.
    fn publish(&self, event: &StageChanged, audit: &AuditEvent) -> Result<(), StoreError>;

    /// Appends an audit event for a change that did not move a stage.
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be recorded.
    fn record(&self, audit: &AuditEvent) -> Result<(), StoreError>;
}
