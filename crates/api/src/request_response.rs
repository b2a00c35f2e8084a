// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// API request to move a submission along the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionSubmissionRequest {
    /// The submission to move.
    pub submission_id: i64,
    /// The workflow action name (e.g. `submit`, `approve`).
    pub action: String,
    /// The stage the caller observed, if any.
    ///
    /// When given, the request fails with a conflict if the submission has
    /// moved since.
    pub expected_stage: Option<String>,
}

/// API response for a committed stage change.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransitionSubmissionResponse {
    /// The submission that moved.
    pub submission_id: i64,
    /// The action that was applied.
    pub action: String,
    /// The stage before the change.
    pub from_stage: String,
    /// The stage after the change.
    pub to_stage: String,
    /// The stored version after the change.
    pub version: i64,
    /// The evaluation outcome, once the submission has been evaluated.
    pub evaluation_outcome: Option<String>,
    /// A success message.
    pub message: String,
}

/// API request to record a review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReviewRequest {
    /// The reviewed submission.
    pub submission_id: i64,
    /// The review stage; required for challenge submissions.
    pub review_stage: Option<String>,
    /// The decision (`approved`, `rejected`, `needs_changes`, `pending`).
    pub decision: String,
    /// Optional score in the range 0-100.
    pub score: Option<u8>,
    /// Optional reviewer comment.
    pub comment: Option<String>,
}

/// API response for a recorded review.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubmitReviewResponse {
    /// The stored review identifier.
    pub review_id: i64,
    /// The reviewed submission.
    pub submission_id: i64,
    /// The stage the review moved the submission to, if it moved.
    pub new_stage: Option<String>,
    /// A success message.
    pub message: String,
}

/// A submission as shown to a caller.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubmissionInfo {
    /// The submission identifier.
    pub submission_id: i64,
    /// `idea` or `challenge_submission`.
    pub kind: String,
    /// The submission title.
    pub title: String,
    /// The author.
    pub author_id: i64,
    /// Co-authors, excluding the author.
    pub team_members: Vec<i64>,
    /// The challenge, for challenge submissions.
    pub challenge_id: Option<i64>,
    /// The current stage.
    pub stage: String,
    /// Whether collaboration requests are accepted.
    pub collaboration_enabled: bool,
    /// The reviewer assigned to the current review stage.
    pub assigned_reviewer: Option<i64>,
    /// The evaluation outcome, once evaluated.
    pub evaluation_outcome: Option<String>,
    /// Number of recorded reviews.
    pub review_count: u32,
    /// Creation time (RFC 3339).
    pub created_at: String,
    /// Time of the last stage change (RFC 3339).
    pub last_stage_change: String,
    /// The stored version, for use as an expected version by editors.
    pub version: i64,
    /// What the requesting actor may do with this submission.
    pub capabilities: SubmissionCapabilities,
}

/// A review as shown to a caller.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReviewInfo {
    /// The review identifier.
    pub review_id: Option<i64>,
    /// The reviewer.
    pub reviewer_id: i64,
    /// The review stage.
    pub review_stage: String,
    /// The decision.
    pub decision: String,
    /// The score, if given.
    pub score: Option<u8>,
    /// The comment, if given.
    pub comment: Option<String>,
    /// When the review was recorded (RFC 3339).
    pub created_at: String,
}

/// API response for a submission lookup.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetSubmissionResponse {
    /// The submission.
    pub submission: SubmissionInfo,
    /// Its reviews, oldest first.
    pub reviews: Vec<ReviewInfo>,
}

/// A challenge as shown to a caller.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChallengeInfo {
    /// The challenge identifier.
    pub challenge_id: i64,
    /// The challenge title.
    pub title: String,
    /// The challenge owner.
    pub created_by: i64,
    /// The challenge status.
    pub status: String,
    /// Submission deadline (RFC 3339).
    pub submission_deadline: String,
    /// Evaluation deadline (RFC 3339).
    pub evaluation_deadline: String,
    /// Number of submissions made against the challenge.
    pub submission_count: u32,
    /// What the requesting actor may do with this challenge.
    pub capabilities: ChallengeCapabilities,
}

/// API response for a challenge listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListChallengesResponse {
    /// The challenges, oldest first.
    pub challenges: Vec<ChallengeInfo>,
}

/// A submission the deadline sweep could not archive.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SweepFailure {
    /// The submission.
    pub submission_id: i64,
    /// Why it was not archived.
    pub reason: String,
}

/// API response for a deadline sweep.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SweepResponse {
    /// Submissions that were archived.
    pub archived: Vec<i64>,
    /// Submissions that were due but could not be archived.
    pub failed: Vec<SweepFailure>,
    /// A summary message.
    pub message: String,
}

/// API response for a CSV export.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExportResponse {
    /// The exported challenge.
    pub challenge_id: i64,
    /// Number of submission rows written.
    pub rows_written: usize,
}

/// Capability flag for a specific action.
///
/// Serialized as a plain boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The action is permitted.
    Allowed,
    /// The action is not permitted.
    Denied,
}

impl Capability {
    /// Returns true if the capability is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Creates a capability from a boolean value.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::Allowed } else { Self::Denied }
    }
}

impl From<ideaflow::Decision> for Capability {
    fn from(decision: ideaflow::Decision) -> Self {
        Self::from_bool(decision.is_allowed())
    }
}

impl serde::Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(matches!(self, Self::Allowed))
    }
}

impl<'de> serde::Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let b = bool::deserialize(deserializer)?;
        Ok(Self::from_bool(b))
    }
}

/// What an actor may do with one submission.
///
/// Workflow flags are only allowed when the stage table also has an edge
/// for the action from the current stage.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubmissionCapabilities {
    /// Whether the actor can edit the title and settings.
    pub can_update: Capability,
    /// Whether the actor can delete the submission.
    pub can_delete: Capability,
    /// Whether the actor can submit the draft.
    pub can_submit: Capability,
    /// Whether the actor can record a review at the current stage.
    pub can_review: Capability,
    /// Whether the actor can move the submission forward.
    pub can_advance: Capability,
    /// Whether the actor can archive the submission.
    pub can_archive: Capability,
    /// Whether the actor can mark the submission as a winner.
    pub can_mark_winner: Capability,
    /// Whether the actor can ask to join the submission.
    pub can_collaborate: Capability,
    /// Whether the actor can invite or remove collaborators.
    pub can_manage_collaborators: Capability,
    /// Whether the actor can export the submission.
    pub can_export: Capability,
    /// Whether the actor can view submission analytics.
    pub can_view_analytics: Capability,
}

/// What an actor may do with one challenge.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChallengeCapabilities {
    /// Whether the actor can edit the challenge details.
    pub can_update: Capability,
    /// Whether the actor can delete the challenge.
    pub can_delete: Capability,
    /// Whether the actor can change the challenge status.
    pub can_change_status: Capability,
    /// Whether the actor can export the challenge submissions.
    pub can_export: Capability,
    /// Whether the actor can make a submission to the challenge.
    pub can_participate: Capability,
}

/// Formats a timestamp for a response.
#[must_use]
pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_else(|_| at.to_string())
}
