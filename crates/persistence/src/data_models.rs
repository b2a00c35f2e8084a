// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::diesel_schema::{
    audit_events, challenges, collaborations, reviews, stage_events, submissions,
};
use crate::error::PersistenceError;

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `Snapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotData {
    pub data: String,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = submissions)]
pub struct SubmissionRow {
    pub submission_id: i64,
    pub title: String,
    pub author_id: i64,
    pub challenge_id: Option<i64>,
    pub challenge_owner: Option<i64>,
    pub stage: String,
    pub collaboration_enabled: bool,
    pub created_at: String,
    pub last_stage_change: String,
    pub assigned_reviewer: Option<i64>,
    pub evaluation_outcome: Option<String>,
    pub version: i64,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = challenges)]
pub struct ChallengeRow {
    pub challenge_id: i64,
    pub title: String,
    pub created_by: i64,
    pub status: String,
    pub submission_deadline: String,
    pub evaluation_deadline: String,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = reviews)]
pub struct ReviewRow {
    pub review_id: i64,
    pub submission_id: i64,
    pub reviewer_id: i64,
    pub review_stage: String,
    pub decision: String,
    pub score: Option<i32>,
    pub comment: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = collaborations)]
pub struct CollaborationRow {
    pub collaboration_id: i64,
    pub submission_id: i64,
    pub collaborator_id: i64,
    pub initiated_by: i64,
    pub kind: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = audit_events)]
pub struct AuditEventRow {
    pub event_id: i64,
    pub submission_id: Option<i64>,
    pub challenge_id: Option<i64>,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
    pub occurred_at: String,
    #[allow(dead_code)]
    pub created_at: Option<String>,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = stage_events)]
pub struct StageEventRow {
    #[allow(dead_code)]
    pub stage_event_id: i64,
    pub audit_event_id: i64,
    pub submission_id: i64,
    pub challenge_id: Option<i64>,
    pub from_stage: String,
    pub to_stage: String,
    pub action: String,
    pub actor_id: i64,
    pub occurred_at: String,
}

/// Formats a timestamp for storage.
///
/// Timestamps are stored as RFC 3339 text so rows stay readable from the
/// `sqlite3` shell.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be represented in RFC 3339.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    at.format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns an error if the text is not valid RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| {
        PersistenceError::ReconstructionError(format!("invalid timestamp '{value}': {e}"))
    })
}
