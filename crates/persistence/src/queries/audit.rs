// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit trail queries.
//!
//! Audit rows are never joined against live records: a deleted submission
//! keeps its history.

use diesel::prelude::*;
use diesel::SqliteConnection;
use ideaflow::StageChanged;
use ideaflow_audit::{Action, Actor, AuditEvent, Cause, Snapshot};
use ideaflow_domain::{
    ChallengeId, DomainError, Stage, SubmissionId, SubmissionKind, UserId, WorkflowAction,
};

use crate::data_models::{
    ActionData, ActorData, AuditEventRow, CauseData, SnapshotData, StageEventRow, parse_timestamp,
};
use crate::diesel_schema::{audit_events, stage_events};
use crate::error::PersistenceError;

/// Retrieves an audit event by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `event_id` - The event ID to retrieve
///
/// # Errors
///
/// Returns an error if the event is not found or cannot be deserialized.
pub fn get_audit_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<AuditEvent, PersistenceError> {
    let result = audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .select(AuditEventRow::as_select())
        .first::<AuditEventRow>(conn);

    match result {
        Ok(row) => into_audit_event(row),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::EventNotFound(event_id)),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves every audit event recorded against a submission, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or an event cannot be deserialized.
pub fn get_audit_trail(
    conn: &mut SqliteConnection,
    submission_id: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::submission_id.eq(submission_id))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?;

    rows.into_iter().map(into_audit_event).collect()
}

/// Counts all recorded audit events.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_audit_events(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(audit_events::table.count().get_result(conn)?)
}

/// Retrieves the published stage changes of a submission, oldest first.
///
/// Each entry is paired with the audit event it was published with.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn get_stage_history(
    conn: &mut SqliteConnection,
    submission_id: i64,
) -> Result<Vec<(StageChanged, i64)>, PersistenceError> {
    let rows: Vec<StageEventRow> = stage_events::table
        .filter(stage_events::submission_id.eq(submission_id))
        .order(stage_events::stage_event_id.asc())
        .select(StageEventRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| {
            let audit_event_id: i64 = row.audit_event_id;
            into_stage_changed(row).map(|event| (event, audit_event_id))
        })
        .collect()
}

fn into_audit_event(row: AuditEventRow) -> Result<AuditEvent, PersistenceError> {
    let actor_data: ActorData = serde_json::from_str(&row.actor_json)?;
    let cause_data: CauseData = serde_json::from_str(&row.cause_json)?;
    let action_data: ActionData = serde_json::from_str(&row.action_json)?;
    let before_data: SnapshotData = serde_json::from_str(&row.before_snapshot_json)?;
    let after_data: SnapshotData = serde_json::from_str(&row.after_snapshot_json)?;

    let event: AuditEvent = AuditEvent::new(
        row.submission_id.map(SubmissionId::new),
        row.challenge_id.map(ChallengeId::new),
        Actor::new(actor_data.id, actor_data.actor_type),
        Cause::new(cause_data.id, cause_data.description),
        Action::new(action_data.name, action_data.details),
        Snapshot::new(before_data.data),
        Snapshot::new(after_data.data),
        parse_timestamp(&row.occurred_at)?,
    );

    Ok(event.recorded(row.event_id))
}

fn into_stage_changed(row: StageEventRow) -> Result<StageChanged, PersistenceError> {
    let reconstruct = |e: DomainError| PersistenceError::ReconstructionError(e.to_string());
    let kind: SubmissionKind = if row.challenge_id.is_some() {
        SubmissionKind::ChallengeSubmission
    } else {
        SubmissionKind::Idea
    };

    let action: WorkflowAction = row.action.parse().map_err(reconstruct)?;

    Ok(StageChanged {
        submission_id: SubmissionId::new(row.submission_id),
        challenge_id: row.challenge_id.map(ChallengeId::new),
        from: Stage::parse(kind, &row.from_stage).map_err(reconstruct)?,
        to: Stage::parse(kind, &row.to_stage).map_err(reconstruct)?,
        action,
        actor_id: UserId::new(row.actor_id),
        occurred_at: parse_timestamp(&row.occurred_at)?,
    })
}
