// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Append-only audit persistence.
//!
//! Nothing in this module updates or deletes an audit row.

use diesel::prelude::*;
use diesel::SqliteConnection;
use ideaflow::StageChanged;
use ideaflow_audit::AuditEvent;
use ideaflow_domain::{ChallengeId, SubmissionId};
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{ActionData, ActorData, CauseData, SnapshotData, format_timestamp};
use crate::diesel_schema::{audit_events, stage_events};
use crate::error::PersistenceError;

/// Persists an audit event.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `event` - The audit event to persist
///
/// # Returns
///
/// The event ID assigned by the database.
///
/// # Errors
///
/// Returns an error if persistence or serialization fails.
pub fn persist_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let actor_data: ActorData = ActorData {
        id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
    };
    let cause_data: CauseData = CauseData {
        id: event.cause.id.clone(),
        description: event.cause.description.clone(),
    };
    let action_data: ActionData = ActionData {
        name: event.action.name.clone(),
        details: event.action.details.clone(),
    };
    let before_data: SnapshotData = SnapshotData {
        data: event.before.data.clone(),
    };
    let after_data: SnapshotData = SnapshotData {
        data: event.after.data.clone(),
    };

    let actor_json: String = serde_json::to_string(&actor_data)?;
    let cause_json: String = serde_json::to_string(&cause_data)?;
    let action_json: String = serde_json::to_string(&action_data)?;
    let before_json: String = serde_json::to_string(&before_data)?;
    let after_json: String = serde_json::to_string(&after_data)?;
    let occurred_at: String = format_timestamp(event.occurred_at)?;

    conn.transaction(|conn| {
        diesel::insert_into(audit_events::table)
            .values((
                audit_events::submission_id.eq(event.submission_id.map(SubmissionId::value)),
                audit_events::challenge_id.eq(event.challenge_id.map(ChallengeId::value)),
                audit_events::actor_json.eq(&actor_json),
                audit_events::cause_json.eq(&cause_json),
                audit_events::action_json.eq(&action_json),
                audit_events::before_snapshot_json.eq(&before_json),
                audit_events::after_snapshot_json.eq(&after_json),
                audit_events::occurred_at.eq(&occurred_at),
            ))
            .execute(conn)?;

        let event_id: i64 = get_last_insert_rowid(conn)?;
        debug!(event_id = event_id, action = %event.action.name, "Persisted audit event");
        Ok(event_id)
    })
}

/// Persists a stage change together with its audit event.
///
/// Both rows are written in one transaction.
///
/// # Returns
///
/// The audit event ID.
///
/// # Errors
///
/// Returns an error if either insert fails.
pub fn persist_stage_change(
    conn: &mut SqliteConnection,
    event: &StageChanged,
    audit: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let occurred_at: String = format_timestamp(event.occurred_at)?;

    conn.transaction(|conn| {
        let audit_event_id: i64 = persist_audit_event(conn, audit)?;

        diesel::insert_into(stage_events::table)
            .values((
                stage_events::audit_event_id.eq(audit_event_id),
                stage_events::submission_id.eq(event.submission_id.value()),
                stage_events::challenge_id.eq(event.challenge_id.map(ChallengeId::value)),
                stage_events::from_stage.eq(event.from.as_str()),
                stage_events::to_stage.eq(event.to.as_str()),
                stage_events::action.eq(event.action.as_str()),
                stage_events::actor_id.eq(event.actor_id.value()),
                stage_events::occurred_at.eq(&occurred_at),
            ))
            .execute(conn)?;

        Ok(audit_event_id)
    })
}
