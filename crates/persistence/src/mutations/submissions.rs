// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use ideaflow::SubmissionRecord;
use ideaflow_domain::{NewSubmission, Origin, UserId};
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::format_timestamp;
use crate::diesel_schema::{submission_team_members, submissions};
use crate::error::PersistenceError;
use crate::queries::submissions::submission_exists;

/// Stores a new draft submission at version 1.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `submission` - The validated draft input
///
/// # Returns
///
/// The submission ID assigned by the database.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the author already has a
/// submission for the same challenge.
pub fn insert_submission(
    conn: &mut SqliteConnection,
    submission: &NewSubmission,
) -> Result<i64, PersistenceError> {
    let (challenge_id, challenge_owner): (Option<i64>, Option<i64>) = match submission.origin {
        Origin::Standalone => (None, None),
        Origin::Challenge {
            challenge_id,
            challenge_owner,
        } => (Some(challenge_id.value()), Some(challenge_owner.value())),
    };
    let created_at: String = format_timestamp(submission.created_at)?;
    let team: Vec<UserId> = submission.team_members.iter().copied().collect();

    conn.transaction(|conn| {
        diesel::insert_into(submissions::table)
            .values((
                submissions::title.eq(&submission.title),
                submissions::author_id.eq(submission.author_id.value()),
                submissions::challenge_id.eq(challenge_id),
                submissions::challenge_owner.eq(challenge_owner),
                submissions::stage.eq(submission.initial_stage().as_str()),
                submissions::collaboration_enabled.eq(submission.collaboration_enabled),
                submissions::created_at.eq(&created_at),
                submissions::last_stage_change.eq(&created_at),
                submissions::version.eq(1_i64),
            ))
            .execute(conn)?;

        let submission_id: i64 = get_last_insert_rowid(conn)?;
        replace_team(conn, submission_id, &team)?;

        debug!(submission_id = submission_id, "Inserted submission");
        Ok(submission_id)
    })
}

/// Saves a submission if its stored version still equals `record.version`.
///
/// The version check and the write happen in one `UPDATE`, so two writers
/// that loaded the same version cannot both succeed.
///
/// # Returns
///
/// The new version.
///
/// # Errors
///
/// Returns `PersistenceError::VersionConflict` if the version moved, or
/// `PersistenceError::SubmissionNotFound` if the row is gone.
pub fn save_submission(
    conn: &mut SqliteConnection,
    record: &SubmissionRecord,
) -> Result<i64, PersistenceError> {
    let submission_id: i64 = record.id.value();
    let next_version: i64 = record.version + 1;
    let last_stage_change: String = format_timestamp(record.last_stage_change)?;

    conn.transaction(|conn| {
        let updated: usize = diesel::update(
            submissions::table
                .filter(submissions::submission_id.eq(submission_id))
                .filter(submissions::version.eq(record.version)),
        )
        .set((
            submissions::title.eq(&record.title),
            submissions::stage.eq(&record.stage),
            submissions::collaboration_enabled.eq(record.collaboration_enabled),
            submissions::last_stage_change.eq(&last_stage_change),
            submissions::assigned_reviewer.eq(record.assigned_reviewer.map(UserId::value)),
            submissions::evaluation_outcome.eq(record.evaluation_outcome.as_deref()),
            submissions::version.eq(next_version),
        ))
        .execute(conn)?;

        if updated == 0 {
            return Err(missing_or_conflict(conn, submission_id, record.version));
        }

        replace_team(conn, submission_id, &record.team_members)?;
        Ok(next_version)
    })
}

/// Deletes a submission if its stored version still equals `version`.
///
/// Reviews, team members, and collaboration records go with it. Audit
/// events stay.
///
/// # Errors
///
/// Returns `PersistenceError::VersionConflict` if the version moved, or
/// `PersistenceError::SubmissionNotFound` if the row is gone.
pub fn delete_submission(
    conn: &mut SqliteConnection,
    submission_id: i64,
    version: i64,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        let deleted: usize = diesel::delete(
            submissions::table
                .filter(submissions::submission_id.eq(submission_id))
                .filter(submissions::version.eq(version)),
        )
        .execute(conn)?;

        if deleted == 0 {
            return Err(missing_or_conflict(conn, submission_id, version));
        }
        Ok(())
    })
}

fn replace_team(
    conn: &mut SqliteConnection,
    submission_id: i64,
    team: &[UserId],
) -> Result<(), PersistenceError> {
    diesel::delete(
        submission_team_members::table
            .filter(submission_team_members::submission_id.eq(submission_id)),
    )
    .execute(conn)?;

    let rows: Vec<_> = team
        .iter()
        .map(|member| {
            (
                submission_team_members::submission_id.eq(submission_id),
                submission_team_members::user_id.eq(member.value()),
            )
        })
        .collect();
    if !rows.is_empty() {
        diesel::insert_into(submission_team_members::table)
            .values(&rows)
            .execute(conn)?;
    }
    Ok(())
}

fn missing_or_conflict(
    conn: &mut SqliteConnection,
    submission_id: i64,
    expected: i64,
) -> PersistenceError {
    match submission_exists(conn, submission_id) {
        Ok(true) => PersistenceError::VersionConflict {
            submission_id,
            expected,
        },
        Ok(false) => PersistenceError::SubmissionNotFound(submission_id),
        Err(err) => err,
    }
}
