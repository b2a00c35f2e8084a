// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use ideaflow::SubmissionRecord;
use ideaflow_domain::{ChallengeId, Stage, SubmissionId, SubmissionKind, UserId};

use crate::data_models::{SubmissionRow, parse_timestamp};
use crate::diesel_schema::{reviews, submission_team_members, submissions};
use crate::error::PersistenceError;

/// Loads a submission record with its team and review count.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `submission_id` - The submission to load
///
/// # Errors
///
/// Returns `PersistenceError::SubmissionNotFound` if no such row exists.
pub fn load_submission(
    conn: &mut SqliteConnection,
    submission_id: i64,
) -> Result<SubmissionRecord, PersistenceError> {
    let result = submissions::table
        .filter(submissions::submission_id.eq(submission_id))
        .select(SubmissionRow::as_select())
        .first::<SubmissionRow>(conn);

    let row: SubmissionRow = match result {
        Ok(row) => row,
        Err(diesel::result::Error::NotFound) => {
            return Err(PersistenceError::SubmissionNotFound(submission_id));
        }
        Err(e) => return Err(PersistenceError::from(e)),
    };

    into_record(conn, row)
}

/// Returns true if the submission row exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn submission_exists(
    conn: &mut SqliteConnection,
    submission_id: i64,
) -> Result<bool, PersistenceError> {
    let found: i64 = submissions::table
        .filter(submissions::submission_id.eq(submission_id))
        .count()
        .get_result(conn)?;
    Ok(found > 0)
}

/// Finds the submission a participant authored for a challenge.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_participant_submission(
    conn: &mut SqliteConnection,
    challenge_id: i64,
    author_id: i64,
) -> Result<Option<i64>, PersistenceError> {
    Ok(submissions::table
        .filter(submissions::challenge_id.eq(challenge_id))
        .filter(submissions::author_id.eq(author_id))
        .select(submissions::submission_id)
        .first::<i64>(conn)
        .optional()?)
}

/// Lists every submission made against a challenge, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_challenge_submissions(
    conn: &mut SqliteConnection,
    challenge_id: i64,
) -> Result<Vec<SubmissionRecord>, PersistenceError> {
    let rows: Vec<SubmissionRow> = submissions::table
        .filter(submissions::challenge_id.eq(challenge_id))
        .order(submissions::submission_id.asc())
        .select(SubmissionRow::as_select())
        .load(conn)?;

    rows.into_iter().map(|row| into_record(conn, row)).collect()
}

/// Lists challenge submissions that are not yet in a terminal stage.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_open_challenge_submissions(
    conn: &mut SqliteConnection,
) -> Result<Vec<SubmissionRecord>, PersistenceError> {
    let terminal: Vec<&'static str> = Stage::all()
        .into_iter()
        .filter(|stage| stage.kind() == SubmissionKind::ChallengeSubmission && stage.is_terminal())
        .map(|stage| stage.as_str())
        .collect();

    let rows: Vec<SubmissionRow> = submissions::table
        .filter(submissions::challenge_id.is_not_null())
        .filter(submissions::stage.ne_all(terminal))
        .order(submissions::submission_id.asc())
        .select(SubmissionRow::as_select())
        .load(conn)?;

    rows.into_iter().map(|row| into_record(conn, row)).collect()
}

/// Counts the reviews attached to a submission.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_reviews(
    conn: &mut SqliteConnection,
    submission_id: i64,
) -> Result<u32, PersistenceError> {
    let count: i64 = reviews::table
        .filter(reviews::submission_id.eq(submission_id))
        .count()
        .get_result(conn)?;
    u32::try_from(count)
        .map_err(|_| PersistenceError::ReconstructionError(format!("review count {count}")))
}

fn team_members(
    conn: &mut SqliteConnection,
    submission_id: i64,
) -> Result<Vec<UserId>, PersistenceError> {
    let ids: Vec<i64> = submission_team_members::table
        .filter(submission_team_members::submission_id.eq(submission_id))
        .order(submission_team_members::user_id.asc())
        .select(submission_team_members::user_id)
        .load(conn)?;
    Ok(ids.into_iter().map(UserId::new).collect())
}

fn into_record(
    conn: &mut SqliteConnection,
    row: SubmissionRow,
) -> Result<SubmissionRecord, PersistenceError> {
    let team_members: Vec<UserId> = team_members(conn, row.submission_id)?;
    let review_count: u32 = count_reviews(conn, row.submission_id)?;

    Ok(SubmissionRecord {
        id: SubmissionId::new(row.submission_id),
        title: row.title,
        author_id: UserId::new(row.author_id),
        team_members,
        challenge_id: row.challenge_id.map(ChallengeId::new),
        challenge_owner: row.challenge_owner.map(UserId::new),
        stage: row.stage,
        collaboration_enabled: row.collaboration_enabled,
        created_at: parse_timestamp(&row.created_at)?,
        last_stage_change: parse_timestamp(&row.last_stage_change)?,
        assigned_reviewer: row.assigned_reviewer.map(UserId::new),
        evaluation_outcome: row.evaluation_outcome,
        review_count,
        version: row.version,
    })
}
