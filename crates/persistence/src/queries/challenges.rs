// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use ideaflow_domain::{Challenge, ChallengeId, ChallengeStatus, UserId};

use crate::data_models::{ChallengeRow, parse_timestamp};
use crate::diesel_schema::{challenges, submissions};
use crate::error::PersistenceError;

/// Loads a challenge with its submission count.
///
/// # Errors
///
/// Returns `PersistenceError::ChallengeNotFound` if no such row exists.
pub fn load_challenge(
    conn: &mut SqliteConnection,
    challenge_id: i64,
) -> Result<Challenge, PersistenceError> {
    let result = challenges::table
        .filter(challenges::challenge_id.eq(challenge_id))
        .select(ChallengeRow::as_select())
        .first::<ChallengeRow>(conn);

    let row: ChallengeRow = match result {
        Ok(row) => row,
        Err(diesel::result::Error::NotFound) => {
            return Err(PersistenceError::ChallengeNotFound(challenge_id));
        }
        Err(e) => return Err(PersistenceError::from(e)),
    };

    into_challenge(conn, row)
}

/// Lists all challenges, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_challenges(conn: &mut SqliteConnection) -> Result<Vec<Challenge>, PersistenceError> {
    let rows: Vec<ChallengeRow> = challenges::table
        .order(challenges::challenge_id.asc())
        .select(ChallengeRow::as_select())
        .load(conn)?;

    rows.into_iter().map(|row| into_challenge(conn, row)).collect()
}

fn into_challenge(
    conn: &mut SqliteConnection,
    row: ChallengeRow,
) -> Result<Challenge, PersistenceError> {
    let count: i64 = submissions::table
        .filter(submissions::challenge_id.eq(row.challenge_id))
        .count()
        .get_result(conn)?;
    let submission_count: u32 = u32::try_from(count)
        .map_err(|_| PersistenceError::ReconstructionError(format!("submission count {count}")))?;
    let status: ChallengeStatus = row
        .status
        .parse()
        .map_err(|e: ideaflow_domain::DomainError| {
            PersistenceError::ReconstructionError(e.to_string())
        })?;

    Ok(Challenge {
        id: ChallengeId::new(row.challenge_id),
        title: row.title,
        created_by: UserId::new(row.created_by),
        status,
        submission_deadline: parse_timestamp(&row.submission_deadline)?,
        evaluation_deadline: parse_timestamp(&row.evaluation_deadline)?,
        submission_count,
    })
}
