// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use ideaflow_domain::{Challenge, ChallengeStatus, NewChallenge};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::format_timestamp;
use crate::diesel_schema::challenges;
use crate::error::PersistenceError;

/// Stores a new challenge in the draft status.
///
/// # Returns
///
/// The challenge ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_challenge(
    conn: &mut SqliteConnection,
    challenge: &NewChallenge,
) -> Result<i64, PersistenceError> {
    let submission_deadline: String = format_timestamp(challenge.submission_deadline)?;
    let evaluation_deadline: String = format_timestamp(challenge.evaluation_deadline)?;

    conn.transaction(|conn| {
        diesel::insert_into(challenges::table)
            .values((
                challenges::title.eq(&challenge.title),
                challenges::created_by.eq(challenge.created_by.value()),
                challenges::status.eq(ChallengeStatus::Draft.as_str()),
                challenges::submission_deadline.eq(&submission_deadline),
                challenges::evaluation_deadline.eq(&evaluation_deadline),
            ))
            .execute(conn)?;
        get_last_insert_rowid(conn)
    })
}

/// Saves a challenge's title, status, and deadlines.
///
/// # Errors
///
/// Returns `PersistenceError::ChallengeNotFound` if the row does not exist.
pub fn save_challenge(
    conn: &mut SqliteConnection,
    challenge: &Challenge,
) -> Result<(), PersistenceError> {
    let challenge_id: i64 = challenge.id.value();
    let updated: usize =
        diesel::update(challenges::table.filter(challenges::challenge_id.eq(challenge_id)))
            .set((
                challenges::title.eq(&challenge.title),
                challenges::status.eq(challenge.status.as_str()),
                challenges::submission_deadline
                    .eq(format_timestamp(challenge.submission_deadline)?),
                challenges::evaluation_deadline
                    .eq(format_timestamp(challenge.evaluation_deadline)?),
            ))
            .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::ChallengeNotFound(challenge_id));
    }
    Ok(())
}

/// Deletes a challenge.
///
/// # Errors
///
/// Returns `PersistenceError::ChallengeNotFound` if the row does not exist,
/// or `PersistenceError::ForeignKeyViolation` while submissions still
/// reference it.
pub fn delete_challenge(
    conn: &mut SqliteConnection,
    challenge_id: i64,
) -> Result<(), PersistenceError> {
    let deleted: usize =
        diesel::delete(challenges::table.filter(challenges::challenge_id.eq(challenge_id)))
            .execute(conn)?;

    if deleted == 0 {
        return Err(PersistenceError::ChallengeNotFound(challenge_id));
    }
    Ok(())
}
