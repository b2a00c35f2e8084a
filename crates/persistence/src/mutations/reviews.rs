// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use ideaflow_domain::Review;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::format_timestamp;
use crate::diesel_schema::reviews;
use crate::error::PersistenceError;

/// Stores a review.
///
/// # Returns
///
/// The review ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails, including when the submission no
/// longer exists.
pub fn insert_review(conn: &mut SqliteConnection, review: &Review) -> Result<i64, PersistenceError> {
    let created_at: String = format_timestamp(review.created_at)?;

    conn.transaction(|conn| {
        diesel::insert_into(reviews::table)
            .values((
                reviews::submission_id.eq(review.submission_id.value()),
                reviews::reviewer_id.eq(review.reviewer_id.value()),
                reviews::review_stage.eq(review.stage.as_str()),
                reviews::decision.eq(review.decision.as_str()),
                reviews::score.eq(review.score.map(i32::from)),
                reviews::comment.eq(review.comment.as_deref()),
                reviews::created_at.eq(&created_at),
            ))
            .execute(conn)?;
        get_last_insert_rowid(conn)
    })
}

/// Removes a review.
///
/// # Errors
///
/// Returns `PersistenceError::ReviewNotFound` if the review does not exist.
pub fn delete_review(conn: &mut SqliteConnection, review_id: i64) -> Result<(), PersistenceError> {
    let deleted: usize =
        diesel::delete(reviews::table.filter(reviews::review_id.eq(review_id))).execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::ReviewNotFound(review_id));
    }
    Ok(())
}
