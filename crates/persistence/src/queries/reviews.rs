// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use ideaflow_domain::{DomainError, Review, ReviewDecision, ReviewId, ReviewStage, SubmissionId, UserId};

use crate::data_models::{ReviewRow, parse_timestamp};
use crate::diesel_schema::reviews;
use crate::error::PersistenceError;

/// Lists the reviews of a submission in the order they were recorded.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_reviews(
    conn: &mut SqliteConnection,
    submission_id: i64,
) -> Result<Vec<Review>, PersistenceError> {
    let rows: Vec<ReviewRow> = reviews::table
        .filter(reviews::submission_id.eq(submission_id))
        .order(reviews::review_id.asc())
        .select(ReviewRow::as_select())
        .load(conn)?;

    rows.into_iter().map(into_review).collect()
}

fn into_review(row: ReviewRow) -> Result<Review, PersistenceError> {
    let reconstruct = |e: DomainError| PersistenceError::ReconstructionError(e.to_string());

    let stage: ReviewStage = row.review_stage.parse().map_err(reconstruct)?;
    let decision: ReviewDecision = row.decision.parse().map_err(reconstruct)?;
    let score: Option<u8> = row
        .score
        .map(|score| {
            u8::try_from(score).map_err(|_| {
                PersistenceError::ReconstructionError(format!("review score {score}"))
            })
        })
        .transpose()?;

    Ok(Review {
        id: Some(ReviewId::new(row.review_id)),
        submission_id: SubmissionId::new(row.submission_id),
        reviewer_id: UserId::new(row.reviewer_id),
        stage,
        decision,
        score,
        comment: row.comment,
        created_at: parse_timestamp(&row.created_at)?,
    })
}
