// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use ideaflow_domain::{
    Collaboration, CollaborationId, CollaborationKind, CollaborationStatus, DomainError,
    SubmissionId, UserId,
};

use crate::data_models::{CollaborationRow, parse_timestamp};
use crate::diesel_schema::collaborations;
use crate::error::PersistenceError;

/// Loads a collaboration record.
///
/// # Errors
///
/// Returns `PersistenceError::CollaborationNotFound` if no such row exists.
pub fn load_collaboration(
    conn: &mut SqliteConnection,
    collaboration_id: i64,
) -> Result<Collaboration, PersistenceError> {
    let result = collaborations::table
        .filter(collaborations::collaboration_id.eq(collaboration_id))
        .select(CollaborationRow::as_select())
        .first::<CollaborationRow>(conn);

    match result {
        Ok(row) => into_collaboration(row),
        Err(diesel::result::Error::NotFound) => {
            Err(PersistenceError::CollaborationNotFound(collaboration_id))
        }
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Returns the most recent collaboration of a user on a submission.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be reconstructed.
pub fn find_collaboration(
    conn: &mut SqliteConnection,
    submission_id: i64,
    collaborator_id: i64,
) -> Result<Option<Collaboration>, PersistenceError> {
    collaborations::table
        .filter(collaborations::submission_id.eq(submission_id))
        .filter(collaborations::collaborator_id.eq(collaborator_id))
        .order(collaborations::collaboration_id.desc())
        .select(CollaborationRow::as_select())
        .first::<CollaborationRow>(conn)
        .optional()?
        .map(into_collaboration)
        .transpose()
}

fn into_collaboration(row: CollaborationRow) -> Result<Collaboration, PersistenceError> {
    let reconstruct = |e: DomainError| PersistenceError::ReconstructionError(e.to_string());

    let kind: CollaborationKind = row.kind.parse().map_err(reconstruct)?;
    let status: CollaborationStatus = row.status.parse().map_err(reconstruct)?;

    Ok(Collaboration {
        id: Some(CollaborationId::new(row.collaboration_id)),
        submission_id: SubmissionId::new(row.submission_id),
        collaborator_id: UserId::new(row.collaborator_id),
        initiated_by: UserId::new(row.initiated_by),
        kind,
        status,
        created_at: parse_timestamp(&row.created_at)?,
        updated_at: parse_timestamp(&row.updated_at)?,
    })
}
