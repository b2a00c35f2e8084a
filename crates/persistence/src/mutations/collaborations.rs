// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use ideaflow_domain::{Collaboration, CollaborationId, CollaborationStatus};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::format_timestamp;
use crate::diesel_schema::collaborations;
use crate::error::PersistenceError;

/// Stores a new collaboration record.
///
/// # Returns
///
/// The collaboration ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_collaboration(
    conn: &mut SqliteConnection,
    collaboration: &Collaboration,
) -> Result<i64, PersistenceError> {
    let created_at: String = format_timestamp(collaboration.created_at)?;
    let updated_at: String = format_timestamp(collaboration.updated_at)?;

    conn.transaction(|conn| {
        diesel::insert_into(collaborations::table)
            .values((
                collaborations::submission_id.eq(collaboration.submission_id.value()),
                collaborations::collaborator_id.eq(collaboration.collaborator_id.value()),
                collaborations::initiated_by.eq(collaboration.initiated_by.value()),
                collaborations::kind.eq(collaboration.kind.as_str()),
                collaborations::status.eq(collaboration.status.as_str()),
                collaborations::created_at.eq(&created_at),
                collaborations::updated_at.eq(&updated_at),
            ))
            .execute(conn)?;
        get_last_insert_rowid(conn)
    })
}

/// Saves a collaboration's status if the stored status is still `expected`.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the record was never stored,
/// `PersistenceError::CollaborationNotFound` if the row does not exist, or
/// `PersistenceError::CollaborationConflict` if another writer changed the
/// status first.
pub fn save_collaboration(
    conn: &mut SqliteConnection,
    collaboration: &Collaboration,
    expected: CollaborationStatus,
) -> Result<(), PersistenceError> {
    let Some(collaboration_id) = collaboration.id.map(CollaborationId::value) else {
        return Err(PersistenceError::NotFound(String::from(
            "collaboration has not been stored",
        )));
    };
    let updated_at: String = format_timestamp(collaboration.updated_at)?;

    conn.transaction(|conn| {
        let updated: usize = diesel::update(
            collaborations::table
                .filter(collaborations::collaboration_id.eq(collaboration_id))
                .filter(collaborations::status.eq(expected.as_str())),
        )
        .set((
            collaborations::status.eq(collaboration.status.as_str()),
            collaborations::updated_at.eq(&updated_at),
        ))
        .execute(conn)?;

        if updated > 0 {
            return Ok(());
        }

        let exists: i64 = collaborations::table
            .filter(collaborations::collaboration_id.eq(collaboration_id))
            .count()
            .get_result(conn)?;
        if exists == 0 {
            return Err(PersistenceError::CollaborationNotFound(collaboration_id));
        }
        Err(PersistenceError::CollaborationConflict {
            collaboration_id,
            expected: expected.as_str().to_string(),
        })
    })
}
