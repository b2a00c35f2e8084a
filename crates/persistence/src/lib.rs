// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` persistence for the ideaflow workflow engine.
//!
//! This crate stores submissions, challenges, reviews, collaboration
//! records, and the append-only audit trail. It is built on Diesel and
//! implements the storage and event ports of the `ideaflow` crate, so a
//! `WorkflowService` can run directly on top of a `Persistence`.
//!
//! ## Concurrency
//!
//! Submissions carry a version number. Every save is a single
//! `UPDATE ... WHERE version = ?`, and a save against a stale version
//! fails with a version conflict instead of overwriting the newer row.
//! The workflow retries or reports the conflict; this crate never does.
//!
//! ## Audit Trail
//!
//! Audit rows are written once and never updated or deleted. They carry no
//! foreign keys, so deleting a submission keeps its history. Stage changes
//! are written together with their audit event in one transaction.
//!
//! ## Testing
//!
//! `Persistence::new_in_memory()` gives every caller its own isolated
//! shared-cache in-memory database with migrations applied.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use ideaflow::StageChanged;
use ideaflow_audit::AuditEvent;
use ideaflow_domain::{Challenge, SubmissionId};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::info;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod store;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// Persistence adapter backed by a single `SQLite` connection.
///
/// The connection sits behind a mutex so the adapter can be shared by
/// reference across threads, as the workflow ports require.
pub struct Persistence {
    conn: Mutex<SqliteConnection>,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:ideaflow_memdb_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        info!(path = path_str, "Opened database file");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Locks the connection for one operation.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ConnectionPoisoned` if a previous holder
    /// panicked.
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, SqliteConnection>, PersistenceError> {
        self.conn
            .lock()
            .map_err(|_| PersistenceError::ConnectionPoisoned)
    }

    /// Retrieves an audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::EventNotFound` if it does not exist.
    pub fn get_audit_event(&self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::audit::get_audit_event(&mut *self.lock()?, event_id)
    }

    /// Retrieves the audit trail of a submission, oldest first.
    ///
    /// The trail survives deletion of the submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_audit_trail(
        &self,
        submission_id: SubmissionId,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::get_audit_trail(&mut *self.lock()?, submission_id.value())
    }

    /// Retrieves the published stage changes of a submission with their
    /// audit event IDs, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_stage_history(
        &self,
        submission_id: SubmissionId,
    ) -> Result<Vec<(StageChanged, i64)>, PersistenceError> {
        queries::audit::get_stage_history(&mut *self.lock()?, submission_id.value())
    }

    /// Counts every recorded audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_audit_events(&self) -> Result<i64, PersistenceError> {
        queries::audit::count_audit_events(&mut *self.lock()?)
    }

    /// Lists all challenges, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_challenges(&self) -> Result<Vec<Challenge>, PersistenceError> {
        queries::challenges::list_challenges(&mut *self.lock()?)
    }
}
