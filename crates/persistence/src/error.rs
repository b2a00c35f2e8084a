// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use ideaflow::StoreError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// The requested audit event was not found.
    EventNotFound(i64),
    /// The requested submission was not found.
    SubmissionNotFound(i64),
    /// The requested challenge was not found.
    ChallengeNotFound(i64),
    /// The requested review was not found.
    ReviewNotFound(i64),
    /// The requested collaboration record was not found.
    CollaborationNotFound(i64),
    /// The stored status of a collaboration no longer matches.
    CollaborationConflict {
        collaboration_id: i64,
        expected: String,
    },
    /// The stored version of a submission no longer matches.
    VersionConflict { submission_id: i64, expected: i64 },
    /// A uniqueness constraint rejected the write.
    UniqueViolation(String),
    /// A row is still referenced by another table.
    ForeignKeyViolation(String),
    /// A stored row could not be turned back into a domain value.
    ReconstructionError(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The connection lock was poisoned by a panicking writer.
    ConnectionPoisoned,
    /// The requested resource was not found.
    NotFound(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::EventNotFound(id) => write!(f, "Event not found: {id}"),
            Self::SubmissionNotFound(id) => write!(f, "Submission not found: {id}"),
            Self::ChallengeNotFound(id) => write!(f, "Challenge not found: {id}"),
            Self::ReviewNotFound(id) => write!(f, "Review not found: {id}"),
            Self::CollaborationNotFound(id) => write!(f, "Collaboration not found: {id}"),
            Self::CollaborationConflict {
                collaboration_id,
                expected,
            } => write!(
                f,
                "Collaboration {collaboration_id} is no longer {expected}"
            ),
            Self::VersionConflict {
                submission_id,
                expected,
            } => write!(
                f,
                "Submission {submission_id} is no longer at version {expected}"
            ),
            Self::UniqueViolation(msg) => write!(f, "Unique constraint violated: {msg}"),
            Self::ForeignKeyViolation(msg) => {
                write!(f, "Record is still referenced: {msg}")
            }
            Self::ReconstructionError(msg) => write!(f, "Row reconstruction error: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::ConnectionPoisoned => write!(f, "Database connection lock is poisoned"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match err {
            Error::NotFound => Self::NotFound("Record not found".to_string()),
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation(info.message().to_string())
            }
            Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKeyViolation(info.message().to_string())
            }
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::SubmissionNotFound(id) => Self::NotFound {
                entity: "submission",
                id,
            },
            PersistenceError::ChallengeNotFound(id) => Self::NotFound {
                entity: "challenge",
                id,
            },
            PersistenceError::ReviewNotFound(id) => Self::NotFound {
                entity: "review",
                id,
            },
            PersistenceError::CollaborationNotFound(id) => Self::NotFound {
                entity: "collaboration",
                id,
            },
            PersistenceError::EventNotFound(id) => Self::NotFound {
                entity: "audit event",
                id,
            },
            PersistenceError::VersionConflict { submission_id, .. } => {
                Self::VersionConflict { id: submission_id }
            }
            PersistenceError::CollaborationConflict {
                collaboration_id, ..
            } => Self::VersionConflict {
                id: collaboration_id,
            },
            PersistenceError::UniqueViolation(msg) => Self::Duplicate(msg),
            other => Self::Backend(other.to_string()),
        }
    }
}
