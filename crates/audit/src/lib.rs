// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit trail types.
//!
//! Every state change in the workflow produces exactly one `AuditEvent`.
//! Events are append-only: nothing in the system updates or deletes one
//! after it has been recorded.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use ideaflow_domain::{ChallengeId, SubmissionId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[cfg(test)]
mod tests;

/// Who performed the recorded change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The user identifier, or `system` for time-driven changes.
    pub id: String,
    /// The actor's roles at the time of the change.
    pub actor_type: String,
}

impl Actor {
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// Builds an audit actor from a workflow actor snapshot.
    #[must_use]
    pub fn from_actor(actor: &ideaflow_domain::Actor) -> Self {
        Self {
            id: actor.id().to_string(),
            actor_type: actor.role_summary(),
        }
    }
}

/// Why the change was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    pub id: String,
    pub description: String,
}

impl Cause {
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// What was done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub details: Option<String>,
}

impl Action {
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A serialized view of the affected record before or after the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub data: String,
}

impl Snapshot {
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// One immutable entry in the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Assigned by the store; `None` before the event is recorded.
    pub event_id: Option<i64>,
    pub submission_id: Option<SubmissionId>,
    pub challenge_id: Option<ChallengeId>,
    pub actor: Actor,
    pub cause: Cause,
    pub action: Action,
    pub before: Snapshot,
    pub after: Snapshot,
    pub occurred_at: OffsetDateTime,
}

impl AuditEvent {
    /// Creates an unrecorded audit event.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        submission_id: Option<SubmissionId>,
        challenge_id: Option<ChallengeId>,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: Snapshot,
        after: Snapshot,
        occurred_at: OffsetDateTime,
    ) -> Self {
        Self {
            event_id: None,
            submission_id,
            challenge_id,
            actor,
            cause,
            action,
            before,
            after,
            occurred_at,
        }
    }

    /// Returns a copy carrying the identifier assigned by the store.
    #[must_use]
    pub fn recorded(mut self, event_id: i64) -> Self {
        self.event_id = Some(event_id);
        self
    }
}
