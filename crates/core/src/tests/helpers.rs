// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ChallengeStore, CollaborationStore, EventSink, ReviewStore, StageChanged, StoreError,
    SubmissionRecord, SubmissionStore,
};
use ideaflow_audit::{AuditEvent, Cause};
use ideaflow_domain::{
    AccountStatus, Actor, Challenge, ChallengeId, ChallengeStatus, Collaboration,
    CollaborationId, CollaborationStatus, NewChallenge, NewSubmission, Review, ReviewId, Role,
    Stage, SubmissionId, UserId,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Barrier, Mutex};
use time::OffsetDateTime;
use time::macros::datetime;

pub const AUTHOR: UserId = UserId::new(1);
pub const TEAMMATE: UserId = UserId::new(2);
pub const CHALLENGE_OWNER: UserId = UserId::new(3);
pub const MANAGER: UserId = UserId::new(10);
pub const SECOND_MANAGER: UserId = UserId::new(11);
pub const SME: UserId = UserId::new(12);
pub const BOARD: UserId = UserId::new(13);
pub const ADMIN: UserId = UserId::new(14);
pub const OUTSIDER: UserId = UserId::new(15);

pub fn fixed_now() -> OffsetDateTime {
    datetime!(2026-03-10 12:00 UTC)
}

pub fn after_submission_deadline() -> OffsetDateTime {
    datetime!(2026-04-02 12:00 UTC)
}

pub fn after_evaluation_deadline() -> OffsetDateTime {
    datetime!(2026-05-02 12:00 UTC)
}

pub fn actor(id: UserId, roles: &[Role]) -> Actor {
    Actor::new(id, roles.iter().copied(), AccountStatus::Active, true)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Test request"))
}

#[derive(Default)]
struct Tables {
    submissions: BTreeMap<SubmissionId, SubmissionRecord>,
    challenges: BTreeMap<ChallengeId, Challenge>,
    reviews: Vec<Review>,
    collaborations: BTreeMap<CollaborationId, Collaboration>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// An in-memory repository with hooks for concurrency tests.
pub struct MemoryRepo {
    tables: Mutex<Tables>,
    save_gate: Barrier,
    /// Number of upcoming saves that wait for each other before writing.
    gated_saves: AtomicUsize,
    /// Number of upcoming saves that fail with a version conflict.
    forced_conflicts: AtomicU32,
    /// Status another writer commits just before the next collaboration save.
    concurrent_collaboration_status: Mutex<Option<CollaborationStatus>>,
    /// Number of upcoming review inserts that fail.
    failing_review_inserts: AtomicU32,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            save_gate: Barrier::new(2),
            gated_saves: AtomicUsize::new(0),
            forced_conflicts: AtomicU32::new(0),
            concurrent_collaboration_status: Mutex::new(None),
            failing_review_inserts: AtomicU32::new(0),
        }
    }

    /// Makes another writer move the next saved collaboration to `status`
    /// after the caller has read it.
    pub fn interleave_collaboration_status(&self, status: CollaborationStatus) {
        *self.concurrent_collaboration_status.lock().unwrap() = Some(status);
    }

    pub fn fail_review_inserts(&self, count: u32) {
        self.failing_review_inserts.store(count, Ordering::SeqCst);
    }

    /// Makes the next two saves rendezvous, so both read before either writes.
    pub fn arm_save_gate(&self) {
        self.gated_saves.store(2, Ordering::SeqCst);
    }

    pub fn force_conflicts(&self, count: u32) {
        self.forced_conflicts.store(count, Ordering::SeqCst);
    }

    /// Stores an active challenge owned by `CHALLENGE_OWNER`.
    pub fn seed_challenge(&self) -> ChallengeId {
        let new_challenge = NewChallenge::new(
            "Cut onboarding time",
            CHALLENGE_OWNER,
            datetime!(2026-04-01 00:00 UTC),
            datetime!(2026-05-01 00:00 UTC),
        )
        .unwrap();
        let id = self.insert_challenge(&new_challenge).unwrap();
        self.set_challenge_status(id, ChallengeStatus::Active);
        id
    }

    pub fn set_challenge_status(&self, id: ChallengeId, status: ChallengeStatus) {
        let mut tables = self.tables.lock().unwrap();
        tables.challenges.get_mut(&id).unwrap().status = status;
    }

    /// Forces a stored stage, bypassing the workflow.
    pub fn set_stage(&self, id: SubmissionId, stage: Stage) {
        let mut tables = self.tables.lock().unwrap();
        let record = tables.submissions.get_mut(&id).unwrap();
        record.stage = stage.as_str().to_string();
        record.version += 1;
    }

    /// Writes a raw stage string, bypassing the workflow.
    pub fn corrupt_stage(&self, id: SubmissionId, stage: &str) {
        let mut tables = self.tables.lock().unwrap();
        tables.submissions.get_mut(&id).unwrap().stage = stage.to_string();
    }

    pub fn review_count(&self, id: SubmissionId) -> usize {
        let tables = self.tables.lock().unwrap();
        tables.reviews.iter().filter(|r| r.submission_id == id).count()
    }

    pub fn stored_version(&self, id: SubmissionId) -> i64 {
        self.tables.lock().unwrap().submissions[&id].version
    }
}

impl SubmissionStore for MemoryRepo {
    fn load_submission(&self, id: SubmissionId) -> Result<SubmissionRecord, StoreError> {
        let tables = self.tables.lock().unwrap();
        let mut record = tables
            .submissions
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "submission",
                id: id.value(),
            })?;
        record.review_count =
            u32::try_from(tables.reviews.iter().filter(|r| r.submission_id == id).count()).unwrap();
        Ok(record)
    }

    fn insert_submission(&self, submission: &NewSubmission) -> Result<SubmissionId, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let challenge_id = match submission.origin {
            ideaflow_domain::Origin::Standalone => None,
            ideaflow_domain::Origin::Challenge { challenge_id, .. } => Some(challenge_id),
        };
        let taken = tables.submissions.values().any(|record| {
            challenge_id.is_some()
                && record.challenge_id == challenge_id
                && record.author_id == submission.author_id
        });
        if taken {
            return Err(StoreError::Duplicate(String::from("participant")));
        }
        let id = SubmissionId::new(tables.next_id());
        let record = SubmissionRecord::from_submission(&submission.clone().into_submission(id), 1);
        tables.submissions.insert(id, record);
        Ok(id)
    }

    fn save_submission(&self, record: &SubmissionRecord) -> Result<i64, StoreError> {
        let gated = self
            .gated_saves
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if gated {
            self.save_gate.wait();
        }
        let conflict = self
            .forced_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if conflict {
            return Err(StoreError::VersionConflict {
                id: record.id.value(),
            });
        }

        let mut tables = self.tables.lock().unwrap();
        let stored = tables.submissions.get_mut(&record.id).ok_or(StoreError::NotFound {
            entity: "submission",
            id: record.id.value(),
        })?;
        if stored.version != record.version {
            return Err(StoreError::VersionConflict {
                id: record.id.value(),
            });
        }
        *stored = record.clone();
        stored.version += 1;
        Ok(stored.version)
    }

    fn delete_submission(&self, id: SubmissionId, version: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        match tables.submissions.get(&id) {
            Some(record) if record.version == version => {
                tables.submissions.remove(&id);
                Ok(())
            }
            Some(_) => Err(StoreError::VersionConflict { id: id.value() }),
            None => Err(StoreError::NotFound {
                entity: "submission",
                id: id.value(),
            }),
        }
    }

    fn find_participant_submission(
        &self,
        challenge_id: ChallengeId,
        author_id: UserId,
    ) -> Result<Option<SubmissionId>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .submissions
            .values()
            .find(|r| r.challenge_id == Some(challenge_id) && r.author_id == author_id)
            .map(|r| r.id))
    }

    fn list_challenge_submissions(
        &self,
        challenge_id: ChallengeId,
    ) -> Result<Vec<SubmissionRecord>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .submissions
            .values()
            .filter(|r| r.challenge_id == Some(challenge_id))
            .cloned()
            .collect())
    }

    fn list_open_challenge_submissions(&self) -> Result<Vec<SubmissionRecord>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .submissions
            .values()
            .filter(|r| r.challenge_id.is_some())
            .filter(|r| !Stage::parse(r.kind(), &r.stage).is_ok_and(|s| s.is_terminal()))
            .cloned()
            .collect())
    }
}

impl ChallengeStore for MemoryRepo {
    fn load_challenge(&self, id: ChallengeId) -> Result<Challenge, StoreError> {
        let tables = self.tables.lock().unwrap();
        let mut challenge = tables.challenges.get(&id).cloned().ok_or(StoreError::NotFound {
            entity: "challenge",
            id: id.value(),
        })?;
        challenge.submission_count = u32::try_from(
            tables
                .submissions
                .values()
                .filter(|r| r.challenge_id == Some(id))
                .count(),
        )
        .unwrap();
        Ok(challenge)
    }

    fn insert_challenge(&self, challenge: &NewChallenge) -> Result<ChallengeId, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let id = ChallengeId::new(tables.next_id());
        tables.challenges.insert(
            id,
            Challenge {
                id,
                title: challenge.title.clone(),
                created_by: challenge.created_by,
                status: ChallengeStatus::Draft,
                submission_deadline: challenge.submission_deadline,
                evaluation_deadline: challenge.evaluation_deadline,
                submission_count: 0,
            },
        );
        Ok(id)
    }

    fn save_challenge(&self, challenge: &Challenge) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables.challenges.insert(challenge.id, challenge.clone());
        Ok(())
    }

    fn delete_challenge(&self, id: ChallengeId) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables.challenges.remove(&id);
        Ok(())
    }
}

impl ReviewStore for MemoryRepo {
    fn list_reviews(&self, submission_id: SubmissionId) -> Result<Vec<Review>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .reviews
            .iter()
            .filter(|r| r.submission_id == submission_id)
            .cloned()
            .collect())
    }

    fn insert_review(&self, review: &Review) -> Result<ReviewId, StoreError> {
        let failing = self
            .failing_review_inserts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(StoreError::Backend(String::from("disk I/O error")));
        }
        let mut tables = self.tables.lock().unwrap();
        let id = ReviewId::new(tables.next_id());
        let mut stored = review.clone();
        stored.id = Some(id);
        tables.reviews.push(stored);
        Ok(id)
    }

    fn delete_review(&self, id: ReviewId) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.reviews.len();
        tables.reviews.retain(|r| r.id != Some(id));
        if tables.reviews.len() == before {
            return Err(StoreError::NotFound {
                entity: "review",
                id: id.value(),
            });
        }
        Ok(())
    }
}

impl CollaborationStore for MemoryRepo {
    fn load_collaboration(&self, id: CollaborationId) -> Result<Collaboration, StoreError> {
        let tables = self.tables.lock().unwrap();
        tables
            .collaborations
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "collaboration",
                id: id.value(),
            })
    }

    fn find_collaboration(
        &self,
        submission_id: SubmissionId,
        collaborator_id: UserId,
    ) -> Result<Option<Collaboration>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .collaborations
            .values()
            .rev()
            .find(|c| c.submission_id == submission_id && c.collaborator_id == collaborator_id)
            .cloned())
    }

    fn insert_collaboration(
        &self,
        collaboration: &Collaboration,
    ) -> Result<CollaborationId, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let id = CollaborationId::new(tables.next_id());
        let mut stored = collaboration.clone();
        stored.id = Some(id);
        tables.collaborations.insert(id, stored);
        Ok(id)
    }

    fn save_collaboration(
        &self,
        collaboration: &Collaboration,
        expected: CollaborationStatus,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let id = collaboration.id.unwrap();
        let stored = tables.collaborations.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "collaboration",
            id: id.value(),
        })?;
        if let Some(status) = self.concurrent_collaboration_status.lock().unwrap().take() {
            stored.status = status;
        }
        if stored.status != expected {
            return Err(StoreError::VersionConflict { id: id.value() });
        }
        *stored = collaboration.clone();
        Ok(())
    }
}

/// Captures everything the workflow publishes.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<StageChanged>>,
    pub audits: Mutex<Vec<AuditEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<StageChanged> {
        self.events.lock().unwrap().clone()
    }

    pub fn audit_actions(&self) -> Vec<String> {
        self.audits
            .lock()
            .unwrap()
            .iter()
            .map(|audit| audit.action.name.clone())
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: &StageChanged, audit: &AuditEvent) -> Result<(), StoreError> {
        self.events.lock().unwrap().push(event.clone());
        self.audits.lock().unwrap().push(audit.clone());
        Ok(())
    }

    fn record(&self, audit: &AuditEvent) -> Result<(), StoreError> {
        self.audits.lock().unwrap().push(audit.clone());
        Ok(())
    }
}

/// A sink whose every delivery fails.
pub struct FailingSink;

impl EventSink for FailingSink {
    fn publish(&self, _event: &StageChanged, _audit: &AuditEvent) -> Result<(), StoreError> {
        Err(StoreError::Backend(String::from("notification queue offline")))
    }

    fn record(&self, _audit: &AuditEvent) -> Result<(), StoreError> {
        Err(StoreError::Backend(String::from("audit log offline")))
    }
}
