// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Workflow port implementations.

use ideaflow::{
    ChallengeStore, CollaborationStore, EventSink, ReviewStore, StageChanged, StoreError,
    SubmissionRecord, SubmissionStore,
};
use ideaflow_audit::AuditEvent;
use ideaflow_domain::{
    Challenge, ChallengeId, Collaboration, CollaborationId, CollaborationStatus, NewChallenge,
    NewSubmission, Review, ReviewId, SubmissionId, UserId,
};
use tracing::{debug, error};

use crate::{Persistence, mutations, queries};

impl SubmissionStore for Persistence {
    fn load_submission(&self, id: SubmissionId) -> Result<SubmissionRecord, StoreError> {
        Ok(queries::submissions::load_submission(
            &mut *self.lock()?,
            id.value(),
        )?)
    }

    fn insert_submission(&self, submission: &NewSubmission) -> Result<SubmissionId, StoreError> {
        let id: i64 = mutations::submissions::insert_submission(&mut *self.lock()?, submission)?;
        Ok(SubmissionId::new(id))
    }

    fn save_submission(&self, record: &SubmissionRecord) -> Result<i64, StoreError> {
        mutations::submissions::save_submission(&mut *self.lock()?, record).map_err(|err| {
            debug!(submission_id = %record.id, error = %err, "Submission save rejected");
            StoreError::from(err)
        })
    }

    fn delete_submission(&self, id: SubmissionId, version: i64) -> Result<(), StoreError> {
        Ok(mutations::submissions::delete_submission(
            &mut *self.lock()?,
            id.value(),
            version,
        )?)
    }

    fn find_participant_submission(
        &self,
        challenge_id: ChallengeId,
        author_id: UserId,
    ) -> Result<Option<SubmissionId>, StoreError> {
        let found: Option<i64> = queries::submissions::find_participant_submission(
            &mut *self.lock()?,
            challenge_id.value(),
            author_id.value(),
        )?;
        Ok(found.map(SubmissionId::new))
    }

    fn list_challenge_submissions(
        &self,
        challenge_id: ChallengeId,
    ) -> Result<Vec<SubmissionRecord>, StoreError> {
        Ok(queries::submissions::list_challenge_submissions(
            &mut *self.lock()?,
            challenge_id.value(),
        )?)
    }

    fn list_open_challenge_submissions(&self) -> Result<Vec<SubmissionRecord>, StoreError> {
        Ok(queries::submissions::list_open_challenge_submissions(
            &mut *self.lock()?,
        )?)
    }
}

impl ChallengeStore for Persistence {
    fn load_challenge(&self, id: ChallengeId) -> Result<Challenge, StoreError> {
        Ok(queries::challenges::load_challenge(
            &mut *self.lock()?,
            id.value(),
        )?)
    }

    fn insert_challenge(&self, challenge: &NewChallenge) -> Result<ChallengeId, StoreError> {
        let id: i64 = mutations::challenges::insert_challenge(&mut *self.lock()?, challenge)?;
        Ok(ChallengeId::new(id))
    }

    fn save_challenge(&self, challenge: &Challenge) -> Result<(), StoreError> {
        Ok(mutations::challenges::save_challenge(
            &mut *self.lock()?,
            challenge,
        )?)
    }

    fn delete_challenge(&self, id: ChallengeId) -> Result<(), StoreError> {
        Ok(mutations::challenges::delete_challenge(
            &mut *self.lock()?,
            id.value(),
        )?)
    }
}

impl ReviewStore for Persistence {
    fn list_reviews(&self, submission_id: SubmissionId) -> Result<Vec<Review>, StoreError> {
        Ok(queries::reviews::list_reviews(
            &mut *self.lock()?,
            submission_id.value(),
        )?)
    }

    fn insert_review(&self, review: &Review) -> Result<ReviewId, StoreError> {
        let id: i64 = mutations::reviews::insert_review(&mut *self.lock()?, review)?;
        Ok(ReviewId::new(id))
    }

    fn delete_review(&self, id: ReviewId) -> Result<(), StoreError> {
        Ok(mutations::reviews::delete_review(
            &mut *self.lock()?,
            id.value(),
        )?)
    }
}

impl CollaborationStore for Persistence {
    fn load_collaboration(&self, id: CollaborationId) -> Result<Collaboration, StoreError> {
        Ok(queries::collaborations::load_collaboration(
            &mut *self.lock()?,
            id.value(),
        )?)
    }

    fn find_collaboration(
        &self,
        submission_id: SubmissionId,
        collaborator_id: UserId,
    ) -> Result<Option<Collaboration>, StoreError> {
        Ok(queries::collaborations::find_collaboration(
            &mut *self.lock()?,
            submission_id.value(),
            collaborator_id.value(),
        )?)
    }

    fn insert_collaboration(
        &self,
        collaboration: &Collaboration,
    ) -> Result<CollaborationId, StoreError> {
        let id: i64 =
            mutations::collaborations::insert_collaboration(&mut *self.lock()?, collaboration)?;
        Ok(CollaborationId::new(id))
    }

    fn save_collaboration(
        &self,
        collaboration: &Collaboration,
        expected: CollaborationStatus,
    ) -> Result<(), StoreError> {
        Ok(mutations::collaborations::save_collaboration(
            &mut *self.lock()?,
            collaboration,
            expected,
        )?)
    }
}

impl EventSink for Persistence {
    fn publish(&self, event: &StageChanged, audit: &AuditEvent) -> Result<(), StoreError> {
        mutations::audit::persist_stage_change(&mut *self.lock()?, event, audit)
            .map(|_| ())
            .map_err(|err| {
                error!(submission_id = %event.submission_id, error = %err, "Failed to persist stage change");
                StoreError::from(err)
            })
    }

    fn record(&self, audit: &AuditEvent) -> Result<(), StoreError> {
        mutations::audit::persist_audit_event(&mut *self.lock()?, audit)
            .map(|_| ())
            .map_err(StoreError::from)
    }
}
