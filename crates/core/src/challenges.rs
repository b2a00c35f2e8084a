// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::policy::{AuthorizationPolicy, ResourceKind};
use crate::ports::{EventSink, Repository};
use crate::workflow::WorkflowService;
use ideaflow_audit::{Action, Actor as AuditActor, AuditEvent, Cause, Snapshot};
use ideaflow_domain::{Actor, Challenge, ChallengeId, ChallengeStatus, NewChallenge};
use time::OffsetDateTime;
use tracing::info;

/// Manages challenges and their lifecycle.
pub struct ChallengeService<'w, 'a, R, E> {
    workflow: &'w WorkflowService<'a, R, E>,
}

impl<'w, 'a, R, E> ChallengeService<'w, 'a, R, E>
where
    R: Repository,
    E: EventSink,
{
    #[must_use]
    pub const fn new(workflow: &'w WorkflowService<'a, R, E>) -> Self {
        Self { workflow }
    }

    /// Creates a challenge in the draft status.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Unauthorized` if the actor may not create
    /// challenges, or a domain violation if the title or deadlines are
    /// invalid.
    pub fn create_challenge(
        &self,
        actor: &Actor,
        new_challenge: &NewChallenge,
        cause: &Cause,
    ) -> Result<Challenge, CoreError> {
        WorkflowService::<R, E>::authorize(
            "create a challenge",
            AuthorizationPolicy::can_create(actor, ResourceKind::Challenge),
            actor,
        )?;
        let checked: NewChallenge = NewChallenge::new(
            &new_challenge.title,
            actor.id(),
            new_challenge.submission_deadline,
            new_challenge.evaluation_deadline,
        )?;

        let id: ChallengeId = self.workflow.repo().insert_challenge(&checked)?;
        let challenge: Challenge = Challenge {
            id,
            title: checked.title,
            created_by: checked.created_by,
            status: ChallengeStatus::Draft,
            submission_deadline: checked.submission_deadline,
            evaluation_deadline: checked.evaluation_deadline,
            submission_count: 0,
        };
        info!(challenge_id = %id, created_by = %actor.id(), "Challenge created");

        self.audit(
            &challenge,
            actor,
            cause,
            Action::new(String::from("CreateChallenge"), Some(format!("Created challenge {id}"))),
            String::from("none"),
        );
        Ok(challenge)
    }

    /// Edits a challenge's title and deadlines.
    ///
    /// Once submissions exist, only actors with elevated edit rights may
    /// change the challenge.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Unauthorized` if the actor may not edit it, or a
    /// domain violation if the new values are invalid.
    pub fn update_challenge_details(
        &self,
        actor: &Actor,
        challenge_id: ChallengeId,
        title: &str,
        submission_deadline: OffsetDateTime,
        evaluation_deadline: OffsetDateTime,
        cause: &Cause,
    ) -> Result<Challenge, CoreError> {
        let challenge: Challenge = self.workflow.repo().load_challenge(challenge_id)?;
        WorkflowService::<R, E>::authorize(
            "edit the challenge",
            AuthorizationPolicy::can_update_challenge(actor, &challenge),
            actor,
        )?;
        let checked: NewChallenge = NewChallenge::new(
            title,
            challenge.created_by,
            submission_deadline,
            evaluation_deadline,
        )?;

        let updated: Challenge = Challenge {
            title: checked.title,
            submission_deadline: checked.submission_deadline,
            evaluation_deadline: checked.evaluation_deadline,
            ..challenge.clone()
        };
        self.workflow.repo().save_challenge(&updated)?;
        self.audit(
            &updated,
            actor,
            cause,
            Action::new(
                String::from("UpdateChallenge"),
                Some(format!("Edited challenge {challenge_id}")),
            ),
            describe(&challenge),
        );
        Ok(updated)
    }

    /// Moves a challenge to a new status.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Unauthorized` if the actor does not manage the
    /// challenge, or a domain violation if the status change is not allowed.
    pub fn change_status(
        &self,
        actor: &Actor,
        challenge_id: ChallengeId,
        target: ChallengeStatus,
        cause: &Cause,
    ) -> Result<Challenge, CoreError> {
        let challenge: Challenge = self.workflow.repo().load_challenge(challenge_id)?;
        WorkflowService::<R, E>::authorize(
            "change the challenge status",
            AuthorizationPolicy::can_change_challenge_status(actor, &challenge),
            actor,
        )?;
        challenge.status.validate_transition(target)?;

        let updated: Challenge = Challenge {
            status: target,
            ..challenge.clone()
        };
        self.workflow.repo().save_challenge(&updated)?;
        info!(
            challenge_id = %challenge_id,
            from = %challenge.status,
            to = %target,
            "Challenge status changed"
        );
        self.audit(
            &updated,
            actor,
            cause,
            Action::new(
                String::from("ChangeChallengeStatus"),
                Some(format!("Moved challenge {challenge_id} from {} to {target}", challenge.status)),
            ),
            describe(&challenge),
        );
        Ok(updated)
    }

    /// Deletes a challenge that has no submissions.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Unauthorized` if submissions exist or the actor
    /// does not manage the challenge.
    pub fn delete_challenge(
        &self,
        actor: &Actor,
        challenge_id: ChallengeId,
        cause: &Cause,
    ) -> Result<(), CoreError> {
        let challenge: Challenge = self.workflow.repo().load_challenge(challenge_id)?;
        WorkflowService::<R, E>::authorize(
            "delete the challenge",
            AuthorizationPolicy::can_delete_challenge(actor, &challenge),
            actor,
        )?;
        self.workflow.repo().delete_challenge(challenge_id)?;
        info!(challenge_id = %challenge_id, "Challenge deleted");

        let audit: AuditEvent = AuditEvent::new(
            None,
            Some(challenge_id),
            AuditActor::from_actor(actor),
            cause.clone(),
            Action::new(
                String::from("DeleteChallenge"),
                Some(format!("Deleted challenge {challenge_id}")),
            ),
            Snapshot::new(describe(&challenge)),
            Snapshot::new(String::from("deleted")),
            self.workflow.now(),
        );
        self.workflow.record(&audit);
        Ok(())
    }

    fn audit(&self, challenge: &Challenge, actor: &Actor, cause: &Cause, action: Action, before: String) {
        let audit: AuditEvent = AuditEvent::new(
            None,
            Some(challenge.id),
            AuditActor::from_actor(actor),
            cause.clone(),
            action,
            Snapshot::new(before),
            Snapshot::new(describe(challenge)),
            self.workflow.now(),
        );
        self.workflow.record(&audit);
    }
}

fn describe(challenge: &Challenge) -> String {
    format!(
        "title={:?} status={} submission_deadline={} evaluation_deadline={}",
        challenge.title,
        challenge.status,
        challenge.submission_deadline,
        challenge.evaluation_deadline
    )
}
