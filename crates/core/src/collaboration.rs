// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::apply::content_audit;
use crate::error::CoreError;
use crate::policy::AuthorizationPolicy;
use crate::ports::{EventSink, Repository, StoreError, SubmissionRecord};
use crate::workflow::WorkflowService;
use ideaflow_audit::{AuditEvent, Cause};
use ideaflow_domain::{
    Actor, Collaboration, CollaborationId, CollaborationKind, CollaborationStatus, DomainError,
    Submission, SubmissionId, UserId,
};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Team membership changes through invitations and join requests.
pub struct CollaborationService<'w, 'a, R, E> {
    workflow: &'w WorkflowService<'a, R, E>,
}

impl<'w, 'a, R, E> CollaborationService<'w, 'a, R, E>
where
    R: Repository,
    E: EventSink,
{
    #[must_use]
    pub const fn new(workflow: &'w WorkflowService<'a, R, E>) -> Self {
        Self { workflow }
    }

    /// Asks to join a submission's team.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Unauthorized` if the submission does not take
    /// collaborators, or a domain violation if the actor already has an open
    /// request or membership.
    pub fn request_to_join(
        &self,
        actor: &Actor,
        submission_id: SubmissionId,
        cause: &Cause,
    ) -> Result<Collaboration, CoreError> {
        let (submission, _) = self.workflow.load(submission_id)?;
        WorkflowService::<R, E>::authorize(
            "join the team",
            AuthorizationPolicy::can_collaborate(actor, &submission),
            actor,
        )?;
        self.open(actor, &submission, actor.id(), CollaborationKind::JoinRequest, cause)
    }

    /// Invites a user to a submission's team.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Unauthorized` if the actor does not manage the
    /// team, or a domain violation if the invitee is already on it or
    /// already has an open record.
    pub fn invite(
        &self,
        actor: &Actor,
        submission_id: SubmissionId,
        invitee: UserId,
        cause: &Cause,
    ) -> Result<Collaboration, CoreError> {
        let (submission, _) = self.workflow.load(submission_id)?;
        WorkflowService::<R, E>::authorize(
            "invite a collaborator",
            AuthorizationPolicy::can_manage_collaborators(actor, &submission),
            actor,
        )?;
        if submission.is_owner(invitee) {
            return Err(CoreError::DomainViolation(DomainError::AlreadyParticipant {
                submission_id,
                user_id: invitee,
            }));
        }
        self.open(actor, &submission, invitee, CollaborationKind::Invitation, cause)
    }

    /// Accepts or declines a pending invitation or join request.
    ///
    /// Accepting adds the collaborator to the team.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Unauthorized` if the actor is not the party being
    /// asked, or a domain violation if the record is no longer pending.
    pub fn respond(
        &self,
        actor: &Actor,
        collaboration_id: CollaborationId,
        accept: bool,
        cause: &Cause,
    ) -> Result<Collaboration, CoreError> {
        let collaboration: Collaboration =
            self.workflow.repo().load_collaboration(collaboration_id)?;
        let (submission, _) = self.workflow.load(collaboration.submission_id)?;
        WorkflowService::<R, E>::authorize(
            "answer the collaboration",
            AuthorizationPolicy::can_respond_to_collaboration(actor, &submission, &collaboration),
            actor,
        )?;

        let target: CollaborationStatus = if accept {
            CollaborationStatus::Accepted
        } else {
            CollaborationStatus::Declined
        };
        self.move_to(actor, &collaboration, target, cause)
    }

    /// Removes an accepted collaborator from the team.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Unauthorized` if the actor does not manage the
    /// team, or a domain violation if the collaborator is not accepted.
    pub fn remove(
        &self,
        actor: &Actor,
        collaboration_id: CollaborationId,
        cause: &Cause,
    ) -> Result<Collaboration, CoreError> {
        self.manage(actor, collaboration_id, CollaborationStatus::Removed, cause)
    }

    /// Restores a removed collaborator to the team.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Unauthorized` if the actor does not manage the
    /// team, or a domain violation if the collaborator was not removed.
    pub fn reinstate(
        &self,
        actor: &Actor,
        collaboration_id: CollaborationId,
        cause: &Cause,
    ) -> Result<Collaboration, CoreError> {
        self.manage(actor, collaboration_id, CollaborationStatus::Accepted, cause)
    }

    fn manage(
        &self,
        actor: &Actor,
        collaboration_id: CollaborationId,
        target: CollaborationStatus,
        cause: &Cause,
    ) -> Result<Collaboration, CoreError> {
        let collaboration: Collaboration =
            self.workflow.repo().load_collaboration(collaboration_id)?;
        let (submission, _) = self.workflow.load(collaboration.submission_id)?;
        WorkflowService::<R, E>::authorize(
            "manage collaborators",
            AuthorizationPolicy::can_manage_collaborators(actor, &submission),
            actor,
        )?;
        self.move_to(actor, &collaboration, target, cause)
    }

    fn open(
        &self,
        actor: &Actor,
        submission: &Submission,
        collaborator: UserId,
        kind: CollaborationKind,
        cause: &Cause,
    ) -> Result<Collaboration, CoreError> {
        let existing: Option<Collaboration> = self
            .workflow
            .repo()
            .find_collaboration(submission.id(), collaborator)?;
        if existing.is_some_and(|collaboration| collaboration.status.is_open()) {
            return Err(CoreError::DomainViolation(DomainError::DuplicateCollaboration {
                submission_id: submission.id(),
                user_id: collaborator,
            }));
        }

        let now: OffsetDateTime = self.workflow.now();
        let mut collaboration: Collaboration =
            Collaboration::pending(submission.id(), collaborator, actor.id(), kind, now);
        let id: CollaborationId = self.workflow.repo().insert_collaboration(&collaboration)?;
        collaboration.id = Some(id);
        info!(
            submission_id = %submission.id(),
            collaborator_id = %collaborator,
            kind = kind.as_str(),
            "Collaboration opened"
        );

        let audit: AuditEvent = content_audit(
            submission,
            actor,
            cause.clone(),
            "OpenCollaboration",
            format!("Opened {} {id} for user {collaborator}", kind.as_str()),
            String::from("none"),
            format!("collaboration={id} status=pending"),
            now,
        );
        self.workflow.record(&audit);
        Ok(collaboration)
    }

    fn move_to(
        &self,
        actor: &Actor,
        collaboration: &Collaboration,
        target: CollaborationStatus,
        cause: &Cause,
    ) -> Result<Collaboration, CoreError> {
        let now: OffsetDateTime = self.workflow.now();
        let updated: Collaboration = collaboration.transition(target, now)?;

        let member: UserId = collaboration.collaborator_id;
        self.workflow
            .repo()
            .save_collaboration(&updated, collaboration.status)
            .map_err(|err| match err {
                StoreError::VersionConflict { .. } => CoreError::Conflict {
                    submission_id: collaboration.submission_id,
                },
                other => CoreError::from(other),
            })?;

        let team_change: Result<(), CoreError> = match target {
            CollaborationStatus::Accepted => {
                self.update_team(collaboration.submission_id, |submission| {
                    submission.with_team_member(member)
                })
            }
            CollaborationStatus::Removed => {
                self.update_team(collaboration.submission_id, |submission| {
                    submission.without_team_member(member)
                })
            }
            CollaborationStatus::Pending | CollaborationStatus::Declined => Ok(()),
        };
        if let Err(err) = team_change {
            if let Err(rollback) = self.workflow.repo().save_collaboration(collaboration, target) {
                warn!(
                    submission_id = %collaboration.submission_id,
                    collaborator_id = %member,
                    error = %rollback,
                    "Could not restore collaboration after failed team change"
                );
            }
            return Err(err);
        }

        let (submission, _) = self.workflow.load(collaboration.submission_id)?;
        let audit: AuditEvent = content_audit(
            &submission,
            actor,
            cause.clone(),
            "UpdateCollaboration",
            format!("Collaboration for user {member} is now {target}"),
            format!("status={}", collaboration.status),
            format!("status={target}"),
            now,
        );
        self.workflow.record(&audit);
        Ok(updated)
    }

    /// Applies a team change, retrying on version conflicts. A moved stage
    /// does not invalidate a team change.
    fn update_team<F>(&self, submission_id: SubmissionId, change: F) -> Result<(), CoreError>
    where
        F: Fn(&Submission) -> Submission,
    {
        let mut retries: u32 = 0;
        loop {
            let (submission, version) = self.workflow.load(submission_id)?;
            let record: SubmissionRecord =
                SubmissionRecord::from_submission(&change(&submission), version);
            match self.workflow.repo().save_submission(&record) {
                Ok(_) => return Ok(()),
                Err(StoreError::VersionConflict { .. })
                    if retries < self.workflow.config().max_conflict_retries =>
                {
                    retries += 1;
                    debug!(submission_id = %submission_id, attempt = retries, "Retrying team update");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
