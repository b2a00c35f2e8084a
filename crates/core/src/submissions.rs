// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::apply::content_audit;
use crate::command::SubmissionDraft;
use crate::error::CoreError;
use crate::policy::{AuthorizationPolicy, ResourceKind};
use crate::ports::{EventSink, Repository, StoreError};
use crate::workflow::WorkflowService;
use ideaflow_audit::{AuditEvent, Cause};
use ideaflow_domain::{
    Actor, Challenge, ChallengeId, DomainError, NewSubmission, Origin, Submission, SubmissionId,
};
use time::OffsetDateTime;
use tracing::info;

/// Creates, edits, and deletes submissions outside of stage changes.
pub struct SubmissionService<'w, 'a, R, E> {
    workflow: &'w WorkflowService<'a, R, E>,
}

impl<'w, 'a, R, E> SubmissionService<'w, 'a, R, E>
where
    R: Repository,
    E: EventSink,
{
    #[must_use]
    pub const fn new(workflow: &'w WorkflowService<'a, R, E>) -> Self {
        Self { workflow }
    }

    /// Creates a standalone idea in the draft stage.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Unauthorized` if the actor may not submit ideas,
    /// or a domain violation if the title is blank.
    pub fn create_idea(
        &self,
        actor: &Actor,
        draft: &SubmissionDraft,
        cause: &Cause,
    ) -> Result<Submission, CoreError> {
        WorkflowService::<R, E>::authorize(
            "create an idea",
            AuthorizationPolicy::can_create(actor, ResourceKind::Idea),
            actor,
        )?;
        self.insert(actor, draft, Origin::Standalone, cause)
    }

    /// Creates a draft submission against an active challenge.
    ///
    /// A participant may hold at most one submission per challenge.
    ///
    /// # Errors
    ///
    /// * `CoreError::Unauthorized` if the actor may not submit
    /// * `CoreError::NotFound` if the challenge does not exist
    /// * `CoreError::DomainViolation` if the actor already has a submission
    ///   for the challenge, or the challenge is not accepting submissions
    pub fn create_challenge_submission(
        &self,
        actor: &Actor,
        challenge_id: ChallengeId,
        draft: &SubmissionDraft,
        cause: &Cause,
    ) -> Result<Submission, CoreError> {
        WorkflowService::<R, E>::authorize(
            "create a challenge submission",
            AuthorizationPolicy::can_create(actor, ResourceKind::ChallengeSubmission),
            actor,
        )?;

        let challenge: Challenge = self.workflow.repo().load_challenge(challenge_id)?;
        let duplicate = || DomainError::DuplicateParticipant {
            challenge_id,
            user_id: actor.id(),
        };
        if self
            .workflow
            .repo()
            .find_participant_submission(challenge_id, actor.id())?
            .is_some()
        {
            return Err(duplicate().into());
        }
        challenge.accepts_submissions(self.workflow.now())?;

        let origin: Origin = Origin::Challenge {
            challenge_id,
            challenge_owner: challenge.created_by,
        };
        self.insert(actor, draft, origin, cause)
    }

    /// Edits a submission's title and collaboration setting.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Unauthorized` if the actor may not edit the
    /// submission, or `CoreError::Conflict` if it changed meanwhile.
    pub fn update_details(
        &self,
        actor: &Actor,
        submission_id: SubmissionId,
        draft: &SubmissionDraft,
        cause: &Cause,
    ) -> Result<Submission, CoreError> {
        let (submission, version) = self.workflow.load(submission_id)?;
        WorkflowService::<R, E>::authorize(
            "edit the submission",
            AuthorizationPolicy::can_update(actor, &submission),
            actor,
        )?;

        let updated: Submission =
            submission.with_details(&draft.title, draft.collaboration_enabled)?;
        let audit: AuditEvent = content_audit(
            &submission,
            actor,
            cause.clone(),
            "UpdateSubmission",
            format!("Edited {} {submission_id}", submission.kind()),
            format!(
                "title={:?} collaboration={}",
                submission.title(),
                submission.collaboration_enabled()
            ),
            format!(
                "title={:?} collaboration={}",
                updated.title(),
                updated.collaboration_enabled()
            ),
            self.workflow.now(),
        );
        self.workflow.commit_content(&updated, version, &audit)?;
        Ok(updated)
    }

    /// Deletes a submission that has no reviews attached.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Unauthorized` if the actor may not delete it, for
    /// example because reviews are attached.
    pub fn delete(
        &self,
        actor: &Actor,
        submission_id: SubmissionId,
        cause: &Cause,
    ) -> Result<(), CoreError> {
        let (submission, version) = self.workflow.load(submission_id)?;
        WorkflowService::<R, E>::authorize(
            "delete the submission",
            AuthorizationPolicy::can_delete(actor, &submission),
            actor,
        )?;

        self.workflow
            .repo()
            .delete_submission(submission_id, version)?;
        info!(submission_id = %submission_id, actor_id = %actor.id(), "Submission deleted");

        let audit: AuditEvent = content_audit(
            &submission,
            actor,
            cause.clone(),
            "DeleteSubmission",
            format!("Deleted {} {submission_id}", submission.kind()),
            format!("stage={} version={version}", submission.stage()),
            String::from("deleted"),
            self.workflow.now(),
        );
        self.workflow.record(&audit);
        Ok(())
    }

    fn insert(
        &self,
        actor: &Actor,
        draft: &SubmissionDraft,
        origin: Origin,
        cause: &Cause,
    ) -> Result<Submission, CoreError> {
        let now: OffsetDateTime = self.workflow.now();
        let new_submission: NewSubmission = NewSubmission::new(&draft.title, actor.id(), origin, now)?
            .with_team(draft.team_members.iter().copied())
            .with_collaboration(draft.collaboration_enabled);

        let id: SubmissionId = self
            .workflow
            .repo()
            .insert_submission(&new_submission)
            .map_err(|err| match (err, origin) {
                // Lost a race against a second create for the same challenge.
                (StoreError::Duplicate(_), Origin::Challenge { challenge_id, .. }) => {
                    CoreError::DomainViolation(DomainError::DuplicateParticipant {
                        challenge_id,
                        user_id: actor.id(),
                    })
                }
                (other, _) => CoreError::from(other),
            })?;
        let submission: Submission = new_submission.into_submission(id);
        info!(
            submission_id = %id,
            kind = %submission.kind(),
            author_id = %actor.id(),
            "Submission created"
        );

        let audit: AuditEvent = content_audit(
            &submission,
            actor,
            cause.clone(),
            "CreateSubmission",
            format!("Created {} {id}", submission.kind()),
            String::from("none"),
            format!("stage={} version=1", submission.stage()),
            now,
        );
        self.workflow.record(&audit);
        Ok(submission)
    }
}
