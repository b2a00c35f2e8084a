// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The workflow service.
//!
//! Every stage change goes through `WorkflowService::request_transition`:
//! load, authorize, check legality and preconditions, apply, then save with
//! a compare-and-swap on the stored version. A lost race is retried against
//! a fresh read only while the stage is still the one the caller observed.
//! Once the stage has moved the request fails with a conflict instead of
//! being applied to a state the caller never saw.

use crate::apply::{apply_transition, content_audit};
use crate::command::TransitionRequest;
use crate::config::WorkflowConfig;
use crate::error::CoreError;
use crate::policy::{AuthorizationPolicy, Decision};
use crate::ports::{EventSink, Repository, StoreError, SubmissionRecord};
use crate::state::{SweepReport, TransitionResult};
use ideaflow_audit::{AuditEvent, Cause};
use ideaflow_domain::{
    Actor, Challenge, ChallengeId, ChallengeSubmissionStatus, DomainError, EvaluationOutcome,
    Review, ReviewResolution, Stage, StageMachine, Submission, SubmissionId, UserId,
    WorkflowAction, resolve_reviews,
};
use std::collections::BTreeMap;
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

/// Coordinates authorization, the stage table, and storage.
pub struct WorkflowService<'a, R, E> {
    repo: &'a R,
    sink: &'a E,
    machine: &'static StageMachine,
    config: WorkflowConfig,
    clock: fn() -> OffsetDateTime,
}

impl<'a, R, E> WorkflowService<'a, R, E>
where
    R: Repository,
    E: EventSink,
{
    /// Creates a workflow service over a repository and an event sink.
    ///
    /// # Errors
    ///
    /// Returns a domain violation if the stage table fails validation or the
    /// configured system actor could be mistaken for a user account.
    pub fn new(repo: &'a R, sink: &'a E, config: WorkflowConfig) -> Result<Self, CoreError> {
        let machine: &'static StageMachine = StageMachine::standard()?;
        let system_id: UserId = config.system_actor.id();
        if system_id.is_account() {
            return Err(DomainError::SystemActorIsAccount(system_id).into());
        }
        Ok(Self {
            repo,
            sink,
            machine,
            config,
            clock: OffsetDateTime::now_utc,
        })
    }

    /// Replaces the wall clock.
    #[must_use]
    pub const fn with_clock(mut self, clock: fn() -> OffsetDateTime) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    #[must_use]
    pub const fn machine(&self) -> &'static StageMachine {
        self.machine
    }

    pub(crate) const fn repo(&self) -> &'a R {
        self.repo
    }

    pub(crate) fn now(&self) -> OffsetDateTime {
        (self.clock)()
    }

    /// Loads a submission and the version it was read at.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if it does not exist, or
    /// `CoreError::CorruptState` if the stored stage cannot be read.
    pub fn load(&self, id: SubmissionId) -> Result<(Submission, i64), CoreError> {
        let record: SubmissionRecord = self.repo.load_submission(id)?;
        let version: i64 = record.version;
        let submission: Submission = record.into_submission().inspect_err(|err| {
            error!(submission_id = %id, error = %err, "Stored submission is unreadable");
        })?;
        Ok((submission, version))
    }

    /// Loads a challenge with its submission count.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if it does not exist.
    pub fn load_challenge(&self, id: ChallengeId) -> Result<Challenge, CoreError> {
        Ok(self.repo.load_challenge(id)?)
    }

    /// Returns the current time as seen by the workflow clock.
    #[must_use]
    pub fn current_time(&self) -> OffsetDateTime {
        self.now()
    }

    /// Requests a stage change on behalf of an actor.
    ///
    /// # Arguments
    ///
    /// * `actor` - The requesting actor
    /// * `request` - The submission, the action, and optionally the stage the
    ///   caller observed
    /// * `cause` - The reason recorded in the audit trail
    ///
    /// # Errors
    ///
    /// * `CoreError::Unauthorized` if the policy denies the request
    /// * `CoreError::InvalidTransition` if the action is not legal from the
    ///   current stage
    /// * `CoreError::Conflict` if the submission moved since it was observed
    /// * `CoreError::DomainViolation` if a deadline or review precondition
    ///   does not hold
    pub fn request_transition(
        &self,
        actor: &Actor,
        request: &TransitionRequest,
        cause: &Cause,
    ) -> Result<TransitionResult, CoreError> {
        let (mut submission, mut version) = self.load(request.submission_id)?;
        let observed: Stage = request.expected_stage.unwrap_or_else(|| submission.stage());
        if submission.stage() != observed {
            debug!(
                submission_id = %request.submission_id,
                expected = %observed,
                actual = %submission.stage(),
                "Submission moved before the request was handled"
            );
            return Err(CoreError::Conflict {
                submission_id: request.submission_id,
            });
        }

        let mut retries: u32 = 0;
        loop {
            let result: TransitionResult =
                self.prepare(actor, &submission, version, request.action, cause)?;
            let record: SubmissionRecord = SubmissionRecord::from_submission(&result.submission, version);

            match self.repo.save_submission(&record) {
                Ok(new_version) => {
                    let result: TransitionResult = TransitionResult {
                        version: new_version,
                        ..result
                    };
                    info!(
                        submission_id = %result.event.submission_id,
                        from = %result.event.from,
                        to = %result.event.to,
                        action = %result.event.action,
                        actor_id = %result.event.actor_id,
                        "Stage changed"
                    );
                    self.publish(&result);
                    return Ok(result);
                }
                Err(StoreError::VersionConflict { .. }) => {
                    retries += 1;
                    if retries > self.config.max_conflict_retries {
                        warn!(
                            submission_id = %request.submission_id,
                            retries = retries - 1,
                            "Giving up after repeated version conflicts"
                        );
                        return Err(CoreError::Conflict {
                            submission_id: request.submission_id,
                        });
                    }
                    (submission, version) = self.load(request.submission_id)?;
                    if submission.stage() != observed {
                        debug!(
                            submission_id = %request.submission_id,
                            stage = %submission.stage(),
                            "Lost the race to a concurrent stage change"
                        );
                        return Err(CoreError::Conflict {
                            submission_id: request.submission_id,
                        });
                    }
                    debug!(
                        submission_id = %request.submission_id,
                        attempt = retries,
                        "Retrying after a version conflict"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Assigns a reviewer to the submission's current review stage.
    ///
    /// The assignment is cleared by the next stage change.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Unauthorized` if the actor may not assign the
    /// reviewer, or `CoreError::Conflict` if the submission changed meanwhile.
    pub fn assign_reviewer(
        &self,
        actor: &Actor,
        submission_id: SubmissionId,
        reviewer: UserId,
        cause: &Cause,
    ) -> Result<Submission, CoreError> {
        let (submission, version) = self.load(submission_id)?;
        Self::authorize(
            "assign a reviewer",
            AuthorizationPolicy::can_assign_reviewer(actor, &submission, reviewer),
            actor,
        )?;

        let updated: Submission = submission.with_assigned_reviewer(reviewer);
        let audit: AuditEvent = content_audit(
            &submission,
            actor,
            cause.clone(),
            "AssignReviewer",
            format!("Assigned reviewer {reviewer} at stage {}", submission.stage()),
            format!("assigned_reviewer={:?}", submission.assigned_reviewer().map(UserId::value)),
            format!("assigned_reviewer={}", reviewer.value()),
            self.now(),
        );
        self.commit_content(&updated, version, &audit)?;
        Ok(updated)
    }

    /// Archives challenge submissions whose deadlines have passed.
    ///
    /// Drafts are archived once the submission deadline is reached, and every
    /// submission still short of an evaluation once the evaluation deadline
    /// is reached. Evaluated submissions are left for winner selection. The
    /// system actor performs the change. A failure on one submission does not
    /// stop the sweep.
    ///
    /// # Errors
    ///
    /// Returns an error only if the open submissions cannot be listed.
    pub fn sweep_expired(&self, cause: &Cause) -> Result<SweepReport, CoreError> {
        let now: OffsetDateTime = self.now();
        let mut report: SweepReport = SweepReport::default();
        let mut challenges: BTreeMap<ChallengeId, Option<Challenge>> = BTreeMap::new();

        for record in self.repo.list_open_challenge_submissions()? {
            let submission_id: SubmissionId = record.id;
            let Some(challenge_id) = record.challenge_id else {
                continue;
            };
            let challenge: Option<&Challenge> = challenges
                .entry(challenge_id)
                .or_insert_with(|| self.repo.load_challenge(challenge_id).ok())
                .as_ref();
            let Some(challenge) = challenge else {
                report
                    .failed
                    .push((submission_id, format!("challenge {challenge_id} not found")));
                continue;
            };

            let is_draft: bool = record.stage == ChallengeSubmissionStatus::Draft.as_str();
            let is_evaluated: bool = record.stage == ChallengeSubmissionStatus::Evaluated.as_str();
            let expired: bool = (!is_evaluated && now >= challenge.evaluation_deadline)
                || (is_draft && now >= challenge.submission_deadline);
            if !expired {
                continue;
            }

            let request: TransitionRequest =
                TransitionRequest::new(submission_id, WorkflowAction::Archive);
            match self.request_transition(&self.config.system_actor, &request, cause) {
                Ok(_) => report.archived.push(submission_id),
                Err(err) => {
                    warn!(submission_id = %submission_id, error = %err, "Failed to archive expired submission");
                    report.failed.push((submission_id, err.to_string()));
                }
            }
        }

        info!(
            archived = report.archived.len(),
            failed = report.failed.len(),
            "Deadline sweep finished"
        );
        Ok(report)
    }

    /// Saves a content change with a single compare-and-swap and records its
    /// audit event.
    pub(crate) fn commit_content(
        &self,
        submission: &Submission,
        version: i64,
        audit: &AuditEvent,
    ) -> Result<i64, CoreError> {
        let record: SubmissionRecord = SubmissionRecord::from_submission(submission, version);
        let new_version: i64 = self.repo.save_submission(&record)?;
        self.record(audit);
        Ok(new_version)
    }

    /// Records an audit event. Failures are logged, not returned.
    pub(crate) fn record(&self, audit: &AuditEvent) {
        if let Err(err) = self.sink.record(audit) {
            warn!(action = %audit.action.name, error = %err, "Failed to record audit event");
        }
    }

    /// Turns a policy decision into a result, logging denials.
    pub(crate) fn authorize(
        action: &str,
        decision: Decision,
        actor: &Actor,
    ) -> Result<(), CoreError> {
        match decision {
            Decision::Allowed => Ok(()),
            Decision::Denied(rule) => {
                warn!(actor_id = %actor.id(), action, rule = %rule, "Request denied");
                Err(CoreError::Unauthorized {
                    action: action.to_string(),
                    rule,
                })
            }
        }
    }

    /// Authorizes, checks, and applies an action without saving.
    fn prepare(
        &self,
        actor: &Actor,
        submission: &Submission,
        version: i64,
        action: WorkflowAction,
        cause: &Cause,
    ) -> Result<TransitionResult, CoreError> {
        let now: OffsetDateTime = self.now();
        let challenge: Option<Challenge> = self.challenge_for(submission, action)?;

        Self::authorize(
            action.as_str(),
            AuthorizationPolicy::authorize_transition(actor, submission, action, challenge.as_ref()),
            actor,
        )?;

        if self.machine.can_transition(submission.stage(), action).is_none() {
            return Err(CoreError::InvalidTransition {
                from: submission.stage(),
                action,
            });
        }

        let mut outcome: Option<EvaluationOutcome> = None;
        match action {
            WorkflowAction::Submit => {
                if let Some(challenge) = &challenge {
                    challenge.accepts_submissions(now)?;
                }
            }
            WorkflowAction::Evaluate => {
                outcome = Some(self.resolve_outcome(submission)?);
            }
            WorkflowAction::MarkWinner => {
                if let Some(challenge) = &challenge
                    && submission.challenge_id() != Some(challenge.id)
                {
                    return Err(CoreError::DomainViolation(DomainError::MismatchedChallenge {
                        submission_id: submission.id(),
                        challenge_id: challenge.id,
                    }));
                }
            }
            WorkflowAction::Approve
            | WorkflowAction::Reject
            | WorkflowAction::RequestChanges
            | WorkflowAction::StartReview
            | WorkflowAction::Archive => {}
        }

        apply_transition(
            self.machine,
            submission,
            version,
            action,
            actor,
            cause.clone(),
            outcome,
            now,
        )
    }

    fn challenge_for(
        &self,
        submission: &Submission,
        action: WorkflowAction,
    ) -> Result<Option<Challenge>, CoreError> {
        let needed: bool = matches!(action, WorkflowAction::Submit | WorkflowAction::MarkWinner);
        match submission.challenge_id() {
            Some(challenge_id) if needed => Ok(Some(self.repo.load_challenge(challenge_id)?)),
            _ => Ok(None),
        }
    }

    fn resolve_outcome(&self, submission: &Submission) -> Result<EvaluationOutcome, CoreError> {
        let reviews: Vec<Review> = self.repo.list_reviews(submission.id())?;
        match resolve_reviews(&self.config.required_challenge_reviews, &reviews) {
            ReviewResolution::Resolved(outcome) => Ok(outcome),
            ReviewResolution::Pending { missing } => {
                Err(CoreError::DomainViolation(DomainError::ReviewsUnresolved {
                    submission_id: submission.id(),
                    missing: missing.iter().map(|stage| stage.as_str().to_string()).collect(),
                }))
            }
        }
    }

    fn publish(&self, result: &TransitionResult) {
        if let Err(err) = self.sink.publish(&result.event, &result.audit_event) {
            warn!(
                submission_id = %result.event.submission_id,
                error = %err,
                "Stage change committed but its event was not delivered"
            );
        }
    }
}
