// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Recording reviews.
//!
//! On an idea, a decided review is the stage change: the review is stored
//! first, then the transition is requested, and the review is withdrawn if
//! the transition fails. A stage never moves without its review, and a review
//! that lost a race leaves no trace. On a challenge submission,
//! reviews accumulate until every required review stage is decided, then the
//! system actor evaluates the submission.

use crate::apply::content_audit;
use crate::command::{ReviewInput, TransitionRequest};
use crate::error::CoreError;
use crate::policy::{AuthorizationPolicy, DenyRule};
use crate::ports::{EventSink, Repository};
use crate::state::{ReviewOutcome, TransitionResult};
use crate::workflow::WorkflowService;
use ideaflow_audit::{AuditEvent, Cause};
use ideaflow_domain::{
    Actor, ChallengeSubmissionStatus, DomainError, Review, ReviewId, ReviewResolution, ReviewStage,
    Stage, Submission, SubmissionId, SubmissionKind, WorkflowAction, resolve_reviews,
};
use tracing::{debug, info, warn};

/// Records reviewer decisions.
pub struct ReviewService<'w, 'a, R, E> {
    workflow: &'w WorkflowService<'a, R, E>,
}

impl<'w, 'a, R, E> ReviewService<'w, 'a, R, E>
where
    R: Repository,
    E: EventSink,
{
    #[must_use]
    pub const fn new(workflow: &'w WorkflowService<'a, R, E>) -> Self {
        Self { workflow }
    }

    /// Records a review and applies the stage change it implies.
    ///
    /// # Arguments
    ///
    /// * `actor` - The reviewer
    /// * `submission_id` - The reviewed submission
    /// * `input` - The decision, optional score and comment, and review stage
    /// * `cause` - The reason recorded in the audit trail
    ///
    /// # Errors
    ///
    /// * `CoreError::Unauthorized` if the reviewer is conflicted, lacks the
    ///   stage permission, or the submission is not reviewable
    /// * `CoreError::Conflict` if an idea moved before the decision landed
    /// * `CoreError::DomainViolation` if the score is out of range or a
    ///   challenge review names no stage
    pub fn submit_review(
        &self,
        actor: &Actor,
        submission_id: SubmissionId,
        input: &ReviewInput,
        cause: &Cause,
    ) -> Result<ReviewOutcome, CoreError> {
        let (submission, _) = self.workflow.load(submission_id)?;
        let review_stage: ReviewStage = Self::review_stage(&submission, input)?;

        WorkflowService::<R, E>::authorize(
            "review the submission",
            AuthorizationPolicy::can_review(actor, &submission, review_stage),
            actor,
        )?;

        let review: Review = Review::new(
            &submission,
            actor.id(),
            review_stage,
            input.decision,
            input.score,
            input.comment.clone(),
            self.workflow.now(),
        )?;

        match submission.kind() {
            SubmissionKind::Idea => self.decide_idea(actor, &submission, &review, cause),
            SubmissionKind::ChallengeSubmission => {
                self.review_challenge_submission(actor, &submission, &review, cause)
            }
        }
    }

    /// Lists the reviews recorded on a submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the reviews cannot be read.
    pub fn list_reviews(&self, submission_id: SubmissionId) -> Result<Vec<Review>, CoreError> {
        Ok(self.workflow.repo().list_reviews(submission_id)?)
    }

    fn review_stage(submission: &Submission, input: &ReviewInput) -> Result<ReviewStage, CoreError> {
        match submission.kind() {
            SubmissionKind::Idea => input
                .stage
                .or_else(|| submission.stage().review_stage())
                .ok_or_else(|| CoreError::Unauthorized {
                    action: String::from("review the submission"),
                    rule: DenyRule::StageNotReviewable,
                }),
            SubmissionKind::ChallengeSubmission => input.stage.ok_or_else(|| {
                CoreError::DomainViolation(DomainError::ReviewStageRequired(submission.id()))
            }),
        }
    }

    fn decide_idea(
        &self,
        actor: &Actor,
        submission: &Submission,
        review: &Review,
        cause: &Cause,
    ) -> Result<ReviewOutcome, CoreError> {
        let review_id: ReviewId = self.workflow.repo().insert_review(review)?;

        let transition: Option<TransitionResult> = match review.decision.workflow_action() {
            Some(action) => {
                let request: TransitionRequest =
                    TransitionRequest::new(submission.id(), action).expecting(submission.stage());
                match self.workflow.request_transition(actor, &request, cause) {
                    Ok(result) => Some(result),
                    Err(err) => {
                        self.withdraw(submission, review_id);
                        return Err(err);
                    }
                }
            }
            None => None,
        };

        self.recorded(actor, submission, review, review_id, cause);
        Ok(ReviewOutcome {
            review_id,
            transition,
        })
    }

    fn review_challenge_submission(
        &self,
        actor: &Actor,
        submission: &Submission,
        review: &Review,
        cause: &Cause,
    ) -> Result<ReviewOutcome, CoreError> {
        let review_id: ReviewId = self.store(actor, submission, review, cause)?;

        let under_review: Stage = Stage::Challenge(ChallengeSubmissionStatus::UnderReview);
        let reviews: Vec<Review> = self.workflow.repo().list_reviews(submission.id())?;
        let resolved: bool = matches!(
            resolve_reviews(&self.workflow.config().required_challenge_reviews, &reviews),
            ReviewResolution::Resolved(_)
        );
        if !resolved {
            return Ok(ReviewOutcome {
                review_id,
                transition: None,
            });
        }

        let request: TransitionRequest =
            TransitionRequest::new(submission.id(), WorkflowAction::Evaluate).expecting(under_review);
        let transition: Option<TransitionResult> = match self.workflow.request_transition(
            &self.workflow.config().system_actor,
            &request,
            cause,
        ) {
            Ok(result) => Some(result),
            Err(err) => {
                // The review is stored either way; evaluation can be retried.
                warn!(
                    submission_id = %submission.id(),
                    error = %err,
                    "Reviews resolved but evaluation failed"
                );
                None
            }
        };
        Ok(ReviewOutcome {
            review_id,
            transition,
        })
    }

    fn store(
        &self,
        actor: &Actor,
        submission: &Submission,
        review: &Review,
        cause: &Cause,
    ) -> Result<ReviewId, CoreError> {
        let review_id: ReviewId = self.workflow.repo().insert_review(review)?;
        self.recorded(actor, submission, review, review_id, cause);
        Ok(review_id)
    }

    fn withdraw(&self, submission: &Submission, review_id: ReviewId) {
        match self.workflow.repo().delete_review(review_id) {
            Ok(()) => {
                debug!(
                    submission_id = %submission.id(),
                    review_id = %review_id,
                    "Review withdrawn after failed transition"
                );
            }
            Err(err) => {
                warn!(
                    submission_id = %submission.id(),
                    review_id = %review_id,
                    error = %err,
                    "Could not withdraw review after failed transition"
                );
            }
        }
    }

    fn recorded(
        &self,
        actor: &Actor,
        submission: &Submission,
        review: &Review,
        review_id: ReviewId,
        cause: &Cause,
    ) {
        info!(
            submission_id = %submission.id(),
            review_id = %review_id,
            reviewer_id = %actor.id(),
            stage = %review.stage,
            decision = %review.decision,
            "Review recorded"
        );

        let audit: AuditEvent = content_audit(
            submission,
            actor,
            cause.clone(),
            "SubmitReview",
            format!("Recorded {} review {review_id}", review.stage),
            format!("reviews={}", submission.review_count()),
            format!("reviews={} decision={}", submission.review_count() + 1, review.decision),
            review.created_at,
        );
        self.workflow.record(&audit);
    }
}
