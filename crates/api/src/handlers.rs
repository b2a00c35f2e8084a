// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request handlers.
//!
//! Each handler parses its request into domain types, calls the workflow,
//! and shapes the result into a response. Authorization is enforced by the
//! workflow itself; denials come back as a generic `ApiError::Unauthorized`.

use crate::capabilities::{compute_challenge_capabilities, compute_submission_capabilities};
use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::request_response::{
    ChallengeInfo, GetSubmissionResponse, ReviewInfo, SubmissionInfo, SubmitReviewRequest,
    SubmissionCapabilities, SubmitReviewResponse, SweepFailure, SweepResponse, TransitionSubmissionRequest,
    TransitionSubmissionResponse, format_timestamp,
};
use ideaflow::{
    EventSink, Repository, ReviewInput, ReviewOutcome, ReviewService, SweepReport,
    TransitionRequest, TransitionResult, WorkflowService,
};
use ideaflow_audit::Cause;
use ideaflow_domain::{
    Actor, Challenge, ChallengeId, Review, ReviewDecision, ReviewId, ReviewStage, Stage, Submission,
    SubmissionId, UserId, WorkflowAction,
};
use time::OffsetDateTime;
use tracing::info;

/// Moves a submission along the workflow.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` if the action or expected stage cannot
/// be parsed, and the translated workflow error if the request is refused.
pub fn transition_submission<R, E>(
    workflow: &WorkflowService<'_, R, E>,
    actor: &Actor,
    request: &TransitionSubmissionRequest,
    cause: &Cause,
) -> Result<TransitionSubmissionResponse, ApiError>
where
    R: Repository,
    E: EventSink,
{
    let submission_id: SubmissionId = SubmissionId::new(request.submission_id);
    let action: WorkflowAction = request
        .action
        .parse()
        .map_err(translate_domain_error)?;

    let mut command: TransitionRequest = TransitionRequest::new(submission_id, action);
    if let Some(expected) = request.expected_stage.as_deref() {
        let (submission, _) = workflow.load(submission_id).map_err(translate_core_error)?;
        let stage: Stage =
            Stage::parse(submission.kind(), expected).map_err(translate_domain_error)?;
        command = command.expecting(stage);
    }

    let result: TransitionResult = workflow
        .request_transition(actor, &command, cause)
        .map_err(translate_core_error)?;

    info!(
        submission_id = %submission_id,
        action = %action,
        to = %result.event.to,
        "Transition request completed"
    );

    Ok(TransitionSubmissionResponse {
        submission_id: submission_id.value(),
        action: action.as_str().to_string(),
        from_stage: result.event.from.as_str().to_string(),
        to_stage: result.event.to.as_str().to_string(),
        version: result.version,
        evaluation_outcome: result
            .submission
            .evaluation_outcome()
            .map(|outcome| outcome.as_str().to_string()),
        message: format!(
            "Submission {submission_id} moved from {} to {}",
            result.event.from, result.event.to
        ),
    })
}

/// Records a review on a submission.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` if the decision or review stage cannot
/// be parsed, and the translated workflow error if the review is refused.
pub fn submit_review<R, E>(
    workflow: &WorkflowService<'_, R, E>,
    actor: &Actor,
    request: &SubmitReviewRequest,
    cause: &Cause,
) -> Result<SubmitReviewResponse, ApiError>
where
    R: Repository,
    E: EventSink,
{
    let submission_id: SubmissionId = SubmissionId::new(request.submission_id);
    let decision: ReviewDecision = request
        .decision
        .parse()
        .map_err(translate_domain_error)?;
    let stage: Option<ReviewStage> = request
        .review_stage
        .as_deref()
        .map(str::parse::<ReviewStage>)
        .transpose()
        .map_err(translate_domain_error)?;

    let input: ReviewInput = ReviewInput {
        stage,
        decision,
        score: request.score,
        comment: request.comment.clone(),
    };

    let outcome: ReviewOutcome = ReviewService::new(workflow)
        .submit_review(actor, submission_id, &input, cause)
        .map_err(translate_core_error)?;

    let new_stage: Option<String> = outcome
        .transition
        .as_ref()
        .map(|result| result.event.to.as_str().to_string());
    let message: String = new_stage.as_ref().map_or_else(
        || format!("Review recorded on submission {submission_id}"),
        |stage| format!("Review recorded; submission {submission_id} moved to {stage}"),
    );

    Ok(SubmitReviewResponse {
        review_id: outcome.review_id.value(),
        submission_id: submission_id.value(),
        new_stage,
        message,
    })
}

/// Looks up a submission with its reviews and the actor's capabilities.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the submission does not exist,
/// or `ApiError::Internal` if its stored state cannot be read.
pub fn get_submission<R, E>(
    workflow: &WorkflowService<'_, R, E>,
    actor: &Actor,
    submission_id: i64,
) -> Result<GetSubmissionResponse, ApiError>
where
    R: Repository,
    E: EventSink,
{
    let submission_id: SubmissionId = SubmissionId::new(submission_id);
    let (submission, version) = workflow.load(submission_id).map_err(translate_core_error)?;
    let challenge: Option<Challenge> = submission
        .challenge_id()
        .map(|challenge_id| workflow.load_challenge(challenge_id))
        .transpose()
        .map_err(translate_core_error)?;
    let reviews: Vec<Review> = ReviewService::new(workflow)
        .list_reviews(submission_id)
        .map_err(translate_core_error)?;

    let capabilities = compute_submission_capabilities(
        actor,
        &submission,
        challenge.as_ref(),
        workflow.machine(),
    );

    Ok(GetSubmissionResponse {
        submission: submission_info(&submission, version, capabilities),
        reviews: reviews.iter().map(review_info).collect(),
    })
}

/// Looks up a challenge with the actor's capabilities.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the challenge does not exist.
pub fn get_challenge<R, E>(
    workflow: &WorkflowService<'_, R, E>,
    actor: &Actor,
    challenge_id: i64,
) -> Result<ChallengeInfo, ApiError>
where
    R: Repository,
    E: EventSink,
{
    let challenge: Challenge = workflow
        .load_challenge(ChallengeId::new(challenge_id))
        .map_err(translate_core_error)?;
    Ok(challenge_info(actor, &challenge, workflow.current_time()))
}

/// Archives every challenge submission whose deadline has passed.
///
/// This is the entry point for scheduled triggers. The change is made by
/// the configured system actor.
///
/// # Errors
///
/// Returns an error only if the open submissions cannot be listed.
pub fn run_deadline_sweep<R, E>(
    workflow: &WorkflowService<'_, R, E>,
    cause: &Cause,
) -> Result<SweepResponse, ApiError>
where
    R: Repository,
    E: EventSink,
{
    let report: SweepReport = workflow
        .sweep_expired(cause)
        .map_err(translate_core_error)?;

    let message: String = format!(
        "Archived {} submission(s); {} failed",
        report.archived.len(),
        report.failed.len()
    );
    Ok(SweepResponse {
        archived: report.archived.iter().copied().map(SubmissionId::value).collect(),
        failed: report
            .failed
            .into_iter()
            .map(|(submission_id, reason)| SweepFailure {
                submission_id: submission_id.value(),
                reason,
            })
            .collect(),
        message,
    })
}

/// Shapes a challenge into its response form.
#[must_use]
pub fn challenge_info(actor: &Actor, challenge: &Challenge, now: OffsetDateTime) -> ChallengeInfo {
    ChallengeInfo {
        challenge_id: challenge.id.value(),
        title: challenge.title.clone(),
        created_by: challenge.created_by.value(),
        status: challenge.status.as_str().to_string(),
        submission_deadline: format_timestamp(challenge.submission_deadline),
        evaluation_deadline: format_timestamp(challenge.evaluation_deadline),
        submission_count: challenge.submission_count,
        capabilities: compute_challenge_capabilities(actor, challenge, now),
    }
}

fn submission_info(
    submission: &Submission,
    version: i64,
    capabilities: SubmissionCapabilities,
) -> SubmissionInfo {
    SubmissionInfo {
        submission_id: submission.id().value(),
        kind: submission.kind().as_str().to_string(),
        title: submission.title().to_string(),
        author_id: submission.author_id().value(),
        team_members: submission
            .team_members()
            .iter()
            .copied()
            .map(UserId::value)
            .collect(),
        challenge_id: submission.challenge_id().map(ChallengeId::value),
        stage: submission.stage().as_str().to_string(),
        collaboration_enabled: submission.collaboration_enabled(),
        assigned_reviewer: submission.assigned_reviewer().map(UserId::value),
        evaluation_outcome: submission
            .evaluation_outcome()
            .map(|outcome| outcome.as_str().to_string()),
        review_count: submission.review_count(),
        created_at: format_timestamp(submission.created_at()),
        last_stage_change: format_timestamp(submission.last_stage_change()),
        version,
        capabilities,
    }
}

fn review_info(review: &Review) -> ReviewInfo {
    ReviewInfo {
        review_id: review.id.map(ReviewId::value),
        reviewer_id: review.reviewer_id.value(),
        review_stage: review.stage.as_str().to_string(),
        decision: review.decision.as_str().to_string(),
        score: review.score,
        comment: review.comment.clone(),
        created_at: format_timestamp(review.created_at),
    }
}
