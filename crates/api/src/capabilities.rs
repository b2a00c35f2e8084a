// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for authorization-aware UI gating.
//!
//! Capabilities expose what an actor is permitted to do without leaking
//! which rule denied it. They are advisory only and do not replace the
//! checks the workflow performs on every request.

use crate::request_response::{Capability, ChallengeCapabilities, SubmissionCapabilities};
use ideaflow::{AuthorizationPolicy, ResourceKind};
use ideaflow_domain::{
    Actor, Challenge, ReviewStage, StageMachine, Submission, WorkflowAction,
};
use time::OffsetDateTime;

/// Computes the capabilities of an actor on one submission.
///
/// # Arguments
///
/// * `actor` - The requesting actor
/// * `submission` - The submission as currently stored
/// * `challenge` - The submission's challenge, if it has one
/// * `machine` - The stage table the workflow runs on
#[must_use]
pub fn compute_submission_capabilities(
    actor: &Actor,
    submission: &Submission,
    challenge: Option<&Challenge>,
    machine: &StageMachine,
) -> SubmissionCapabilities {
    let stage = submission.stage();
    let transition = |action: WorkflowAction| -> Capability {
        let legal: bool = machine.can_transition(stage, action).is_some();
        Capability::from_bool(
            legal
                && AuthorizationPolicy::authorize_transition(actor, submission, action, challenge)
                    .is_allowed(),
        )
    };

    let can_review: bool = ReviewStage::ALL
        .into_iter()
        .filter(|review_stage| stage.accepts_review(*review_stage))
        .any(|review_stage| {
            AuthorizationPolicy::can_review(actor, submission, review_stage).is_allowed()
        });

    let can_advance: bool = machine
        .actions_from(stage)
        .into_iter()
        .filter(|action| {
            action.is_forward()
                && !matches!(action, WorkflowAction::Submit | WorkflowAction::MarkWinner)
        })
        .any(|action| transition(action).is_allowed());

    SubmissionCapabilities {
        can_update: AuthorizationPolicy::can_update(actor, submission).into(),
        can_delete: AuthorizationPolicy::can_delete(actor, submission).into(),
        can_submit: transition(WorkflowAction::Submit),
        can_review: Capability::from_bool(can_review),
        can_advance: Capability::from_bool(can_advance),
        can_archive: transition(WorkflowAction::Archive),
        can_mark_winner: transition(WorkflowAction::MarkWinner),
        can_collaborate: AuthorizationPolicy::can_collaborate(actor, submission).into(),
        can_manage_collaborators: AuthorizationPolicy::can_manage_collaborators(actor, submission)
            .into(),
        can_export: AuthorizationPolicy::can_export(actor, submission).into(),
        can_view_analytics: AuthorizationPolicy::can_view_analytics(actor, submission).into(),
    }
}

/// Computes the capabilities of an actor on one challenge at `now`.
#[must_use]
pub fn compute_challenge_capabilities(
    actor: &Actor,
    challenge: &Challenge,
    now: OffsetDateTime,
) -> ChallengeCapabilities {
    let can_participate: bool = challenge.accepts_submissions(now).is_ok()
        && AuthorizationPolicy::can_create(actor, ResourceKind::ChallengeSubmission).is_allowed();

    ChallengeCapabilities {
        can_update: AuthorizationPolicy::can_update_challenge(actor, challenge).into(),
        can_delete: AuthorizationPolicy::can_delete_challenge(actor, challenge).into(),
        can_change_status: AuthorizationPolicy::can_change_challenge_status(actor, challenge)
            .into(),
        can_export: AuthorizationPolicy::can_export_challenge(actor, challenge).into(),
        can_participate: Capability::from_bool(can_participate),
    }
}
