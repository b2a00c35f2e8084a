// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::event::StageChanged;
use crate::state::TransitionResult;
use ideaflow_audit::{Action, Actor as AuditActor, AuditEvent, Cause, Snapshot};
use ideaflow_domain::{Actor, EvaluationOutcome, StageMachine, Submission, WorkflowAction};
use time::OffsetDateTime;

/// Applies a workflow action to a submission, producing the moved
/// submission, its stage event, and its audit event.
///
/// This is a pure function. Authorization and preconditions are the
/// caller's job; only the legality of the edge is checked here.
///
/// # Arguments
///
/// * `machine` - The stage transition table
/// * `submission` - The submission as currently stored (immutable)
/// * `version` - The stored version the submission was read at
/// * `action` - The action to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `outcome` - The evaluation outcome to record, for `Evaluate`
/// * `at` - The time the change takes effect
///
/// # Returns
///
/// * `Ok(TransitionResult)` with the moved submission and events. The
///   version in the result is `version + 1`, the version a successful save
///   will produce.
///
/// # Errors
///
/// Returns `CoreError::InvalidTransition` if the table has no edge for the
/// action from the current stage, or a domain violation if the outcome
/// cannot be recorded.
#[allow(clippy::too_many_arguments)]
pub fn apply_transition(
    machine: &StageMachine,
    submission: &Submission,
    version: i64,
    action: WorkflowAction,
    actor: &Actor,
    cause: Cause,
    outcome: Option<EvaluationOutcome>,
    at: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let Some(mut moved) = machine.apply(submission, action, at) else {
        return Err(CoreError::InvalidTransition {
            from: submission.stage(),
            action,
        });
    };

    if let Some(outcome) = outcome {
        moved = moved.with_evaluation_outcome(outcome)?;
    }

    let event: StageChanged = StageChanged {
        submission_id: submission.id(),
        challenge_id: submission.challenge_id(),
        from: submission.stage(),
        to: moved.stage(),
        action,
        actor_id: actor.id(),
        occurred_at: at,
    };

    let before: Snapshot = Snapshot::new(format!(
        "stage={} version={version}",
        submission.stage()
    ));
    let after: Snapshot = Snapshot::new(match moved.evaluation_outcome() {
        Some(outcome) => format!(
            "stage={} version={} outcome={outcome}",
            moved.stage(),
            version + 1
        ),
        None => format!("stage={} version={}", moved.stage(), version + 1),
    });
    let audit_action: Action = Action::new(
        action.as_str().to_string(),
        Some(format!(
            "Moved {} {} from {} to {}",
            submission.kind(),
            submission.id(),
            submission.stage(),
            moved.stage()
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        Some(submission.id()),
        submission.challenge_id(),
        AuditActor::from_actor(actor),
        cause,
        audit_action,
        before,
        after,
        at,
    );

    Ok(TransitionResult {
        submission: moved,
        version: version + 1,
        event,
        audit_event,
    })
}

/// Builds an audit event for a change that did not move a stage.
#[allow(clippy::too_many_arguments)]
pub(crate) fn content_audit(
    submission: &Submission,
    actor: &Actor,
    cause: Cause,
    name: &str,
    details: String,
    before: String,
    after: String,
    at: OffsetDateTime,
) -> AuditEvent {
    AuditEvent::new(
        Some(submission.id()),
        submission.challenge_id(),
        AuditActor::from_actor(actor),
        cause,
        Action::new(name.to_string(), Some(details)),
        Snapshot::new(before),
        Snapshot::new(after),
        at,
    )
}
