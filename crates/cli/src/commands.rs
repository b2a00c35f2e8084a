// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Subcommands and their execution.

use clap::Subcommand;
use ideaflow::{
    ChallengeService, CollaborationService, SubmissionDraft, SubmissionService, WorkflowService,
};
use ideaflow_api::{
    ApiError, ListChallengesResponse, SubmitReviewRequest, TransitionSubmissionRequest,
    challenge_info, export_challenge_submissions_csv, format_timestamp, get_challenge,
    get_submission, run_deadline_sweep, submit_review, transition_submission,
    translate_core_error, translate_domain_error,
};
use ideaflow_audit::{AuditEvent, Cause};
use ideaflow_domain::{
    AccountStatus, Actor, Challenge, ChallengeId, ChallengeStatus, Collaboration,
    CollaborationId, NewChallenge, Role, Submission, SubmissionId, UserId,
};
use ideaflow_persistence::{Persistence, PersistenceError};
use serde_json::{Value, json};
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::info;

/// Errors reported by the command line.
#[derive(Debug, Error)]
pub enum CliError {
    /// The command needs an acting user.
    #[error("This command needs an acting user; pass --actor <id>")]
    MissingActor,
    /// A role name could not be parsed.
    #[error("Unknown role '{0}'")]
    InvalidRole(String),
    /// The actor id is reserved for the system actor.
    #[error("Actor id {0} is reserved; account ids are positive")]
    ReservedActor(i64),
    /// The workflow refused the request.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The database failed outside of a workflow request.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    /// Output could not be written.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
    /// A response could not be serialized.
    #[error("Failed to serialize response: {0}")]
    Output(#[from] serde_json::Error),
}

/// Everything a command needs to run.
pub struct Context<'w, 'a> {
    pub workflow: &'w WorkflowService<'a, Persistence, Persistence>,
    pub persistence: &'a Persistence,
    pub actor_id: Option<i64>,
    pub roles: Vec<String>,
    pub cause: Cause,
}

impl Context<'_, '_> {
    /// Builds the acting user from the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if no actor was given, the id is reserved, or a role
    /// is unknown.
    pub fn actor(&self) -> Result<Actor, CliError> {
        let id: i64 = self.actor_id.ok_or(CliError::MissingActor)?;
        if !UserId::new(id).is_account() {
            return Err(CliError::ReservedActor(id));
        }
        let roles: Vec<Role> = self
            .roles
            .iter()
            .map(|role| {
                role.trim()
                    .parse::<Role>()
                    .map_err(|_| CliError::InvalidRole(role.clone()))
            })
            .collect::<Result<Vec<Role>, CliError>>()?;
        Ok(Actor::new(UserId::new(id), roles, AccountStatus::Active, true))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a submission with its reviews and what the actor may do with it
    Show {
        /// The submission ID
        submission_id: i64,
    },
    /// Show a challenge
    Challenge {
        /// The challenge ID
        challenge_id: i64,
    },
    /// List all challenges
    Challenges,
    /// Create a standalone idea
    CreateIdea {
        /// The idea title
        #[arg(long)]
        title: String,
        /// Co-author user IDs, comma separated
        #[arg(long, value_delimiter = ',')]
        team: Vec<i64>,
        /// Accept join requests from other users
        #[arg(long)]
        collaboration: bool,
    },
    /// Create a challenge in the draft status
    CreateChallenge {
        /// The challenge title
        #[arg(long)]
        title: String,
        /// Submission deadline (RFC 3339)
        #[arg(long, value_parser = parse_timestamp)]
        submission_deadline: OffsetDateTime,
        /// Evaluation deadline (RFC 3339)
        #[arg(long, value_parser = parse_timestamp)]
        evaluation_deadline: OffsetDateTime,
    },
    /// Move a challenge to another status
    ChallengeStatus {
        /// The challenge ID
        challenge_id: i64,
        /// The target status (e.g. `active`, `closed`, `judging`)
        status: String,
    },
    /// Submit to a challenge
    Participate {
        /// The challenge ID
        challenge_id: i64,
        /// The submission title
        #[arg(long)]
        title: String,
    },
    /// Apply a workflow action to a submission
    Transition {
        /// The submission ID
        submission_id: i64,
        /// The action (e.g. `submit`, `approve`, `archive`)
        action: String,
        /// Fail if the submission is no longer in this stage
        #[arg(long)]
        expect: Option<String>,
    },
    /// Record a review decision
    Review {
        /// The submission ID
        submission_id: i64,
        /// The decision (`approved`, `rejected`, `needs_changes`, `pending`)
        decision: String,
        /// The review stage; required for challenge submissions
        #[arg(long)]
        stage: Option<String>,
        /// Score from 0 to 100
        #[arg(long)]
        score: Option<u8>,
        /// Reviewer comment
        #[arg(long)]
        comment: Option<String>,
    },
    /// Ask to join a submission's team
    Join {
        /// The submission ID
        submission_id: i64,
    },
    /// Invite a user to a submission's team
    Invite {
        /// The submission ID
        submission_id: i64,
        /// The invited user ID
        user_id: i64,
    },
    /// Accept or decline a pending collaboration
    Respond {
        /// The collaboration ID
        collaboration_id: i64,
        /// Decline instead of accepting
        #[arg(long)]
        decline: bool,
    },
    /// Archive challenge submissions whose deadlines have passed
    Sweep,
    /// Write the submissions of a challenge as CSV
    Export {
        /// The challenge ID
        challenge_id: i64,
        /// Output file; standard output when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the audit trail of a submission
    Audit {
        /// The submission ID
        submission_id: i64,
    },
}

fn parse_timestamp(value: &str) -> Result<OffsetDateTime, String> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| format!("expected RFC 3339: {e}"))
}

/// Runs one command.
///
/// Returns the response to print, or `None` if the command already wrote
/// its output to `out`.
///
/// # Errors
///
/// Returns an error if the request is refused or cannot be completed.
#[allow(clippy::too_many_lines)]
pub fn execute<W: Write>(
    ctx: &Context<'_, '_>,
    command: Command,
    out: &mut W,
) -> Result<Option<Value>, CliError> {
    let workflow = ctx.workflow;
    let cause: &Cause = &ctx.cause;

    let response: Value = match command {
        Command::Show { submission_id } => {
            serde_json::to_value(get_submission(workflow, &ctx.actor()?, submission_id)?)?
        }
        Command::Challenge { challenge_id } => {
            serde_json::to_value(get_challenge(workflow, &ctx.actor()?, challenge_id)?)?
        }
        Command::Challenges => {
            let actor: Actor = ctx.actor()?;
            let now: OffsetDateTime = workflow.current_time();
            let challenges: Vec<Challenge> = ctx.persistence.list_challenges()?;
            serde_json::to_value(ListChallengesResponse {
                challenges: challenges
                    .iter()
                    .map(|challenge| challenge_info(&actor, challenge, now))
                    .collect(),
            })?
        }
        Command::CreateIdea {
            title,
            team,
            collaboration,
        } => {
            let actor: Actor = ctx.actor()?;
            let draft: SubmissionDraft = SubmissionDraft {
                title,
                team_members: team.into_iter().map(UserId::new).collect(),
                collaboration_enabled: collaboration,
            };
            let idea: Submission = SubmissionService::new(workflow)
                .create_idea(&actor, &draft, cause)
                .map_err(translate_core_error)?;
            serde_json::to_value(get_submission(workflow, &actor, idea.id().value())?)?
        }
        Command::CreateChallenge {
            title,
            submission_deadline,
            evaluation_deadline,
        } => {
            let actor: Actor = ctx.actor()?;
            let new_challenge: NewChallenge =
                NewChallenge::new(&title, actor.id(), submission_deadline, evaluation_deadline)
                    .map_err(translate_domain_error)?;
            let challenge: Challenge = ChallengeService::new(workflow)
                .create_challenge(&actor, &new_challenge, cause)
                .map_err(translate_core_error)?;
            serde_json::to_value(challenge_info(&actor, &challenge, workflow.current_time()))?
        }
        Command::ChallengeStatus {
            challenge_id,
            status,
        } => {
            let actor: Actor = ctx.actor()?;
            let target: ChallengeStatus = status.parse().map_err(translate_domain_error)?;
            let challenge: Challenge = ChallengeService::new(workflow)
                .change_status(&actor, ChallengeId::new(challenge_id), target, cause)
                .map_err(translate_core_error)?;
            serde_json::to_value(challenge_info(&actor, &challenge, workflow.current_time()))?
        }
        Command::Participate {
            challenge_id,
            title,
        } => {
            let actor: Actor = ctx.actor()?;
            let submission: Submission = SubmissionService::new(workflow)
                .create_challenge_submission(
                    &actor,
                    ChallengeId::new(challenge_id),
                    &SubmissionDraft::titled(&title),
                    cause,
                )
                .map_err(translate_core_error)?;
            serde_json::to_value(get_submission(workflow, &actor, submission.id().value())?)?
        }
        Command::Transition {
            submission_id,
            action,
            expect,
        } => {
            let request: TransitionSubmissionRequest = TransitionSubmissionRequest {
                submission_id,
                action,
                expected_stage: expect,
            };
            serde_json::to_value(transition_submission(
                workflow,
                &ctx.actor()?,
                &request,
                cause,
            )?)?
        }
        Command::Review {
            submission_id,
            decision,
            stage,
            score,
            comment,
        } => {
            let request: SubmitReviewRequest = SubmitReviewRequest {
                submission_id,
                review_stage: stage,
                decision,
                score,
                comment,
            };
            serde_json::to_value(submit_review(workflow, &ctx.actor()?, &request, cause)?)?
        }
        Command::Join { submission_id } => {
            let collaboration: Collaboration = CollaborationService::new(workflow)
                .request_to_join(&ctx.actor()?, SubmissionId::new(submission_id), cause)
                .map_err(translate_core_error)?;
            collaboration_to_response(&collaboration)
        }
        Command::Invite {
            submission_id,
            user_id,
        } => {
            let collaboration: Collaboration = CollaborationService::new(workflow)
                .invite(
                    &ctx.actor()?,
                    SubmissionId::new(submission_id),
                    UserId::new(user_id),
                    cause,
                )
                .map_err(translate_core_error)?;
            collaboration_to_response(&collaboration)
        }
        Command::Respond {
            collaboration_id,
            decline,
        } => {
            let collaboration: Collaboration = CollaborationService::new(workflow)
                .respond(
                    &ctx.actor()?,
                    CollaborationId::new(collaboration_id),
                    !decline,
                    cause,
                )
                .map_err(translate_core_error)?;
            collaboration_to_response(&collaboration)
        }
        Command::Sweep => serde_json::to_value(run_deadline_sweep(workflow, cause)?)?,
        Command::Export {
            challenge_id,
            output,
        } => {
            let actor: Actor = ctx.actor()?;
            if let Some(path) = output {
                let file = std::fs::File::create(&path)?;
                let response =
                    export_challenge_submissions_csv(ctx.persistence, &actor, challenge_id, file)?;
                info!(path = %path.display(), rows = response.rows_written, "Export written");
                serde_json::to_value(response)?
            } else {
                export_challenge_submissions_csv(ctx.persistence, &actor, challenge_id, &mut *out)?;
                return Ok(None);
            }
        }
        Command::Audit { submission_id } => {
            let trail: Vec<AuditEvent> = ctx
                .persistence
                .get_audit_trail(SubmissionId::new(submission_id))?;
            Value::Array(trail.iter().map(audit_event_to_response).collect())
        }
    };

    Ok(Some(response))
}

fn collaboration_to_response(collaboration: &Collaboration) -> Value {
    json!({
        "collaboration_id": collaboration.id.map(CollaborationId::value),
        "submission_id": collaboration.submission_id.value(),
        "collaborator_id": collaboration.collaborator_id.value(),
        "initiated_by": collaboration.initiated_by.value(),
        "kind": collaboration.kind.as_str(),
        "status": collaboration.status.as_str(),
        "updated_at": format_timestamp(collaboration.updated_at),
    })
}

fn audit_event_to_response(event: &AuditEvent) -> Value {
    json!({
        "event_id": event.event_id,
        "actor": event.actor.id,
        "actor_type": event.actor.actor_type,
        "cause": event.cause.description,
        "action": event.action.name,
        "details": event.action.details,
        "before": event.before.data,
        "after": event.after.data,
        "occurred_at": format_timestamp(event.occurred_at),
    })
}
