// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV export of challenge submissions.

use crate::error::{ApiError, translate_core_error};
use crate::request_response::{ExportResponse, format_timestamp};
use ideaflow::{
    AuthorizationPolicy, ChallengeStore, CoreError, Decision, SubmissionRecord, SubmissionStore,
};
use ideaflow_domain::{Actor, Challenge, ChallengeId, UserId};
use std::io::Write;
use tracing::{info, warn};

/// One exported submission.
#[derive(Debug, serde::Serialize)]
struct ExportRow {
    submission_id: i64,
    title: String,
    author_id: i64,
    /// Team member IDs separated by `;`.
    team_members: String,
    stage: String,
    evaluation_outcome: String,
    review_count: u32,
    created_at: String,
    last_stage_change: String,
}

impl From<&SubmissionRecord> for ExportRow {
    fn from(record: &SubmissionRecord) -> Self {
        Self {
            submission_id: record.id.value(),
            title: record.title.clone(),
            author_id: record.author_id.value(),
            team_members: record
                .team_members
                .iter()
                .copied()
                .map(UserId::value)
                .map(|id| id.to_string())
                .collect::<Vec<String>>()
                .join(";"),
            stage: record.stage.clone(),
            evaluation_outcome: record.evaluation_outcome.clone().unwrap_or_default(),
            review_count: record.review_count,
            created_at: format_timestamp(record.created_at),
            last_stage_change: format_timestamp(record.last_stage_change),
        }
    }
}

/// Writes the submissions of a challenge as CSV.
///
/// Only the challenge owner and actors holding the `export_data`
/// permission may export. Rows are written in submission order with a
/// header line.
///
/// # Arguments
///
/// * `repo` - The store to read from
/// * `actor` - The requesting actor
/// * `challenge_id` - The challenge to export
/// * `writer` - Destination of the CSV text
///
/// # Errors
///
/// * `ApiError::Unauthorized` if the actor may not export the challenge
/// * `ApiError::ResourceNotFound` if the challenge does not exist
/// * `ApiError::Internal` if reading or writing fails
pub fn export_challenge_submissions_csv<R, W>(
    repo: &R,
    actor: &Actor,
    challenge_id: i64,
    writer: W,
) -> Result<ExportResponse, ApiError>
where
    R: SubmissionStore + ChallengeStore,
    W: Write,
{
    let challenge_id: ChallengeId = ChallengeId::new(challenge_id);
    let challenge: Challenge = repo
        .load_challenge(challenge_id)
        .map_err(|err| translate_core_error(CoreError::from(err)))?;

    if let Decision::Denied(rule) = AuthorizationPolicy::can_export_challenge(actor, &challenge) {
        warn!(actor_id = %actor.id(), challenge_id = %challenge_id, rule = %rule, "Export denied");
        return Err(ApiError::Unauthorized {
            action: String::from("export challenge submissions"),
        });
    }

    let records: Vec<SubmissionRecord> = repo
        .list_challenge_submissions(challenge_id)
        .map_err(|err| translate_core_error(CoreError::from(err)))?;

    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in &records {
        csv_writer
            .serialize(ExportRow::from(record))
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to write CSV row: {e}"),
            })?;
    }
    // An empty export still carries its header line.
    if records.is_empty() {
        csv_writer
            .write_record([
                "submission_id",
                "title",
                "author_id",
                "team_members",
                "stage",
                "evaluation_outcome",
                "review_count",
                "created_at",
                "last_stage_change",
            ])
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to write CSV header: {e}"),
            })?;
    }
    csv_writer.flush().map_err(|e| ApiError::Internal {
        message: format!("Failed to flush CSV output: {e}"),
    })?;

    info!(challenge_id = %challenge_id, rows = records.len(), "Exported challenge submissions");
    Ok(ExportResponse {
        challenge_id: challenge_id.value(),
        rows_written: records.len(),
    })
}
