// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::event::StageChanged;
use ideaflow_audit::AuditEvent;
use ideaflow_domain::{ReviewId, Submission, SubmissionId};

/// The outcome of a committed stage change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The submission after the change.
    pub submission: Submission,
    /// The stored version after the change.
    pub version: i64,
    /// The event published to downstream handlers.
    pub event: StageChanged,
    /// The audit record of the change.
    pub audit_event: AuditEvent,
}

/// The outcome of recording a review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub review_id: ReviewId,
    /// The stage change the review caused, if any.
    pub transition: Option<TransitionResult>,
}

/// Submissions touched by a deadline sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub archived: Vec<SubmissionId>,
    pub failed: Vec<(SubmissionId, String)>,
}
