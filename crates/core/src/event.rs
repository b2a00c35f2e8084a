// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use ideaflow_domain::{
    ChallengeId, ChallengeSubmissionStatus, Stage, SubmissionId, UserId, WorkflowAction,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Published once for every committed stage change.
///
/// Downstream handlers (notifications, points, analytics) react to this
/// event; none of them can veto the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageChanged {
    pub submission_id: SubmissionId,
    pub challenge_id: Option<ChallengeId>,
    pub from: Stage,
    pub to: Stage,
    pub action: WorkflowAction,
    pub actor_id: UserId,
    pub occurred_at: OffsetDateTime,
}

impl StageChanged {
    /// Returns true for changes that earn the submitters recognition.
    #[must_use]
    pub fn is_recognition(&self) -> bool {
        self.action == WorkflowAction::Approve
            || self.to == Stage::Challenge(ChallengeSubmissionStatus::Winner)
    }
}
