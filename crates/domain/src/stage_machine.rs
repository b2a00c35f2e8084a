// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The stage transition table.
//!
//! Every legal `(stage, action) -> stage` edge of both lifecycles lives in a
//! single table. The table is checked once when first used: every
//! non-terminal stage must have an exit and every terminal stage must have
//! none. A table that fails the check is never handed out.

use crate::error::DomainError;
use crate::stage::{ChallengeSubmissionStatus, IdeaStage, Stage, WorkflowAction};
use crate::submission::Submission;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use time::OffsetDateTime;

static STANDARD: LazyLock<Result<StageMachine, DomainError>> =
    LazyLock::new(|| StageMachine::from_edges(standard_edges()));

/// Lookup table of legal stage transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageMachine {
    edges: BTreeMap<(Stage, WorkflowAction), Stage>,
}

impl StageMachine {
    /// Returns the validated standard table.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StageMachineIncomplete` if the built-in table
    /// fails validation.
    pub fn standard() -> Result<&'static Self, DomainError> {
        (*STANDARD).as_ref().map_err(Clone::clone)
    }

    /// Builds and validates a table from explicit edges.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge crosses lifecycles, or if validation fails.
    pub fn from_edges<I>(edges: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = ((Stage, WorkflowAction), Stage)>,
    {
        let edges: BTreeMap<(Stage, WorkflowAction), Stage> = edges.into_iter().collect();
        for ((from, action), to) in &edges {
            if from.kind() != to.kind() {
                return Err(DomainError::StageMachineIncomplete {
                    stage: from.as_str().to_string(),
                    reason: format!("{action} leads into the {} lifecycle", to.kind()),
                });
            }
        }
        let machine: Self = Self { edges };
        machine.validate()?;
        Ok(machine)
    }

    /// Checks every stage of both lifecycles against the table.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StageMachineIncomplete` naming the first stage
    /// that is terminal with an exit or non-terminal without one.
    pub fn validate(&self) -> Result<(), DomainError> {
        for stage in Stage::all() {
            let has_exit: bool = self.edges.keys().any(|(from, _)| *from == stage);
            if stage.is_terminal() && has_exit {
                return Err(DomainError::StageMachineIncomplete {
                    stage: stage.as_str().to_string(),
                    reason: String::from("terminal stage has an outgoing edge"),
                });
            }
            if !stage.is_terminal() && !has_exit {
                return Err(DomainError::StageMachineIncomplete {
                    stage: stage.as_str().to_string(),
                    reason: String::from("non-terminal stage has no outgoing edge"),
                });
            }
        }
        Ok(())
    }

    /// Returns the target stage if the action is legal from `from`.
    #[must_use]
    pub fn can_transition(&self, from: Stage, action: WorkflowAction) -> Option<Stage> {
        self.edges.get(&(from, action)).copied()
    }

    /// Returns true if the stage has no outgoing edges in this table.
    #[must_use]
    pub fn is_terminal(&self, stage: Stage) -> bool {
        !self.edges.keys().any(|(from, _)| *from == stage)
    }

    /// Returns true if owners may edit content in this stage.
    #[must_use]
    pub const fn is_editable(stage: Stage) -> bool {
        stage.is_editable()
    }

    /// Lists the actions that are legal from a stage.
    #[must_use]
    pub fn actions_from(&self, stage: Stage) -> Vec<WorkflowAction> {
        self.edges
            .keys()
            .filter(|(from, _)| *from == stage)
            .map(|(_, action)| *action)
            .collect()
    }

    /// Follows forward actions from `start` until a stage with no forward exit.
    ///
    /// The returned path includes `start`.
    #[must_use]
    pub fn forward_path(&self, start: Stage) -> Vec<Stage> {
        let mut path: Vec<Stage> = vec![start];
        let mut current: Stage = start;
        while let Some(next) = self
            .actions_from(current)
            .into_iter()
            .filter(WorkflowAction::is_forward)
            .find_map(|action| self.can_transition(current, action))
        {
            if path.contains(&next) {
                break;
            }
            path.push(next);
            current = next;
        }
        path
    }

    /// Applies a legal action to a submission.
    ///
    /// Returns `None` when the edge does not exist. Otherwise the returned
    /// copy is in the target stage, stamped with `at`, and has any
    /// stage-scoped reviewer assignment cleared.
    #[must_use]
    pub fn apply(
        &self,
        submission: &Submission,
        action: WorkflowAction,
        at: OffsetDateTime,
    ) -> Option<Submission> {
        self.can_transition(submission.stage(), action)
            .map(|target| submission.moved_to(target, at))
    }
}

fn standard_edges() -> Vec<((Stage, WorkflowAction), Stage)> {
    use ChallengeSubmissionStatus as C;
    use IdeaStage as I;
    use WorkflowAction as A;

    let idea = Stage::Idea;
    let challenge = Stage::Challenge;

    let mut edges: Vec<((Stage, WorkflowAction), Stage)> = vec![
        ((idea(I::Draft), A::Submit), idea(I::Submitted)),
        ((idea(I::Submitted), A::Approve), idea(I::ManagerReview)),
        ((idea(I::ManagerReview), A::Approve), idea(I::SmeReview)),
        ((idea(I::SmeReview), A::Approve), idea(I::Collaboration)),
        ((idea(I::Collaboration), A::Approve), idea(I::BoardReview)),
        ((idea(I::BoardReview), A::Approve), idea(I::Implementation)),
        ((idea(I::Implementation), A::Approve), idea(I::Completed)),
        ((challenge(C::Draft), A::Submit), challenge(C::Submitted)),
        ((challenge(C::Submitted), A::StartReview), challenge(C::UnderReview)),
        ((challenge(C::UnderReview), A::Evaluate), challenge(C::Evaluated)),
        ((challenge(C::Evaluated), A::MarkWinner), challenge(C::Winner)),
    ];

    for review in [I::ManagerReview, I::SmeReview, I::BoardReview] {
        edges.push(((idea(review), A::Reject), idea(I::Draft)));
        edges.push(((idea(review), A::RequestChanges), idea(I::Draft)));
    }

    for stage in Stage::all().into_iter().filter(|stage| !stage.is_terminal()) {
        let archived: Stage = match stage {
            Stage::Idea(_) => idea(I::Archived),
            Stage::Challenge(_) => challenge(C::Archived),
        };
        edges.push(((stage, A::Archive), archived));
    }

    edges
}
