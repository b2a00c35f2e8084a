// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authorization policy.
//!
//! Every check is a pure function of an actor snapshot and the records it
//! wants to touch. Checks run their disqualifying rules first (inactive
//! account, conflict of interest, wrong stage, attached records) and only
//! then look for a granting permission. Anything not explicitly granted is
//! denied.

use ideaflow_domain::{
    Actor, Challenge, ChallengeSubmissionStatus, Collaboration, CollaborationKind, Permission,
    ReviewStage, Stage, Submission, UserId, WorkflowAction, is_conflicted,
};

/// The rule that caused a denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyRule {
    /// The account is pending, banned, or suspended.
    InactiveAccount,
    /// The actor has no roles at all.
    NoRoles,
    /// The user has not accepted the terms of use.
    TermsNotAccepted,
    /// No role of the actor grants the named permission.
    MissingPermission(Permission),
    /// The actor authored, co-authored, or owns the challenge of the submission.
    ConflictOfInterest,
    /// Only the author or a team member may do this.
    NotOwner,
    /// Owners may only submit their own work, never advance it further.
    OwnerRestricted,
    /// The submission is past its editable stages.
    StageNotEditable,
    /// The submission does not accept reviews at this stage.
    StageNotReviewable,
    /// Reviews or submissions are attached and protect the record.
    AttachedRecordsExist,
    /// The owner has not opened the submission to collaborators.
    CollaborationDisabled,
    /// The actor is already on the team.
    AlreadyParticipant,
    /// The submission is not in a stage that takes new collaborators.
    StageNotCollaborative,
    /// Winners may only be selected once judging has started.
    ChallengeNotJudging,
    /// Only evaluated submissions with an approved or recommended outcome can win.
    NotShortlisted,
    /// Non-owners may only move submissions forward.
    NotForward,
    /// Only the invited user, or the owners for a join request, may answer.
    NotCounterparty,
}

impl DenyRule {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InactiveAccount => "inactive_account",
            Self::NoRoles => "no_roles",
            Self::TermsNotAccepted => "terms_not_accepted",
            Self::MissingPermission(_) => "missing_permission",
            Self::ConflictOfInterest => "conflict_of_interest",
            Self::NotOwner => "not_owner",
            Self::OwnerRestricted => "owner_restricted",
            Self::StageNotEditable => "stage_not_editable",
            Self::StageNotReviewable => "stage_not_reviewable",
            Self::AttachedRecordsExist => "attached_records_exist",
            Self::CollaborationDisabled => "collaboration_disabled",
            Self::AlreadyParticipant => "already_participant",
            Self::StageNotCollaborative => "stage_not_collaborative",
            Self::ChallengeNotJudging => "challenge_not_judging",
            Self::NotShortlisted => "not_shortlisted",
            Self::NotForward => "not_forward",
            Self::NotCounterparty => "not_counterparty",
        }
    }
}

impl std::fmt::Display for DenyRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingPermission(permission) => {
                write!(f, "{}({permission})", self.as_str())
            }
            _ => write!(f, "{}", self.as_str()),
        }
    }
}

/// The answer to an authorization question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(DenyRule),
}

impl Decision {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Returns the denial rule, if denied.
    #[must_use]
    pub const fn rule(&self) -> Option<DenyRule> {
        match self {
            Self::Allowed => None,
            Self::Denied(rule) => Some(*rule),
        }
    }
}

impl From<Result<(), DenyRule>> for Decision {
    fn from(result: Result<(), DenyRule>) -> Self {
        match result {
            Ok(()) => Self::Allowed,
            Err(rule) => Self::Denied(rule),
        }
    }
}

/// What an actor is trying to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Idea,
    ChallengeSubmission,
    Challenge,
}

/// Authorization checks for the submission lifecycle.
pub struct AuthorizationPolicy;

impl AuthorizationPolicy {
    /// Checks whether an actor may create a resource of the given kind.
    ///
    /// Ideas and challenge submissions need an active account, accepted
    /// terms, and `SubmitIdea`. Challenges need `CreateChallenge`.
    #[must_use]
    pub fn can_create(actor: &Actor, kind: ResourceKind) -> Decision {
        Decision::from(Self::create_rule(actor, kind))
    }

    /// Checks whether an actor may edit a submission's content.
    ///
    /// Owners may edit while the stage is editable. Once reviews are
    /// attached, only `ElevatedEdit` may edit.
    #[must_use]
    pub fn can_update(actor: &Actor, submission: &Submission) -> Decision {
        Decision::from(Self::update_rule(actor, submission))
    }

    /// Checks whether an actor may delete a submission.
    ///
    /// Submissions with reviews attached are never deletable; they can be
    /// archived instead.
    #[must_use]
    pub fn can_delete(actor: &Actor, submission: &Submission) -> Decision {
        Decision::from(Self::delete_rule(actor, submission))
    }

    /// Checks whether an actor may edit a challenge's content.
    #[must_use]
    pub fn can_update_challenge(actor: &Actor, challenge: &Challenge) -> Decision {
        Decision::from(Self::update_challenge_rule(actor, challenge))
    }

    /// Checks whether an actor may delete a challenge.
    #[must_use]
    pub fn can_delete_challenge(actor: &Actor, challenge: &Challenge) -> Decision {
        Decision::from(Self::delete_challenge_rule(actor, challenge))
    }

    /// Checks whether an actor may move a challenge through its lifecycle.
    #[must_use]
    pub fn can_change_challenge_status(actor: &Actor, challenge: &Challenge) -> Decision {
        Decision::from(Self::active(actor).and_then(|()| Self::manage_challenge(actor, challenge)))
    }

    /// Checks whether an actor may review a submission at a review stage.
    ///
    /// Conflict of interest is checked before any role, so no role can
    /// override it.
    #[must_use]
    pub fn can_review(actor: &Actor, submission: &Submission, review_stage: ReviewStage) -> Decision {
        Decision::from(Self::review_rule(actor, submission, review_stage))
    }

    /// Checks whether an actor may apply a non-review status action.
    ///
    /// Owners may only submit. Everyone else needs a forward action and
    /// `AdvanceStatus`.
    #[must_use]
    pub fn can_update_status(
        actor: &Actor,
        submission: &Submission,
        action: WorkflowAction,
    ) -> Decision {
        Decision::from(Self::update_status_rule(actor, submission, action))
    }

    /// Checks whether an actor may archive a submission.
    #[must_use]
    pub fn can_archive(actor: &Actor) -> Decision {
        Decision::from(
            Self::active(actor).and_then(|()| Self::require(actor, Permission::ArchiveSubmissions)),
        )
    }

    /// Checks whether an actor may select a submission as a challenge winner.
    #[must_use]
    pub fn can_mark_winner(actor: &Actor, submission: &Submission, challenge: &Challenge) -> Decision {
        Decision::from(Self::mark_winner_rule(actor, submission, challenge))
    }

    /// Checks whether an actor may ask to join a submission's team.
    #[must_use]
    pub fn can_collaborate(actor: &Actor, submission: &Submission) -> Decision {
        Decision::from(Self::collaborate_rule(actor, submission))
    }

    /// Checks whether an actor may invite, remove, or reinstate collaborators.
    #[must_use]
    pub fn can_manage_collaborators(actor: &Actor, submission: &Submission) -> Decision {
        Decision::from(Self::active(actor).and_then(|()| {
            if submission.is_owner(actor.id()) {
                Ok(())
            } else {
                Self::require(actor, Permission::ManageCollaborations)
            }
        }))
    }

    /// Checks whether an actor may accept or decline a pending collaboration.
    #[must_use]
    pub fn can_respond_to_collaboration(
        actor: &Actor,
        submission: &Submission,
        collaboration: &Collaboration,
    ) -> Decision {
        Decision::from(Self::active(actor).and_then(|()| match collaboration.kind {
            CollaborationKind::Invitation if collaboration.collaborator_id == actor.id() => Ok(()),
            CollaborationKind::JoinRequest
                if submission.is_owner(actor.id())
                    || actor.has_permission(Permission::ManageCollaborations) =>
            {
                Ok(())
            }
            CollaborationKind::Invitation | CollaborationKind::JoinRequest => {
                Err(DenyRule::NotCounterparty)
            }
        }))
    }

    /// Checks whether an actor may export a submission's data.
    #[must_use]
    pub fn can_export(actor: &Actor, submission: &Submission) -> Decision {
        Decision::from(Self::owner_or(actor, submission.is_owner(actor.id()), Permission::ExportData))
    }

    /// Checks whether an actor may export the submissions of a challenge.
    #[must_use]
    pub fn can_export_challenge(actor: &Actor, challenge: &Challenge) -> Decision {
        Decision::from(Self::owner_or(actor, challenge.is_owner(actor.id()), Permission::ExportData))
    }

    /// Checks whether an actor may view analytics for a submission.
    #[must_use]
    pub fn can_view_analytics(actor: &Actor, submission: &Submission) -> Decision {
        Decision::from(Self::owner_or(
            actor,
            submission.is_owner(actor.id()),
            Permission::ViewAnalytics,
        ))
    }

    /// Checks whether an actor may assign a reviewer to a submission's
    /// current review stage.
    #[must_use]
    pub fn can_assign_reviewer(actor: &Actor, submission: &Submission, reviewer: UserId) -> Decision {
        Decision::from(Self::active(actor).and_then(|()| {
            if submission.is_owner(actor.id()) {
                return Err(DenyRule::OwnerRestricted);
            }
            if is_conflicted(reviewer, submission) {
                return Err(DenyRule::ConflictOfInterest);
            }
            let reviewable: bool = submission.stage().review_stage().is_some()
                || submission.stage() == Stage::Challenge(ChallengeSubmissionStatus::UnderReview);
            if !reviewable {
                return Err(DenyRule::StageNotReviewable);
            }
            Self::require(actor, Permission::AdvanceStatus)
        }))
    }

    /// Routes a workflow action to the check that governs it.
    ///
    /// # Arguments
    ///
    /// * `actor` - The requesting actor
    /// * `submission` - The submission as currently stored
    /// * `action` - The requested action
    /// * `challenge` - The submission's challenge, needed for winner selection
    #[must_use]
    pub fn authorize_transition(
        actor: &Actor,
        submission: &Submission,
        action: WorkflowAction,
        challenge: Option<&Challenge>,
    ) -> Decision {
        if let Err(rule) = Self::active(actor) {
            return Decision::Denied(rule);
        }

        match action {
            WorkflowAction::Submit => {
                if submission.is_owner(actor.id()) {
                    Self::can_update_status(actor, submission, action)
                } else {
                    Decision::Denied(DenyRule::NotOwner)
                }
            }
            WorkflowAction::Approve | WorkflowAction::Reject | WorkflowAction::RequestChanges => {
                match submission.stage().review_stage() {
                    Some(review_stage) => Self::can_review(actor, submission, review_stage),
                    None => Self::can_update_status(actor, submission, action),
                }
            }
            WorkflowAction::StartReview | WorkflowAction::Evaluate => {
                Self::can_update_status(actor, submission, action)
            }
            WorkflowAction::MarkWinner => challenge.map_or(
                Decision::Denied(DenyRule::NotShortlisted),
                |challenge| Self::can_mark_winner(actor, submission, challenge),
            ),
            WorkflowAction::Archive => Self::can_archive(actor),
        }
    }

    fn active(actor: &Actor) -> Result<(), DenyRule> {
        if !actor.is_active() {
            return Err(DenyRule::InactiveAccount);
        }
        if actor.roles().is_empty() {
            return Err(DenyRule::NoRoles);
        }
        Ok(())
    }

    fn require(actor: &Actor, permission: Permission) -> Result<(), DenyRule> {
        if actor.has_permission(permission) {
            Ok(())
        } else {
            Err(DenyRule::MissingPermission(permission))
        }
    }

    fn owner_or(actor: &Actor, is_owner: bool, permission: Permission) -> Result<(), DenyRule> {
        Self::active(actor)?;
        if is_owner {
            return Ok(());
        }
        Self::require(actor, permission)
    }

    fn create_rule(actor: &Actor, kind: ResourceKind) -> Result<(), DenyRule> {
        Self::active(actor)?;
        match kind {
            ResourceKind::Idea | ResourceKind::ChallengeSubmission => {
                if !actor.terms_accepted() {
                    return Err(DenyRule::TermsNotAccepted);
                }
                Self::require(actor, Permission::SubmitIdea)
            }
            ResourceKind::Challenge => Self::require(actor, Permission::CreateChallenge),
        }
    }

    fn update_rule(actor: &Actor, submission: &Submission) -> Result<(), DenyRule> {
        Self::active(actor)?;
        if submission.is_owner(actor.id()) {
            return if submission.stage().is_editable() {
                Ok(())
            } else {
                Err(DenyRule::StageNotEditable)
            };
        }
        if submission.review_count() > 0 {
            return Self::require(actor, Permission::ElevatedEdit);
        }
        Err(DenyRule::NotOwner)
    }

    fn delete_rule(actor: &Actor, submission: &Submission) -> Result<(), DenyRule> {
        Self::active(actor)?;
        if submission.review_count() > 0 {
            return Err(DenyRule::AttachedRecordsExist);
        }
        if !submission.is_owner(actor.id()) {
            return Err(DenyRule::NotOwner);
        }
        if !submission.stage().is_editable() {
            return Err(DenyRule::StageNotEditable);
        }
        Ok(())
    }

    fn manage_challenge(actor: &Actor, challenge: &Challenge) -> Result<(), DenyRule> {
        if actor.has_permission(Permission::ManageAllChallenges) {
            return Ok(());
        }
        Self::require(actor, Permission::ManageOwnChallenges)?;
        if challenge.is_owner(actor.id()) {
            Ok(())
        } else {
            Err(DenyRule::NotOwner)
        }
    }

    fn update_challenge_rule(actor: &Actor, challenge: &Challenge) -> Result<(), DenyRule> {
        Self::active(actor)?;
        if challenge.submission_count > 0 {
            return Self::require(actor, Permission::ElevatedEdit)
                .map_err(|_| DenyRule::AttachedRecordsExist);
        }
        Self::manage_challenge(actor, challenge)
    }

    fn delete_challenge_rule(actor: &Actor, challenge: &Challenge) -> Result<(), DenyRule> {
        Self::active(actor)?;
        if challenge.submission_count > 0 {
            return Err(DenyRule::AttachedRecordsExist);
        }
        Self::manage_challenge(actor, challenge)
    }

    fn review_rule(
        actor: &Actor,
        submission: &Submission,
        review_stage: ReviewStage,
    ) -> Result<(), DenyRule> {
        Self::active(actor)?;
        if is_conflicted(actor.id(), submission) {
            return Err(DenyRule::ConflictOfInterest);
        }
        if !submission.stage().accepts_review(review_stage) {
            return Err(DenyRule::StageNotReviewable);
        }
        Self::require(actor, review_stage.required_permission())
    }

    fn update_status_rule(
        actor: &Actor,
        submission: &Submission,
        action: WorkflowAction,
    ) -> Result<(), DenyRule> {
        Self::active(actor)?;
        if submission.is_owner(actor.id()) {
            return if action == WorkflowAction::Submit {
                Ok(())
            } else {
                Err(DenyRule::OwnerRestricted)
            };
        }
        if !action.is_forward() {
            return Err(DenyRule::NotForward);
        }
        Self::require(actor, Permission::AdvanceStatus)
    }

    fn mark_winner_rule(
        actor: &Actor,
        submission: &Submission,
        challenge: &Challenge,
    ) -> Result<(), DenyRule> {
        Self::active(actor)?;
        Self::require(actor, Permission::SelectWinners)?;
        if !challenge.status.allows_winner_selection() {
            return Err(DenyRule::ChallengeNotJudging);
        }
        let shortlisted: bool = submission.stage()
            == Stage::Challenge(ChallengeSubmissionStatus::Evaluated)
            && submission
                .evaluation_outcome()
                .is_some_and(|outcome| outcome.is_shortlisted());
        if shortlisted {
            Ok(())
        } else {
            Err(DenyRule::NotShortlisted)
        }
    }

    fn collaborate_rule(actor: &Actor, submission: &Submission) -> Result<(), DenyRule> {
        Self::active(actor)?;
        if !submission.collaboration_enabled() {
            return Err(DenyRule::CollaborationDisabled);
        }
        if submission.is_owner(actor.id()) {
            return Err(DenyRule::AlreadyParticipant);
        }
        if !submission.stage().is_collaboration_eligible() {
            return Err(DenyRule::StageNotCollaborative);
        }
        Ok(())
    }
}
