// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Roles, permissions, and the actor snapshot.
//!
//! Roles are coarse labels assigned to user accounts. Every authorization
//! question is asked in terms of permissions, which are derived from the
//! union of an actor's roles once, when the actor snapshot is built.

use crate::error::DomainError;
use crate::types::{AccountStatus, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// A role label carried by a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Manager,
    Sme,
    ChallengeReviewer,
    IdeaReviewer,
    BoardMember,
    Administrator,
    Developer,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::User,
        Self::Manager,
        Self::Sme,
        Self::ChallengeReviewer,
        Self::IdeaReviewer,
        Self::BoardMember,
        Self::Administrator,
        Self::Developer,
    ];

    /// Returns the string representation used for persistence and the CLI.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Manager => "manager",
            Self::Sme => "sme",
            Self::ChallengeReviewer => "challenge_reviewer",
            Self::IdeaReviewer => "idea_reviewer",
            Self::BoardMember => "board_member",
            Self::Administrator => "administrator",
            Self::Developer => "developer",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "user" => Ok(Self::User),
            "manager" => Ok(Self::Manager),
            "sme" => Ok(Self::Sme),
            "challenge_reviewer" => Ok(Self::ChallengeReviewer),
            "idea_reviewer" => Ok(Self::IdeaReviewer),
            "board_member" => Ok(Self::BoardMember),
            "administrator" => Ok(Self::Administrator),
            "developer" => Ok(Self::Developer),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }

    /// Returns the permissions this role grants on its own.
    ///
    /// `Developer` is the superset of every other role.
    #[must_use]
    pub const fn grants(&self) -> &'static [Permission] {
        use Permission as P;

        match self {
            Self::User => &[P::SubmitIdea],
            Self::Manager => &[
                P::SubmitIdea,
                P::CreateChallenge,
                P::ManageOwnChallenges,
                P::ReviewManagerStage,
                P::AdvanceStatus,
                P::SelectWinners,
                P::ExportData,
                P::ViewAnalytics,
                P::ViewReviewQueue,
            ],
            Self::Sme => &[P::SubmitIdea, P::ReviewSmeStage, P::ViewReviewQueue],
            Self::ChallengeReviewer => &[
                P::SubmitIdea,
                P::ReviewSmeStage,
                P::ReviewChallengeStage,
                P::ViewReviewQueue,
            ],
            Self::IdeaReviewer => &[P::SubmitIdea, P::ViewReviewQueue],
            Self::BoardMember => &[P::SubmitIdea, P::ReviewBoardStage, P::ViewReviewQueue],
            Self::Administrator => &[
                P::SubmitIdea,
                P::CreateChallenge,
                P::ManageOwnChallenges,
                P::ManageAllChallenges,
                P::ElevatedEdit,
                P::AdvanceStatus,
                P::ArchiveSubmissions,
                P::SelectWinners,
                P::ExportData,
                P::ViewAnalytics,
                P::ViewReviewQueue,
                P::ManageCollaborations,
            ],
            Self::Developer => &Permission::ALL,
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single grantable capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    SubmitIdea,
    CreateChallenge,
    ManageOwnChallenges,
    ManageAllChallenges,
    /// Edit content that already has reviews attached.
    ElevatedEdit,
    ReviewManagerStage,
    ReviewSmeStage,
    ReviewBoardStage,
    ReviewChallengeStage,
    /// Move a submission forward when not its owner.
    AdvanceStatus,
    ArchiveSubmissions,
    SelectWinners,
    ExportData,
    ViewAnalytics,
    ViewReviewQueue,
    ManageCollaborations,
}

impl Permission {
    /// Every permission, in declaration order.
    pub const ALL: [Self; 16] = [
        Self::SubmitIdea,
        Self::CreateChallenge,
        Self::ManageOwnChallenges,
        Self::ManageAllChallenges,
        Self::ElevatedEdit,
        Self::ReviewManagerStage,
        Self::ReviewSmeStage,
        Self::ReviewBoardStage,
        Self::ReviewChallengeStage,
        Self::AdvanceStatus,
        Self::ArchiveSubmissions,
        Self::SelectWinners,
        Self::ExportData,
        Self::ViewAnalytics,
        Self::ViewReviewQueue,
        Self::ManageCollaborations,
    ];

    /// Returns the string representation of the permission.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SubmitIdea => "submit_idea",
            Self::CreateChallenge => "create_challenge",
            Self::ManageOwnChallenges => "manage_own_challenges",
            Self::ManageAllChallenges => "manage_all_challenges",
            Self::ElevatedEdit => "elevated_edit",
            Self::ReviewManagerStage => "review_manager_stage",
            Self::ReviewSmeStage => "review_sme_stage",
            Self::ReviewBoardStage => "review_board_stage",
            Self::ReviewChallengeStage => "review_challenge_stage",
            Self::AdvanceStatus => "advance_status",
            Self::ArchiveSubmissions => "archive_submissions",
            Self::SelectWinners => "select_winners",
            Self::ExportData => "export_data",
            Self::ViewAnalytics => "view_analytics",
            Self::ViewReviewQueue => "view_review_queue",
            Self::ManageCollaborations => "manage_collaborations",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The resolved union of permissions granted by a set of roles.
///
/// An empty role set resolves to an empty capability set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet(BTreeSet<Permission>);

impl CapabilitySet {
    /// Resolves the permissions granted by the given roles.
    #[must_use]
    pub fn from_roles<'a, I>(roles: I) -> Self
    where
        I: IntoIterator<Item = &'a Role>,
    {
        Self(
            roles
                .into_iter()
                .flat_map(|role| role.grants().iter().copied())
                .collect(),
        )
    }

    #[must_use]
    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }
}

/// An already-authenticated caller, as seen by the workflow.
///
/// The snapshot is immutable: roles, account status, and terms acceptance
/// are fixed at construction and capabilities are resolved once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    id: UserId,
    roles: BTreeSet<Role>,
    status: AccountStatus,
    terms_accepted: bool,
    capabilities: CapabilitySet,
}

impl Actor {
    /// Creates an actor snapshot and resolves its capabilities.
    ///
    /// # Arguments
    ///
    /// * `id` - The user account identifier
    /// * `roles` - The roles assigned to the account
    /// * `status` - The account standing
    /// * `terms_accepted` - Whether the user accepted the terms of use
    #[must_use]
    pub fn new<I>(id: UserId, roles: I, status: AccountStatus, terms_accepted: bool) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        let roles: BTreeSet<Role> = roles.into_iter().collect();
        let capabilities: CapabilitySet = CapabilitySet::from_roles(&roles);
        Self {
            id,
            roles,
            status,
            terms_accepted,
            capabilities,
        }
    }

    /// The actor used for time-driven and handler-driven transitions.
    ///
    /// It holds the administrator role and is always active.
    #[must_use]
    pub fn system() -> Self {
        Self::new(
            UserId::SYSTEM,
            [Role::Administrator],
            AccountStatus::Active,
            true,
        )
    }

    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub const fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    #[must_use]
    pub const fn status(&self) -> AccountStatus {
        self.status
    }

    #[must_use]
    pub const fn terms_accepted(&self) -> bool {
        self.terms_accepted
    }

    #[must_use]
    pub const fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    #[must_use]
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.roles.contains(role))
    }

    #[must_use]
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.capabilities.contains(permission)
    }

    /// Returns a comma separated list of role names, or `none`.
    #[must_use]
    pub fn role_summary(&self) -> String {
        if self.roles.is_empty() {
            return String::from("none");
        }
        self.roles
            .iter()
            .map(Role::as_str)
            .collect::<Vec<&str>>()
            .join(",")
    }
}
