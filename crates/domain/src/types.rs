// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Declares an opaque numeric identifier.
///
/// Identifiers are assigned by the store; the domain never fabricates them
/// except for the reserved system actor.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw identifier value.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw identifier value.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifies a user account.
    UserId
);
impl UserId {
    /// The identifier of the system actor. Account ids are always positive.
    pub const SYSTEM: Self = Self(0);

    /// Returns whether this id may belong to a user account.
    #[must_use]
    pub const fn is_account(self) -> bool {
        self.0 > 0
    }
}

entity_id!(
    /// Identifies an idea or challenge submission.
    SubmissionId
);
entity_id!(
    /// Identifies a challenge.
    ChallengeId
);
entity_id!(
    /// Identifies a review record.
    ReviewId
);
entity_id!(
    /// Identifies a collaboration record.
    CollaborationId
);

/// The standing of a user account.
///
/// Only `Active` accounts may perform any operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Active,
    Pending,
    Banned,
    Suspended,
}

impl AccountStatus {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Banned => "banned",
            Self::Suspended => "suspended",
        }
    }

    /// Returns true if the account may act at all.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "active" => Ok(Self::Active),
            "pending" => Ok(Self::Pending),
            "banned" => Ok(Self::Banned),
            "suspended" => Ok(Self::Suspended),
            _ => Err(DomainError::InvalidAccountStatus(s.to_string())),
        }
    }
}

impl FromStr for AccountStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
