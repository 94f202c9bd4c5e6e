// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A caller's role within one schedule.
///
/// Variants are declared in rank order, so the derived ordering matches
/// the permission hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScheduleRole {
    /// Can view the schedule.
    Member,
    /// Can edit patterns, shifts, assignments and events.
    Maintainer,
    /// Full control, including membership.
    Manager,
}

impl ScheduleRole {
    /// Parses a role name case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a known role.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "member" => Ok(Self::Member),
            "maintainer" => Ok(Self::Maintainer),
            "manager" => Ok(Self::Manager),
            _ => Err(DomainError::InvalidRole(value.to_string())),
        }
    }

    /// Returns the canonical role name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Maintainer => "Maintainer",
            Self::Manager => "Manager",
        }
    }

    /// Numeric rank (Member = 1, Maintainer = 2, Manager = 3).
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Member => 1,
            Self::Maintainer => 2,
            Self::Manager => 3,
        }
    }

    /// Returns true if this role ranks at or above `minimum`.
    #[must_use]
    pub const fn at_least(self, minimum: Self) -> bool {
        self.rank() >= minimum.rank()
    }
}

impl std::fmt::Display for ScheduleRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
