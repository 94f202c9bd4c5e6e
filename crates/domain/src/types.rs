// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Number of days in the pattern editor cycle.
pub const PATTERN_CYCLE_DAYS: u8 = 28;

/// Maximum number of swatches a pattern can carry.
pub const MAX_SWATCHES: usize = 4;

/// Generates a canonical database identifier newtype.
macro_rules! canonical_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw identifier.
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

canonical_id!(
    /// Identifies a schedule (tenant).
    ScheduleId
);
canonical_id!(
    /// Identifies a shift ("employee type") within a schedule.
    EmployeeTypeId
);
canonical_id!(
    /// Identifies a rotation pattern.
    PatternId
);
canonical_id!(
    /// Identifies a calendar event.
    EventId
);
canonical_id!(
    /// Identifies a reusable coverage code.
    CoverageCodeId
);

/// A directory object id for a user.
///
/// Object ids are compared case-insensitively, so the canonical form is
/// trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserOid(String);

impl UserOid {
    /// Creates a user object id.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty after trimming.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidUserOid(value.to_string()));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Returns the canonical (lowercase) form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserOid {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<UserOid> for String {
    fn from(value: UserOid) -> Self {
        value.0
    }
}

impl std::fmt::Display for UserOid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `#rrggbb` colour, normalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Colour used for events without a valid colour.
    pub const DEFAULT_EVENT: &'static str = "#22c55e";

    /// Parses a `#RRGGBB` colour.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not exactly `#` followed by six hex digits.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        let valid: bool = trimmed.len() == 7
            && trimmed.starts_with('#')
            && trimmed[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(DomainError::InvalidColor(value.to_string()));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Parses a colour, falling back to the default event colour.
    #[must_use]
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value
            .and_then(|v| Self::parse(v).ok())
            .unwrap_or_else(Self::default_event)
    }

    /// The default event colour (`#22c55e`).
    #[must_use]
    pub fn default_event() -> Self {
        Self(Self::DEFAULT_EVENT.to_string())
    }

    /// Returns the colour string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the red, green and blue channels.
    #[must_use]
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |range: std::ops::Range<usize>| -> u8 {
            u8::from_str_radix(&self.0[range], 16).unwrap_or(0)
        };
        (channel(1..3), channel(3..5), channel(5..7))
    }
}

impl TryFrom<String> for HexColor {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Optional storage features available to the core.
///
/// Built once when the store is opened and passed into read and write
/// paths instead of being re-detected per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCapabilities {
    /// Shift definitions have an effective-dated version history.
    pub supports_shift_versioning: bool,
    /// Events may be scoped to a shift.
    pub supports_event_scoping: bool,
    /// Events may carry their own display mode and colour.
    pub supports_custom_event_colors: bool,
}

impl StoreCapabilities {
    /// Every optional feature enabled.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            supports_shift_versioning: true,
            supports_event_scoping: true,
            supports_custom_event_colors: true,
        }
    }
}

impl Default for StoreCapabilities {
    fn default() -> Self {
        Self::full()
    }
}
