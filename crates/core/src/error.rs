// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftboard_domain::DomainError;
use time::Date;

/// Errors that can occur while planning or applying timeline changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// Two versions of one timeline overlap.
    OverlappingVersions {
        /// Start of the earlier version.
        first_start: Date,
        /// Start of the later version.
        second_start: Date,
    },
    /// A version ends before it starts.
    InvertedVersion {
        /// Start of the offending version.
        start_date: Date,
    },
    /// More than one version is open-ended.
    MultipleOpenVersions {
        /// Number of open versions found.
        count: usize,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::OverlappingVersions {
                first_start,
                second_start,
            } => write!(
                f,
                "Timeline versions starting {first_start} and {second_start} overlap"
            ),
            Self::InvertedVersion { start_date } => {
                write!(f, "Timeline version starting {start_date} ends before it starts")
            }
            Self::MultipleOpenVersions { count } => {
                write!(f, "Timeline has {count} open-ended versions")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
