// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use shiftboard::CoreError;
use shiftboard_domain::DomainError;
use shiftboard_persistence::PersistenceError;

use crate::pattern_input::PatternInputError;

/// Authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The caller is not an active member of the schedule.
    NotAMember {
        /// The schedule that was accessed.
        schedule_id: i64,
    },
    /// The caller's role is below the one the action requires.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAMember { schedule_id } => {
                write!(f, "Not a member of schedule {schedule_id}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core/persistence errors and represent the
/// API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The caller may not perform this action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The write conflicts with existing data.
    Conflict {
        /// Machine-readable reason, when one exists.
        code: Option<String>,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// The action affects live data and must be retried with confirmation.
    NeedsConfirmation {
        /// Machine-readable reason.
        code: String,
        /// A human-readable description of what would change.
        message: String,
        /// Number of shifts currently using the pattern.
        active_shift_usage_count: usize,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::Conflict { code, message } => match code {
                Some(code) => write!(f, "Conflict ({code}): {message}"),
                None => write!(f, "Conflict: {message}"),
            },
            Self::NeedsConfirmation { code, message, .. } => {
                write!(f, "Confirmation required ({code}): {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotAMember { schedule_id } => Self::Unauthorized {
                action: format!("access schedule {schedule_id}"),
                required_role: String::from("Member"),
            },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PatternInputError> for ApiError {
    fn from(err: PatternInputError) -> Self {
        match err {
            PatternInputError::Invalid(domain_err) => translate_domain_error(domain_err),
            other => Self::InvalidInput {
                field: String::from("pattern"),
                message: other.to_string(),
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// Every domain error is a validation failure; the match only picks the
/// field it is reported against.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let field: &str = match &err {
        DomainError::TooManySwatches { .. }
        | DomainError::InvalidSwatchIndex { .. }
        | DomainError::DuplicateSwatchIndex { .. }
        | DomainError::NonContiguousSwatchIndexes => "swatches",
        DomainError::DayOutOfRange { .. }
        | DomainError::NoShiftDayOverlap { .. }
        | DomainError::EmptyPattern => "pattern",
        DomainError::InvalidColor(_) => "color",
        DomainError::InvalidName { field, .. } | DomainError::TextTooLong { field, .. } => *field,
        DomainError::DateParseError { .. } | DomainError::DateArithmeticOverflow { .. } => "date",
        DomainError::EndBeforeStart { .. } => "endDate",
        DomainError::InvalidMonth { .. } => "monthIndex",
        DomainError::InvalidEventCode(_) => "code",
        DomainError::InvalidDisplayMode(_) => "displayMode",
        DomainError::InvalidEventScope(_) => "scopeType",
        DomainError::InvalidUserOid(_) => "userOid",
        DomainError::InvalidRole(_) => "role",
        DomainError::InvalidDisplayPosition { .. } => "displayOrder",
    };
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Storage failures are reported as internal errors without leaking
/// database detail beyond the message.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        PersistenceError::TimelineViolation(core_err) => translate_core_error(core_err),
        PersistenceError::Conflict(message) => ApiError::Conflict {
            code: None,
            message,
        },
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: resource_type_of(&message).to_string(),
            message,
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

/// Persistence not-found messages lead with the resource name.
fn resource_type_of(message: &str) -> &str {
    message
        .split_whitespace()
        .next()
        .filter(|word| word.chars().next().is_some_and(char::is_uppercase))
        .unwrap_or("Resource")
}
