// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Date;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// More swatches were supplied than a pattern can hold.
    TooManySwatches {
        /// The number of swatches supplied.
        count: usize,
    },
    /// A swatch index is outside `0..=3`.
    InvalidSwatchIndex {
        /// 1-based position of the swatch in the input.
        position: usize,
        /// The offending index value.
        index: i64,
    },
    /// Two swatches share the same index.
    DuplicateSwatchIndex {
        /// The duplicated index.
        index: u8,
    },
    /// Swatch indexes do not form `0..N`.
    NonContiguousSwatchIndexes,
    /// A pattern day is outside the 28-day editor cycle.
    DayOutOfRange {
        /// The offending day value.
        day: i64,
    },
    /// A no-shift day is also selected as an on day.
    NoShiftDayOverlap {
        /// The conflicting cycle day.
        day: u8,
    },
    /// The pattern selects no on days at all.
    EmptyPattern,
    /// Colour is not a `#RRGGBB` value.
    InvalidColor(String),
    /// A required name is empty or too long.
    InvalidName {
        /// The field being validated.
        field: &'static str,
        /// Why the name was rejected.
        reason: String,
    },
    /// Free text exceeds its maximum length.
    TextTooLong {
        /// The field being validated.
        field: &'static str,
        /// The maximum number of characters.
        max: usize,
    },
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// An end date precedes its start date.
    EndBeforeStart {
        /// The start date.
        start: Date,
        /// The end date.
        end: Date,
    },
    /// Year or month index outside the supported range.
    InvalidMonth {
        /// The requested year.
        year: i32,
        /// The requested 0-based month index.
        month_index: i32,
    },
    /// Event code is empty or has invalid characters.
    InvalidEventCode(String),
    /// Display mode label is not recognised.
    InvalidDisplayMode(String),
    /// Event scope fields do not match the scope type.
    InvalidEventScope(String),
    /// User object id is empty.
    InvalidUserOid(String),
    /// Role name is not recognised.
    InvalidRole(String),
    /// Requested display position is out of range.
    InvalidDisplayPosition {
        /// The requested 1-based position.
        requested: i64,
        /// The largest accepted position.
        max: usize,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooManySwatches { count } => {
                write!(f, "A maximum of 4 swatches is supported, got {count}")
            }
            Self::InvalidSwatchIndex { position, index } => {
                write!(f, "Swatch {position} index is invalid: {index}")
            }
            Self::DuplicateSwatchIndex { index } => {
                write!(f, "Swatch index {index} is duplicated")
            }
            Self::NonContiguousSwatchIndexes => {
                write!(f, "Swatch indexes must be contiguous starting at 0")
            }
            Self::DayOutOfRange { day } => {
                write!(f, "Pattern day {day} is outside 1..=28")
            }
            Self::NoShiftDayOverlap { day } => write!(
                f,
                "No shift day {day} cannot overlap selected on-shift days"
            ),
            Self::EmptyPattern => write!(f, "Select at least one on-shift day"),
            Self::InvalidColor(value) => write!(f, "Color must be a hex value: {value}"),
            Self::InvalidName { field, reason } => write!(f, "Invalid {field}: {reason}"),
            Self::TextTooLong { field, max } => {
                write!(f, "{field} must be {max} characters or fewer")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow: {operation}")
            }
            Self::EndBeforeStart { start, end } => {
                write!(f, "End date {end} cannot be before start date {start}")
            }
            Self::InvalidMonth { year, month_index } => {
                write!(f, "Invalid month: year={year}, monthIndex={month_index}")
            }
            Self::InvalidEventCode(msg) => write!(f, "Invalid event code: {msg}"),
            Self::InvalidDisplayMode(value) => write!(f, "Invalid display mode: {value}"),
            Self::InvalidEventScope(msg) => write!(f, "Invalid event scope: {msg}"),
            Self::InvalidUserOid(value) => write!(f, "Invalid user id: '{value}'"),
            Self::InvalidRole(value) => write!(f, "Unknown schedule role: {value}"),
            Self::InvalidDisplayPosition { requested, max } => write!(
                f,
                "Display order {requested} is out of range (1..={max})"
            ),
        }
    }
}

impl std::error::Error for DomainError {}
