// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Input validation shared by every write path.

use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, Month};

use crate::error::DomainError;

/// Canonical on-disk and wire date format.
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Maximum length of a pattern name.
pub const PATTERN_NAME_MAX: usize = 100;
/// Maximum length of a shift name.
pub const SHIFT_NAME_MAX: usize = 50;
/// Maximum length of a coverage code label.
pub const LABEL_MAX: usize = 100;
/// Maximum length of event comments.
pub const COMMENTS_MAX: usize = 2000;
/// Maximum length of an event code.
pub const EVENT_CODE_MAX: usize = 16;

/// Supported calendar years for month views.
pub const MIN_YEAR: i32 = 2000;
/// Supported calendar years for month views.
pub const MAX_YEAR: i32 = 2100;

/// Reasons an event code is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EventCodeError {
    #[error("event code is required")]
    Empty,
    #[error("event code must be {EVENT_CODE_MAX} characters or fewer")]
    TooLong,
    #[error("event code may only contain A-Z, 0-9, '_' and '-' (found '{0}')")]
    InvalidCharacter(char),
}

impl From<EventCodeError> for DomainError {
    fn from(err: EventCodeError) -> Self {
        Self::InvalidEventCode(err.to_string())
    }
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns an error if the string is not a valid calendar date in that format.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), DATE_FORMAT).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a date as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns an error if formatting fails.
pub fn format_date(date: Date) -> Result<String, DomainError> {
    date.format(DATE_FORMAT)
        .map_err(|e| DomainError::DateParseError {
            date_string: date.to_string(),
            error: e.to_string(),
        })
}

/// Returns `date` shifted by `days`.
///
/// # Errors
///
/// Returns an error if the result is outside the representable range.
pub fn add_days(date: Date, days: i64) -> Result<Date, DomainError> {
    date.checked_add(Duration::days(days))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("{date} + {days} days"),
        })
}

/// Returns the 1-based day number of `day` relative to `start`.
///
/// The start date itself is day 1; earlier dates yield zero or negative numbers.
#[must_use]
pub fn day_number(start: Date, day: Date) -> i64 {
    (day - start).whole_days() + 1
}

/// The inclusive first and last day of a calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    /// First day of the month.
    pub start: Date,
    /// Last day of the month.
    pub end: Date,
}

impl MonthRange {
    /// Iterates every day in the month.
    pub fn days(&self) -> impl Iterator<Item = Date> + use<> {
        let end: Date = self.end;
        std::iter::successors(Some(self.start), move |d| {
            d.next_day().filter(|next| *next <= end)
        })
    }

    /// Returns true if `[start, end]` intersects this month.
    ///
    /// An open end (`None`) extends indefinitely.
    #[must_use]
    pub fn overlaps(&self, start: Date, end: Option<Date>) -> bool {
        start <= self.end && end.is_none_or(|e| e >= self.start)
    }
}

/// Validates a `(year, monthIndex)` request and returns the month range.
///
/// `month_index` is 0-based (0 = January).
///
/// # Errors
///
/// Returns an error if the year is outside 2000..=2100 or the month index
/// outside 0..=11.
pub fn validate_month(year: i32, month_index: i32) -> Result<MonthRange, DomainError> {
    let invalid = || DomainError::InvalidMonth { year, month_index };
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) || !(0..=11).contains(&month_index) {
        return Err(invalid());
    }
    let month_number: u8 = u8::try_from(month_index + 1).map_err(|_| invalid())?;
    let month: Month = Month::try_from(month_number).map_err(|_| invalid())?;
    let start: Date = Date::from_calendar_date(year, month, 1).map_err(|_| invalid())?;
    let end: Date = Date::from_calendar_date(year, month, month.length(year))
        .map_err(|_| invalid())?;
    Ok(MonthRange { start, end })
}

/// Validates that `end` is not before `start`.
///
/// # Errors
///
/// Returns an error if `end < start`.
pub fn validate_date_range(start: Date, end: Date) -> Result<(), DomainError> {
    if end < start {
        return Err(DomainError::EndBeforeStart { start, end });
    }
    Ok(())
}

/// Trims a required name and enforces its maximum length.
///
/// # Errors
///
/// Returns an error if the trimmed name is empty or longer than `max`.
pub fn validate_name(field: &'static str, value: &str, max: usize) -> Result<String, DomainError> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidName {
            field,
            reason: String::from("is required"),
        });
    }
    if trimmed.chars().count() > max {
        return Err(DomainError::InvalidName {
            field,
            reason: format!("must be {max} characters or fewer"),
        });
    }
    Ok(trimmed.to_string())
}

/// Trims optional free text. Blank input becomes `None`.
///
/// # Errors
///
/// Returns an error if the trimmed text is longer than `max`.
pub fn clean_optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, DomainError> {
    let Some(trimmed) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > max {
        return Err(DomainError::TextTooLong { field, max });
    }
    Ok(Some(trimmed.to_string()))
}

/// Normalizes an event code: uppercase, whitespace runs become `-`.
///
/// The result matches `^[A-Z0-9_-]{1,16}$`.
///
/// # Errors
///
/// Returns an error if the normalized code is empty, too long, or contains
/// other characters.
pub fn normalize_event_code(value: &str) -> Result<String, EventCodeError> {
    let code: String = value
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join("-")
        .to_ascii_uppercase();
    if code.is_empty() {
        return Err(EventCodeError::Empty);
    }
    if let Some(bad) = code
        .chars()
        .find(|c| !(c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '_' || *c == '-'))
    {
        return Err(EventCodeError::InvalidCharacter(bad));
    }
    if code.chars().count() > EVENT_CODE_MAX {
        return Err(EventCodeError::TooLong);
    }
    Ok(code)
}
