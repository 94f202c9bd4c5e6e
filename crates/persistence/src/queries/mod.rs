// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `schedules`: Schedules and members
//! - `patterns`: Rotation patterns
//! - `shifts`: Shift rows, version history and display order
//! - `assignments`: User-to-shift assignment history
//! - `events`: Coverage codes and calendar events
//! - `month`: Everything one month view needs, in one read
//!
//! Rows marked inactive are soft-deleted and skipped unless a function says
//! otherwise.

pub mod assignments;
pub mod events;
pub mod month;
pub mod patterns;
pub mod schedules;
pub mod shifts;

use shiftboard_domain::{format_date, parse_date};
use time::Date;

use crate::error::PersistenceError;

/// Formats a date for a `TEXT` column.
pub(crate) fn to_db_date(date: Date) -> Result<String, PersistenceError> {
    Ok(format_date(date)?)
}

/// Parses a `TEXT` date column.
pub(crate) fn from_db_date(table: &'static str, value: &str) -> Result<Date, PersistenceError> {
    parse_date(value).map_err(|e| PersistenceError::CorruptRow {
        table,
        detail: e.to_string(),
    })
}

/// Parses a nullable `TEXT` date column.
pub(crate) fn from_db_optional_date(
    table: &'static str,
    value: Option<&str>,
) -> Result<Option<Date>, PersistenceError> {
    value.map(|v| from_db_date(table, v)).transpose()
}

/// Encodes a boolean as an `INTEGER` flag.
pub(crate) const fn flag(value: bool) -> i32 {
    if value { 1 } else { 0 }
}
