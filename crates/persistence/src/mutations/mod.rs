// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! ## Module Organization
//!
//! - `schedules`: Schedules and members
//! - `patterns`: Pattern writes and the removal cascade
//! - `shifts`: Shift creation, timeline changes and projection refresh
//! - `assignments`: Assignment upserts
//! - `events`: Coverage codes and events
//!
//! Every function that writes more than one row runs inside
//! `SqliteConnection::immediate_transaction`, which takes the write lock on
//! the first statement. Returning an error from the closure rolls back
//! every write made so far.

pub mod assignments;
pub mod events;
pub mod patterns;
pub mod schedules;
pub mod shifts;

use diesel::dsl::sql;
use diesel::expression::SqlLiteral;
use diesel::sql_types::{Nullable, Text};

/// `CURRENT_TIMESTAMP` for nullable timestamp columns.
pub(crate) fn now() -> SqlLiteral<Nullable<Text>> {
    sql::<Nullable<Text>>("CURRENT_TIMESTAMP")
}
