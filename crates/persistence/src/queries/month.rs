// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Loads the rows one month view is composed from.

use std::collections::BTreeMap;

use diesel::SqliteConnection;
use shiftboard::{MemberProfile, MonthInputs};
use shiftboard_domain::{MonthRange, ScheduleId, StoreCapabilities, UserOid};
use tracing::debug;

use crate::error::PersistenceError;
use crate::queries::{assignments, events, patterns, schedules, shifts};

/// Reads shifts, versions, patterns, assignments, members and events for
/// one month in a single pass.
///
/// Removed patterns and inactive members are included so past months keep
/// their colours and names.
///
/// # Errors
///
/// Returns an error if any query fails or a row is corrupt.
pub fn load_month_inputs(
    conn: &mut SqliteConnection,
    schedule_id: ScheduleId,
    range: MonthRange,
    capabilities: StoreCapabilities,
) -> Result<MonthInputs, PersistenceError> {
    let mut inputs: MonthInputs = MonthInputs {
        shifts: shifts::list_shifts(conn, schedule_id)?,
        patterns: patterns::load_pattern_payloads(conn, schedule_id)?,
        assignments: assignments::assignments_between(conn, schedule_id, range.start, range.end)?,
        ..MonthInputs::default()
    };

    if capabilities.supports_shift_versioning {
        inputs.versions = shifts::all_shift_timelines(conn, schedule_id, capabilities)?;
    }

    inputs.members = schedules::list_all_members(conn, schedule_id)?
        .into_iter()
        .map(|member| {
            (
                member.user_oid,
                MemberProfile {
                    display_name: member.display_name,
                    role: member.role,
                },
            )
        })
        .collect::<BTreeMap<UserOid, MemberProfile>>();

    inputs.events = events::events_between(conn, schedule_id, range.start, range.end)?
        .into_iter()
        .map(|event| event.record)
        .collect();

    debug!(
        schedule_id = schedule_id.value(),
        shifts = inputs.shifts.len(),
        assignments = inputs.assignments.len(),
        events = inputs.events.len(),
        "Loaded month inputs"
    );
    Ok(inputs)
}
