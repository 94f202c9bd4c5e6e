// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for authorization-aware UI gating.
//!
//! Capabilities expose what a caller may do in a schedule without leaking
//! store internals. They are advisory only and do not replace the role
//! checks every handler performs.

use shiftboard_domain::{ScheduleRole, StoreCapabilities};

use crate::request_response::{Capability, ScheduleCapabilities};

/// Computes the capabilities of a member in a schedule.
///
/// Capabilities depend on:
/// - The member's role
/// - The optional features the store offers
///
/// # Arguments
///
/// * `role` - The caller's role in the schedule
/// * `store` - The capabilities of the backing store
///
/// # Returns
///
/// A `ScheduleCapabilities` struct with all capability flags set.
#[must_use]
pub fn compute_schedule_capabilities(
    role: ScheduleRole,
    store: StoreCapabilities,
) -> ScheduleCapabilities {
    let can_edit: bool = role.at_least(ScheduleRole::Maintainer);
    ScheduleCapabilities {
        role: role.as_str().to_string(),
        can_edit_schedule: Capability::from_bool(can_edit),
        can_manage_members: Capability::from_bool(role.at_least(ScheduleRole::Manager)),
        // Read-only members never see the editors these gate
        can_scope_events_to_shifts: Capability::from_bool(
            can_edit && store.supports_event_scoping,
        ),
        can_use_custom_event_colors: Capability::from_bool(
            can_edit && store.supports_custom_event_colors,
        ),
        has_shift_history: Capability::from_bool(store.supports_shift_versioning),
    }
}
