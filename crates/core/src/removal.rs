// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pattern removal planning.
//!
//! A pattern that no shift version ever referenced is deleted outright.
//! Otherwise it is marked inactive so historical versions keep their
//! reference. If versions active today still use it, the caller must confirm;
//! each such shift is then split at today into the old version and a new
//! open version with no pattern.

use std::collections::BTreeMap;

use shiftboard_domain::{EmployeeTypeId, PatternId};
use time::Date;
use tracing::debug;

use crate::error::CoreError;
use crate::shift::{ShiftFields, ShiftVersion};
use crate::timeline::{TimelinePlan, plan_change};

/// Conflict code reported when confirmation is required.
pub const PATTERN_ACTIVE_IN_USE: &str = "PATTERN_ACTIVE_IN_USE";

/// How many shifts reference a pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternUsage {
    /// Shifts with any version referencing the pattern.
    pub shift_usage_count: usize,
    /// Shifts whose version active today references the pattern.
    pub active_shift_usage_count: usize,
}

/// The outcome reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalMode {
    HardDelete,
    RemovedWithUnassignedTransition,
    SoftRemove,
}

impl RemovalMode {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HardDelete => "hard-delete",
            Self::RemovedWithUnassignedTransition => "removed-with-unassigned-transition",
            Self::SoftRemove => "soft-remove",
        }
    }
}

impl std::fmt::Display for RemovalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the store must do to remove a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalDecision {
    /// Delete the pattern row.
    HardDelete,
    /// Refuse until the caller confirms.
    NeedsConfirmation { active_shift_usage_count: usize },
    /// Apply every plan, then mark the pattern inactive.
    SoftRemove {
        unassign: Vec<(EmployeeTypeId, TimelinePlan<ShiftFields>)>,
    },
}

impl RemovalDecision {
    /// The reported mode, or `None` when confirmation is still required.
    #[must_use]
    pub fn mode(&self) -> Option<RemovalMode> {
        match self {
            Self::HardDelete => Some(RemovalMode::HardDelete),
            Self::NeedsConfirmation { .. } => None,
            Self::SoftRemove { unassign } if unassign.is_empty() => Some(RemovalMode::SoftRemove),
            Self::SoftRemove { .. } => Some(RemovalMode::RemovedWithUnassignedTransition),
        }
    }
}

fn active_references(versions: &[ShiftVersion], pattern_id: PatternId, today: Date) -> bool {
    versions
        .iter()
        .any(|v| v.fields.pattern_id == Some(pattern_id) && v.contains(today))
}

/// Counts how many shifts reference `pattern_id`.
#[must_use]
pub fn pattern_usage(
    pattern_id: PatternId,
    versions_by_shift: &BTreeMap<EmployeeTypeId, Vec<ShiftVersion>>,
    today: Date,
) -> PatternUsage {
    let mut usage: PatternUsage = PatternUsage::default();
    for versions in versions_by_shift.values() {
        if versions
            .iter()
            .any(|v| v.fields.pattern_id == Some(pattern_id))
        {
            usage.shift_usage_count += 1;
        }
        if active_references(versions, pattern_id, today) {
            usage.active_shift_usage_count += 1;
        }
    }
    usage
}

/// Decides how to remove `pattern_id`.
///
/// # Arguments
///
/// * `pattern_id` - The pattern being removed
/// * `versions_by_shift` - Every shift timeline in the schedule
/// * `today` - The effective date of any unassignment
/// * `confirm_active_removal` - Whether the caller accepted the cascade
///
/// # Errors
///
/// Returns an error if a cascade plan cannot be computed.
pub fn plan_pattern_removal(
    pattern_id: PatternId,
    versions_by_shift: &BTreeMap<EmployeeTypeId, Vec<ShiftVersion>>,
    today: Date,
    confirm_active_removal: bool,
) -> Result<RemovalDecision, CoreError> {
    let usage: PatternUsage = pattern_usage(pattern_id, versions_by_shift, today);

    if usage.active_shift_usage_count > 0 && !confirm_active_removal {
        return Ok(RemovalDecision::NeedsConfirmation {
            active_shift_usage_count: usage.active_shift_usage_count,
        });
    }
    if usage.shift_usage_count == 0 {
        return Ok(RemovalDecision::HardDelete);
    }

    let mut unassign: Vec<(EmployeeTypeId, TimelinePlan<ShiftFields>)> = Vec::new();
    for (employee_type_id, versions) in versions_by_shift {
        let Some(active) = versions
            .iter()
            .filter(|v| v.contains(today))
            .max_by_key(|v| v.start_date)
        else {
            continue;
        };
        if active.fields.pattern_id != Some(pattern_id) {
            continue;
        }
        let plan: TimelinePlan<ShiftFields> =
            plan_change(versions, today, active.fields.unassigned())?;
        debug!(
            employee_type_id = employee_type_id.value(),
            pattern_id = pattern_id.value(),
            "Planned unassignment"
        );
        unassign.push((*employee_type_id, plan));
    }

    Ok(RemovalDecision::SoftRemove { unassign })
}
