// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod assignment;
mod calendar;
mod error;
mod removal;
mod shift;
mod timeline;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use assignment::{AssignmentFields, AssignmentRecord, AssignmentVersion, shift_on};
pub use calendar::{
    EventRecord, MemberProfile, MonthEmployee, MonthGroup, MonthInputs, MonthView,
    build_month_view,
};
pub use error::CoreError;
pub use removal::{
    PATTERN_ACTIVE_IN_USE, PatternUsage, RemovalDecision, RemovalMode, pattern_usage,
    plan_pattern_removal,
};
pub use shift::{ShiftFields, ShiftRecord, ShiftVersion, projection_source};
pub use timeline::{
    TimelinePlan, TimelineStep, TimelineVersion, active_on, apply_plan, current_version,
    end_before_next, plan_change, validate_timeline,
};
