// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and pure rules for shiftboard.
//!
//! This crate owns the rotation pattern engine (parsing, run detection,
//! prediction and projection), event visual composition, display ordering
//! and input validation. Nothing here performs I/O.

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

mod error;
mod event_visuals;
mod ordering;
mod pattern;
mod prediction;
mod projection;
mod roles;
mod summary;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use event_visuals::{
    CellContext, CellEventVisuals, DisplayMode, EventScope, EventScopeType, OVERLAY_ALPHA,
    ScheduleEvent, linear_gradient, resolve_cell_event_visuals, to_rgba,
};
pub use ordering::{
    OrderedEntry, changed_entries, plan_insert, plan_move, renormalize, resolve_insert_position,
    resolve_move_position,
};
pub use pattern::{
    NoneSwatchPayload, Pattern, PatternInput, PatternPayload, StoredPattern, Swatch, SwatchInput,
};
pub use prediction::{DayRun, Prediction, find_runs, predict};
pub use projection::{ResolvedPattern, color_for_pattern_day};
pub use roles::ScheduleRole;
pub use summary::{
    CONFLICTING_SCHEDULES, has_prediction_conflict, summarize_pattern, summarize_resolved,
};
pub use types::{
    CoverageCodeId, EmployeeTypeId, EventId, HexColor, MAX_SWATCHES, PATTERN_CYCLE_DAYS,
    PatternId, ScheduleId, StoreCapabilities, UserOid,
};
pub use validation::{
    COMMENTS_MAX, EVENT_CODE_MAX, EventCodeError, LABEL_MAX, MAX_YEAR, MIN_YEAR, MonthRange,
    PATTERN_NAME_MAX, SHIFT_NAME_MAX, add_days, clean_optional_text, day_number, format_date,
    normalize_event_code, parse_date, validate_date_range, validate_month, validate_name,
};
