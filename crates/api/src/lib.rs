// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for shiftboard.
//!
//! Every operation takes the persistence handle, the identified caller and
//! the target schedule. The caller's schedule role is resolved before any
//! data is read or written:
//!
//! - reads require `Member`
//! - schedule edits require `Maintainer`
//! - membership changes require `Manager`
//!
//! Requests and responses are camelCase serde DTOs with `YYYY-MM-DD` date
//! strings. Domain, core and persistence errors are translated into
//! [`ApiError`] so no storage detail crosses this boundary.

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
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod capabilities;
mod error;
mod handlers;
mod pattern_input;
mod request_response;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use auth::{AuthorizationService, AuthorizedCaller, Caller};
pub use capabilities::compute_schedule_capabilities;
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    create_coverage_code, create_event, create_pattern, create_shift, delete_event,
    delete_pattern, describe_pattern, get_capabilities, get_month, list_assignments,
    list_coverage_codes, list_events, list_members, list_patterns, list_shift_versions,
    list_shifts, preview_pattern, remove_member, update_coverage_code, update_event,
    update_member, update_pattern, update_shift, upsert_assignment, upsert_member,
};
pub use pattern_input::{PatternInputError, decode_pattern_json, validate_pattern_input};
pub use request_response::{
    AssignmentInfo, Capability, CoverageCodeInfo, CoverageCodeRequest, CreateShiftRequest,
    DeletePatternRequest, DeletePatternResponse, EventInfo, EventRequest, ListAssignmentsRequest,
    ListAssignmentsResponse, ListCoverageCodesResponse, ListEventsRequest, ListEventsResponse,
    ListMembersResponse, ListPatternsResponse, ListShiftVersionsResponse, ListShiftsResponse,
    MemberInfo, MonthEmployeeInfo, MonthEventInfo, MonthGroupInfo, MonthRequest, MonthResponse,
    PatternInfo, PatternRequest, PredictionInfo, PreviewPatternRequest, PreviewPatternResponse,
    RemoveMemberRequest, ScheduleCapabilities, ShiftInfo, ShiftVersionInfo, SwatchPreview,
    UpdateMemberRequest, UpdateShiftRequest, UpsertAssignmentRequest, UpsertAssignmentResponse,
    UpsertMemberRequest,
};
