// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Demo schedule seeding.
//!
//! Everything after the schedule and its manager goes through the API
//! handlers, so the seeded data obeys the same validation as user edits.

use color_eyre::Result;
use serde::Serialize;
use shiftboard_api::{
    Caller, CoverageCodeInfo, CoverageCodeRequest, CreateShiftRequest, EventRequest,
    PatternRequest, UpsertAssignmentRequest, UpsertMemberRequest, create_coverage_code,
    create_event, create_pattern, create_shift, upsert_assignment, upsert_member,
};
use shiftboard_domain::{
    PatternInput, ScheduleId, ScheduleRole, SwatchInput, UserOid, add_days, format_date,
};
use shiftboard_persistence::Persistence;
use time::{Date, Month};
use tracing::info;

const DEMO_MANAGER: &str = "demo-manager";

const DEMO_MEMBERS: [(&str, &str, &str); 3] = [
    ("alex", "Alex Rivera", "Member"),
    ("blair", "Blair Chen", "Member"),
    ("casey", "Casey Morgan", "Maintainer"),
];

/// Identifiers of the seeded demo schedule.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoSummary {
    pub schedule_id: i64,
    pub manager: String,
    pub pattern_ids: Vec<i64>,
    pub shift_ids: Vec<i64>,
}

fn swatch(index: i64, color: &str, on_days: &[i64]) -> SwatchInput {
    SwatchInput {
        swatch_index: index,
        color: String::from(color),
        on_days: on_days.to_vec(),
    }
}

/// Seeds a schedule with two rotations, two shifts, three members and a
/// few events around `today`.
///
/// # Errors
///
/// Returns an error if any write is rejected.
pub fn seed_demo(persistence: &mut Persistence, today: Date) -> Result<DemoSummary> {
    let schedule_id: ScheduleId = persistence.create_schedule("Demo Operations")?;
    persistence.upsert_member(
        schedule_id,
        &UserOid::new(DEMO_MANAGER)?,
        Some("Demo Manager"),
        ScheduleRole::Manager,
    )?;
    let manager: Caller = Caller::new(UserOid::new(DEMO_MANAGER)?);

    for (user_oid, name, role) in DEMO_MEMBERS {
        upsert_member(
            persistence,
            &manager,
            schedule_id,
            &UpsertMemberRequest {
                user_oid: String::from(user_oid),
                display_name: Some(String::from(name)),
                role: String::from(role),
            },
        )?;
    }

    let rotations: [(&str, PatternInput); 2] = [
        (
            "Four on four off",
            PatternInput {
                swatches: vec![swatch(0, "#ef4444", &[1, 2, 3, 4, 9, 10, 11, 12])],
                no_shift_days: Vec::new(),
            },
        ),
        (
            "Alternating crews",
            PatternInput {
                swatches: vec![
                    swatch(0, "#3b82f6", &[1, 2, 3, 4, 9, 10, 11, 12]),
                    swatch(1, "#10b981", &[5, 6, 7, 8, 13, 14, 15, 16]),
                ],
                no_shift_days: Vec::new(),
            },
        ),
    ];
    let mut pattern_ids: Vec<i64> = Vec::new();
    for (name, pattern) in rotations {
        let created = create_pattern(
            persistence,
            &manager,
            schedule_id,
            &PatternRequest {
                name: String::from(name),
                pattern,
            },
        )?;
        pattern_ids.push(created.pattern_id);
    }

    let year_start: String = format_date(Date::from_calendar_date(today.year(), Month::January, 1)?)?;
    let mut shift_ids: Vec<i64> = Vec::new();
    for (name, pattern_id) in [("Days", pattern_ids[0]), ("Nights", pattern_ids[1])] {
        let shift = create_shift(
            persistence,
            &manager,
            schedule_id,
            &CreateShiftRequest {
                name: String::from(name),
                pattern_id: Some(pattern_id),
                start_date: year_start.clone(),
                display_order: None,
            },
        )?;
        shift_ids.push(shift.employee_type_id);
    }

    for ((user_oid, _, _), shift_id) in DEMO_MEMBERS
        .iter()
        .zip([shift_ids[0], shift_ids[1], shift_ids[0]])
    {
        upsert_assignment(
            persistence,
            &manager,
            schedule_id,
            &UpsertAssignmentRequest {
                user_oid: String::from(*user_oid),
                employee_type_id: shift_id,
                start_date: year_start.clone(),
                display_order: None,
            },
        )?;
    }

    let vacation: CoverageCodeInfo = create_coverage_code(
        persistence,
        &manager,
        schedule_id,
        &CoverageCodeRequest {
            code: String::from("VAC"),
            label: String::from("Vacation"),
            display_mode: String::from("Badge Indicator"),
            color: String::from("#f59e0b"),
            is_active: true,
        },
    )?;
    create_event(
        persistence,
        &manager,
        schedule_id,
        &EventRequest {
            scope_type: String::from("user"),
            user_oid: Some(String::from("alex")),
            start_date: format_date(today)?,
            end_date: format_date(add_days(today, 2)?)?,
            coverage_code_id: Some(vacation.coverage_code_id),
            ..EventRequest::default()
        },
    )?;
    create_event(
        persistence,
        &manager,
        schedule_id,
        &EventRequest {
            scope_type: String::from("shift"),
            employee_type_id: Some(shift_ids[1]),
            start_date: format_date(add_days(today, 7)?)?,
            end_date: format_date(add_days(today, 7)?)?,
            custom_code: Some(String::from("DRILL")),
            custom_name: Some(String::from("Fire drill")),
            display_mode: Some(String::from("Schedule Overlay")),
            color: Some(String::from("#6366f1")),
            comments: Some(String::from("Muster at the north exit")),
            ..EventRequest::default()
        },
    )?;

    info!(
        schedule_id = schedule_id.value(),
        patterns = pattern_ids.len(),
        shifts = shift_ids.len(),
        "Seeded demo schedule"
    );
    Ok(DemoSummary {
        schedule_id: schedule_id.value(),
        manager: String::from(DEMO_MANAGER),
        pattern_ids,
        shift_ids,
    })
}
