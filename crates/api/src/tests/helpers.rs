// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use shiftboard_domain::{PatternInput, ScheduleId, ScheduleRole, SwatchInput, UserOid};
use shiftboard_persistence::Persistence;
use time::{Date, Month};

use crate::{
    Caller, CreateShiftRequest, PatternInfo, PatternRequest, ShiftInfo, create_pattern,
    create_shift,
};

pub const MANAGER: &str = "manager-oid";
pub const MAINTAINER: &str = "maintainer-oid";
pub const MEMBER: &str = "member-oid";

pub fn date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).expect("Valid test date")
}

/// The fixed "today" used by handler tests.
pub fn today() -> Date {
    date(2026, Month::March, 15)
}

pub fn caller(oid: &str) -> Caller {
    Caller::new(UserOid::new(oid).expect("Valid test user"))
}

/// A fresh store with one schedule and a member at every role.
pub fn create_test_schedule() -> (Persistence, ScheduleId) {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let schedule_id: ScheduleId = persistence.create_schedule("Operations").unwrap();
    for (oid, name, role) in [
        (MANAGER, "Morgan Manager", ScheduleRole::Manager),
        (MAINTAINER, "Max Maintainer", ScheduleRole::Maintainer),
        (MEMBER, "Mel Member", ScheduleRole::Member),
    ] {
        persistence
            .upsert_member(
                schedule_id,
                &UserOid::new(oid).unwrap(),
                Some(name),
                role,
            )
            .unwrap();
    }
    (persistence, schedule_id)
}

/// One red swatch working days 1-4 and 9-12: four on, four off.
pub fn rotation_input() -> PatternInput {
    PatternInput {
        swatches: vec![SwatchInput {
            swatch_index: 0,
            color: String::from("#FF0000"),
            on_days: vec![1, 2, 3, 4, 9, 10, 11, 12],
        }],
        no_shift_days: Vec::new(),
    }
}

pub fn rotation_request(name: &str) -> PatternRequest {
    PatternRequest {
        name: String::from(name),
        pattern: rotation_input(),
    }
}

pub fn create_test_pattern(
    persistence: &mut Persistence,
    schedule_id: ScheduleId,
    name: &str,
) -> i64 {
    let info: PatternInfo = create_pattern(
        persistence,
        &caller(MAINTAINER),
        schedule_id,
        &rotation_request(name),
    )
    .unwrap();
    info.pattern_id
}

pub fn create_test_shift(
    persistence: &mut Persistence,
    schedule_id: ScheduleId,
    name: &str,
    pattern_id: Option<i64>,
    start_date: &str,
) -> ShiftInfo {
    let request: CreateShiftRequest = CreateShiftRequest {
        name: String::from(name),
        pattern_id,
        start_date: String::from(start_date),
        display_order: None,
    };
    create_shift(persistence, &caller(MAINTAINER), schedule_id, &request).unwrap()
}
