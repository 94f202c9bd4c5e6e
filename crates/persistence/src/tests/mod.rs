// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;
mod pattern_tests;
mod shift_tests;

use shiftboard::ShiftRecord;
use shiftboard_domain::{
    Pattern, PatternId, PatternInput, ScheduleId, ScheduleRole, SwatchInput, UserOid,
};
use time::{Date, Month};

use crate::{NewShift, Persistence, PatternWrite};

pub const MANAGER: &str = "manager-oid";

pub fn date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).expect("Valid test date")
}

/// The fixed "today" used by timeline tests.
pub fn today() -> Date {
    date(2026, Month::March, 15)
}

pub fn oid(value: &str) -> UserOid {
    UserOid::new(value).expect("Valid test user")
}

/// A fresh store with one schedule managed by [`MANAGER`].
pub fn create_test_schedule() -> (Persistence, ScheduleId) {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let schedule_id: ScheduleId = persistence.create_schedule("Operations").unwrap();
    persistence
        .upsert_member(
            schedule_id,
            &oid(MANAGER),
            Some("Morgan Manager"),
            ScheduleRole::Manager,
        )
        .unwrap();
    (persistence, schedule_id)
}

/// One swatch working days 1-4 and 9-12: four on, four off.
pub fn four_on_four_off(name: &str) -> PatternWrite {
    let input: PatternInput = PatternInput {
        swatches: vec![SwatchInput {
            swatch_index: 0,
            color: String::from("#ff0000"),
            on_days: vec![1, 2, 3, 4, 9, 10, 11, 12],
        }],
        no_shift_days: Vec::new(),
    };
    PatternWrite {
        name: String::from(name),
        summary: String::from("1 shift - 4 on / 4 off"),
        pattern: Pattern::from_input(&input).unwrap(),
    }
}

pub fn create_test_pattern(
    persistence: &mut Persistence,
    schedule_id: ScheduleId,
    name: &str,
) -> PatternId {
    persistence
        .create_pattern(schedule_id, &four_on_four_off(name), Some(MANAGER))
        .unwrap()
}

pub fn create_test_shift(
    persistence: &mut Persistence,
    schedule_id: ScheduleId,
    name: &str,
    pattern_id: Option<PatternId>,
    start_date: Date,
) -> ShiftRecord {
    let new_shift: NewShift = NewShift {
        name: String::from(name),
        pattern_id,
        start_date,
        display_order: None,
    };
    persistence
        .create_shift(schedule_id, &new_shift, Some(MANAGER))
        .unwrap()
}

/// Adds an active member with the given role.
pub fn add_member(
    persistence: &mut Persistence,
    schedule_id: ScheduleId,
    user: &str,
    display_name: &str,
    role: ScheduleRole,
) -> UserOid {
    let user_oid: UserOid = oid(user);
    persistence
        .upsert_member(schedule_id, &user_oid, Some(display_name), role)
        .unwrap();
    user_oid
}
