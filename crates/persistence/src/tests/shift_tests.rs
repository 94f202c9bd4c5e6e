// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftboard::{ShiftRecord, ShiftVersion};
use shiftboard_domain::{DomainError, EmployeeTypeId, PatternId, StoreCapabilities};
use time::Month;

use crate::error::PersistenceError;
use crate::tests::{create_test_pattern, create_test_schedule, create_test_shift, date, today};
use crate::{NewShift, Persistence, ShiftChange};

fn change(
    shift: &ShiftRecord,
    name: &str,
    pattern_id: Option<PatternId>,
    effective: time::Date,
) -> ShiftChange {
    ShiftChange {
        employee_type_id: shift.employee_type_id,
        name: String::from(name),
        pattern_id,
        effective_date: effective,
        display_order: None,
    }
}

fn names(persistence: &mut Persistence, schedule_id: shiftboard_domain::ScheduleId) -> Vec<String> {
    persistence
        .list_shifts(schedule_id)
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect()
}

#[test]
fn test_create_shift_appends_and_records_history() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let pattern_id: PatternId = create_test_pattern(&mut persistence, schedule_id, "Rotation");

    let shift: ShiftRecord = create_test_shift(
        &mut persistence,
        schedule_id,
        "Days",
        Some(pattern_id),
        date(2026, Month::January, 1),
    );

    assert_eq!(shift.display_order, 1);
    let versions: Vec<ShiftVersion> = persistence
        .shift_timeline(schedule_id, shift.employee_type_id)
        .unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].start_date, date(2026, Month::January, 1));
    assert_eq!(versions[0].end_date, None);
    assert_eq!(versions[0].fields.pattern_id, Some(pattern_id));
}

#[test]
fn test_create_shift_at_position_shifts_others_down() {
    let (mut persistence, schedule_id) = create_test_schedule();
    create_test_shift(&mut persistence, schedule_id, "Days", None, today());
    create_test_shift(&mut persistence, schedule_id, "Nights", None, today());

    let new_shift: NewShift = NewShift {
        name: String::from("Swing"),
        pattern_id: None,
        start_date: today(),
        display_order: Some(1),
    };
    persistence
        .create_shift(schedule_id, &new_shift, None)
        .unwrap();

    assert_eq!(names(&mut persistence, schedule_id), vec!["Swing", "Days", "Nights"]);
    let orders: Vec<i64> = persistence
        .list_shifts(schedule_id)
        .unwrap()
        .iter()
        .map(|s| s.display_order)
        .collect();
    assert_eq!(orders, vec![1, 2, 3]);
}

#[test]
fn test_create_shift_rejects_out_of_range_position() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let new_shift: NewShift = NewShift {
        name: String::from("Days"),
        pattern_id: None,
        start_date: today(),
        display_order: Some(3),
    };

    let result: Result<ShiftRecord, PersistenceError> =
        persistence.create_shift(schedule_id, &new_shift, None);

    assert!(matches!(
        result,
        Err(PersistenceError::DomainViolation(
            DomainError::InvalidDisplayPosition { requested: 3, max: 1 }
        ))
    ));
    assert!(persistence.list_shifts(schedule_id).unwrap().is_empty());
}

#[test]
fn test_duplicate_shift_name_is_a_conflict() {
    let (mut persistence, schedule_id) = create_test_schedule();
    create_test_shift(&mut persistence, schedule_id, "Days", None, today());
    let new_shift: NewShift = NewShift {
        name: String::from("DAYS"),
        pattern_id: None,
        start_date: today(),
        display_order: None,
    };

    let result: Result<ShiftRecord, PersistenceError> =
        persistence.create_shift(schedule_id, &new_shift, None);

    assert!(matches!(result, Err(PersistenceError::Conflict(_))));
}

#[test]
fn test_create_shift_with_removed_pattern_is_not_found() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let new_shift: NewShift = NewShift {
        name: String::from("Days"),
        pattern_id: Some(PatternId::new(42)),
        start_date: today(),
        display_order: None,
    };

    let result: Result<ShiftRecord, PersistenceError> =
        persistence.create_shift(schedule_id, &new_shift, None);

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_future_change_splits_timeline_and_keeps_projection() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let pattern_id: PatternId = create_test_pattern(&mut persistence, schedule_id, "Rotation");
    let shift: ShiftRecord = create_test_shift(
        &mut persistence,
        schedule_id,
        "Days",
        Some(pattern_id),
        date(2026, Month::January, 1),
    );

    let updated: ShiftRecord = persistence
        .update_shift(
            schedule_id,
            &change(&shift, "Late Days", None, date(2026, Month::April, 1)),
            today(),
            None,
        )
        .unwrap();

    let versions: Vec<ShiftVersion> = persistence
        .shift_timeline(schedule_id, shift.employee_type_id)
        .unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0].end_date, Some(date(2026, Month::March, 31)));
    assert_eq!(versions[0].fields.name, "Days");
    assert_eq!(versions[1].start_date, date(2026, Month::April, 1));
    assert_eq!(versions[1].fields.name, "Late Days");
    assert_eq!(versions[1].fields.pattern_id, None);

    // Today still falls in the first version.
    assert_eq!(updated.name, "Days");
    assert_eq!(updated.pattern_id, Some(pattern_id));
}

#[test]
fn test_change_on_existing_start_overwrites_version() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let shift: ShiftRecord = create_test_shift(
        &mut persistence,
        schedule_id,
        "Days",
        None,
        date(2026, Month::January, 1),
    );

    persistence
        .update_shift(
            schedule_id,
            &change(&shift, "Day Shift", None, date(2026, Month::January, 1)),
            today(),
            None,
        )
        .unwrap();

    let versions: Vec<ShiftVersion> = persistence
        .shift_timeline(schedule_id, shift.employee_type_id)
        .unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].fields.name, "Day Shift");
    let row: ShiftRecord = persistence
        .get_shift(schedule_id, shift.employee_type_id)
        .unwrap()
        .unwrap();
    assert_eq!(row.name, "Day Shift");
}

#[test]
fn test_backdated_change_ends_before_existing_version() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let shift: ShiftRecord = create_test_shift(
        &mut persistence,
        schedule_id,
        "Days",
        None,
        date(2026, Month::March, 1),
    );

    persistence
        .update_shift(
            schedule_id,
            &change(&shift, "Early", None, date(2026, Month::February, 1)),
            today(),
            None,
        )
        .unwrap();

    let versions: Vec<ShiftVersion> = persistence
        .shift_timeline(schedule_id, shift.employee_type_id)
        .unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0].start_date, date(2026, Month::February, 1));
    assert_eq!(versions[0].end_date, Some(date(2026, Month::February, 28)));
    assert_eq!(versions[1].fields.name, "Days");
}

#[test]
fn test_update_moves_display_order() {
    let (mut persistence, schedule_id) = create_test_schedule();
    create_test_shift(&mut persistence, schedule_id, "Days", None, today());
    create_test_shift(&mut persistence, schedule_id, "Swing", None, today());
    let nights: ShiftRecord =
        create_test_shift(&mut persistence, schedule_id, "Nights", None, today());

    let mut move_up: ShiftChange = change(&nights, "Nights", None, today());
    move_up.display_order = Some(1);
    persistence
        .update_shift(schedule_id, &move_up, today(), None)
        .unwrap();

    assert_eq!(names(&mut persistence, schedule_id), vec!["Nights", "Days", "Swing"]);
}

#[test]
fn test_update_unknown_shift_is_not_found() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let ghost: ShiftRecord = ShiftRecord {
        employee_type_id: EmployeeTypeId::new(77),
        display_order: 1,
        name: String::from("Ghost"),
        pattern_id: None,
        start_date: today(),
    };

    let result: Result<ShiftRecord, PersistenceError> = persistence.update_shift(
        schedule_id,
        &change(&ghost, "Ghost", None, today()),
        today(),
        None,
    );

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_without_versioning_only_the_row_changes() {
    let (persistence, schedule_id) = create_test_schedule();
    let mut persistence: Persistence = persistence.with_capabilities(StoreCapabilities {
        supports_shift_versioning: false,
        ..StoreCapabilities::full()
    });
    let shift: ShiftRecord = create_test_shift(
        &mut persistence,
        schedule_id,
        "Days",
        None,
        date(2026, Month::January, 1),
    );

    persistence
        .update_shift(
            schedule_id,
            &change(&shift, "Renamed", None, date(2026, Month::June, 1)),
            today(),
            None,
        )
        .unwrap();

    let versions: Vec<ShiftVersion> = persistence
        .shift_timeline(schedule_id, shift.employee_type_id)
        .unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].start_date, date(2026, Month::January, 1));
    assert_eq!(versions[0].fields.name, "Renamed");
}

#[test]
fn test_legacy_shift_gets_baseline_version_on_first_change() {
    let (persistence, schedule_id) = create_test_schedule();
    let mut legacy: Persistence = persistence.with_capabilities(StoreCapabilities {
        supports_shift_versioning: false,
        ..StoreCapabilities::full()
    });
    let shift: ShiftRecord = create_test_shift(
        &mut legacy,
        schedule_id,
        "Days",
        None,
        date(2026, Month::January, 1),
    );
    let mut persistence: Persistence = legacy.with_capabilities(StoreCapabilities::full());

    persistence
        .update_shift(
            schedule_id,
            &change(&shift, "Nights", None, date(2026, Month::May, 1)),
            today(),
            None,
        )
        .unwrap();

    let versions: Vec<ShiftVersion> = persistence
        .shift_timeline(schedule_id, shift.employee_type_id)
        .unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0].fields.name, "Days");
    assert_eq!(versions[0].end_date, Some(date(2026, Month::April, 30)));
    assert_eq!(versions[1].fields.name, "Nights");
}

#[test]
fn test_failed_timeline_check_rolls_back_shift_change() {
    use diesel::prelude::*;

    use crate::diesel_schema::employee_type_versions;

    let (mut persistence, schedule_id) = create_test_schedule();
    let shift: ShiftRecord = create_test_shift(
        &mut persistence,
        schedule_id,
        "Days",
        None,
        date(2026, Month::January, 1),
    );
    // Overlaps the open January version. The change below closes this row
    // and inserts a new one before the overlap is detected.
    diesel::insert_into(employee_type_versions::table)
        .values((
            employee_type_versions::schedule_id.eq(schedule_id.value()),
            employee_type_versions::employee_type_id.eq(shift.employee_type_id.value()),
            employee_type_versions::name.eq("Days"),
            employee_type_versions::start_date.eq("2026-02-01"),
        ))
        .execute(&mut persistence.conn)
        .unwrap();
    let versions_before: Vec<ShiftVersion> = persistence
        .shift_timeline(schedule_id, shift.employee_type_id)
        .unwrap();
    let row_before: Option<ShiftRecord> = persistence
        .get_shift(schedule_id, shift.employee_type_id)
        .unwrap();

    let result: Result<ShiftRecord, PersistenceError> = persistence.update_shift(
        schedule_id,
        &change(&shift, "Swing", None, date(2026, Month::March, 1)),
        today(),
        None,
    );

    assert!(matches!(result, Err(PersistenceError::TimelineViolation(_))));
    assert_eq!(
        persistence
            .shift_timeline(schedule_id, shift.employee_type_id)
            .unwrap(),
        versions_before
    );
    assert_eq!(
        persistence
            .get_shift(schedule_id, shift.employee_type_id)
            .unwrap(),
        row_before
    );
}
