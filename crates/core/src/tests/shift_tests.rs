// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftboard_domain::{EmployeeTypeId, PatternId, UserOid};
use time::Month;

use crate::tests::helpers::{date, shift_version};
use crate::{
    AssignmentFields, AssignmentRecord, AssignmentVersion, ShiftFields, ShiftRecord, ShiftVersion,
    TimelineVersion, projection_source, shift_on,
};

fn create_test_shift() -> ShiftRecord {
    ShiftRecord {
        employee_type_id: EmployeeTypeId::new(4),
        display_order: 1,
        name: String::from("Days"),
        pattern_id: Some(PatternId::new(1)),
        start_date: date(2026, Month::January, 1),
    }
}

#[test]
fn test_row_as_open_version() {
    let version: ShiftVersion = create_test_shift().as_open_version();

    assert_eq!(version.start_date, date(2026, Month::January, 1));
    assert!(version.is_open());
    assert_eq!(version.fields.name, "Days");
    assert_eq!(version.fields.pattern_id, Some(PatternId::new(1)));
}

#[test]
fn test_as_of_reads_version_active_that_day() {
    let versions: Vec<ShiftVersion> = vec![
        shift_version(
            date(2026, Month::January, 1),
            Some(date(2026, Month::March, 31)),
            "Days",
            Some(1),
        ),
        shift_version(date(2026, Month::April, 1), None, "Early Days", Some(2)),
    ];
    let shift: ShiftRecord = create_test_shift();

    let february: ShiftRecord = shift.as_of(&versions, date(2026, Month::February, 10));
    let may: ShiftRecord = shift.as_of(&versions, date(2026, Month::May, 10));

    assert_eq!(february.name, "Days");
    assert_eq!(may.name, "Early Days");
    assert_eq!(may.pattern_id, Some(PatternId::new(2)));
    assert_eq!(may.start_date, date(2026, Month::April, 1));
    assert_eq!(may.display_order, 1);
}

#[test]
fn test_as_of_before_history_keeps_row() {
    let versions: Vec<ShiftVersion> =
        vec![shift_version(date(2026, Month::April, 1), None, "Later", None)];

    let view: ShiftRecord = create_test_shift().as_of(&versions, date(2026, Month::January, 5));

    assert_eq!(view, create_test_shift());
}

#[test]
fn test_projection_refresh_prefers_version_active_today() {
    let versions: Vec<ShiftVersion> = vec![
        shift_version(
            date(2026, Month::January, 1),
            Some(date(2026, Month::November, 30)),
            "Days",
            Some(1),
        ),
        shift_version(date(2026, Month::December, 1), None, "Winter Days", None),
    ];
    let mut shift: ShiftRecord = create_test_shift();

    let source: &ShiftVersion =
        projection_source(&versions, date(2026, Month::October, 16)).unwrap();
    shift.refresh_from(source);

    assert_eq!(shift.name, "Days");
    assert_eq!(shift.pattern_id, Some(PatternId::new(1)));
}

#[test]
fn test_projection_refresh_falls_back_to_latest_version() {
    let versions: Vec<ShiftVersion> = vec![
        shift_version(date(2026, Month::December, 1), None, "Winter Days", None),
        shift_version(
            date(2026, Month::November, 1),
            Some(date(2026, Month::November, 30)),
            "Autumn Days",
            Some(1),
        ),
    ];

    let source: &ShiftVersion =
        projection_source(&versions, date(2026, Month::October, 16)).unwrap();

    assert_eq!(source.fields.name, "Winter Days");
}

#[test]
fn test_unassigned_keeps_name() {
    let version: ShiftVersion = create_test_shift().as_open_version();

    let unassigned: ShiftFields = version.fields.unassigned();

    assert_eq!(unassigned.name, "Days");
    assert_eq!(unassigned.pattern_id, None);
}

#[test]
fn test_assignment_shift_on() {
    let versions: Vec<AssignmentVersion> = vec![
        TimelineVersion::new(
            date(2026, Month::January, 1),
            Some(date(2026, Month::June, 30)),
            AssignmentFields::new(EmployeeTypeId::new(1), 2),
        ),
        TimelineVersion::new(
            date(2026, Month::July, 1),
            None,
            AssignmentFields::new(EmployeeTypeId::new(2), 1),
        ),
    ];
    let record: AssignmentRecord =
        AssignmentRecord::new(UserOid::new("ABC-123").unwrap(), versions[1].clone());

    assert_eq!(
        shift_on(&versions, date(2026, Month::March, 3)),
        Some(EmployeeTypeId::new(1))
    );
    assert_eq!(
        shift_on(&versions, date(2026, Month::August, 3)),
        Some(EmployeeTypeId::new(2))
    );
    assert_eq!(shift_on(&versions, date(2025, Month::August, 3)), None);
    assert_eq!(record.user_oid.as_str(), "abc-123");
    assert_eq!(record.employee_type_id(), EmployeeTypeId::new(2));
    assert_eq!(record.display_order(), 1);
}
