// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

use shiftboard::{PatternUsage, RemovalDecision, RemovalMode, ShiftRecord, ShiftVersion};
use shiftboard_domain::{PatternId, StoredPattern};
use time::Month;

use crate::error::PersistenceError;
use crate::tests::{
    create_test_pattern, create_test_schedule, create_test_shift, date, four_on_four_off, today,
};
use crate::{PatternData, ShiftChange};

#[test]
fn test_create_and_list_patterns() {
    let (mut persistence, schedule_id) = create_test_schedule();
    create_test_pattern(&mut persistence, schedule_id, "Nights");
    let days: PatternId = create_test_pattern(&mut persistence, schedule_id, "days");

    let patterns: Vec<PatternData> = persistence.list_patterns(schedule_id).unwrap();

    let names: Vec<&str> = patterns.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["days", "Nights"]);
    assert_eq!(patterns[0].pattern_id, days);
    assert!(matches!(patterns[0].pattern, StoredPattern::Valid(_)));
    assert_eq!(patterns[0].created_by.as_deref(), Some("manager-oid"));
}

#[test]
fn test_duplicate_pattern_name_is_a_conflict() {
    let (mut persistence, schedule_id) = create_test_schedule();
    create_test_pattern(&mut persistence, schedule_id, "Four On");

    let result: Result<PatternId, PersistenceError> =
        persistence.create_pattern(schedule_id, &four_on_four_off(" four on "), None);

    assert!(matches!(result, Err(PersistenceError::Conflict(_))));
}

#[test]
fn test_update_pattern_replaces_name() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let pattern_id: PatternId = create_test_pattern(&mut persistence, schedule_id, "Old");

    persistence
        .update_pattern(schedule_id, pattern_id, &four_on_four_off("New"))
        .unwrap();

    let stored: PatternData = persistence
        .get_pattern(schedule_id, pattern_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, "New");
}

#[test]
fn test_update_pattern_may_keep_its_own_name() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let pattern_id: PatternId = create_test_pattern(&mut persistence, schedule_id, "Same");

    let result: Result<(), PersistenceError> =
        persistence.update_pattern(schedule_id, pattern_id, &four_on_four_off("SAME"));

    assert!(result.is_ok());
}

#[test]
fn test_update_unknown_pattern_is_not_found() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let result: Result<(), PersistenceError> =
        persistence.update_pattern(schedule_id, PatternId::new(99), &four_on_four_off("X"));

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_corrupt_payload_reads_as_corrupt() {
    use diesel::prelude::*;

    use crate::diesel_schema::patterns;

    let (mut persistence, schedule_id) = create_test_schedule();
    let pattern_id: PatternId = create_test_pattern(&mut persistence, schedule_id, "Broken");
    diesel::update(patterns::table)
        .filter(patterns::pattern_id.eq(pattern_id.value()))
        .set(patterns::pattern_json.eq("{not json"))
        .execute(&mut persistence.conn)
        .unwrap();

    let stored: PatternData = persistence
        .get_pattern(schedule_id, pattern_id)
        .unwrap()
        .unwrap();

    assert!(matches!(stored.pattern, StoredPattern::Corrupt));
}

#[test]
fn test_unused_pattern_is_hard_deleted() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let pattern_id: PatternId = create_test_pattern(&mut persistence, schedule_id, "Unused");

    let decision: RemovalDecision = persistence
        .remove_pattern(schedule_id, pattern_id, today(), false, None)
        .unwrap();

    assert_eq!(decision, RemovalDecision::HardDelete);
    let payloads: BTreeMap<PatternId, StoredPattern> =
        persistence.load_pattern_payloads(schedule_id).unwrap();
    assert!(!payloads.contains_key(&pattern_id));
}

#[test]
fn test_active_pattern_needs_confirmation() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let pattern_id: PatternId = create_test_pattern(&mut persistence, schedule_id, "Days");
    let shift: ShiftRecord = create_test_shift(
        &mut persistence,
        schedule_id,
        "Days",
        Some(pattern_id),
        date(2026, Month::January, 1),
    );

    let decision: RemovalDecision = persistence
        .remove_pattern(schedule_id, pattern_id, today(), false, None)
        .unwrap();

    assert_eq!(
        decision,
        RemovalDecision::NeedsConfirmation {
            active_shift_usage_count: 1
        }
    );
    assert!(persistence.get_pattern(schedule_id, pattern_id).unwrap().is_some());
    let versions: Vec<ShiftVersion> = persistence
        .shift_timeline(schedule_id, shift.employee_type_id)
        .unwrap();
    assert_eq!(versions.len(), 1);
}

#[test]
fn test_confirmed_removal_splits_active_shift() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let pattern_id: PatternId = create_test_pattern(&mut persistence, schedule_id, "Days");
    let shift: ShiftRecord = create_test_shift(
        &mut persistence,
        schedule_id,
        "Days",
        Some(pattern_id),
        date(2026, Month::January, 1),
    );

    let decision: RemovalDecision = persistence
        .remove_pattern(schedule_id, pattern_id, today(), true, Some("manager-oid"))
        .unwrap();

    assert_eq!(
        decision.mode(),
        Some(RemovalMode::RemovedWithUnassignedTransition)
    );
    let versions: Vec<ShiftVersion> = persistence
        .shift_timeline(schedule_id, shift.employee_type_id)
        .unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0].start_date, date(2026, Month::January, 1));
    assert_eq!(versions[0].end_date, Some(date(2026, Month::March, 14)));
    assert_eq!(versions[0].fields.pattern_id, Some(pattern_id));
    assert_eq!(versions[1].start_date, today());
    assert_eq!(versions[1].end_date, None);
    assert_eq!(versions[1].fields.pattern_id, None);
    assert_eq!(versions[1].fields.name, "Days");

    let row: ShiftRecord = persistence
        .get_shift(schedule_id, shift.employee_type_id)
        .unwrap()
        .unwrap();
    assert_eq!(row.pattern_id, None);

    // Removed from pickers, still available to history.
    assert!(persistence.get_pattern(schedule_id, pattern_id).unwrap().is_none());
    assert!(
        persistence
            .load_pattern_payloads(schedule_id)
            .unwrap()
            .contains_key(&pattern_id)
    );
}

#[test]
fn test_pattern_used_only_in_history_is_soft_removed() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let pattern_id: PatternId = create_test_pattern(&mut persistence, schedule_id, "Days");
    let shift: ShiftRecord = create_test_shift(
        &mut persistence,
        schedule_id,
        "Days",
        Some(pattern_id),
        date(2026, Month::January, 1),
    );
    let change: ShiftChange = ShiftChange {
        employee_type_id: shift.employee_type_id,
        name: String::from("Days"),
        pattern_id: None,
        effective_date: date(2026, Month::March, 1),
        display_order: None,
    };
    persistence
        .update_shift(schedule_id, &change, today(), None)
        .unwrap();

    let decision: RemovalDecision = persistence
        .remove_pattern(schedule_id, pattern_id, today(), false, None)
        .unwrap();

    assert_eq!(decision.mode(), Some(RemovalMode::SoftRemove));
    let versions: Vec<ShiftVersion> = persistence
        .shift_timeline(schedule_id, shift.employee_type_id)
        .unwrap();
    assert_eq!(versions.len(), 2);
}

#[test]
fn test_remove_unknown_pattern_is_not_found() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let result: Result<RemovalDecision, PersistenceError> =
        persistence.remove_pattern(schedule_id, PatternId::new(5), today(), true, None);

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_pattern_usage_counts_history_and_today() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let pattern_id: PatternId = create_test_pattern(&mut persistence, schedule_id, "Days");
    create_test_shift(
        &mut persistence,
        schedule_id,
        "Active",
        Some(pattern_id),
        date(2026, Month::January, 1),
    );
    create_test_shift(
        &mut persistence,
        schedule_id,
        "Future",
        Some(pattern_id),
        date(2026, Month::June, 1),
    );

    let usage: PatternUsage = persistence
        .pattern_usage(schedule_id, pattern_id, today())
        .unwrap();

    assert_eq!(usage.shift_usage_count, 2);
    assert_eq!(usage.active_shift_usage_count, 1);
}
