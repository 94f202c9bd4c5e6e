// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pattern create, list, preview and removal through the API.

use shiftboard_domain::{PatternInput, SwatchInput};

use crate::{
    ApiError, DeletePatternRequest, DeletePatternResponse, ListPatternsResponse,
    ListShiftsResponse, PatternInfo, PatternRequest, PreviewPatternRequest,
    PreviewPatternResponse, create_pattern, delete_pattern, list_patterns, list_shifts,
    preview_pattern, update_pattern,
};

use super::helpers::{
    MAINTAINER, MEMBER, caller, create_test_pattern, create_test_schedule, create_test_shift,
    rotation_input, rotation_request, today,
};

#[test]
fn test_create_pattern_stores_summary_and_normalized_colors() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let info: PatternInfo = create_pattern(
        &mut persistence,
        &caller(MAINTAINER),
        schedule_id,
        &rotation_request("  Four On  "),
    )
    .unwrap();

    assert_eq!(info.name, "Four On");
    assert_eq!(info.summary, "1 shift - 4 on / 4 off");
    let stored: PatternInput = info.pattern.unwrap();
    assert_eq!(stored.swatches[0].color, "#ff0000");
    assert_eq!(info.shift_usage_count, 0);
}

#[test]
fn test_create_pattern_rejects_member() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let result = create_pattern(
        &mut persistence,
        &caller(MEMBER),
        schedule_id,
        &rotation_request("Rotation"),
    );

    assert!(matches!(
        result,
        Err(ApiError::Unauthorized { ref required_role, .. }) if required_role == "Maintainer"
    ));
}

#[test]
fn test_create_pattern_rejects_empty_pattern() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let request: PatternRequest = PatternRequest {
        name: String::from("Blank"),
        pattern: PatternInput {
            swatches: vec![SwatchInput {
                swatch_index: 0,
                color: String::from("#00ff00"),
                on_days: Vec::new(),
            }],
            no_shift_days: vec![1, 2],
        },
    };

    let result = create_pattern(&mut persistence, &caller(MAINTAINER), schedule_id, &request);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "pattern"
    ));
}

#[test]
fn test_create_pattern_rejects_bad_color() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let mut request: PatternRequest = rotation_request("Rotation");
    request.pattern.swatches[0].color = String::from("red");

    let result = create_pattern(&mut persistence, &caller(MAINTAINER), schedule_id, &request);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "color"
    ));
}

#[test]
fn test_create_pattern_rejects_blank_name() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let result = create_pattern(
        &mut persistence,
        &caller(MAINTAINER),
        schedule_id,
        &rotation_request("   "),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "name"
    ));
}

#[test]
fn test_create_pattern_rejects_duplicate_name() {
    let (mut persistence, schedule_id) = create_test_schedule();
    create_test_pattern(&mut persistence, schedule_id, "Rotation");

    let result = create_pattern(
        &mut persistence,
        &caller(MAINTAINER),
        schedule_id,
        &rotation_request("ROTATION"),
    );

    assert!(matches!(result, Err(ApiError::Conflict { code: None, .. })));
}

#[test]
fn test_update_unknown_pattern_is_not_found() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let result = update_pattern(
        &mut persistence,
        &caller(MAINTAINER),
        schedule_id,
        999,
        &rotation_request("Rotation"),
        today(),
    );

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Pattern"
    ));
}

#[test]
fn test_list_patterns_reports_usage() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let pattern_id: i64 = create_test_pattern(&mut persistence, schedule_id, "Rotation");
    create_test_shift(
        &mut persistence,
        schedule_id,
        "Days",
        Some(pattern_id),
        "2026-01-01",
    );

    let response: ListPatternsResponse =
        list_patterns(&mut persistence, &caller(MEMBER), schedule_id, today()).unwrap();

    assert_eq!(response.patterns.len(), 1);
    assert_eq!(response.patterns[0].shift_usage_count, 1);
    assert_eq!(response.patterns[0].active_shift_usage_count, 1);
}

#[test]
fn test_delete_unused_pattern_is_hard_delete() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let pattern_id: i64 = create_test_pattern(&mut persistence, schedule_id, "Rotation");

    let response: DeletePatternResponse = delete_pattern(
        &mut persistence,
        &caller(MAINTAINER),
        schedule_id,
        &DeletePatternRequest {
            pattern_id,
            confirm_active_removal: false,
        },
        today(),
    )
    .unwrap();

    assert_eq!(response.mode, "hard-delete");
    assert!(response.unassigned_shift_ids.is_empty());
}

#[test]
fn test_delete_active_pattern_needs_confirmation() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let pattern_id: i64 = create_test_pattern(&mut persistence, schedule_id, "Rotation");
    create_test_shift(
        &mut persistence,
        schedule_id,
        "Days",
        Some(pattern_id),
        "2026-01-01",
    );

    let result = delete_pattern(
        &mut persistence,
        &caller(MAINTAINER),
        schedule_id,
        &DeletePatternRequest {
            pattern_id,
            confirm_active_removal: false,
        },
        today(),
    );

    assert!(matches!(
        result,
        Err(ApiError::NeedsConfirmation {
            ref code,
            active_shift_usage_count: 1,
            ..
        }) if code == "PATTERN_ACTIVE_IN_USE"
    ));
    let shifts: ListShiftsResponse =
        list_shifts(&mut persistence, &caller(MEMBER), schedule_id).unwrap();
    assert_eq!(shifts.shifts[0].pattern_id, Some(pattern_id));
}

#[test]
fn test_confirmed_delete_unassigns_shift_from_today() {
    let (mut persistence, schedule_id) = create_test_schedule();
    let pattern_id: i64 = create_test_pattern(&mut persistence, schedule_id, "Rotation");
    let shift_id: i64 = create_test_shift(
        &mut persistence,
        schedule_id,
        "Days",
        Some(pattern_id),
        "2026-01-01",
    )
    .employee_type_id;

    let response: DeletePatternResponse = delete_pattern(
        &mut persistence,
        &caller(MAINTAINER),
        schedule_id,
        &DeletePatternRequest {
            pattern_id,
            confirm_active_removal: true,
        },
        today(),
    )
    .unwrap();

    assert_eq!(response.mode, "removed-with-unassigned-transition");
    assert_eq!(response.unassigned_shift_ids, vec![shift_id]);
    let shifts: ListShiftsResponse =
        list_shifts(&mut persistence, &caller(MEMBER), schedule_id).unwrap();
    assert_eq!(shifts.shifts[0].pattern_id, None);
    let patterns: ListPatternsResponse =
        list_patterns(&mut persistence, &caller(MEMBER), schedule_id, today()).unwrap();
    assert!(patterns.patterns.is_empty());
}

#[test]
fn test_preview_pattern_projects_cycle() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let preview: PreviewPatternResponse = preview_pattern(
        &mut persistence,
        &caller(MEMBER),
        schedule_id,
        &PreviewPatternRequest {
            pattern: rotation_input(),
        },
    )
    .unwrap();

    assert_eq!(preview.summary, "1 shift - 4 on / 4 off");
    assert!(!preview.conflicting);
    assert_eq!(preview.cycle_colors.len(), 28);
    assert_eq!(preview.cycle_colors[0].as_deref(), Some("#ff0000"));
    assert_eq!(preview.cycle_colors[4], None);
    assert_eq!(preview.cycle_colors[16].as_deref(), Some("#ff0000"));
    let prediction = preview.swatches[0].prediction.as_ref().unwrap();
    assert_eq!((prediction.on_days, prediction.off_days), (4, 4));
}

#[test]
fn test_preview_pattern_writes_nothing() {
    let (mut persistence, schedule_id) = create_test_schedule();

    preview_pattern(
        &mut persistence,
        &caller(MAINTAINER),
        schedule_id,
        &PreviewPatternRequest {
            pattern: rotation_input(),
        },
    )
    .unwrap();

    let patterns: ListPatternsResponse =
        list_patterns(&mut persistence, &caller(MEMBER), schedule_id, today()).unwrap();
    assert!(patterns.patterns.is_empty());
}
