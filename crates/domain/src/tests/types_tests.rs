// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DisplayMode, DomainError, EmployeeTypeId, EventScope, EventScopeType, HexColor, ScheduleRole,
    UserOid,
};

#[test]
fn test_hex_color_normalizes_case() {
    let color: HexColor = HexColor::parse(" #AbCdEf ").unwrap();
    assert_eq!(color.as_str(), "#abcdef");
    assert_eq!(color.rgb(), (0xab, 0xcd, 0xef));
}

#[test]
fn test_hex_color_rejects_short_and_named_values() {
    assert!(HexColor::parse("#fff").is_err());
    assert!(HexColor::parse("red").is_err());
    assert!(HexColor::parse("#gggggg").is_err());
    assert!(HexColor::parse("ff00ff0").is_err());
}

#[test]
fn test_hex_color_parse_or_default() {
    assert_eq!(HexColor::parse_or_default(Some("bad")).as_str(), "#22c55e");
    assert_eq!(HexColor::parse_or_default(None).as_str(), "#22c55e");
    assert_eq!(HexColor::parse_or_default(Some("#FF0000")).as_str(), "#ff0000");
}

#[test]
fn test_user_oid_is_trimmed_and_lowercased() {
    let oid: UserOid = UserOid::new("  ABC-Def ").unwrap();
    assert_eq!(oid.as_str(), "abc-def");
    assert_eq!(oid, UserOid::new("abc-DEF").unwrap());
}

#[test]
fn test_user_oid_rejects_blank() {
    assert!(matches!(UserOid::new("   "), Err(DomainError::InvalidUserOid(_))));
}

#[test]
fn test_schedule_role_ranking() {
    assert_eq!(ScheduleRole::parse("maintainer").unwrap(), ScheduleRole::Maintainer);
    assert!(ScheduleRole::Manager.at_least(ScheduleRole::Maintainer));
    assert!(ScheduleRole::Maintainer.at_least(ScheduleRole::Maintainer));
    assert!(!ScheduleRole::Member.at_least(ScheduleRole::Maintainer));
    assert!(ScheduleRole::Member < ScheduleRole::Manager);
    assert!(ScheduleRole::parse("owner").is_err());
}

#[test]
fn test_event_scope_from_parts_enforces_exclusive_fields() {
    let oid: UserOid = UserOid::new("u1").unwrap();
    assert_eq!(
        EventScope::from_parts(EventScopeType::Global, None, None).unwrap(),
        EventScope::Global
    );
    assert!(
        EventScope::from_parts(EventScopeType::Global, Some(EmployeeTypeId::new(1)), None)
            .is_err()
    );
    assert!(EventScope::from_parts(EventScopeType::Shift, None, None).is_err());
    assert!(
        EventScope::from_parts(
            EventScopeType::Shift,
            Some(EmployeeTypeId::new(1)),
            Some(oid.clone())
        )
        .is_err()
    );
    assert_eq!(
        EventScope::from_parts(EventScopeType::User, None, Some(oid.clone())).unwrap(),
        EventScope::User(oid)
    );
}

#[test]
fn test_event_scope_derive_prefers_user() {
    let oid: UserOid = UserOid::new("u1").unwrap();
    assert_eq!(
        EventScope::derive(Some(EmployeeTypeId::new(3)), Some(oid.clone())),
        EventScope::User(oid)
    );
    assert_eq!(
        EventScope::derive(Some(EmployeeTypeId::new(3)), None),
        EventScope::Shift(EmployeeTypeId::new(3))
    );
    assert_eq!(EventScope::derive(None, None), EventScope::Global);
}

#[test]
fn test_display_mode_labels() {
    assert_eq!(DisplayMode::parse("Shift Override").unwrap(), DisplayMode::Override);
    assert_eq!(DisplayMode::Badge.label(), "Badge Indicator");
    assert!(DisplayMode::parse("Overlay").is_err());
    assert_eq!(DisplayMode::parse_or_default(Some("nope")), DisplayMode::Overlay);
    assert_eq!(
        serde_json::to_string(&DisplayMode::Overlay).unwrap(),
        "\"Schedule Overlay\""
    );
}
