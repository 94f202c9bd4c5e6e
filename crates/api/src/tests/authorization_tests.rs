// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role enforcement, membership management and capabilities.

use shiftboard_domain::{ScheduleRole, StoreCapabilities, UserOid};

use crate::{
    ApiError, AuthError, AuthorizationService, Capability, ListMembersResponse, MemberInfo,
    RemoveMemberRequest, ScheduleCapabilities, UpdateMemberRequest, UpsertMemberRequest,
    compute_schedule_capabilities, get_capabilities, list_members, list_shifts, remove_member,
    update_member, upsert_member,
};

use super::helpers::{MAINTAINER, MANAGER, MEMBER, caller, create_test_schedule};

fn member_request(user_oid: &str, role: &str) -> UpsertMemberRequest {
    UpsertMemberRequest {
        user_oid: String::from(user_oid),
        display_name: Some(String::from("New Person")),
        role: String::from(role),
    }
}

fn rename_request(user_oid: &str, display_name: &str) -> UpdateMemberRequest {
    UpdateMemberRequest {
        user_oid: String::from(user_oid),
        display_name: Some(String::from(display_name)),
        role: None,
    }
}

fn role_request(user_oid: &str, role: &str) -> UpdateMemberRequest {
    UpdateMemberRequest {
        user_oid: String::from(user_oid),
        display_name: None,
        role: Some(String::from(role)),
    }
}

fn removal(user_oid: &str) -> RemoveMemberRequest {
    RemoveMemberRequest {
        user_oid: String::from(user_oid),
    }
}

// ============================================================================
// Role checks
// ============================================================================

#[test]
fn test_check_role_orders_roles() {
    assert!(
        AuthorizationService::check_role(
            ScheduleRole::Manager,
            ScheduleRole::Maintainer,
            "edit"
        )
        .is_ok()
    );

    let result =
        AuthorizationService::check_role(ScheduleRole::Member, ScheduleRole::Maintainer, "edit");

    assert_eq!(
        result,
        Err(AuthError::Unauthorized {
            action: String::from("edit"),
            required_role: String::from("Maintainer"),
        })
    );
}

#[test]
fn test_non_member_cannot_read() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let result = list_shifts(&mut persistence, &caller("stranger"), schedule_id);

    assert!(matches!(
        result,
        Err(ApiError::Unauthorized { ref required_role, .. }) if required_role == "Member"
    ));
}

#[test]
fn test_caller_oid_is_case_insensitive() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let result = list_shifts(&mut persistence, &caller("MEMBER-OID"), schedule_id);

    assert!(result.is_ok());
}

#[test]
fn test_deactivated_member_loses_access() {
    let (mut persistence, schedule_id) = create_test_schedule();
    persistence
        .deactivate_member(schedule_id, &UserOid::new(MEMBER).unwrap())
        .unwrap();

    let result = list_shifts(&mut persistence, &caller(MEMBER), schedule_id);

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

// ============================================================================
// Members
// ============================================================================

#[test]
fn test_manager_adds_member() {
    let (mut persistence, schedule_id) = create_test_schedule();

    upsert_member(
        &mut persistence,
        &caller(MANAGER),
        schedule_id,
        &member_request("new-oid", "maintainer"),
    )
    .unwrap();

    let members: ListMembersResponse =
        list_members(&mut persistence, &caller(MEMBER), schedule_id).unwrap();
    assert_eq!(members.members.len(), 4);
    assert!(
        members
            .members
            .iter()
            .any(|m| m.user_oid == "new-oid" && m.role == "Maintainer")
    );
}

#[test]
fn test_maintainer_cannot_manage_members() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let result = upsert_member(
        &mut persistence,
        &caller(MAINTAINER),
        schedule_id,
        &member_request("new-oid", "Member"),
    );

    assert!(matches!(
        result,
        Err(ApiError::Unauthorized { ref required_role, .. }) if required_role == "Manager"
    ));
}

#[test]
fn test_last_manager_cannot_be_demoted() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let result = upsert_member(
        &mut persistence,
        &caller(MANAGER),
        schedule_id,
        &member_request(MANAGER, "Member"),
    );

    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_unknown_role_is_invalid() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let result = upsert_member(
        &mut persistence,
        &caller(MANAGER),
        schedule_id,
        &member_request("new-oid", "Owner"),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "role"
    ));
}

#[test]
fn test_member_renames_self() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let info: MemberInfo = update_member(
        &mut persistence,
        &caller(MEMBER),
        schedule_id,
        &rename_request(MEMBER, "  Mel M.  "),
    )
    .unwrap();

    assert_eq!(info.display_name.as_deref(), Some("Mel M."));
    assert_eq!(info.role, "Member");
}

#[test]
fn test_member_cannot_rename_others() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let result = update_member(
        &mut persistence,
        &caller(MEMBER),
        schedule_id,
        &rename_request(MAINTAINER, "Someone Else"),
    );

    assert!(matches!(
        result,
        Err(ApiError::Unauthorized { ref required_role, .. }) if required_role == "Manager"
    ));
}

#[test]
fn test_member_cannot_change_own_role() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let result = update_member(
        &mut persistence,
        &caller(MEMBER),
        schedule_id,
        &role_request(MEMBER, "Manager"),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_blank_display_name_is_invalid() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let result = update_member(
        &mut persistence,
        &caller(MEMBER),
        schedule_id,
        &rename_request(MEMBER, "   "),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "displayName"
    ));
}

#[test]
fn test_manager_promotes_member() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let info: MemberInfo = update_member(
        &mut persistence,
        &caller(MANAGER),
        schedule_id,
        &role_request(MEMBER, "manager"),
    )
    .unwrap();

    assert_eq!(info.role, "Manager");
    assert_eq!(info.display_name.as_deref(), Some("Mel Member"));
}

#[test]
fn test_update_member_cannot_demote_last_manager() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let result = update_member(
        &mut persistence,
        &caller(MANAGER),
        schedule_id,
        &role_request(MANAGER, "Maintainer"),
    );

    assert!(matches!(result, Err(ApiError::Conflict { .. })));
    assert_eq!(
        persistence
            .member_role(schedule_id, &UserOid::new(MANAGER).unwrap())
            .unwrap(),
        Some(ScheduleRole::Manager)
    );
}

#[test]
fn test_update_unknown_member_is_not_found() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let result = update_member(
        &mut persistence,
        &caller(MANAGER),
        schedule_id,
        &role_request("nobody-oid", "Member"),
    );

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_removed_member_loses_access() {
    let (mut persistence, schedule_id) = create_test_schedule();

    remove_member(&mut persistence, &caller(MANAGER), schedule_id, &removal(MEMBER)).unwrap();

    let members: ListMembersResponse =
        list_members(&mut persistence, &caller(MANAGER), schedule_id).unwrap();
    assert!(members.members.iter().all(|m| m.user_oid != MEMBER));
    let result = list_shifts(&mut persistence, &caller(MEMBER), schedule_id);
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_maintainer_cannot_remove_member() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let result = remove_member(
        &mut persistence,
        &caller(MAINTAINER),
        schedule_id,
        &removal(MEMBER),
    );

    assert!(matches!(
        result,
        Err(ApiError::Unauthorized { ref required_role, .. }) if required_role == "Manager"
    ));
}

#[test]
fn test_last_manager_cannot_be_removed() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let result = remove_member(&mut persistence, &caller(MANAGER), schedule_id, &removal(MANAGER));

    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

// ============================================================================
// Capabilities
// ============================================================================

#[test]
fn test_capabilities_follow_role() {
    let (mut persistence, schedule_id) = create_test_schedule();

    let member: ScheduleCapabilities =
        get_capabilities(&mut persistence, &caller(MEMBER), schedule_id).unwrap();
    let maintainer: ScheduleCapabilities =
        get_capabilities(&mut persistence, &caller(MAINTAINER), schedule_id).unwrap();
    let manager: ScheduleCapabilities =
        get_capabilities(&mut persistence, &caller(MANAGER), schedule_id).unwrap();

    assert_eq!(member.can_edit_schedule, Capability::Denied);
    assert_eq!(member.can_scope_events_to_shifts, Capability::Denied);
    assert_eq!(maintainer.can_edit_schedule, Capability::Allowed);
    assert_eq!(maintainer.can_manage_members, Capability::Denied);
    assert_eq!(manager.can_manage_members, Capability::Allowed);
    assert_eq!(manager.role, "Manager");
}

#[test]
fn test_capabilities_follow_store() {
    let limited: StoreCapabilities = StoreCapabilities {
        supports_shift_versioning: false,
        supports_event_scoping: false,
        supports_custom_event_colors: true,
    };

    let capabilities: ScheduleCapabilities =
        compute_schedule_capabilities(ScheduleRole::Maintainer, limited);

    assert_eq!(capabilities.can_scope_events_to_shifts, Capability::Denied);
    assert_eq!(capabilities.can_use_custom_event_colors, Capability::Allowed);
    assert_eq!(capabilities.has_shift_history, Capability::Denied);
}

#[test]
fn test_capabilities_serialize_as_booleans() {
    let capabilities: ScheduleCapabilities =
        compute_schedule_capabilities(ScheduleRole::Manager, StoreCapabilities::full());

    let json: serde_json::Value = serde_json::to_value(&capabilities).unwrap();

    assert_eq!(json["canEditSchedule"], true);
    assert_eq!(json["hasShiftHistory"], true);
}
