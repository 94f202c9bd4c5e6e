// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller identity and schedule-role authorization.
//!
//! Identity comes from the host (a verified directory object id); roles
//! come from schedule membership. Every operation resolves the caller's
//! role for the target schedule before touching data.

use shiftboard_domain::{ScheduleId, ScheduleRole, UserOid};
use shiftboard_persistence::Persistence;
use tracing::debug;

use crate::error::{ApiError, AuthError, translate_persistence_error};

/// An identified caller, before any schedule is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// The caller's directory object id.
    pub user_oid: UserOid,
}

impl Caller {
    /// Creates a caller from a directory object id.
    #[must_use]
    pub const fn new(user_oid: UserOid) -> Self {
        Self { user_oid }
    }
}

/// A caller whose role in one schedule has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedCaller {
    /// The caller's directory object id.
    pub user_oid: UserOid,
    /// The schedule the role applies to.
    pub schedule_id: ScheduleId,
    /// The caller's role in that schedule.
    pub role: ScheduleRole,
}

impl AuthorizedCaller {
    /// Actor recorded on written rows.
    #[must_use]
    pub fn actor(&self) -> Option<&str> {
        Some(self.user_oid.as_str())
    }
}

/// Authorization service for enforcing schedule roles.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that `role` ranks at least `required`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the action and the required role.
    pub fn check_role(
        role: ScheduleRole,
        required: ScheduleRole,
        action: &str,
    ) -> Result<(), AuthError> {
        if role.at_least(required) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: required.as_str().to_string(),
            })
        }
    }

    /// Resolves the caller's role in a schedule and checks it.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The store holding schedule membership
    /// * `caller` - The identified caller
    /// * `schedule_id` - The schedule being accessed
    /// * `required` - The lowest role allowed to perform `action`
    /// * `action` - Name of the operation, for error messages
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the caller is not an active member or their
    /// role is too low, or an internal error if membership cannot be read.
    pub fn authorize(
        persistence: &mut Persistence,
        caller: &Caller,
        schedule_id: ScheduleId,
        required: ScheduleRole,
        action: &str,
    ) -> Result<AuthorizedCaller, ApiError> {
        let role: ScheduleRole = persistence
            .member_role(schedule_id, &caller.user_oid)
            .map_err(translate_persistence_error)?
            .ok_or(AuthError::NotAMember {
                schedule_id: schedule_id.value(),
            })?;
        Self::check_role(role, required, action)?;

        debug!(
            schedule_id = schedule_id.value(),
            user_oid = %caller.user_oid,
            role = role.as_str(),
            action,
            "Authorized caller"
        );
        Ok(AuthorizedCaller {
            user_oid: caller.user_oid.clone(),
            schedule_id,
            role,
        })
    }

    /// Authorizes a read. Any member may read.
    ///
    /// # Errors
    ///
    /// See [`AuthorizationService::authorize`].
    pub fn authorize_read(
        persistence: &mut Persistence,
        caller: &Caller,
        schedule_id: ScheduleId,
        action: &str,
    ) -> Result<AuthorizedCaller, ApiError> {
        Self::authorize(persistence, caller, schedule_id, ScheduleRole::Member, action)
    }

    /// Authorizes a schedule edit. Maintainers and managers may edit.
    ///
    /// # Errors
    ///
    /// See [`AuthorizationService::authorize`].
    pub fn authorize_edit(
        persistence: &mut Persistence,
        caller: &Caller,
        schedule_id: ScheduleId,
        action: &str,
    ) -> Result<AuthorizedCaller, ApiError> {
        Self::authorize(
            persistence,
            caller,
            schedule_id,
            ScheduleRole::Maintainer,
            action,
        )
    }

    /// Authorizes a membership change. Only managers may manage members.
    ///
    /// # Errors
    ///
    /// See [`AuthorizationService::authorize`].
    pub fn authorize_manage(
        persistence: &mut Persistence,
        caller: &Caller,
        schedule_id: ScheduleId,
        action: &str,
    ) -> Result<AuthorizedCaller, ApiError> {
        Self::authorize(persistence, caller, schedule_id, ScheduleRole::Manager, action)
    }
}
