// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User-to-shift assignment timelines.
//!
//! Each user has one timeline; every version places the user in exactly one
//! shift at a display position within that shift.

use shiftboard_domain::{EmployeeTypeId, UserOid};
use time::Date;

use crate::timeline::{TimelineVersion, active_on};

/// The versioned fields of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentFields {
    pub employee_type_id: EmployeeTypeId,
    pub display_order: i64,
}

impl AssignmentFields {
    /// Creates assignment fields.
    #[must_use]
    pub const fn new(employee_type_id: EmployeeTypeId, display_order: i64) -> Self {
        Self {
            employee_type_id,
            display_order,
        }
    }
}

/// One dated assignment of a user.
pub type AssignmentVersion = TimelineVersion<AssignmentFields>;

/// A stored assignment row with its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRecord {
    pub user_oid: UserOid,
    pub version: AssignmentVersion,
}

impl AssignmentRecord {
    /// Creates a record.
    #[must_use]
    pub const fn new(user_oid: UserOid, version: AssignmentVersion) -> Self {
        Self { user_oid, version }
    }

    /// Shift of this record.
    #[must_use]
    pub const fn employee_type_id(&self) -> EmployeeTypeId {
        self.version.fields.employee_type_id
    }

    /// Display position of this record.
    #[must_use]
    pub const fn display_order(&self) -> i64 {
        self.version.fields.display_order
    }
}

/// Returns the shift a user belongs to on `day`.
#[must_use]
pub fn shift_on(versions: &[AssignmentVersion], day: Date) -> Option<EmployeeTypeId> {
    active_on(versions, day).map(|v| v.fields.employee_type_id)
}
