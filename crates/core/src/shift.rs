// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift ("employee type") timelines.

use shiftboard_domain::{EmployeeTypeId, PatternId};
use time::Date;

use crate::timeline::{TimelineVersion, active_on, current_version};

/// The versioned fields of a shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftFields {
    pub name: String,
    pub pattern_id: Option<PatternId>,
}

impl ShiftFields {
    /// Creates shift fields.
    #[must_use]
    pub const fn new(name: String, pattern_id: Option<PatternId>) -> Self {
        Self { name, pattern_id }
    }

    /// The same shift with no pattern ("Unassigned").
    #[must_use]
    pub fn unassigned(&self) -> Self {
        Self {
            name: self.name.clone(),
            pattern_id: None,
        }
    }
}

/// One dated version of a shift.
pub type ShiftVersion = TimelineVersion<ShiftFields>;

/// The denormalized current row of a shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftRecord {
    pub employee_type_id: EmployeeTypeId,
    pub display_order: i64,
    pub name: String,
    pub pattern_id: Option<PatternId>,
    pub start_date: Date,
}

impl ShiftRecord {
    /// The row viewed as a single open version.
    ///
    /// Used when the store does not keep shift history.
    #[must_use]
    pub fn as_open_version(&self) -> ShiftVersion {
        TimelineVersion::new(
            self.start_date,
            None,
            ShiftFields::new(self.name.clone(), self.pattern_id),
        )
    }

    /// Copies the projected fields from `version` into the row.
    pub fn refresh_from(&mut self, version: &ShiftVersion) {
        self.name.clone_from(&version.fields.name);
        self.pattern_id = version.fields.pattern_id;
        self.start_date = version.start_date;
    }

    /// The row as seen on `as_of`: fields of the version active that day,
    /// falling back to the row itself.
    #[must_use]
    pub fn as_of(&self, versions: &[ShiftVersion], as_of: Date) -> Self {
        let mut view: Self = self.clone();
        if let Some(version) = active_on(versions, as_of) {
            view.refresh_from(version);
        }
        view
    }
}

/// Returns the version the denormalized row should mirror after a change.
#[must_use]
pub fn projection_source(versions: &[ShiftVersion], today: Date) -> Option<&ShiftVersion> {
    current_version(versions, today)
}
