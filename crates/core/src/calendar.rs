// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Month view composition.
//!
//! Combines shift timelines, patterns, assignments and events into the
//! per-group, per-employee day colours and event backgrounds of one month.

use std::collections::{BTreeMap, HashSet};

use shiftboard_domain::{
    CellContext, CellEventVisuals, CoverageCodeId, DisplayMode, EmployeeTypeId, EventId,
    EventScope, HexColor, MonthRange, PatternId, ResolvedPattern, ScheduleEvent, ScheduleRole,
    StoreCapabilities, StoredPattern, UserOid, day_number, resolve_cell_event_visuals,
};
use time::Date;
use tracing::warn;

use crate::assignment::AssignmentRecord;
use crate::shift::{ShiftRecord, ShiftVersion};
use crate::timeline::active_on;

/// Profile of a schedule member used for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberProfile {
    pub display_name: Option<String>,
    pub role: ScheduleRole,
}

/// A stored event joined with its coverage code, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub event_id: EventId,
    pub employee_type_id: Option<EmployeeTypeId>,
    pub user_oid: Option<UserOid>,
    pub start_date: Date,
    pub end_date: Date,
    pub coverage_code_id: Option<CoverageCodeId>,
    pub coverage_display_mode: Option<String>,
    pub coverage_color: Option<String>,
    pub custom_display_mode: Option<String>,
    pub custom_color: Option<String>,
}

impl EventRecord {
    /// Resolves scope, display mode and colour.
    ///
    /// A linked coverage code supplies mode and colour; otherwise the custom
    /// values do. Missing or invalid values fall back to overlay mode and the
    /// default event colour.
    #[must_use]
    pub fn resolve(&self, capabilities: StoreCapabilities) -> ScheduleEvent {
        let employee_type_id: Option<EmployeeTypeId> = self
            .employee_type_id
            .filter(|_| capabilities.supports_event_scoping);
        let (mode, color): (Option<&str>, Option<&str>) = if self.coverage_code_id.is_some() {
            (
                self.coverage_display_mode.as_deref(),
                self.coverage_color.as_deref(),
            )
        } else if capabilities.supports_custom_event_colors {
            (
                self.custom_display_mode.as_deref(),
                self.custom_color.as_deref(),
            )
        } else {
            (None, None)
        };

        ScheduleEvent {
            event_id: self.event_id,
            scope: EventScope::derive(employee_type_id, self.user_oid.clone()),
            start_date: self.start_date,
            end_date: self.end_date,
            display_mode: DisplayMode::parse_or_default(mode),
            color: HexColor::parse_or_default(color),
        }
    }
}

/// Everything needed to render one month.
#[derive(Debug, Clone, Default)]
pub struct MonthInputs {
    /// Active shifts of the schedule.
    pub shifts: Vec<ShiftRecord>,
    /// Shift versions keyed by shift. Ignored without versioning support.
    pub versions: BTreeMap<EmployeeTypeId, Vec<ShiftVersion>>,
    /// Stored patterns referenced by any version.
    pub patterns: BTreeMap<PatternId, StoredPattern>,
    /// Assignment rows overlapping the month.
    pub assignments: Vec<AssignmentRecord>,
    /// Member profiles keyed by user.
    pub members: BTreeMap<UserOid, MemberProfile>,
    /// Events overlapping the month.
    pub events: Vec<EventRecord>,
}

/// One employee row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthEmployee {
    pub user_oid: UserOid,
    pub name: String,
    pub role: ScheduleRole,
    /// Colour per day of month; days without a shift are absent.
    pub day_colors: BTreeMap<u8, HexColor>,
    /// Event backgrounds per day of month for this user's cells.
    pub day_visuals: BTreeMap<u8, CellEventVisuals>,
}

/// One shift section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGroup {
    pub employee_type_id: EmployeeTypeId,
    pub category: String,
    pub employees: Vec<MonthEmployee>,
    /// Event backgrounds per day of month for the shift header.
    pub day_visuals: BTreeMap<u8, CellEventVisuals>,
}

/// A rendered month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub range: MonthRange,
    pub groups: Vec<MonthGroup>,
    pub events: Vec<ScheduleEvent>,
}

/// Builds the month view.
///
/// # Arguments
///
/// * `range` - The month being rendered
/// * `inputs` - Rows loaded from the store
/// * `capabilities` - What the store supports
#[must_use]
pub fn build_month_view(
    range: MonthRange,
    inputs: &MonthInputs,
    capabilities: StoreCapabilities,
) -> MonthView {
    let timelines: BTreeMap<EmployeeTypeId, Vec<ShiftVersion>> =
        shift_timelines(range, inputs, capabilities);
    let patterns: BTreeMap<PatternId, ResolvedPattern> = resolve_patterns(&inputs.patterns);

    let mut events: Vec<ScheduleEvent> = inputs
        .events
        .iter()
        .filter(|e| e.start_date <= range.end && e.end_date >= range.start)
        .map(|e| e.resolve(capabilities))
        .collect();
    events.sort_by_key(|e| (e.start_date, e.end_date, e.event_id));

    let mut sections: Vec<(i64, String, EmployeeTypeId)> = Vec::new();
    for shift in &inputs.shifts {
        let Some(versions) = timelines.get(&shift.employee_type_id) else {
            continue;
        };
        sections.push((
            shift.display_order,
            section_name(shift, versions, range),
            shift.employee_type_id,
        ));
    }
    sections.sort();

    let groups: Vec<MonthGroup> = sections
        .into_iter()
        .map(|(_, category, employee_type_id)| {
            let versions: &[ShiftVersion] = timelines
                .get(&employee_type_id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            MonthGroup {
                employee_type_id,
                category,
                employees: employees_for(employee_type_id, versions, &patterns, range, inputs, &events),
                day_visuals: visuals_for(&events, range, &CellContext::shift(employee_type_id)),
            }
        })
        .collect();

    MonthView {
        range,
        groups,
        events,
    }
}

/// Shift timelines overlapping the month.
fn shift_timelines(
    range: MonthRange,
    inputs: &MonthInputs,
    capabilities: StoreCapabilities,
) -> BTreeMap<EmployeeTypeId, Vec<ShiftVersion>> {
    let mut timelines: BTreeMap<EmployeeTypeId, Vec<ShiftVersion>> = BTreeMap::new();
    for shift in &inputs.shifts {
        let versions: Vec<ShiftVersion> = if capabilities.supports_shift_versioning {
            inputs
                .versions
                .get(&shift.employee_type_id)
                .map(|all| {
                    all.iter()
                        .filter(|v| range.overlaps(v.start_date, v.end_date))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        } else {
            let version: ShiftVersion = shift.as_open_version();
            if version.start_date <= range.end {
                vec![version]
            } else {
                Vec::new()
            }
        };
        if !versions.is_empty() {
            timelines.insert(shift.employee_type_id, versions);
        }
    }
    timelines
}

fn resolve_patterns(
    stored: &BTreeMap<PatternId, StoredPattern>,
) -> BTreeMap<PatternId, ResolvedPattern> {
    stored
        .iter()
        .filter_map(|(id, pattern)| match pattern {
            StoredPattern::Valid(_) => Some((*id, ResolvedPattern::from_stored(pattern.clone()))),
            StoredPattern::Corrupt => {
                warn!(pattern_id = id.value(), "Skipping corrupt stored pattern");
                None
            }
        })
        .collect()
}

/// Section title: the version active at month end, else the latest version
/// in the window, else the row name.
fn section_name(shift: &ShiftRecord, versions: &[ShiftVersion], range: MonthRange) -> String {
    let name: &str = active_on(versions, range.end)
        .or_else(|| versions.iter().max_by_key(|v| v.start_date))
        .map_or(shift.name.as_str(), |v| v.fields.name.as_str());
    let trimmed: &str = name.trim();
    if trimmed.is_empty() {
        format!("Shift {}", shift.employee_type_id)
    } else {
        trimmed.to_string()
    }
}

fn employees_for(
    employee_type_id: EmployeeTypeId,
    versions: &[ShiftVersion],
    patterns: &BTreeMap<PatternId, ResolvedPattern>,
    range: MonthRange,
    inputs: &MonthInputs,
    events: &[ScheduleEvent],
) -> Vec<MonthEmployee> {
    let mut rows: Vec<&AssignmentRecord> = inputs
        .assignments
        .iter()
        .filter(|a| a.employee_type_id() == employee_type_id)
        .filter(|a| range.overlaps(a.version.start_date, a.version.end_date))
        .collect();
    rows.sort_by(|a, b| {
        a.display_order()
            .cmp(&b.display_order())
            .then_with(|| b.version.start_date.cmp(&a.version.start_date))
            .then_with(|| a.user_oid.cmp(&b.user_oid))
    });

    let mut employees: Vec<MonthEmployee> = Vec::new();
    let mut seen: HashSet<&UserOid> = HashSet::new();
    for row in &rows {
        if seen.insert(&row.user_oid) {
            let profile: Option<&MemberProfile> = inputs.members.get(&row.user_oid);
            let name: String = profile
                .and_then(|p| p.display_name.as_deref())
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map_or_else(|| row.user_oid.to_string(), str::to_string);
            employees.push(MonthEmployee {
                user_oid: row.user_oid.clone(),
                name,
                role: profile.map_or(ScheduleRole::Member, |p| p.role),
                day_colors: BTreeMap::new(),
                day_visuals: visuals_for(
                    events,
                    range,
                    &CellContext::user(row.user_oid.clone(), Some(employee_type_id)),
                ),
            });
        }
        let Some(employee) = employees.iter_mut().find(|e| e.user_oid == row.user_oid) else {
            continue;
        };
        paint_days(employee, row, versions, patterns, range);
    }
    employees
}

fn paint_days(
    employee: &mut MonthEmployee,
    row: &AssignmentRecord,
    versions: &[ShiftVersion],
    patterns: &BTreeMap<PatternId, ResolvedPattern>,
    range: MonthRange,
) {
    for day in range.days() {
        if !row.version.contains(day) {
            continue;
        }
        let Some(version) = active_on(versions, day) else {
            continue;
        };
        let Some(pattern) = version
            .fields
            .pattern_id
            .and_then(|id| patterns.get(&id))
        else {
            continue;
        };
        if let Some(color) = pattern.color_for_day(day_number(version.start_date, day)) {
            employee.day_colors.insert(day.day(), color.clone());
        }
    }
}

fn visuals_for(
    events: &[ScheduleEvent],
    range: MonthRange,
    context: &CellContext,
) -> BTreeMap<u8, CellEventVisuals> {
    range
        .days()
        .filter_map(|day| {
            let visuals: CellEventVisuals = resolve_cell_event_visuals(events, day, context);
            (!visuals.is_empty()).then_some((day.day(), visuals))
        })
        .collect()
}
