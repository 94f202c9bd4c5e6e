// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Layering of calendar events onto a single day cell.
//!
//! Each display mode resolves independently. Override and badge events must
//! match the cell's own scope type; overlay events match any cell their scope
//! reaches (global everywhere, shift by employee type, user by object id).
//! Within a mode only the most specific scope present is rendered
//! (user > shift > global), ordered by ascending event id.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::error::DomainError;
use crate::types::{EmployeeTypeId, EventId, HexColor, UserOid};

/// Alpha applied to overlay colours.
pub const OVERLAY_ALPHA: f64 = 0.33;

/// Scope type of an event or a calendar cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventScopeType {
    Global,
    Shift,
    User,
}

impl EventScopeType {
    /// Specificity rank: user = 3, shift = 2, global = 1.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::User => 3,
            Self::Shift => 2,
            Self::Global => 1,
        }
    }

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Shift => "shift",
            Self::User => "user",
        }
    }

    /// Parses a wire name case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown scope names.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(Self::Global),
            "shift" => Ok(Self::Shift),
            "user" => Ok(Self::User),
            _ => Err(DomainError::InvalidEventScope(format!(
                "unknown scope type '{value}'"
            ))),
        }
    }
}

/// What an event is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventScope {
    /// Every cell in the schedule.
    Global,
    /// One shift.
    Shift(EmployeeTypeId),
    /// One user.
    User(UserOid),
}

impl EventScope {
    /// Builds a scope from its flat representation.
    ///
    /// Exactly the field matching `scope_type` must be set.
    ///
    /// # Errors
    ///
    /// Returns an error if the fields do not match the scope type.
    pub fn from_parts(
        scope_type: EventScopeType,
        employee_type_id: Option<EmployeeTypeId>,
        user_oid: Option<UserOid>,
    ) -> Result<Self, DomainError> {
        match (scope_type, employee_type_id, user_oid) {
            (EventScopeType::Global, None, None) => Ok(Self::Global),
            (EventScopeType::Shift, Some(id), None) => Ok(Self::Shift(id)),
            (EventScopeType::User, None, Some(oid)) => Ok(Self::User(oid)),
            (EventScopeType::Global, _, _) => Err(DomainError::InvalidEventScope(
                String::from("global events cannot target a shift or user"),
            )),
            (EventScopeType::Shift, _, _) => Err(DomainError::InvalidEventScope(String::from(
                "shift events need a shift and no user",
            ))),
            (EventScopeType::User, _, _) => Err(DomainError::InvalidEventScope(String::from(
                "user events need a user and no shift",
            ))),
        }
    }

    /// Derives the scope from stored columns: user first, then shift, else global.
    #[must_use]
    pub fn derive(employee_type_id: Option<EmployeeTypeId>, user_oid: Option<UserOid>) -> Self {
        match (user_oid, employee_type_id) {
            (Some(oid), _) => Self::User(oid),
            (None, Some(id)) => Self::Shift(id),
            (None, None) => Self::Global,
        }
    }

    /// Returns the scope type.
    #[must_use]
    pub const fn scope_type(&self) -> EventScopeType {
        match self {
            Self::Global => EventScopeType::Global,
            Self::Shift(_) => EventScopeType::Shift,
            Self::User(_) => EventScopeType::User,
        }
    }

    /// Returns the shift id for shift-scoped events.
    #[must_use]
    pub const fn employee_type_id(&self) -> Option<EmployeeTypeId> {
        match self {
            Self::Shift(id) => Some(*id),
            Self::Global | Self::User(_) => None,
        }
    }

    /// Returns the user for user-scoped events.
    #[must_use]
    pub const fn user_oid(&self) -> Option<&UserOid> {
        match self {
            Self::User(oid) => Some(oid),
            Self::Global | Self::Shift(_) => None,
        }
    }
}

/// How an event is drawn on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Translucent wash over the cell.
    #[serde(rename = "Schedule Overlay")]
    Overlay,
    /// Small marker on the cell.
    #[serde(rename = "Badge Indicator")]
    Badge,
    /// Replaces the cell's base colour.
    #[serde(rename = "Shift Override")]
    Override,
}

impl DisplayMode {
    /// Returns the display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overlay => "Schedule Overlay",
            Self::Badge => "Badge Indicator",
            Self::Override => "Shift Override",
        }
    }

    /// Parses a display label.
    ///
    /// # Errors
    ///
    /// Returns an error if the label is not one of the three display modes.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim() {
            "Schedule Overlay" => Ok(Self::Overlay),
            "Badge Indicator" => Ok(Self::Badge),
            "Shift Override" => Ok(Self::Override),
            _ => Err(DomainError::InvalidDisplayMode(value.to_string())),
        }
    }

    /// Parses a stored label, falling back to [`DisplayMode::Overlay`].
    #[must_use]
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value
            .and_then(|v| Self::parse(v).ok())
            .unwrap_or(Self::Overlay)
    }
}

/// A resolved event as seen by the compositor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEvent {
    pub event_id: EventId,
    pub scope: EventScope,
    pub start_date: Date,
    pub end_date: Date,
    pub display_mode: DisplayMode,
    pub color: HexColor,
}

impl ScheduleEvent {
    /// True if the event covers `day` (inclusive on both ends).
    #[must_use]
    pub fn covers(&self, day: Date) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}

/// The cell an event is being drawn into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellContext {
    pub scope_type: EventScopeType,
    pub employee_type_id: Option<EmployeeTypeId>,
    pub user_oid: Option<UserOid>,
}

impl CellContext {
    /// Context for a schedule-wide cell.
    #[must_use]
    pub const fn global() -> Self {
        Self {
            scope_type: EventScopeType::Global,
            employee_type_id: None,
            user_oid: None,
        }
    }

    /// Context for a shift header cell.
    #[must_use]
    pub const fn shift(employee_type_id: EmployeeTypeId) -> Self {
        Self {
            scope_type: EventScopeType::Shift,
            employee_type_id: Some(employee_type_id),
            user_oid: None,
        }
    }

    /// Context for a user's cell within a shift.
    #[must_use]
    pub const fn user(user_oid: UserOid, employee_type_id: Option<EmployeeTypeId>) -> Self {
        Self {
            scope_type: EventScopeType::User,
            employee_type_id,
            user_oid: Some(user_oid),
        }
    }

    /// Exact match used for override and badge events.
    fn matches_exact(&self, scope: &EventScope) -> bool {
        if scope.scope_type() != self.scope_type {
            return false;
        }
        match scope {
            EventScope::Global => true,
            EventScope::Shift(id) => self.employee_type_id == Some(*id),
            EventScope::User(oid) => self.user_oid.as_ref() == Some(oid),
        }
    }

    /// Relaxed match used for overlay events.
    fn matches_overlay(&self, scope: &EventScope) -> bool {
        match scope {
            EventScope::Global => true,
            EventScope::Shift(id) => self.employee_type_id == Some(*id),
            EventScope::User(oid) => self.user_oid.as_ref() == Some(oid),
        }
    }
}

/// Backgrounds produced for one cell. Each is a CSS colour or gradient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellEventVisuals {
    pub override_background: Option<String>,
    pub overlay_background: Option<String>,
    pub badge_background: Option<String>,
}

impl CellEventVisuals {
    /// True if no mode produced a background.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.override_background.is_none()
            && self.overlay_background.is_none()
            && self.badge_background.is_none()
    }
}

/// Composites every event covering `day` into the cell's backgrounds.
#[must_use]
pub fn resolve_cell_event_visuals(
    events: &[ScheduleEvent],
    day: Date,
    context: &CellContext,
) -> CellEventVisuals {
    let covering: Vec<&ScheduleEvent> = events.iter().filter(|e| e.covers(day)).collect();
    if covering.is_empty() {
        return CellEventVisuals::default();
    }

    let exact: Vec<&ScheduleEvent> = covering
        .iter()
        .copied()
        .filter(|e| context.matches_exact(&e.scope))
        .collect();
    let overlay: Vec<&ScheduleEvent> = covering
        .iter()
        .copied()
        .filter(|e| context.matches_overlay(&e.scope))
        .collect();

    CellEventVisuals {
        override_background: resolve_mode_background(&exact, DisplayMode::Override, None),
        overlay_background: resolve_mode_background(
            &overlay,
            DisplayMode::Overlay,
            Some(OVERLAY_ALPHA),
        ),
        badge_background: resolve_mode_background(&exact, DisplayMode::Badge, None),
    }
}

fn resolve_mode_background(
    events: &[&ScheduleEvent],
    mode: DisplayMode,
    alpha: Option<f64>,
) -> Option<String> {
    let mode_events: Vec<&ScheduleEvent> = events
        .iter()
        .copied()
        .filter(|e| e.display_mode == mode)
        .collect();
    let best_rank: u8 = mode_events
        .iter()
        .map(|e| e.scope.scope_type().rank())
        .max()?;

    let mut winners: Vec<&ScheduleEvent> = mode_events
        .into_iter()
        .filter(|e| e.scope.scope_type().rank() == best_rank)
        .collect();
    winners.sort_by_key(|e| e.event_id);

    let colors: Vec<String> = winners
        .iter()
        .map(|e| match alpha {
            Some(alpha) => to_rgba(&e.color, alpha),
            None => e.color.as_str().to_string(),
        })
        .collect();
    Some(linear_gradient(&colors))
}

/// `rgba(r, g, b, a)` with alpha clamped to `0..=1` and two decimals.
#[must_use]
pub fn to_rgba(color: &HexColor, alpha: f64) -> String {
    let (r, g, b) = color.rgb();
    format!("rgba({r}, {g}, {b}, {:.2})", alpha.clamp(0.0, 1.0))
}

/// One colour as-is, two as a 135 degree two-stop gradient, more as evenly
/// spaced stops rounded to whole percentages.
#[must_use]
pub fn linear_gradient(colors: &[String]) -> String {
    match colors {
        [] => String::from(HexColor::DEFAULT_EVENT),
        [single] => single.clone(),
        [first, second] => format!("linear-gradient(135deg, {first} 0%, {second} 100%)"),
        _ => {
            let last: usize = colors.len() - 1;
            let stops: Vec<String> = colors
                .iter()
                .enumerate()
                .map(|(i, color)| {
                    let stop: usize = (i * 200 + last) / (2 * last);
                    format!("{color} {stop}%")
                })
                .collect();
            format!("linear-gradient(135deg, {})", stops.join(", "))
        }
    }
}
