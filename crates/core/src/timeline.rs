// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Effective-dated timelines.
//!
//! A timeline is an ordered, non-overlapping sequence of versions keyed by
//! start date. Each version is closed (`end_date` set) or open-ended.
//!
//! Applying a change effective on date `D`:
//!
//! 1. A version with `start < D` that still covers `D` is closed at `D - 1`
//! 2. A version starting exactly on `D` is overwritten in place
//! 3. Otherwise a new version is inserted at `D`
//!
//! In both 2 and 3 the resulting version ends the day before the next later
//! version starts, or stays open when none exists. Planning is pure; the
//! store executes the resulting steps inside one transaction.

use shiftboard_domain::{DomainError, add_days};
use time::Date;

use crate::error::CoreError;

/// One dated version of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineVersion<F> {
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub fields: F,
}

impl<F> TimelineVersion<F> {
    /// Creates a version.
    #[must_use]
    pub const fn new(start_date: Date, end_date: Option<Date>, fields: F) -> Self {
        Self {
            start_date,
            end_date,
            fields,
        }
    }

    /// True if `day` lies within `[start_date, end_date]`.
    #[must_use]
    pub fn contains(&self, day: Date) -> bool {
        self.start_date <= day && self.end_date.is_none_or(|end| end >= day)
    }

    /// True if the version has no end date.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.end_date.is_none()
    }

    /// True if the version intersects `[start, end]`.
    #[must_use]
    pub fn overlaps(&self, start: Date, end: Date) -> bool {
        self.start_date <= end && self.end_date.is_none_or(|e| e >= start)
    }
}

/// One store operation produced by planning a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineStep<F> {
    /// Set the end date of the version starting on `start_date`.
    Close { start_date: Date, end_date: Date },
    /// Replace the fields and end date of the version starting on `start_date`.
    Overwrite {
        start_date: Date,
        end_date: Option<Date>,
        fields: F,
    },
    /// Add a new version.
    Insert {
        start_date: Date,
        end_date: Option<Date>,
        fields: F,
    },
}

/// The ordered steps that apply one change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelinePlan<F> {
    pub effective_date: Date,
    pub steps: Vec<TimelineStep<F>>,
}

impl<F> TimelinePlan<F> {
    /// True if the plan splits an existing version.
    #[must_use]
    pub fn closes_version(&self) -> bool {
        self.steps
            .iter()
            .any(|step| matches!(step, TimelineStep::Close { .. }))
    }
}

/// Plans a change of `fields` effective on `effective_date`.
///
/// # Errors
///
/// Returns an error if date arithmetic overflows.
pub fn plan_change<F: Clone>(
    versions: &[TimelineVersion<F>],
    effective_date: Date,
    fields: F,
) -> Result<TimelinePlan<F>, CoreError> {
    let mut steps: Vec<TimelineStep<F>> = Vec::new();

    let containing: Option<&TimelineVersion<F>> = versions
        .iter()
        .filter(|v| v.start_date < effective_date && v.contains(effective_date))
        .max_by_key(|v| v.start_date);
    if let Some(version) = containing {
        steps.push(TimelineStep::Close {
            start_date: version.start_date,
            end_date: add_days(effective_date, -1)?,
        });
    }

    let end_date: Option<Date> = end_before_next(versions, effective_date)?;

    if versions.iter().any(|v| v.start_date == effective_date) {
        steps.push(TimelineStep::Overwrite {
            start_date: effective_date,
            end_date,
            fields,
        });
    } else {
        steps.push(TimelineStep::Insert {
            start_date: effective_date,
            end_date,
            fields,
        });
    }

    Ok(TimelinePlan {
        effective_date,
        steps,
    })
}

/// Applies a plan to an in-memory timeline, returning versions sorted by start.
#[must_use]
pub fn apply_plan<F: Clone>(
    versions: &[TimelineVersion<F>],
    plan: &TimelinePlan<F>,
) -> Vec<TimelineVersion<F>> {
    let mut next: Vec<TimelineVersion<F>> = versions.to_vec();
    for step in &plan.steps {
        match step {
            TimelineStep::Close {
                start_date,
                end_date,
            } => {
                if let Some(version) = next.iter_mut().find(|v| v.start_date == *start_date) {
                    version.end_date = Some(*end_date);
                }
            }
            TimelineStep::Overwrite {
                start_date,
                end_date,
                fields,
            } => {
                if let Some(version) = next.iter_mut().find(|v| v.start_date == *start_date) {
                    version.end_date = *end_date;
                    version.fields = fields.clone();
                }
            }
            TimelineStep::Insert {
                start_date,
                end_date,
                fields,
            } => next.push(TimelineVersion::new(*start_date, *end_date, fields.clone())),
        }
    }
    next.sort_by_key(|v| v.start_date);
    next
}

/// Returns the version covering `day`. Later starts win if data overlaps.
#[must_use]
pub fn active_on<F>(versions: &[TimelineVersion<F>], day: Date) -> Option<&TimelineVersion<F>> {
    versions
        .iter()
        .filter(|v| v.contains(day))
        .max_by_key(|v| v.start_date)
}

/// Returns the version backing the denormalized current projection.
///
/// This is the version active on `today`, or the latest version by start
/// date when nothing covers today (retired or not yet started).
#[must_use]
pub fn current_version<F>(versions: &[TimelineVersion<F>], today: Date) -> Option<&TimelineVersion<F>> {
    active_on(versions, today).or_else(|| versions.iter().max_by_key(|v| v.start_date))
}

/// Checks that versions are well formed, disjoint and have at most one open end.
///
/// # Errors
///
/// Returns an error describing the first violation found.
pub fn validate_timeline<F>(versions: &[TimelineVersion<F>]) -> Result<(), CoreError> {
    let mut sorted: Vec<&TimelineVersion<F>> = versions.iter().collect();
    sorted.sort_by_key(|v| v.start_date);

    for version in &sorted {
        if version.end_date.is_some_and(|end| end < version.start_date) {
            return Err(CoreError::InvertedVersion {
                start_date: version.start_date,
            });
        }
    }

    for pair in sorted.windows(2) {
        let (first, second) = (pair[0], pair[1]);
        if first.end_date.is_none_or(|end| end >= second.start_date) {
            return Err(CoreError::OverlappingVersions {
                first_start: first.start_date,
                second_start: second.start_date,
            });
        }
    }

    let open: usize = sorted.iter().filter(|v| v.is_open()).count();
    if open > 1 {
        return Err(CoreError::MultipleOpenVersions { count: open });
    }
    Ok(())
}

/// End date for a version starting on `start`: the day before the next
/// later version starts, or `None` when no later version exists.
///
/// # Errors
///
/// Returns an error if date arithmetic overflows.
pub fn end_before_next<F>(
    versions: &[TimelineVersion<F>],
    start: Date,
) -> Result<Option<Date>, DomainError> {
    versions
        .iter()
        .map(|v| v.start_date)
        .filter(|s| *s > start)
        .min()
        .map(|next| add_days(next, -1))
        .transpose()
}
