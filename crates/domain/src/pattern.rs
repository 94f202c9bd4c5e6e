// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rotation pattern parsing and validation.
//!
//! A pattern is edited as up to four colour swatches over a 28-day cycle
//! plus a set of explicit "no shift" days. The same validator runs on the
//! write path (rejecting bad input) and on the read path, where persisted
//! payloads that fail validation degrade to [`StoredPattern::Corrupt`].
//!
//! ## Invariants
//!
//! - Swatch indexes are unique and contiguous from 0
//! - Every day lies in `1..=28`
//! - No-shift days never overlap any swatch's on days
//! - Day sets are deduplicated and sorted; swatches are sorted by index

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::types::{HexColor, MAX_SWATCHES, PATTERN_CYCLE_DAYS};

/// Code stored on the no-shift pseudo swatch.
const NONE_SWATCH_CODE: &str = "NONE";

/// Raw swatch as received from the editor or read from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwatchInput {
    pub swatch_index: i64,
    pub color: String,
    #[serde(default)]
    pub on_days: Vec<i64>,
}

/// Raw pattern in editor shape: `{swatches, noShiftDays}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternInput {
    #[serde(default)]
    pub swatches: Vec<SwatchInput>,
    #[serde(default)]
    pub no_shift_days: Vec<i64>,
}

/// The no-shift pseudo swatch in the persisted payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoneSwatchPayload {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub on_days: Vec<i64>,
}

/// Persisted pattern payload: `{swatches, noneSwatch: {code, onDays}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternPayload {
    #[serde(default)]
    pub swatches: Vec<SwatchInput>,
    #[serde(default)]
    pub none_swatch: Option<NoneSwatchPayload>,
}

/// One validated colour swatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Swatch {
    #[serde(rename = "swatchIndex")]
    index: u8,
    color: HexColor,
    on_days: BTreeSet<u8>,
}

impl Swatch {
    /// Returns the swatch index (`0..=3`).
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.index
    }

    /// Returns the swatch colour.
    #[must_use]
    pub const fn color(&self) -> &HexColor {
        &self.color
    }

    /// Returns the explicitly selected cycle days.
    #[must_use]
    pub const fn on_days(&self) -> &BTreeSet<u8> {
        &self.on_days
    }
}

/// A validated, canonical rotation pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    swatches: Vec<Swatch>,
    no_shift_days: BTreeSet<u8>,
}

impl Pattern {
    /// Validates editor input into a canonical pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if there are more than four swatches, indexes are
    /// out of range, duplicated or not contiguous, a colour is not `#RRGGBB`,
    /// any day lies outside `1..=28`, or a no-shift day overlaps an on day.
    pub fn from_input(input: &PatternInput) -> Result<Self, DomainError> {
        if input.swatches.len() > MAX_SWATCHES {
            return Err(DomainError::TooManySwatches {
                count: input.swatches.len(),
            });
        }

        let mut swatches: Vec<Swatch> = Vec::with_capacity(input.swatches.len());
        for (position, raw) in input.swatches.iter().enumerate() {
            let index: u8 = u8::try_from(raw.swatch_index)
                .ok()
                .filter(|i| usize::from(*i) < MAX_SWATCHES)
                .ok_or(DomainError::InvalidSwatchIndex {
                    position: position + 1,
                    index: raw.swatch_index,
                })?;
            if swatches.iter().any(|s| s.index == index) {
                return Err(DomainError::DuplicateSwatchIndex { index });
            }
            swatches.push(Swatch {
                index,
                color: HexColor::parse(&raw.color)?,
                on_days: parse_cycle_days(&raw.on_days)?,
            });
        }
        swatches.sort_by_key(|s| s.index);
        if swatches
            .iter()
            .enumerate()
            .any(|(expected, s)| usize::from(s.index) != expected)
        {
            return Err(DomainError::NonContiguousSwatchIndexes);
        }

        let no_shift_days: BTreeSet<u8> = parse_cycle_days(&input.no_shift_days)?;
        for swatch in &swatches {
            if let Some(day) = swatch.on_days.intersection(&no_shift_days).next() {
                return Err(DomainError::NoShiftDayOverlap { day: *day });
            }
        }

        Ok(Self {
            swatches,
            no_shift_days,
        })
    }

    /// Validates a persisted payload.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Pattern::from_input`].
    pub fn from_payload(payload: &PatternPayload) -> Result<Self, DomainError> {
        Self::from_input(&PatternInput {
            swatches: payload.swatches.clone(),
            no_shift_days: payload
                .none_swatch
                .as_ref()
                .map(|none| none.on_days.clone())
                .unwrap_or_default(),
        })
    }

    /// Returns the swatches, sorted by index.
    #[must_use]
    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    /// Returns the explicit no-shift days.
    #[must_use]
    pub const fn no_shift_days(&self) -> &BTreeSet<u8> {
        &self.no_shift_days
    }

    /// Total number of selected on days across every swatch.
    #[must_use]
    pub fn selected_day_count(&self) -> usize {
        self.swatches.iter().map(|s| s.on_days.len()).sum()
    }

    /// Returns the first swatch (by ascending index) that explicitly selects `cycle_day`.
    #[must_use]
    pub fn explicit_owner(&self, cycle_day: u8) -> Option<&Swatch> {
        self.swatches.iter().find(|s| s.on_days.contains(&cycle_day))
    }

    /// Returns the editor-shape input for this pattern.
    #[must_use]
    pub fn to_input(&self) -> PatternInput {
        PatternInput {
            swatches: self.swatch_inputs(),
            no_shift_days: self.no_shift_days.iter().map(|d| i64::from(*d)).collect(),
        }
    }

    /// Returns the persisted payload for this pattern.
    #[must_use]
    pub fn to_payload(&self) -> PatternPayload {
        PatternPayload {
            swatches: self.swatch_inputs(),
            none_swatch: Some(NoneSwatchPayload {
                code: Some(NONE_SWATCH_CODE.to_string()),
                on_days: self.no_shift_days.iter().map(|d| i64::from(*d)).collect(),
            }),
        }
    }

    fn swatch_inputs(&self) -> Vec<SwatchInput> {
        self.swatches
            .iter()
            .map(|s| SwatchInput {
                swatch_index: i64::from(s.index),
                color: s.color.as_str().to_string(),
                on_days: s.on_days.iter().map(|d| i64::from(*d)).collect(),
            })
            .collect()
    }
}

/// A pattern as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredPattern {
    /// The payload parsed and validated.
    Valid(Pattern),
    /// The payload was unreadable or failed validation.
    Corrupt,
}

impl StoredPattern {
    /// Parses a persisted JSON payload. Never fails.
    #[must_use]
    pub fn parse(json: &str) -> Self {
        serde_json::from_str::<PatternPayload>(json)
            .ok()
            .and_then(|payload| Pattern::from_payload(&payload).ok())
            .map_or(Self::Corrupt, Self::Valid)
    }

    /// Returns the validated pattern, if any.
    #[must_use]
    pub const fn pattern(&self) -> Option<&Pattern> {
        match self {
            Self::Valid(pattern) => Some(pattern),
            Self::Corrupt => None,
        }
    }

    /// Returns the pattern, or an empty pattern when corrupt.
    #[must_use]
    pub fn into_pattern_or_empty(self) -> Pattern {
        match self {
            Self::Valid(pattern) => pattern,
            Self::Corrupt => Pattern::default(),
        }
    }
}

fn parse_cycle_days(days: &[i64]) -> Result<BTreeSet<u8>, DomainError> {
    days.iter()
        .map(|day| {
            u8::try_from(*day)
                .ok()
                .filter(|d| (1..=PATTERN_CYCLE_DAYS).contains(d))
                .ok_or(DomainError::DayOutOfRange { day: *day })
        })
        .collect()
}
