// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Projection of a pattern onto absolute day numbers.
//!
//! Day 1 is the start date of the shift version using the pattern. Resolution
//! order for a day:
//!
//! 1. Any swatch whose prediction is on at the absolute day (lowest index wins)
//! 2. Beyond day 28, when the pattern has any prediction: off
//! 3. The cycle day (`((day - 1) mod 28) + 1`): no-shift days are off,
//!    explicitly selected days use their owning swatch's colour
//! 4. The precomputed cycle-day table of predicted owners

use std::collections::BTreeMap;

use crate::pattern::{Pattern, StoredPattern};
use crate::prediction::{Prediction, predict};
use crate::types::{HexColor, PATTERN_CYCLE_DAYS};

/// A pattern with its per-swatch predictions computed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPattern {
    pattern: Pattern,
    predictions: Vec<Option<Prediction>>,
    day_color_by_cycle_day: BTreeMap<u8, HexColor>,
}

impl ResolvedPattern {
    /// Computes predictions and the cycle-day fallback table for `pattern`.
    #[must_use]
    pub fn new(pattern: Pattern) -> Self {
        let predictions: Vec<Option<Prediction>> = pattern
            .swatches()
            .iter()
            .map(|swatch| predict(swatch.on_days()))
            .collect();

        let mut day_color_by_cycle_day: BTreeMap<u8, HexColor> = BTreeMap::new();
        for (swatch, prediction) in pattern.swatches().iter().zip(&predictions) {
            let Some(prediction) = prediction else {
                continue;
            };
            for day in prediction.predicted_on() {
                day_color_by_cycle_day
                    .entry(*day)
                    .or_insert_with(|| swatch.color().clone());
            }
        }

        Self {
            pattern,
            predictions,
            day_color_by_cycle_day,
        }
    }

    /// Resolves a stored pattern. Corrupt payloads resolve to an empty pattern.
    #[must_use]
    pub fn from_stored(stored: StoredPattern) -> Self {
        Self::new(stored.into_pattern_or_empty())
    }

    /// Returns the underlying pattern.
    #[must_use]
    pub const fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Returns the prediction for each swatch, aligned with `pattern().swatches()`.
    #[must_use]
    pub fn predictions(&self) -> &[Option<Prediction>] {
        &self.predictions
    }

    /// Returns true if at least one swatch has a prediction.
    #[must_use]
    pub fn has_prediction(&self) -> bool {
        self.predictions.iter().any(Option::is_some)
    }

    /// Returns the colour for an absolute day number, or `None` for no shift.
    ///
    /// Day numbers below 1 precede the version start and never have a shift.
    #[must_use]
    pub fn color_for_day(&self, day: i64) -> Option<&HexColor> {
        if day < 1 {
            return None;
        }

        let predicted_owner = self
            .pattern
            .swatches()
            .iter()
            .zip(&self.predictions)
            .find(|(_, prediction)| prediction.as_ref().is_some_and(|p| p.is_on(day)));
        if let Some((swatch, _)) = predicted_owner {
            return Some(swatch.color());
        }

        if day > i64::from(PATTERN_CYCLE_DAYS) && self.has_prediction() {
            return None;
        }

        let cycle_day: u8 = cycle_day(day);
        if self.pattern.no_shift_days().contains(&cycle_day) {
            return None;
        }
        if let Some(owner) = self.pattern.explicit_owner(cycle_day) {
            return Some(owner.color());
        }

        self.day_color_by_cycle_day.get(&cycle_day)
    }
}

/// Convenience wrapper resolving a single day of `pattern`.
#[must_use]
pub fn color_for_pattern_day(pattern: &Pattern, day: i64) -> Option<HexColor> {
    ResolvedPattern::new(pattern.clone())
        .color_for_day(day)
        .cloned()
}

/// Maps an absolute day number (>= 1) into the editor cycle `1..=28`.
fn cycle_day(day: i64) -> u8 {
    let cycle: i64 = i64::from(PATTERN_CYCLE_DAYS);
    // rem_euclid keeps the value in 0..28, so the conversion cannot fail.
    u8::try_from((day - 1).rem_euclid(cycle) + 1).unwrap_or(1)
}
