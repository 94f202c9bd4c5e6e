// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Run detection and rotation prediction.
//!
//! Users seed a swatch with a couple of example cycles. Selected days are
//! grouped into maximal consecutive runs; every adjacent pair of runs
//! proposes an on/off cycle anchored at the start of the second run. A
//! candidate survives only if its predicted on-set covers every selected
//! day, and the surviving candidate built from the most evidence wins.
//! Fewer than two runs never yields a prediction.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::PATTERN_CYCLE_DAYS;

/// A maximal run of consecutive selected days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRun {
    /// First day of the run.
    pub start: u8,
    /// Last day of the run (inclusive).
    pub end: u8,
}

impl DayRun {
    /// Number of days in the run.
    #[must_use]
    pub const fn length(self) -> u8 {
        self.end - self.start + 1
    }
}

/// An inferred repeating on/off rotation for one swatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    on_days: u8,
    off_days: u8,
    anchor: u8,
    predicted_on: BTreeSet<u8>,
}

impl Prediction {
    /// Consecutive on days per cycle.
    #[must_use]
    pub const fn on_days(&self) -> u8 {
        self.on_days
    }

    /// Consecutive off days per cycle.
    #[must_use]
    pub const fn off_days(&self) -> u8 {
        self.off_days
    }

    /// Cycle day at which an on block starts.
    #[must_use]
    pub const fn anchor(&self) -> u8 {
        self.anchor
    }

    /// `on_days + off_days`.
    #[must_use]
    pub const fn cycle_length(&self) -> u8 {
        self.on_days + self.off_days
    }

    /// Predicted on days within the 28-day editor cycle.
    #[must_use]
    pub const fn predicted_on(&self) -> &BTreeSet<u8> {
        &self.predicted_on
    }

    /// Evaluates the rotation at an absolute day number.
    ///
    /// The day is not wrapped to the editor cycle, so the rotation extends
    /// indefinitely in both directions.
    #[must_use]
    pub fn is_on(&self, day: i64) -> bool {
        cycle_position(day, self.anchor, self.cycle_length()) < i64::from(self.on_days)
    }
}

/// Groups sorted days into maximal consecutive runs.
#[must_use]
pub fn find_runs(days: &BTreeSet<u8>) -> Vec<DayRun> {
    let mut runs: Vec<DayRun> = Vec::new();
    for &day in days {
        match runs.last_mut() {
            Some(run) if run.end + 1 == day => run.end = day,
            _ => runs.push(DayRun {
                start: day,
                end: day,
            }),
        }
    }
    runs
}

/// Infers a repeating rotation from a swatch's selected days.
///
/// Returns `None` when fewer than two runs exist or no candidate is
/// consistent with every selected day. Ties on evidence go to the first
/// adjacent pair scanned.
#[must_use]
pub fn predict(on_days: &BTreeSet<u8>) -> Option<Prediction> {
    let runs: Vec<DayRun> = find_runs(on_days);
    if runs.len() < 2 {
        return None;
    }

    let mut best: Option<(u8, Prediction)> = None;
    for pair in runs.windows(2) {
        let (first, second) = (pair[0], pair[1]);
        let off_days: u8 = second.start - first.end - 1;
        if off_days == 0 {
            continue;
        }
        let on_length: u8 = first.length().max(second.length());
        let anchor: u8 = second.start;
        let cycle_length: u8 = on_length + off_days;

        let predicted_on: BTreeSet<u8> = (1..=PATTERN_CYCLE_DAYS)
            .filter(|day| cycle_position(i64::from(*day), anchor, cycle_length) < i64::from(on_length))
            .collect();
        if !on_days.is_subset(&predicted_on) {
            continue;
        }

        let score: u8 = first.length() + second.length();
        if best.as_ref().is_none_or(|(best_score, _)| score > *best_score) {
            best = Some((
                score,
                Prediction {
                    on_days: on_length,
                    off_days,
                    anchor,
                    predicted_on,
                },
            ));
        }
    }

    best.map(|(_, prediction)| prediction)
}

/// `((day - anchor) mod L + L) mod L`.
fn cycle_position(day: i64, anchor: u8, cycle_length: u8) -> i64 {
    (day - i64::from(anchor)).rem_euclid(i64::from(cycle_length))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn days(values: &[u8]) -> BTreeSet<u8> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_find_runs_groups_consecutive_days() {
        let runs: Vec<DayRun> = find_runs(&days(&[1, 2, 3, 7, 9, 10]));
        assert_eq!(
            runs,
            vec![
                DayRun { start: 1, end: 3 },
                DayRun { start: 7, end: 7 },
                DayRun { start: 9, end: 10 },
            ]
        );
    }

    #[test]
    fn test_find_runs_empty() {
        assert!(find_runs(&BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_predict_four_on_four_off() {
        let prediction: Prediction = predict(&days(&[1, 2, 3, 4, 9, 10, 11, 12])).unwrap();
        assert_eq!(prediction.on_days(), 4);
        assert_eq!(prediction.off_days(), 4);
        assert_eq!(prediction.anchor(), 9);
        assert_eq!(
            prediction.predicted_on(),
            &days(&[1, 2, 3, 4, 9, 10, 11, 12, 17, 18, 19, 20, 25, 26, 27, 28])
        );
    }

    #[test]
    fn test_predict_single_run_refuses() {
        assert!(predict(&days(&[5, 6, 7])).is_none());
    }

    #[test]
    fn test_predict_empty_refuses() {
        assert!(predict(&BTreeSet::new()).is_none());
    }

    #[test]
    fn test_predict_uses_longer_run_as_on_length() {
        // Runs of 2 and 3 separated by 2 off days: 3 on / 2 off anchored at 5.
        let prediction: Prediction = predict(&days(&[1, 2, 5, 6, 7])).unwrap();
        assert_eq!(prediction.on_days(), 3);
        assert_eq!(prediction.off_days(), 2);
        assert_eq!(prediction.anchor(), 5);
        assert!(prediction.predicted_on().contains(&1));
        assert!(prediction.predicted_on().contains(&2));
    }

    #[test]
    fn test_predict_discards_inconsistent_candidates() {
        // (1..2, 4..5) proposes 2 on / 1 off, which misses day 9.
        // (4..5, 9) proposes 2 on / 3 off, which misses day 1.
        assert!(predict(&days(&[1, 2, 4, 5, 9])).is_none());
    }

    #[test]
    fn test_predict_keeps_candidate_covering_all_runs() {
        // (1..2, 4..5) proposes 2 on / 1 off and also covers 10..11.
        let prediction: Prediction = predict(&days(&[1, 2, 4, 5, 10, 11])).unwrap();
        assert_eq!(prediction.on_days(), 2);
        assert_eq!(prediction.off_days(), 1);
        assert_eq!(prediction.anchor(), 4);
    }

    #[test]
    fn test_predict_prefers_most_evidence() {
        // (3..4, 9..12) scores 6 and (9..12, 17..20) scores 8. Both describe
        // 4 on / 4 off with the same phase; the later pair wins on evidence.
        let prediction: Prediction =
            predict(&days(&[3, 4, 9, 10, 11, 12, 17, 18, 19, 20])).unwrap();
        assert_eq!(prediction.on_days(), 4);
        assert_eq!(prediction.off_days(), 4);
        assert_eq!(prediction.anchor(), 17);
    }

    #[test]
    fn test_predict_ties_go_to_first_pair() {
        let prediction: Prediction = predict(&days(&[1, 2, 5, 6, 9, 10])).unwrap();
        assert_eq!(prediction.anchor(), 5);
        assert_eq!(prediction.on_days(), 2);
        assert_eq!(prediction.off_days(), 2);
    }

    #[test]
    fn test_is_on_extends_beyond_cycle() {
        let prediction: Prediction = predict(&days(&[1, 2, 3, 4, 9, 10, 11, 12])).unwrap();
        assert!(prediction.is_on(20));
        assert!(!prediction.is_on(21));
        assert!(prediction.is_on(33));
        assert!(!prediction.is_on(37));
        assert!(prediction.is_on(41));
    }
}
