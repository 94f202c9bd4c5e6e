// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Human-readable pattern summaries for the pattern editor.

use std::collections::BTreeSet;

use crate::pattern::Pattern;
use crate::prediction::Prediction;
use crate::projection::ResolvedPattern;
use crate::types::PATTERN_CYCLE_DAYS;

/// Summary shown when swatch predictions fight over an unselected day.
pub const CONFLICTING_SCHEDULES: &str = "Conflicting schedules";

/// Shift count with an optional dominant on/off rhythm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RhythmSummary {
    shift_count: usize,
    on_off: Option<(usize, usize)>,
}

/// Builds the editor summary string for a pattern.
///
/// Formats: `"<N> shift(s) - <on> on / <off> off"`, `"<N> shift(s)"`,
/// or [`CONFLICTING_SCHEDULES`].
#[must_use]
pub fn summarize_pattern(pattern: &Pattern) -> String {
    summarize_resolved(&ResolvedPattern::new(pattern.clone()))
}

/// Builds the editor summary string from an already resolved pattern.
#[must_use]
pub fn summarize_resolved(resolved: &ResolvedPattern) -> String {
    let pattern: &Pattern = resolved.pattern();
    if pattern.swatches().is_empty() {
        return String::from("0 shifts");
    }
    if has_prediction_conflict(resolved) {
        return String::from(CONFLICTING_SCHEDULES);
    }

    let predictions: Vec<&Prediction> = resolved.predictions().iter().flatten().collect();
    let Some(rhythm) = rhythm_summary(&predictions) else {
        let seeded: usize = pattern
            .swatches()
            .iter()
            .filter(|s| !s.on_days().is_empty())
            .count();
        return shift_label(seeded);
    };

    match rhythm.on_off {
        Some((on, off)) => format!("{} - {on} on / {off} off", shift_label(rhythm.shift_count)),
        None => shift_label(rhythm.shift_count),
    }
}

/// True if two or more predictions claim a day that is neither a no-shift
/// day nor explicitly selected by any swatch.
#[must_use]
pub fn has_prediction_conflict(resolved: &ResolvedPattern) -> bool {
    let pattern: &Pattern = resolved.pattern();
    (1..=PATTERN_CYCLE_DAYS)
        .filter(|day| !pattern.no_shift_days().contains(day))
        .filter(|day| pattern.explicit_owner(*day).is_none())
        .any(|day| {
            resolved
                .predictions()
                .iter()
                .flatten()
                .filter(|p| p.predicted_on().contains(&day))
                .count()
                > 1
        })
}

fn shift_label(count: usize) -> String {
    if count == 1 {
        String::from("1 shift")
    } else {
        format!("{count} shifts")
    }
}

fn rhythm_summary(predictions: &[&Prediction]) -> Option<RhythmSummary> {
    let first: &Prediction = predictions.first()?;
    if predictions.len() == 1 {
        return Some(RhythmSummary {
            shift_count: 1,
            on_off: Some((usize::from(first.on_days()), usize::from(first.off_days()))),
        });
    }

    let combined: BTreeSet<u8> = predictions
        .iter()
        .flat_map(|p| p.predicted_on().iter().copied())
        .collect();
    let coverage: Vec<bool> = (1..=PATTERN_CYCLE_DAYS)
        .map(|day| combined.contains(&day))
        .collect();

    Some(RhythmSummary {
        shift_count: predictions.len(),
        on_off: dominant_runs(&coverage),
    })
}

/// Splits cyclic coverage into on/off runs starting at the first transition
/// and returns the most frequent on-run and off-run lengths.
fn dominant_runs(coverage: &[bool]) -> Option<(usize, usize)> {
    let len: usize = coverage.len();
    let transition_start: usize =
        (0..len).find(|i| coverage[*i] != coverage[(i + len - 1) % len])?;

    let mut runs: Vec<(bool, usize)> = Vec::new();
    let mut current: bool = coverage[transition_start];
    let mut length: usize = 0;
    for step in 0..len {
        let value: bool = coverage[(transition_start + step) % len];
        if value == current {
            length += 1;
        } else {
            runs.push((current, length));
            current = value;
            length = 1;
        }
    }
    runs.push((current, length));

    let on_runs: Vec<usize> = runs.iter().filter(|(on, _)| *on).map(|(_, l)| *l).collect();
    let off_runs: Vec<usize> = runs.iter().filter(|(on, _)| !*on).map(|(_, l)| *l).collect();
    Some((most_frequent(&on_runs)?, most_frequent(&off_runs)?))
}

/// Most frequent value; the first value seen wins ties.
fn most_frequent(values: &[usize]) -> Option<usize> {
    let mut counts: Vec<(usize, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| v == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((*value, 1)),
        }
    }
    let mut best: (usize, usize) = *counts.first()?;
    for candidate in &counts {
        if candidate.1 > best.1 {
            best = *candidate;
        }
    }
    Some(best.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_most_frequent_first_wins_ties() {
        assert_eq!(most_frequent(&[3, 4, 4, 3]), Some(3));
        assert_eq!(most_frequent(&[2, 5, 5]), Some(5));
        assert_eq!(most_frequent(&[]), None);
    }

    #[test]
    fn test_dominant_runs_all_on_has_no_transition() {
        assert_eq!(dominant_runs(&[true; 28]), None);
    }

    #[test]
    fn test_dominant_runs_wraps_cyclically() {
        // on: 1-2 and 27-28 form one cyclic run of 4.
        let coverage: Vec<bool> = (1..=28).map(|d| d <= 2 || d >= 27 || (11..=14).contains(&d)).collect();
        assert_eq!(dominant_runs(&coverage), Some((4, 8)));
    }
}
