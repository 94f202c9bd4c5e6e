// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod types_tests;

use crate::{HexColor, Pattern, PatternInput, SwatchInput};

/// Builds editor input from `(color, on_days)` pairs, indexed in order.
pub fn pattern_input(swatches: &[(&str, &[i64])], no_shift_days: &[i64]) -> PatternInput {
    PatternInput {
        swatches: swatches
            .iter()
            .zip(0_i64..)
            .map(|((color, on_days), index)| SwatchInput {
                swatch_index: index,
                color: (*color).to_string(),
                on_days: on_days.to_vec(),
            })
            .collect(),
        no_shift_days: no_shift_days.to_vec(),
    }
}

/// Builds a validated pattern, panicking on invalid fixtures.
pub fn create_test_pattern(swatches: &[(&str, &[i64])], no_shift_days: &[i64]) -> Pattern {
    Pattern::from_input(&pattern_input(swatches, no_shift_days)).unwrap()
}

pub fn color(value: &str) -> HexColor {
    HexColor::parse(value).unwrap()
}

pub fn date(year: i32, month: time::Month, day: u8) -> time::Date {
    time::Date::from_calendar_date(year, month, day).unwrap()
}
