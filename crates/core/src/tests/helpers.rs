// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftboard_domain::{Pattern, PatternId, PatternInput, StoredPattern, SwatchInput};
use time::{Date, Month};

use crate::{ShiftFields, ShiftVersion, TimelineVersion};

pub fn date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).unwrap()
}

pub fn shift_fields(name: &str, pattern_id: Option<i64>) -> ShiftFields {
    ShiftFields::new(String::from(name), pattern_id.map(PatternId::new))
}

pub fn shift_version(
    start: Date,
    end: Option<Date>,
    name: &str,
    pattern_id: Option<i64>,
) -> ShiftVersion {
    TimelineVersion::new(start, end, shift_fields(name, pattern_id))
}

/// One swatch working days 1-4 and 9-12: four on, four off.
pub fn create_four_on_four_off(color: &str) -> StoredPattern {
    let input: PatternInput = PatternInput {
        swatches: vec![SwatchInput {
            swatch_index: 0,
            color: String::from(color),
            on_days: vec![1, 2, 3, 4, 9, 10, 11, 12],
        }],
        no_shift_days: Vec::new(),
    };
    StoredPattern::Valid(Pattern::from_input(&input).unwrap())
}
