// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Decoding of pattern editor payloads.

use shiftboard_domain::{DomainError, Pattern, PatternInput};
use thiserror::Error;

/// Reasons an editor payload cannot become a pattern.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatternInputError {
    #[error("pattern payload is empty")]
    Empty,
    #[error("pattern payload is not valid JSON: {0}")]
    Malformed(String),
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Decodes `{swatches, noShiftDays}` JSON.
///
/// # Errors
///
/// Returns an error if the text is blank or not a pattern object.
pub fn decode_pattern_json(json: &str) -> Result<PatternInput, PatternInputError> {
    if json.trim().is_empty() {
        return Err(PatternInputError::Empty);
    }
    serde_json::from_str(json).map_err(|e| PatternInputError::Malformed(e.to_string()))
}

/// Validates editor input into a canonical pattern.
///
/// # Errors
///
/// Returns an error if any swatch, day or colour is invalid.
pub fn validate_pattern_input(input: &PatternInput) -> Result<Pattern, PatternInputError> {
    Ok(Pattern::from_input(input)?)
}
