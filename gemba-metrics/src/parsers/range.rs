use gemba_core::AnswerParser;
use serde::{Deserialize, Serialize};

use super::numerical::parse_numerical_answer;

pub const DEFAULT_MIN_SCORE: i64 = 0;
pub const DEFAULT_MAX_SCORE: i64 = 100;

/// Parses a number and rejects it unless it lies in `[min, max]`.
pub fn validate_number(answer: &str, min: i64, max: i64) -> Option<i64> {
    parse_numerical_answer(answer, Some(max)).filter(|score| (min..=max).contains(score))
}

/// Inclusive score bounds, 0..=100 by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeValidator {
    pub min: i64,
    pub max: i64,
}

impl RangeValidator {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }
}

impl Default for RangeValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SCORE, DEFAULT_MAX_SCORE)
    }
}

impl AnswerParser for RangeValidator {
    type Output = i64;

    fn parse(&self, answer: &str) -> Option<i64> {
        validate_number(answer, self.min, self.max)
    }
}
