use gemba_core::{AnswerParser, ParsedAnswer};
use serde::{Deserialize, Serialize};

use crate::parsers::{
    parse_classes, parse_mqm_answer, validate_number, validate_stars, ClassList,
};

/// Which parser a protocol stage applies to raw answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerValidator {
    /// Integer within inclusive bounds.
    Number { min: i64, max: i64 },
    /// 1..=5 star rating.
    Stars,
    /// Index into an ordered class list.
    Classes { classes: ClassList },
    /// MQM penalty, or the annotation set when `list_errors` is set.
    Mqm { list_errors: bool },
    /// Answer kept verbatim.
    Passthrough,
}

impl AnswerValidator {
    /// Validates an answer that may be absent; absence is never parsed.
    pub fn validate(&self, answer: Option<&str>) -> Option<ParsedAnswer> {
        self.parse(answer?)
    }

    /// Same validator with MQM error listing switched on or off.
    pub fn listing_errors(&self, list_errors: bool) -> Self {
        match self {
            AnswerValidator::Mqm { .. } => AnswerValidator::Mqm { list_errors },
            other => other.clone(),
        }
    }
}

impl AnswerParser for AnswerValidator {
    type Output = ParsedAnswer;

    fn parse(&self, answer: &str) -> Option<ParsedAnswer> {
        match self {
            AnswerValidator::Number { min, max } => {
                validate_number(answer, *min, *max).map(ParsedAnswer::Score)
            }
            AnswerValidator::Stars => validate_stars(answer).map(ParsedAnswer::Score),
            AnswerValidator::Classes { classes } => {
                parse_classes(answer, classes.labels()).map(ParsedAnswer::Class)
            }
            AnswerValidator::Mqm { list_errors } => parse_mqm_answer(Some(answer), *list_errors),
            AnswerValidator::Passthrough => Some(ParsedAnswer::Text(answer.to_string())),
        }
    }
}
