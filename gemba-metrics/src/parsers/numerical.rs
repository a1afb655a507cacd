//! Integer score extraction from free-text or structured answers.
//!
//! Models answer in many shapes: a bare number, `{"score": 87}`, `**85/100**`,
//! or a sentence such as `Score: 85/100 - good`. Each shape is handled by one
//! [`Strategy`]; strategies run from most to least confident and the first
//! that yields a value wins.

use gemba_core::AnswerParser;
use once_cell::sync::Lazy;
use regex::Regex;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());
static QUOTED_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\[['"]([0-9]*)['"]\]$"#).unwrap());
static ASTERISK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*+").unwrap());

/// One way of reading a number out of an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `{"score": N}` object.
    StructuredJson,
    /// Exactly one run of digits.
    SingleNumber,
    /// `['72']` one-element list literal.
    QuotedList,
    /// Exactly `N/max`.
    ExactFraction,
    /// [`Strategy::SingleNumber`] after removing `*` runs.
    UnboldedSingleNumber,
    /// [`Strategy::ExactFraction`] after removing `*` runs.
    UnboldedExactFraction,
    /// `N/max` followed by a non-digit, anywhere in the unbolded answer.
    FractionAnywhere,
    /// Exactly two numbers, the second being `max`.
    TwoNumbersWithMax,
}

impl Strategy {
    /// Evaluation order.
    pub const ORDER: [Strategy; 8] = [
        Strategy::StructuredJson,
        Strategy::SingleNumber,
        Strategy::QuotedList,
        Strategy::ExactFraction,
        Strategy::UnboldedSingleNumber,
        Strategy::UnboldedExactFraction,
        Strategy::FractionAnywhere,
        Strategy::TwoNumbersWithMax,
    ];

    fn apply(self, answer: &Answer<'_>) -> Option<i64> {
        match self {
            Strategy::StructuredJson => structured_score(answer.raw),
            Strategy::SingleNumber => single_number(answer.raw),
            Strategy::QuotedList => quoted_list(answer.raw),
            Strategy::ExactFraction => exact_fraction(answer.raw, answer.max?),
            Strategy::UnboldedSingleNumber => answer
                .unbolded_differs()
                .then(|| single_number(&answer.unbolded))
                .flatten(),
            Strategy::UnboldedExactFraction => answer
                .unbolded_differs()
                .then(|| exact_fraction(&answer.unbolded, answer.max?))
                .flatten(),
            Strategy::FractionAnywhere => fraction_anywhere(&answer.unbolded, answer.max?),
            Strategy::TwoNumbersWithMax => two_numbers_with_max(&answer.unbolded, answer.max?),
        }
    }
}

struct Answer<'a> {
    raw: &'a str,
    unbolded: String,
    max: Option<i64>,
}

impl<'a> Answer<'a> {
    fn new(raw: &'a str, max: Option<i64>) -> Self {
        let unbolded = ASTERISK_RUN.replace_all(raw, "").trim().to_string();
        Self { raw, unbolded, max }
    }

    fn unbolded_differs(&self) -> bool {
        self.unbolded != self.raw
    }
}

/// Extracts an integer score, or `None` when no strategy is confident.
///
/// `max` enables the fraction strategies (`85/100`). No lower bound is
/// consulted here; range checks belong to [`crate::validate_number`].
pub fn parse_numerical_answer(answer: &str, max: Option<i64>) -> Option<i64> {
    let answer = Answer::new(answer, max);
    Strategy::ORDER
        .iter()
        .find_map(|strategy| strategy.apply(&answer))
}

/// Like [`parse_numerical_answer`], also reporting which strategy matched.
pub fn parse_numerical_answer_with_strategy(
    answer: &str,
    max: Option<i64>,
) -> Option<(i64, Strategy)> {
    let answer = Answer::new(answer, max);
    Strategy::ORDER
        .iter()
        .find_map(|strategy| strategy.apply(&answer).map(|score| (score, *strategy)))
}

fn structured_score(answer: &str) -> Option<i64> {
    let parsed: serde_json::Value = serde_json::from_str(answer).ok()?;
    coerce_integer(parsed.as_object()?.get("score")?)
}

/// Integer coercion for the `score` field: integers, truncated floats,
/// numeric strings and booleans.
fn coerce_integer(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        serde_json::Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn digit_runs(text: &str) -> Vec<&str> {
    DIGIT_RUN.find_iter(text).map(|m| m.as_str()).collect()
}

fn single_number(text: &str) -> Option<i64> {
    match digit_runs(text).as_slice() {
        [only] => only.parse().ok(),
        _ => None,
    }
}

fn quoted_list(text: &str) -> Option<i64> {
    QUOTED_LIST.captures(text)?.get(1)?.as_str().parse().ok()
}

fn exact_fraction(text: &str, max: i64) -> Option<i64> {
    let numerator = text.strip_suffix(&format!("/{}", max))?;
    if numerator.is_empty() || !numerator.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    numerator.parse().ok()
}

fn fraction_anywhere(text: &str, max: i64) -> Option<i64> {
    let pattern = Regex::new(&format!(r"([0-9]+)/{}(?:[^0-9]|$)", max)).ok()?;
    pattern.captures(text)?.get(1)?.as_str().parse().ok()
}

fn two_numbers_with_max(text: &str, max: i64) -> Option<i64> {
    match digit_runs(text).as_slice() {
        [score, denominator] if denominator.parse::<i64>().ok() == Some(max) => {
            score.parse().ok()
        }
        _ => None,
    }
}

/// [`parse_numerical_answer`] as an [`AnswerParser`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumericalParser {
    pub max: Option<i64>,
}

impl NumericalParser {
    pub fn new(max: Option<i64>) -> Self {
        Self { max }
    }
}

impl AnswerParser for NumericalParser {
    type Output = i64;

    fn parse(&self, answer: &str) -> Option<i64> {
        parse_numerical_answer(answer, self.max)
    }
}
