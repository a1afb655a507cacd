use gemba_core::AnswerParser;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use tracing::warn;

use super::numerical::parse_numerical_answer;

static BOLD_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

pub const MIN_STARS: i64 = 1;
pub const MAX_STARS: i64 = 5;

/// Word and digit spellings of each rating, matched against the
/// space-padded answer.
const RATING_FORMS: [(i64, &str, &str); 5] = [
    (1, " one ", "1 star"),
    (2, " two ", "2 star"),
    (3, " three ", "3 star"),
    (4, " four ", "4 star"),
    (5, " five ", "5 star"),
];

/// Reads a 1..=5 star rating from glyphs (`***`, `★★★`), words
/// (`three stars`) or digits (`3 stars`).
///
/// Every signal present in the answer must agree; any disagreement, or a
/// value outside 1..=5, yields `None`.
pub fn validate_stars(answer: &str) -> Option<i64> {
    let unbolded = BOLD_SPAN.replace_all(answer, "${1}");
    let lowered = unbolded.to_lowercase();
    let mut candidates = BTreeSet::new();

    let asterisks = lowered.matches('*').count();
    if asterisks > 0 {
        candidates.insert(asterisks as i64);
    }
    let glyphs = lowered.matches('★').count();
    if glyphs > 0 {
        candidates.insert(glyphs as i64);
    }

    let padded = format!(" {} ", lowered).replace('\n', " ");
    for (value, word, digits) in RATING_FORMS {
        if padded.contains(word) || padded.contains(digits) {
            candidates.insert(value);
        }
    }

    if let Some(numerical) = parse_numerical_answer(&padded, None) {
        candidates.insert(numerical);
    }

    match candidates.into_iter().collect::<Vec<_>>().as_slice() {
        [only] if (MIN_STARS..=MAX_STARS).contains(only) => Some(*only),
        [_, _, ..] => {
            warn!(answer = %answer, "Star rating signals disagree");
            None
        }
        _ => None,
    }
}

/// [`validate_stars`] as an [`AnswerParser`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StarRatingParser;

impl AnswerParser for StarRatingParser {
    type Output = i64;

    fn parse(&self, answer: &str) -> Option<i64> {
        validate_stars(answer)
    }
}
