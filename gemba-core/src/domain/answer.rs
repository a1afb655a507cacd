use serde::Serialize;

use super::annotation::MqmErrors;

/// What a validator extracted from one raw answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParsedAnswer {
    /// Numeric score: 0..=100, 1..=5 stars, or a non-positive MQM penalty.
    Score(i64),
    /// Zero-based index into a protocol's class list.
    Class(usize),
    /// Full MQM annotation set, returned instead of the penalty on request.
    Errors(MqmErrors),
    /// Raw text kept verbatim, e.g. annotated error spans.
    Text(String),
}

impl ParsedAnswer {
    pub fn as_score(&self) -> Option<i64> {
        match self {
            ParsedAnswer::Score(score) => Some(*score),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<usize> {
        match self {
            ParsedAnswer::Class(index) => Some(*index),
            _ => None,
        }
    }

    pub fn as_errors(&self) -> Option<&MqmErrors> {
        match self {
            ParsedAnswer::Errors(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParsedAnswer::Text(text) => Some(text),
            _ => None,
        }
    }
}
