//! MQM error extraction and scoring.
//!
//! An MQM answer arrives either as structured JSON
//! (`{"errors": {"critical": [...], "major": [...], "minor": [...]}}`) or as a
//! text block with `Critical:` / `Major:` / `Minor:` sections, one error per
//! line. Both are reduced to [`MqmErrors`] and scored with
//! [`SeverityWeights::MQM`](gemba_core::SeverityWeights::MQM).

use gemba_core::{AnswerParser, ErrorAnnotation, MqmErrors, ParsedAnswer, Severity};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::protocols::ResponseFormat;

static SECTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(critical|major|minor)\s*:\s*(.*)$").unwrap());

/// Where the annotations of an [`MqmParse`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MqmSource {
    /// JSON that validates against the MQM response format schema.
    Structured,
    /// Text with at least one severity section header.
    Sections,
    /// Neither shape was recognised; scored as error-free.
    Unstructured,
}

/// Annotations extracted from one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MqmParse {
    pub errors: MqmErrors,
    pub source: MqmSource,
}

impl MqmParse {
    pub fn score(&self) -> i64 {
        self.errors.score()
    }

    /// False when the answer followed neither format. Its score of 0 then
    /// means "nothing recognised" rather than "no errors".
    pub fn recognised(&self) -> bool {
        self.source != MqmSource::Unstructured
    }
}

#[derive(Deserialize)]
struct StructuredAnswer {
    errors: StructuredErrors,
}

#[derive(Deserialize)]
struct StructuredErrors {
    critical: Vec<StructuredError>,
    major: Vec<StructuredError>,
    minor: Vec<StructuredError>,
}

#[derive(Deserialize)]
struct StructuredError {
    category: String,
    description: String,
}

/// Reads annotations from `answer`, trying structured JSON first and the
/// sectioned text block second. Never fails: unrecognised text yields an
/// empty [`MqmSource::Unstructured`] parse.
pub fn extract_mqm_errors(answer: &str) -> MqmParse {
    let strategies: [(MqmSource, fn(&str) -> Option<MqmErrors>); 2] = [
        (MqmSource::Structured, structured_errors),
        (MqmSource::Sections, section_errors),
    ];

    strategies
        .iter()
        .find_map(|(source, strategy)| {
            strategy(answer).map(|errors| MqmParse {
                errors,
                source: *source,
            })
        })
        .unwrap_or_else(|| {
            warn!("MQM answer has no severity sections, counting zero errors");
            MqmParse {
                errors: MqmErrors::new(),
                source: MqmSource::Unstructured,
            }
        })
}

fn structured_errors(answer: &str) -> Option<MqmErrors> {
    let value: Value = serde_json::from_str(answer).ok()?;
    if !ResponseFormat::Mqm.conforms(&value) {
        debug!("JSON answer does not match the MQM response format");
        return None;
    }
    let parsed: StructuredAnswer = serde_json::from_value(value).ok()?;
    let tiers = [
        (Severity::Critical, parsed.errors.critical),
        (Severity::Major, parsed.errors.major),
        (Severity::Minor, parsed.errors.minor),
    ];

    Some(
        tiers
            .into_iter()
            .flat_map(|(severity, items)| {
                items
                    .into_iter()
                    .map(move |item| ErrorAnnotation::new(item.category, item.description, severity))
            })
            .collect(),
    )
}

fn section_errors(answer: &str) -> Option<MqmErrors> {
    let lines: Vec<&str> = answer.lines().map(str::trim).collect();
    if !lines.iter().any(|line| SECTION_HEADER.is_match(line)) {
        return None;
    }

    let mut errors = MqmErrors::new();
    let mut section: Option<Severity> = None;

    for line in lines {
        let entry = match SECTION_HEADER.captures(line) {
            Some(caps) => {
                section = caps[1].parse().ok();
                caps.get(2).map_or("", |m| m.as_str().trim())
            }
            None => line,
        };

        if entry.is_empty() || is_no_error(entry) {
            continue;
        }

        match section {
            Some(severity) => errors.push(annotation_from_line(entry, severity)),
            None => warn!(line = %entry, "MQM error line before any severity section"),
        }
    }

    Some(errors)
}

fn is_no_error(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("no-error") || lower.contains("no error")
}

/// Splits `category - description`; non-translation is always critical.
fn annotation_from_line(line: &str, section: Severity) -> ErrorAnnotation {
    let severity = if line.to_lowercase().contains("non-translation") {
        Severity::Critical
    } else {
        section
    };

    let (category, description) = match line.split_once(" - ") {
        Some((category, description)) => (category.trim(), description.trim()),
        None => (line, ""),
    };

    ErrorAnnotation::new(category, description, severity)
}

/// MQM judgment for one raw answer.
///
/// An absent answer (nothing came back upstream) yields `None` without any
/// parsing. Otherwise returns the penalty score, or the full annotation set
/// when `list_errors` is set.
pub fn parse_mqm_answer(answer: Option<&str>, list_errors: bool) -> Option<ParsedAnswer> {
    let answer = answer?;
    let parsed = extract_mqm_errors(answer);
    debug!(
        source = ?parsed.source,
        errors = parsed.errors.len(),
        score = parsed.score(),
        "Parsed MQM answer"
    );

    Some(if list_errors {
        ParsedAnswer::Errors(parsed.errors)
    } else {
        ParsedAnswer::Score(parsed.score())
    })
}

/// [`parse_mqm_answer`] as an [`AnswerParser`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MqmParser {
    pub list_errors: bool,
}

impl MqmParser {
    pub fn new(list_errors: bool) -> Self {
        Self { list_errors }
    }
}

impl AnswerParser for MqmParser {
    type Output = ParsedAnswer;

    fn parse(&self, answer: &str) -> Option<ParsedAnswer> {
        parse_mqm_answer(Some(answer), self.list_errors)
    }
}

const TAXONOMY: &[(&str, &[&str])] = &[
    (
        "accuracy",
        &["addition", "mistranslation", "omission", "untranslated text"],
    ),
    (
        "fluency",
        &[
            "character encoding",
            "grammar",
            "inconsistency",
            "punctuation",
            "register",
            "spelling",
        ],
    ),
    (
        "locale convention",
        &["currency", "date", "name", "telephone", "time"],
    ),
    ("style", &[]),
    ("terminology", &["inappropriate", "inconsistent"]),
    ("non-translation", &[]),
    ("other", &[]),
];

/// Maps free-form error text onto the MQM taxonomy, e.g.
/// `accuracy/mistranslation` → `accuracy-mistranslation`. Unmatched text is
/// `unknown`.
pub fn classify_error(text: &str) -> String {
    let lower = text.to_lowercase();
    TAXONOMY
        .iter()
        .find(|(class, _)| lower.contains(class))
        .map(|(class, subclasses)| {
            match subclasses.iter().filter(|sub| lower.contains(*sub)).last() {
                Some(sub) => format!("{}-{}", class, sub),
                None => class.to_string(),
            }
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// Taxonomy class of an annotation: its category, or the description when
/// the category alone is not recognised.
pub fn error_class(annotation: &ErrorAnnotation) -> String {
    match classify_error(&annotation.category) {
        class if class == "unknown" => classify_error(&annotation.description),
        class => class,
    }
}

/// An annotation with its taxonomy class attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedError {
    #[serde(flatten)]
    pub annotation: ErrorAnnotation,
    pub class: String,
}

/// [`MqmErrors`] with every annotation classified, tiers kept in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassifiedErrors {
    pub critical: Vec<ClassifiedError>,
    pub major: Vec<ClassifiedError>,
    pub minor: Vec<ClassifiedError>,
}

impl ClassifiedErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ClassifiedError> {
        self.critical.iter().chain(&self.major).chain(&self.minor)
    }
}

pub fn classify_errors(errors: &MqmErrors) -> ClassifiedErrors {
    let tier = |annotations: &[ErrorAnnotation]| {
        annotations
            .iter()
            .map(|annotation| ClassifiedError {
                class: error_class(annotation),
                annotation: annotation.clone(),
            })
            .collect()
    };
    ClassifiedErrors {
        critical: tier(&errors.critical),
        major: tier(&errors.major),
        minor: tier(&errors.minor),
    }
}
