//! Fixed table of scoring protocols.
//!
//! Built once on first use and never mutated. Callers resolve a protocol by
//! its public name; an unknown name is a programming error and fails with
//! [`CoreError::UnsupportedProtocol`].

use gemba_core::{CoreError, PromptTemplate, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::response_format::ResponseFormat;
use super::templates;
use super::validator::AnswerValidator;
use crate::parsers::{ClassList, DEFAULT_MAX_SCORE, DEFAULT_MIN_SCORE};

/// Placeholder that marks a template as needing a reference translation.
pub const REFERENCE_VARIABLE: &str = "reference_seg";

/// Answer-token hint for the class-selection protocols.
pub const CLASSES_MAX_ANSWER_TOKENS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Protocol {
    #[serde(rename = "GEMBA-DA")]
    Da,
    #[serde(rename = "GEMBA-DA_ref")]
    DaRef,
    #[serde(rename = "GEMBA-SQM")]
    Sqm,
    #[serde(rename = "GEMBA-SQM_ref")]
    SqmRef,
    #[serde(rename = "GEMBA-stars")]
    Stars,
    #[serde(rename = "GEMBA-stars_ref")]
    StarsRef,
    #[serde(rename = "GEMBA-classes")]
    Classes,
    #[serde(rename = "GEMBA-classes_ref")]
    ClassesRef,
    #[serde(rename = "GEMBA-MQM")]
    Mqm,
    #[serde(rename = "GEMBA-ESA")]
    Esa,
}

impl Protocol {
    pub const ALL: [Protocol; 10] = [
        Protocol::Da,
        Protocol::DaRef,
        Protocol::Sqm,
        Protocol::SqmRef,
        Protocol::Stars,
        Protocol::StarsRef,
        Protocol::Classes,
        Protocol::ClassesRef,
        Protocol::Mqm,
        Protocol::Esa,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Protocol::Da => "GEMBA-DA",
            Protocol::DaRef => "GEMBA-DA_ref",
            Protocol::Sqm => "GEMBA-SQM",
            Protocol::SqmRef => "GEMBA-SQM_ref",
            Protocol::Stars => "GEMBA-stars",
            Protocol::StarsRef => "GEMBA-stars_ref",
            Protocol::Classes => "GEMBA-classes",
            Protocol::ClassesRef => "GEMBA-classes_ref",
            Protocol::Mqm => "GEMBA-MQM",
            Protocol::Esa => "GEMBA-ESA",
        }
    }

    pub fn definition(&self) -> &'static ProtocolDefinition {
        &REGISTRY[self]
    }

    /// Structured-output shape this protocol asks for, if any.
    pub fn response_format(&self) -> Option<ResponseFormat> {
        match self {
            Protocol::Da | Protocol::DaRef | Protocol::Sqm | Protocol::SqmRef => {
                Some(ResponseFormat::Score)
            }
            Protocol::Mqm => Some(ResponseFormat::Mqm),
            _ => None,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Protocol {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Protocol::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| CoreError::UnsupportedProtocol(s.to_string()))
    }
}

/// One prompt/parse round trip. Most protocols have a single stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub template: PromptTemplate,
    pub validator: AnswerValidator,
    pub max_answer_tokens: Option<u32>,
}

impl Stage {
    fn new(template: PromptTemplate, validator: AnswerValidator) -> Self {
        Self {
            template,
            validator,
            max_answer_tokens: None,
        }
    }

    fn with_max_answer_tokens(mut self, tokens: u32) -> Self {
        self.max_answer_tokens = Some(tokens);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtocolDefinition {
    pub protocol: Protocol,
    pub uses_reference: bool,
    pub stages: Vec<Stage>,
}

impl ProtocolDefinition {
    fn new(protocol: Protocol, stages: Vec<Stage>) -> Self {
        let uses_reference = stages
            .iter()
            .any(|stage| stage.template.uses_variable(REFERENCE_VARIABLE));
        Self {
            protocol,
            uses_reference,
            stages,
        }
    }

    pub fn name(&self) -> &'static str {
        self.protocol.name()
    }

    /// The stage whose answer is the protocol's score.
    pub fn final_stage(&self) -> &Stage {
        // Every definition is built with at least one stage.
        &self.stages[self.stages.len() - 1]
    }

    /// Response format to request, or `None` when structured output is
    /// disabled or the protocol has no schema.
    pub fn response_format(&self, use_structured_output: bool) -> Option<ResponseFormat> {
        if use_structured_output {
            self.protocol.response_format()
        } else {
            None
        }
    }
}

fn number() -> AnswerValidator {
    AnswerValidator::Number {
        min: DEFAULT_MIN_SCORE,
        max: DEFAULT_MAX_SCORE,
    }
}

fn classes() -> AnswerValidator {
    AnswerValidator::Classes {
        classes: ClassList::from_static(&templates::CLASS_LABELS),
    }
}

fn single(protocol: Protocol, template: &str, validator: AnswerValidator) -> ProtocolDefinition {
    ProtocolDefinition::new(
        protocol,
        vec![Stage::new(PromptTemplate::text(template), validator)],
    )
}

fn build_registry() -> HashMap<Protocol, ProtocolDefinition> {
    let definitions = vec![
        single(Protocol::Da, templates::DA, number()),
        single(Protocol::DaRef, templates::DA_REF, number()),
        single(Protocol::Sqm, templates::SQM, number()),
        single(Protocol::SqmRef, templates::SQM_REF, number()),
        single(Protocol::Stars, templates::STARS, AnswerValidator::Stars),
        single(Protocol::StarsRef, templates::STARS_REF, AnswerValidator::Stars),
        ProtocolDefinition::new(
            Protocol::Classes,
            vec![Stage::new(PromptTemplate::text(templates::CLASSES), classes())
                .with_max_answer_tokens(CLASSES_MAX_ANSWER_TOKENS)],
        ),
        ProtocolDefinition::new(
            Protocol::ClassesRef,
            vec![
                Stage::new(PromptTemplate::text(templates::CLASSES_REF), classes())
                    .with_max_answer_tokens(CLASSES_MAX_ANSWER_TOKENS),
            ],
        ),
        ProtocolDefinition::new(
            Protocol::Mqm,
            vec![Stage::new(
                templates::mqm_template(),
                AnswerValidator::Mqm { list_errors: false },
            )],
        ),
        ProtocolDefinition::new(
            Protocol::Esa,
            vec![
                Stage::new(
                    PromptTemplate::text(templates::ESA_ERROR_SPANS),
                    AnswerValidator::Passthrough,
                ),
                Stage::new(PromptTemplate::text(templates::ESA_RANKING), number()),
            ],
        ),
    ];

    definitions
        .into_iter()
        .map(|definition| (definition.protocol, definition))
        .collect()
}

static REGISTRY: Lazy<HashMap<Protocol, ProtocolDefinition>> = Lazy::new(build_registry);

/// Resolves a protocol by its public name.
pub fn lookup(name: &str) -> Result<&'static ProtocolDefinition> {
    Ok(name.parse::<Protocol>()?.definition())
}

/// Every definition, in [`Protocol::ALL`] order.
pub fn definitions() -> impl Iterator<Item = &'static ProtocolDefinition> {
    Protocol::ALL.into_iter().map(|p| p.definition())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_class_labels_are_unambiguous() {
        assert!(ClassList::new(templates::CLASS_LABELS).is_ok());
    }

    #[test]
    fn test_every_protocol_is_registered() {
        for protocol in Protocol::ALL {
            assert_eq!(protocol.definition().protocol, protocol);
            assert!(!protocol.definition().stages.is_empty());
        }
    }

    #[test]
    fn test_names_round_trip() {
        for protocol in Protocol::ALL {
            assert_eq!(protocol.name().parse::<Protocol>().unwrap(), protocol);
            assert_eq!(
                serde_json::to_value(protocol).unwrap(),
                serde_json::json!(protocol.name())
            );
        }
    }
}
