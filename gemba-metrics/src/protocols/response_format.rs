//! JSON Schemas requested from models that support structured output.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

static ERROR_ITEM_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "properties": {
            "category": {"type": "string"},
            "description": {"type": "string"},
        },
        "required": ["category", "description"],
        "additionalProperties": false,
    })
});

static SCORE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "properties": {"score": {"type": "integer"}},
        "required": ["score"],
        "additionalProperties": false,
    })
});

static MQM_SCHEMA: Lazy<Value> = Lazy::new(|| {
    let item = ERROR_ITEM_SCHEMA.clone();
    json!({
        "type": "object",
        "properties": {
            "errors": {
                "type": "object",
                "properties": {
                    "critical": {"type": "array", "items": item},
                    "major": {"type": "array", "items": item},
                    "minor": {"type": "array", "items": item},
                },
                "required": ["critical", "major", "minor"],
                "additionalProperties": false,
            },
        },
        "required": ["errors"],
        "additionalProperties": false,
    })
});

static SCORE_FORMAT: Lazy<Value> = Lazy::new(|| wrap("score_response", &SCORE_SCHEMA));
static MQM_FORMAT: Lazy<Value> = Lazy::new(|| wrap("mqm_response", &MQM_SCHEMA));

static SCORE_VALIDATOR: Lazy<Option<jsonschema::Validator>> =
    Lazy::new(|| jsonschema::validator_for(&SCORE_SCHEMA).ok());
static MQM_VALIDATOR: Lazy<Option<jsonschema::Validator>> =
    Lazy::new(|| jsonschema::validator_for(&MQM_SCHEMA).ok());

fn wrap(name: &str, schema: &Value) -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": name,
            "strict": true,
            "schema": schema,
        },
    })
}

/// The two structured-output shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// `{"score": <integer>}`
    Score,
    /// `{"errors": {"critical": [...], "major": [...], "minor": [...]}}`
    Mqm,
}

impl ResponseFormat {
    /// Bare JSON Schema.
    pub fn schema(&self) -> &'static Value {
        match self {
            ResponseFormat::Score => &SCORE_SCHEMA,
            ResponseFormat::Mqm => &MQM_SCHEMA,
        }
    }

    /// `response_format` request parameter wrapping the schema.
    pub fn request_parameter(&self) -> &'static Value {
        match self {
            ResponseFormat::Score => &SCORE_FORMAT,
            ResponseFormat::Mqm => &MQM_FORMAT,
        }
    }

    /// Whether `instance` satisfies the schema.
    pub fn conforms(&self, instance: &Value) -> bool {
        let validator = match self {
            ResponseFormat::Score => SCORE_VALIDATOR.as_ref(),
            ResponseFormat::Mqm => MQM_VALIDATOR.as_ref(),
        };
        validator.is_some_and(|v| v.is_valid(instance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_schema() {
        assert!(ResponseFormat::Score.conforms(&json!({"score": 87})));
        assert!(!ResponseFormat::Score.conforms(&json!({"score": "87"})));
        assert!(!ResponseFormat::Score.conforms(&json!({"score": 87, "why": "ok"})));
        assert!(!ResponseFormat::Score.conforms(&json!({})));
    }

    #[test]
    fn test_mqm_schema() {
        let ok = json!({"errors": {"critical": [], "major": [
            {"category": "accuracy/mistranslation", "description": "wrong word"}
        ], "minor": []}});
        assert!(ResponseFormat::Mqm.conforms(&ok));

        let missing_tier = json!({"errors": {"critical": [], "major": []}});
        assert!(!ResponseFormat::Mqm.conforms(&missing_tier));

        let extra_field = json!({"errors": {"critical": [], "major": [
            {"category": "a", "description": "b", "span": "c"}
        ], "minor": []}});
        assert!(!ResponseFormat::Mqm.conforms(&extra_field));
    }

    #[test]
    fn test_request_parameter_is_strict_json_schema() {
        let param = ResponseFormat::Mqm.request_parameter();
        assert_eq!(param["type"], "json_schema");
        assert_eq!(param["json_schema"]["name"], "mqm_response");
        assert_eq!(param["json_schema"]["strict"], true);
        assert_eq!(&param["json_schema"]["schema"], ResponseFormat::Mqm.schema());
    }
}
