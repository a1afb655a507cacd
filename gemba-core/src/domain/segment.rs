use serde::{Deserialize, Serialize};

/// One source/hypothesis pair to be judged, plus whatever its templates need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub source_lang: String,
    pub target_lang: String,
    pub source_seg: String,
    pub target_seg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_seg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_spans: Option<String>,
}

impl Segment {
    pub fn new(
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
        source_seg: impl Into<String>,
        target_seg: impl Into<String>,
    ) -> Self {
        Self {
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            source_seg: source_seg.into(),
            target_seg: target_seg.into(),
            reference_seg: None,
            error_spans: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference_seg = Some(reference.into());
        self
    }

    pub fn with_error_spans(mut self, spans: impl Into<String>) -> Self {
        self.error_spans = Some(spans.into());
        self
    }

    /// Template context: every populated field keyed by its placeholder name.
    pub fn to_context(&self) -> serde_json::Value {
        let mut context = serde_json::Map::new();
        context.insert("source_lang".to_string(), self.source_lang.clone().into());
        context.insert("target_lang".to_string(), self.target_lang.clone().into());
        context.insert("source_seg".to_string(), self.source_seg.clone().into());
        context.insert("target_seg".to_string(), self.target_seg.clone().into());
        if let Some(reference) = &self.reference_seg {
            context.insert("reference_seg".to_string(), reference.clone().into());
        }
        if let Some(spans) = &self.error_spans {
            context.insert("error_spans".to_string(), spans.clone().into());
        }
        serde_json::Value::Object(context)
    }
}
