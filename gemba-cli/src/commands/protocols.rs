//! Protocol listing

use anyhow::Result;
use comfy_table::Cell;
use gemba_metrics::{definitions, AnswerValidator, ProtocolDefinition, ResponseFormat};
use serde::Serialize;

use crate::context::Context;
use crate::output::{dash, TableDisplay};

#[derive(Debug, Serialize)]
struct ProtocolRow {
    name: &'static str,
    stages: usize,
    uses_reference: bool,
    answer: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_answer_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

impl ProtocolRow {
    fn new(definition: &'static ProtocolDefinition, use_structured_output: bool) -> Self {
        let last = definition.final_stage();
        Self {
            name: definition.name(),
            stages: definition.stages.len(),
            uses_reference: definition.uses_reference,
            answer: answer_kind(&last.validator),
            max_answer_tokens: last.max_answer_tokens,
            response_format: definition.response_format(use_structured_output),
        }
    }
}

fn answer_kind(validator: &AnswerValidator) -> &'static str {
    match validator {
        AnswerValidator::Number { .. } => "score 0-100",
        AnswerValidator::Stars => "stars 1-5",
        AnswerValidator::Classes { .. } => "class",
        AnswerValidator::Mqm { .. } => "mqm",
        AnswerValidator::Passthrough => "text",
    }
}

impl TableDisplay for ProtocolRow {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(self.name),
            Cell::new(self.stages),
            Cell::new(if self.uses_reference { "yes" } else { "no" }),
            Cell::new(self.answer),
            self.max_answer_tokens.map(Cell::new).unwrap_or_else(dash),
            self.response_format
                .map(|format| match format {
                    ResponseFormat::Score => Cell::new("score"),
                    ResponseFormat::Mqm => Cell::new("mqm"),
                })
                .unwrap_or_else(dash),
        ]
    }
}

pub fn execute(ctx: &Context) -> Result<()> {
    let rows: Vec<ProtocolRow> = definitions()
        .map(|definition| ProtocolRow::new(definition, ctx.config.use_structured_output))
        .collect();

    ctx.output.write_list(
        &rows,
        &["Name", "Stages", "Reference", "Answer", "Max tokens", "Response format"],
    )
}
