//! Answer parsing

use anyhow::{bail, Context as _, Result};
use clap::Args;
use comfy_table::Cell;
use gemba_core::ParsedAnswer;
use gemba_metrics::{classify_errors, lookup, ClassifiedErrors};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

use super::stage_index;
use crate::context::Context;
use crate::output::{dash, OutputFormat, TableDisplay};

/// Parse arguments
#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Protocol name, e.g. GEMBA-MQM
    #[arg(short, long)]
    pub protocol: String,

    /// Answers as JSON lines: a string, null, or {"answer": ...}. `-` reads stdin
    #[arg(short = 'a', long = "answers", alias = "input", default_value = "-")]
    pub input: PathBuf,

    /// Zero-based stage whose validator to apply (defaults to the last stage)
    #[arg(long)]
    pub stage: Option<usize>,

    /// Return MQM annotations instead of the penalty score
    #[arg(long)]
    pub list_mqm_errors: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnswerLine {
    Bare(Option<String>),
    Wrapped { answer: Option<String> },
}

impl AnswerLine {
    fn into_answer(self) -> Option<String> {
        match self {
            AnswerLine::Bare(answer) | AnswerLine::Wrapped { answer } => answer,
        }
    }
}

/// A parsed answer as written out. MQM annotation sets carry their
/// taxonomy class.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum AnswerOutput {
    Errors(ClassifiedErrors),
    Value(ParsedAnswer),
}

impl From<ParsedAnswer> for AnswerOutput {
    fn from(answer: ParsedAnswer) -> Self {
        match answer {
            ParsedAnswer::Errors(errors) => AnswerOutput::Errors(classify_errors(&errors)),
            other => AnswerOutput::Value(other),
        }
    }
}

#[derive(Debug, Serialize)]
struct ParsedRow {
    line: usize,
    answer: Option<AnswerOutput>,
}

impl TableDisplay for ParsedRow {
    fn to_row(&self) -> Vec<Cell> {
        let answer = match &self.answer {
            None => dash(),
            Some(AnswerOutput::Value(ParsedAnswer::Score(score))) => Cell::new(score),
            Some(AnswerOutput::Value(ParsedAnswer::Class(class))) => Cell::new(class),
            Some(AnswerOutput::Value(ParsedAnswer::Text(text))) => Cell::new(text),
            Some(AnswerOutput::Value(ParsedAnswer::Errors(errors))) => {
                Cell::new(format!("{} error(s)", errors.len()))
            }
            Some(AnswerOutput::Errors(errors)) => Cell::new(
                errors
                    .iter()
                    .map(|e| {
                        format!(
                            "{}: {} - {} [{}]",
                            e.annotation.severity,
                            e.annotation.category,
                            e.annotation.description,
                            e.class
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
        };
        vec![Cell::new(self.line), answer]
    }
}

pub fn execute(ctx: &Context, args: ParseArgs) -> Result<()> {
    let protocol = lookup(&args.protocol)?;
    let stage = stage_index(protocol, args.stage)?;
    let validator = protocol.stages[stage]
        .validator
        .listing_errors(args.list_mqm_errors);

    let input = read_input(&args.input)?;
    let rows = input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            let answer: AnswerLine = serde_json::from_str(line).with_context(|| {
                format!(
                    "line {}: expected a JSON string, null or {{\"answer\": ...}}",
                    i + 1
                )
            })?;
            Ok(ParsedRow {
                line: i + 1,
                answer: validator
                    .validate(answer.into_answer().as_deref())
                    .map(AnswerOutput::from),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let parsed = rows.iter().filter(|row| row.answer.is_some()).count();
    info!(
        protocol = protocol.name(),
        stage,
        parsed,
        unparsed = rows.len() - parsed,
        "Parsed answers"
    );
    if parsed < rows.len() {
        ctx.output
            .warning(&format!("{} answer(s) could not be parsed", rows.len() - parsed));
    }

    match ctx.output.format() {
        OutputFormat::Json => ctx.output.write_lines(rows.iter().map(|row| &row.answer)),
        OutputFormat::Table => ctx.output.write_list(&rows, &["Line", "Answer"]),
    }
}

fn read_input(path: &Path) -> Result<String> {
    let mut input = String::new();
    if path.as_os_str() == "-" {
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read stdin")?;
    } else {
        input = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
    }
    if input.trim().is_empty() {
        bail!("No answers to parse");
    }
    Ok(input)
}
