//! Prompt rendering

use anyhow::{bail, Context as _, Result};
use clap::Args;
use gemba_core::{language_name, Segment};
use gemba_metrics::lookup;
use gemba_workflow::{stage_options, CacheKey, CompletionRequest};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::stage_index;
use crate::context::Context;

/// Render arguments
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Protocol name, e.g. GEMBA-DA
    #[arg(short, long)]
    pub protocol: String,

    /// Source language code or name
    #[arg(long)]
    pub source_lang: String,

    /// Target language code or name
    #[arg(long)]
    pub target_lang: String,

    /// Source segments, one per line
    #[arg(long)]
    pub source: PathBuf,

    /// Translated segments, one per line
    #[arg(long = "hypothesis", alias = "target")]
    pub target: PathBuf,

    /// Reference translations, one per line
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Error spans from an earlier stage, one JSON string per line
    #[arg(long)]
    pub error_spans: Option<PathBuf>,

    /// Zero-based stage to render (defaults to the last stage)
    #[arg(long)]
    pub stage: Option<usize>,
}

/// One rendered request, ready for a chat completions endpoint.
#[derive(Debug, Serialize)]
struct RenderedRequest {
    index: usize,
    protocol: &'static str,
    stage: usize,
    cache_key: CacheKey,
    body: serde_json::Value,
}

pub fn execute(ctx: &Context, args: RenderArgs) -> Result<()> {
    let protocol = lookup(&args.protocol)?;
    let stage = stage_index(protocol, args.stage)?;
    let config = ctx.request_config();

    let segments = read_segments(&args)?;
    info!(
        protocol = protocol.name(),
        stage,
        segments = segments.len(),
        "Rendering prompts"
    );

    let options = stage_options(protocol, stage, &config);
    let template = &protocol.stages[stage].template;

    let rendered = segments
        .iter()
        .enumerate()
        .map(|(index, segment)| {
            let prompt = template
                .render(&segment.to_context())
                .with_context(|| format!("Failed to render segment {}", index))?;
            let cache_key = CacheKey::new(&prompt, &config.model, 0)?;
            debug!(index, %cache_key, "Rendered prompt");

            let request = CompletionRequest {
                prompt,
                model: config.model.clone(),
                temperature: 0,
                max_tokens: options.max_tokens,
                response_format: options.response_format,
            };
            Ok(RenderedRequest {
                index,
                protocol: protocol.name(),
                stage,
                cache_key,
                body: request.to_chat_body(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    ctx.output.write_lines(rendered)
}

fn read_segments(args: &RenderArgs) -> Result<Vec<Segment>> {
    let sources = read_lines(&args.source)?;
    let targets = read_lines(&args.target)?;
    if sources.len() != targets.len() {
        bail!(
            "Source and target line counts differ ({} vs {})",
            sources.len(),
            targets.len()
        );
    }

    let references = match &args.reference {
        Some(path) => Some(read_lines(path)?),
        None => None,
    };
    let spans = match &args.error_spans {
        Some(path) => Some(read_error_spans(path)?),
        None => None,
    };
    for (name, count) in [
        ("Reference", references.as_ref().map(Vec::len)),
        ("Error span", spans.as_ref().map(Vec::len)),
    ] {
        if let Some(count) = count.filter(|count| *count != sources.len()) {
            bail!(
                "{} line count differs from source ({} vs {})",
                name,
                count,
                sources.len()
            );
        }
    }

    let source_lang = language_name(&args.source_lang);
    let target_lang = language_name(&args.target_lang);

    Ok(sources
        .into_iter()
        .zip(targets)
        .enumerate()
        .map(|(i, (source, target))| {
            let mut segment = Segment::new(source_lang, target_lang, source, target);
            if let Some(reference) = references.as_ref().map(|r| r[i].clone()) {
                segment = segment.with_reference(reference);
            }
            if let Some(Some(span)) = spans.as_ref().map(|s| s[i].clone()) {
                segment = segment.with_error_spans(span);
            }
            segment
        })
        .collect())
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(content.lines().map(str::to_string).collect())
}

fn read_error_spans(path: &Path) -> Result<Vec<Option<String>>> {
    read_lines(path)?
        .iter()
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("{}:{}: expected a JSON string or null", path.display(), i + 1))
        })
        .collect()
}
