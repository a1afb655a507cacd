//! Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{ParseArgs, RenderArgs};
use crate::output::OutputFormat;

/// GEMBA: translation-quality scoring with large language models
#[derive(Debug, Parser)]
#[command(name = "gemba", version, about, long_about = None)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Additional configuration file
    #[arg(short, long, global = true, env = "GEMBA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Do not request structured JSON output from the model
    #[arg(long, global = true)]
    pub no_structured_output: bool,

    /// Model name used in rendered requests and cache keys
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the scoring protocols
    Protocols,

    /// Render protocol prompts for parallel segment files
    Render(RenderArgs),

    /// Parse raw model answers with a protocol's validator
    Parse(ParseArgs),
}
