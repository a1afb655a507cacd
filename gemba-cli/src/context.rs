//! CLI execution context

use anyhow::{Context as _, Result};
use gemba_workflow::RequestConfig;

use crate::cli::Cli;
use crate::config::GembaConfig;
use crate::output::{OutputFormat, OutputWriter};

/// Execution context for CLI commands
pub struct Context {
    /// Loaded configuration with command-line overrides applied
    pub config: GembaConfig,

    /// Output format
    pub output_format: OutputFormat,

    /// Output writer
    pub output: OutputWriter,

    /// Verbose mode
    pub verbose: bool,
}

impl Context {
    /// Create a new context from CLI arguments
    pub fn new(cli: &Cli) -> Result<Self> {
        let mut config = GembaConfig::load(cli.config.as_deref())
            .context("Failed to load configuration")?;

        if cli.no_structured_output {
            config.use_structured_output = false;
        }
        if cli.log_json {
            config.log_json = true;
        }
        if let Some(model) = &cli.model {
            config.model = model.clone();
        }

        let output_format = cli.output.unwrap_or(config.output);

        Ok(Self {
            config,
            output_format,
            output: OutputWriter::new(output_format),
            verbose: cli.verbose,
        })
    }

    /// Request-loop settings for commands that prepare requests.
    pub fn request_config(&self) -> RequestConfig {
        self.config.request_config()
    }

    /// Filter directive used when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> String {
        let level = if self.verbose {
            "debug"
        } else {
            self.config.log_level.as_str()
        };
        format!("gemba={level},gemba_cli={level},gemba_workflow={level},gemba_metrics={level}")
    }
}
