//! CLI configuration management

use anyhow::Result;
use config::{Config as ConfigLoader, Environment, File};
use gemba_workflow::RequestConfig;
use serde::Deserialize;
use std::path::Path;

use crate::output::OutputFormat;

/// Settings read from `config/default`, `config/local`, an optional extra
/// file and `GEMBA_*` environment variables, in that order.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GembaConfig {
    /// Log level for the `gemba` crates when `RUST_LOG` is unset
    pub log_level: String,

    /// Emit logs as JSON
    pub log_json: bool,

    /// Ask for structured JSON output when a protocol has a schema
    pub use_structured_output: bool,

    /// Segments scored concurrently
    pub concurrency: usize,

    /// Model name
    pub model: String,

    /// Default output format
    pub output: OutputFormat,
}

impl Default for GembaConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: false,
            use_structured_output: true,
            concurrency: 8,
            model: RequestConfig::default().model,
            output: OutputFormat::Json,
        }
    }
}

impl GembaConfig {
    pub fn load(extra: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = extra {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(Environment::with_prefix("GEMBA").try_parsing(true))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Request-loop settings derived from this configuration.
    pub fn request_config(&self) -> RequestConfig {
        RequestConfig::new(self.model.clone())
            .with_concurrency(self.concurrency)
            .with_structured_output(self.use_structured_output)
    }
}
