use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;
mod context;
mod output;

use cli::{Cli, Commands};
use context::Context;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = Context::new(&cli)?;

    // Logs go to stderr so stdout stays machine-readable.
    let (json_layer, text_layer) = if ctx.config.log_json {
        (
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
            None,
        )
    } else {
        (
            None,
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| ctx.log_directive().into()),
        )
        .with(json_layer)
        .with(text_layer)
        .init();

    tracing::debug!(model = %ctx.config.model, output = %ctx.output_format, "Configuration loaded");

    match cli.command {
        Commands::Protocols => commands::protocols::execute(&ctx),
        Commands::Render(args) => commands::render::execute(&ctx, args),
        Commands::Parse(args) => commands::parse::execute(&ctx, args),
    }
}
