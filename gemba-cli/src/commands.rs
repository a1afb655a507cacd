//! Subcommand implementations

pub mod parse;
pub mod protocols;
pub mod render;

pub use parse::ParseArgs;
pub use render::RenderArgs;

use anyhow::{bail, Result};
use gemba_metrics::ProtocolDefinition;

/// Zero-based stage index, defaulting to the final stage.
pub(crate) fn stage_index(protocol: &ProtocolDefinition, stage: Option<usize>) -> Result<usize> {
    let last = protocol.stages.len().saturating_sub(1);
    match stage {
        None => Ok(last),
        Some(index) if index <= last => Ok(index),
        Some(index) => bail!(
            "{} has {} stage(s); stage {} does not exist",
            protocol.name(),
            protocol.stages.len(),
            index
        ),
    }
}
