use gemba_core::CoreError;
use thiserror::Error;

/// Failures reported by an [`LlmProvider`](crate::LlmProvider).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider refused to answer; treated as an empty answer set.
    #[error("Content filtered: {0}")]
    ContentFilter(String),

    /// The model produced output the provider could not return; treated as
    /// an empty answer set.
    #[error("Invalid model output: {0}")]
    InvalidModelOutput(String),

    /// Rate limits, timeouts, server errors. Retried after a delay.
    #[error("Transient provider error: {0}")]
    Transient(String),

    #[error("Provider error: {0}")]
    Fatal(String),
}

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Provider still failing after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: ProviderError,
    },
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
