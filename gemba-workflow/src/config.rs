use std::time::Duration;

/// Highest temperature step tried before giving up on a prompt.
pub const MAX_TEMPERATURE_STEP: u32 = 10;

/// Extra completion budget requested after a truncated answer.
pub const TOKEN_INCREMENT: u32 = 200;

/// Completion budget for single-stage protocols without their own hint.
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Settings for the request loop and bulk scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    /// Model identifier passed to the provider
    pub model: String,

    /// Highest temperature step (sampling temperature is step / 10)
    pub max_temperature: u32,

    /// Tokens added to the budget when a completion is cut off
    pub token_increment: u32,

    /// Budget for single-stage protocols whose stage has no hint
    pub default_max_tokens: Option<u32>,

    /// Transient provider failures tolerated per request
    pub max_transient_retries: u32,

    /// Wait between transient retries
    pub retry_delay: Duration,

    /// Segments scored concurrently
    pub concurrency: usize,

    /// Ask the provider for structured JSON when the protocol has a schema
    pub use_structured_output: bool,

    /// Return MQM annotation sets instead of penalty scores
    pub list_mqm_errors: bool,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            max_temperature: MAX_TEMPERATURE_STEP,
            token_increment: TOKEN_INCREMENT,
            default_max_tokens: Some(DEFAULT_MAX_TOKENS),
            max_transient_retries: 5,
            retry_delay: Duration::from_secs(1),
            concurrency: 8,
            use_structured_output: true,
            list_mqm_errors: false,
        }
    }
}

impl RequestConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_max_temperature(mut self, max_temperature: u32) -> Self {
        self.max_temperature = max_temperature;
        self
    }

    pub fn with_token_increment(mut self, token_increment: u32) -> Self {
        self.token_increment = token_increment;
        self
    }

    pub fn with_default_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.default_max_tokens = max_tokens;
        self
    }

    /// Set the transient retry limit and the wait between attempts
    pub fn with_transient_retries(mut self, max_retries: u32, delay: Duration) -> Self {
        self.max_transient_retries = max_retries;
        self.retry_delay = delay;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_structured_output(mut self, enabled: bool) -> Self {
        self.use_structured_output = enabled;
        self
    }

    pub fn with_mqm_error_listing(mut self, enabled: bool) -> Self {
        self.list_mqm_errors = enabled;
        self
    }
}
