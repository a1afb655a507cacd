//! Request loop: provider calls, caching and temperature escalation.
//!
//! For one prompt the loop asks the provider for answers at temperature
//! step 0, validates them, and moves to the next step when none parses.
//! Truncated completions are re-requested with a larger token budget;
//! content-filtered or invalid output ends the loop with an absent answer.

use gemba_core::{ParsedAnswer, Prompt};
use gemba_metrics::{AnswerValidator, ResponseFormat};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::{CacheKey, InMemoryCache, RawAnswer, ResponseCache};
use crate::config::RequestConfig;
use crate::error::{ProviderError, Result, WorkflowError};
use crate::provider::{CompletionRequest, FinishReason, LlmProvider};

/// One validated (or absent) answer for a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    pub temperature: u32,
    /// Position of the raw answer among all answers seen for the prompt,
    /// across temperature steps. `None` when no answer was ever returned.
    pub answer_id: Option<usize>,
    pub answer: Option<ParsedAnswer>,
    pub finish_reason: Option<FinishReason>,
    pub model: String,
}

impl AnswerRecord {
    fn absent(temperature: u32, answer_id: Option<usize>, model: &str) -> Self {
        Self {
            temperature,
            answer_id,
            answer: None,
            finish_reason: None,
            model: model.to_string(),
        }
    }
}

/// Options for one prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub max_tokens: Option<u32>,
    pub response_format: Option<ResponseFormat>,
}

pub struct AnswerRequester {
    provider: Arc<dyn LlmProvider>,
    cache: Arc<dyn ResponseCache>,
    config: RequestConfig,
}

impl AnswerRequester {
    pub fn new(provider: Arc<dyn LlmProvider>, config: RequestConfig) -> Self {
        Self {
            provider,
            cache: Arc::new(InMemoryCache::new()),
            config,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// Validated answers for `prompt`.
    ///
    /// Always returns at least one record. When the provider yields no
    /// answers at all, the single record has an absent answer.
    pub async fn request(
        &self,
        prompt: &Prompt,
        validator: &AnswerValidator,
        options: RequestOptions,
    ) -> Result<Vec<AnswerRecord>> {
        let mut temperature = 0;
        let mut answers_seen = 0usize;

        loop {
            let answers = self.answers_for(prompt, temperature, options).await?;
            if answers.is_empty() {
                return Ok(vec![AnswerRecord::absent(
                    temperature,
                    answers_seen.checked_sub(1),
                    &self.config.model,
                )]);
            }

            let mut records = Vec::new();
            for raw in answers {
                let answer_id = answers_seen;
                answers_seen += 1;

                let parsed = validator.validate(Some(&raw.answer));
                debug!(
                    temperature,
                    answer_id,
                    raw = %raw.answer,
                    parsed = ?parsed,
                    "Parsed answer"
                );

                if let Some(answer) = parsed {
                    records.push(AnswerRecord {
                        temperature,
                        answer_id: Some(answer_id),
                        answer: Some(answer),
                        finish_reason: Some(raw.finish_reason),
                        model: self.config.model.clone(),
                    });
                }
            }

            if !records.is_empty() {
                return Ok(records);
            }

            debug!(temperature, "No answer could be parsed, raising temperature");
            // `options` is reused as is, so a raised temperature keeps the token budget.
            temperature += 1;
        }
    }

    /// Cached answers when a non-empty list is stored, fresh ones otherwise.
    async fn answers_for(
        &self,
        prompt: &Prompt,
        temperature: u32,
        options: RequestOptions,
    ) -> Result<Vec<RawAnswer>> {
        let key = CacheKey::new(prompt, &self.config.model, temperature)?;
        if let Some(cached) = self.cache.get(&key).filter(|answers| !answers.is_empty()) {
            debug!(key = %key, "Cache hit");
            return Ok(cached);
        }

        let answers = self.fetch_answers(prompt, temperature, options).await?;
        self.cache.put(key, answers.clone());
        Ok(answers)
    }

    async fn fetch_answers(
        &self,
        prompt: &Prompt,
        temperature: u32,
        options: RequestOptions,
    ) -> Result<Vec<RawAnswer>> {
        if temperature > self.config.max_temperature {
            return Ok(Vec::new());
        }

        let mut request = CompletionRequest {
            prompt: prompt.clone(),
            model: self.config.model.clone(),
            temperature,
            max_tokens: options.max_tokens,
            response_format: options.response_format,
        };
        let mut attempts = 0;

        loop {
            let choices = match self.provider.complete(&request).await {
                Ok(choices) => choices,
                Err(ProviderError::ContentFilter(reason))
                | Err(ProviderError::InvalidModelOutput(reason)) => {
                    warn!(reason = %reason, "Provider returned no usable answer");
                    return Ok(Vec::new());
                }
                Err(ProviderError::Transient(reason)) => {
                    attempts += 1;
                    if attempts > self.config.max_transient_retries {
                        return Err(WorkflowError::RetriesExhausted {
                            attempts,
                            source: ProviderError::Transient(reason),
                        });
                    }
                    warn!(
                        "Provider error, retrying (attempt {}/{}): {}",
                        attempts, self.config.max_transient_retries, reason
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            let mut answers = Vec::with_capacity(choices.len());
            let mut truncated = false;
            for choice in choices {
                let Some(content) = choice.content else {
                    return Ok(Vec::new());
                };
                if choice.finish_reason != FinishReason::Stop {
                    warn!(finish_reason = ?choice.finish_reason, "Completion did not finish");
                    truncated = true;
                    break;
                }
                answers.push(RawAnswer {
                    answer: content.trim().to_string(),
                    finish_reason: choice.finish_reason,
                });
            }

            if truncated {
                match request.max_tokens {
                    Some(budget) => {
                        request.max_tokens = Some(budget + self.config.token_increment);
                        continue;
                    }
                    None => return Ok(Vec::new()),
                }
            }

            return Ok(dedup(answers));
        }
    }
}

/// Drops repeated answers, keeping first occurrences in order.
fn dedup(answers: Vec<RawAnswer>) -> Vec<RawAnswer> {
    let mut seen = HashSet::new();
    answers
        .into_iter()
        .filter(|answer| seen.insert(answer.clone()))
        .collect()
}
