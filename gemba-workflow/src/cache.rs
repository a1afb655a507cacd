use dashmap::DashMap;
use gemba_core::{Prompt, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::provider::FinishReason;

/// An unparsed answer as stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawAnswer {
    pub answer: String,
    pub finish_reason: FinishReason,
}

/// SHA-256 over the prompt, model and temperature step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

#[derive(Serialize)]
struct KeyMaterial<'a> {
    model: &'a str,
    temperature: u32,
    prompt: &'a Prompt,
}

impl CacheKey {
    pub fn new(prompt: &Prompt, model: &str, temperature: u32) -> Result<Self> {
        let material = serde_json::to_vec(&KeyMaterial {
            model,
            temperature,
            prompt,
        })?;
        let mut hasher = Sha256::new();
        hasher.update(&material);
        Ok(Self(hex::encode(hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Answer store keyed by [`CacheKey`]. Empty answer lists may be stored but
/// are never reused by the request loop.
pub trait ResponseCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<Vec<RawAnswer>>;
    fn put(&self, key: CacheKey, answers: Vec<RawAnswer>);
}

#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: DashMap<CacheKey, Vec<RawAnswer>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl ResponseCache for InMemoryCache {
    fn get(&self, key: &CacheKey) -> Option<Vec<RawAnswer>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn put(&self, key: CacheKey, answers: Vec<RawAnswer>) {
        self.entries.insert(key, answers);
    }
}
