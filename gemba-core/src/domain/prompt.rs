use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\w+)\}").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A rendered prompt: either a single user message or a full conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prompt {
    Text(String),
    Chat(Vec<ChatMessage>),
}

impl Prompt {
    /// The conversation sent to a chat endpoint.
    pub fn messages(&self) -> Vec<ChatMessage> {
        match self {
            Prompt::Text(text) => vec![ChatMessage::user(text.clone())],
            Prompt::Chat(messages) => messages.clone(),
        }
    }
}

/// Template with `{name}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PromptTemplate {
    Text(String),
    Chat(Vec<ChatMessage>),
}

impl PromptTemplate {
    pub fn text(template: impl Into<String>) -> Self {
        PromptTemplate::Text(template.into())
    }

    pub fn chat(messages: Vec<ChatMessage>) -> Self {
        PromptTemplate::Chat(messages)
    }

    /// Placeholder names in order of first appearance.
    pub fn variables(&self) -> Vec<String> {
        let mut variables: Vec<String> = Vec::new();
        for part in self.parts() {
            for cap in PLACEHOLDER.captures_iter(part) {
                let name = &cap[1];
                if !variables.iter().any(|v| v == name) {
                    variables.push(name.to_string());
                }
            }
        }
        variables
    }

    pub fn uses_variable(&self, name: &str) -> bool {
        self.variables().iter().any(|v| v == name)
    }

    /// Substitutes every placeholder from `context` in a single pass, so
    /// values that themselves contain braces are inserted verbatim.
    pub fn render(&self, context: &serde_json::Value) -> Result<Prompt> {
        for var in self.variables() {
            if context.get(&var).is_none() {
                return Err(CoreError::MissingVariable(var));
            }
        }

        Ok(match self {
            PromptTemplate::Text(template) => Prompt::Text(substitute(template, context)),
            PromptTemplate::Chat(messages) => Prompt::Chat(
                messages
                    .iter()
                    .map(|m| ChatMessage::new(m.role, substitute(&m.content, context)))
                    .collect(),
            ),
        })
    }

    fn parts(&self) -> Vec<&str> {
        match self {
            PromptTemplate::Text(template) => vec![template.as_str()],
            PromptTemplate::Chat(messages) => messages.iter().map(|m| m.content.as_str()).collect(),
        }
    }
}

fn substitute(template: &str, context: &serde_json::Value) -> String {
    PLACEHOLDER
        .replace_all(template, |cap: &regex::Captures<'_>| match context.get(&cap[1]) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(value) => value.to_string(),
            None => cap[0].to_string(),
        })
        .into_owned()
}
