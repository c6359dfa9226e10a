//! Model service trait — the abstraction over a generative-text backend.
//!
//! A model service turns a rendered prompt into generated text, or a piece of
//! text into an embedding vector, and reports usage in one uniform shape no
//! matter which wire dialect the backend speaks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Per-call prompt settings supplied by the prompt builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptConfig {
    /// Sequences at which generation stops.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,
}

impl PromptConfig {
    pub fn with_stop_sequences<I, S>(stop_sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stop_sequences: stop_sequences.into_iter().map(Into::into).collect(),
        }
    }
}

/// Sampling parameters currently configured on a model service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
}

/// Token usage information.
///
/// `total_tokens` is always the sum of the other two; there is no way to
/// build a `Usage` with an independent total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl Usage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }

    pub fn prompt_tokens(&self) -> u32 {
        self.prompt_tokens
    }

    pub fn completion_tokens(&self) -> u32 {
        self.completion_tokens
    }

    pub fn total_tokens(&self) -> u32 {
        self.total_tokens
    }
}

/// Character count of `text`, used as the token count for providers that bill
/// per character.
pub fn char_count(text: &str) -> u32 {
    u32::try_from(text.chars().count()).unwrap_or(u32::MAX)
}

/// One generated candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedText {
    /// Reserved for multi-candidate disambiguation; currently always empty.
    pub id: String,
    pub text: String,
}

impl GeneratedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            text: text.into(),
        }
    }
}

/// The uniform result of a text generation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub results: Vec<GeneratedText>,
    pub usage: Usage,
}

/// Input to an embedding call: one string, or a batch of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedInput {
    Single(String),
    Batch(Vec<String>),
}

impl EmbedInput {
    /// Normalize into a list of strings.
    pub fn into_texts(self) -> Vec<String> {
        match self {
            Self::Single(text) => vec![text],
            Self::Batch(texts) => texts,
        }
    }
}

impl From<&str> for EmbedInput {
    fn from(text: &str) -> Self {
        Self::Single(text.to_string())
    }
}

impl From<String> for EmbedInput {
    fn from(text: String) -> Self {
        Self::Single(text)
    }
}

impl From<Vec<String>> for EmbedInput {
    fn from(texts: Vec<String>) -> Self {
        Self::Batch(texts)
    }
}

impl From<&[&str]> for EmbedInput {
    fn from(texts: &[&str]) -> Self {
        Self::Batch(texts.iter().map(|t| t.to_string()).collect())
    }
}

/// The result of an embedding call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// The normalized input texts.
    pub texts: Vec<String>,
    pub embedding: Vec<f32>,
    pub usage: Usage,
}

/// The core ModelService trait.
///
/// Implemented by every backend adapter. Callers (the CLI, memory providers)
/// depend on this trait rather than on a concrete adapter.
#[async_trait]
pub trait ModelService: Send + Sync {
    /// A human-readable name for this service (e.g., "GoogleAI").
    fn name(&self) -> &str;

    /// Generate text for a fully rendered prompt.
    async fn generate(
        &self,
        prompt: &str,
        config: &PromptConfig,
        session_id: Option<&str>,
    ) -> Result<GenerateResult>;

    /// Embed a single piece of text.
    async fn embed(&self, input: EmbedInput, session_id: Option<&str>) -> Result<EmbedResult>;

    /// Current sampling parameters. Never dispatches.
    fn model_config(&self) -> ModelConfig;
}
