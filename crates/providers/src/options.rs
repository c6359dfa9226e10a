//! Model identifiers and generation options for Google AI.

use std::fmt;
use std::str::FromStr;

use promptwire_config::GoogleConfig;
use promptwire_core::{Error, ModelConfig};
use serde::{Deserialize, Serialize};

/// Models for text generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerateModel {
    #[serde(rename = "text-bison")]
    TextBison,
    #[serde(rename = "chat-bison")]
    ChatBison,
}

impl GenerateModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextBison => "text-bison",
            Self::ChatBison => "chat-bison",
        }
    }
}

impl fmt::Display for GenerateModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerateModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text-bison" => Ok(Self::TextBison),
            "chat-bison" => Ok(Self::ChatBison),
            other => Err(Error::config(format!("unknown Google AI generation model: {other}"))),
        }
    }
}

/// Models for embeddings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmbedModel {
    #[serde(rename = "textembedding-gecko")]
    TextEmbeddingGecko,
}

impl EmbedModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextEmbeddingGecko => "textembedding-gecko",
        }
    }
}

impl fmt::Display for EmbedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbedModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "textembedding-gecko" => Ok(Self::TextEmbeddingGecko),
            other => Err(Error::config(format!("unknown Google AI embedding model: {other}"))),
        }
    }
}

/// Model selection and sampling parameters for the Google AI adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleAiOptions {
    pub model: GenerateModel,
    pub embed_model: EmbedModel,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
}

impl Default for GoogleAiOptions {
    fn default() -> Self {
        Self {
            model: GenerateModel::TextBison,
            embed_model: EmbedModel::TextEmbeddingGecko,
            max_tokens: 300,
            temperature: 0.45,
            top_p: 1.0,
            top_k: 40,
        }
    }
}

impl GoogleAiOptions {
    /// Defaults tuned for more creative text.
    pub fn creative() -> Self {
        Self {
            temperature: 0.9,
            ..Self::default()
        }
    }

    /// Defaults tuned for fast, focused text.
    pub fn fast() -> Self {
        Self {
            temperature: 0.45,
            ..Self::default()
        }
    }

    /// Build options from the `[google]` config section.
    pub fn from_config(config: &GoogleConfig) -> Result<Self, Error> {
        Ok(Self {
            model: config.model.parse()?,
            embed_model: config.embed_model.parse()?,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
        })
    }

    /// Sampling parameters as seen by callers.
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
        }
    }
}
