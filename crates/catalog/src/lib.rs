//! Built-in model catalog for the Google AI text and embedding models.
//!
//! Prices are per 1K tokens in the entry's currency. For these models the
//! provider bills per character, so a "token" is one character.
//!
//! The catalog is advisory: adapters use it for size checks and cost
//! estimates, never for protocol decisions.

use promptwire_core::Usage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cost and size characteristics of one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelEntry {
    pub id: String,
    pub currency: String,
    /// Characters are billed as tokens.
    pub character_is_token: bool,
    pub prompt_token_cost_per_1k: f64,
    pub completion_token_cost_per_1k: f64,
    /// Maximum context size, in tokens (characters for this provider).
    pub max_tokens: usize,
    /// Billing-unit multiplier.
    pub one_tpm: u32,
}

impl ModelEntry {
    /// Currency cost of a call with the given usage.
    pub fn cost(&self, usage: &Usage) -> f64 {
        let prompt = f64::from(usage.prompt_tokens()) * self.prompt_token_cost_per_1k;
        let completion = f64::from(usage.completion_tokens()) * self.completion_token_cost_per_1k;
        (prompt + completion) / 1000.0 * f64::from(self.one_tpm)
    }
}

/// Immutable lookup table from model id to [`ModelEntry`].
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    entries: HashMap<String, ModelEntry>,
}

impl ModelCatalog {
    /// The Google AI models (PaLM text, chat, and embedding).
    pub fn google_ai() -> Self {
        Self::from_entries([
            ModelEntry {
                id: "text-bison".into(),
                currency: "usd".into(),
                character_is_token: true,
                prompt_token_cost_per_1k: 0.001,
                completion_token_cost_per_1k: 0.001,
                max_tokens: 8192,
                one_tpm: 1,
            },
            ModelEntry {
                id: "chat-bison".into(),
                currency: "usd".into(),
                character_is_token: true,
                prompt_token_cost_per_1k: 0.0005,
                completion_token_cost_per_1k: 0.0005,
                max_tokens: 4096,
                one_tpm: 1,
            },
            ModelEntry {
                id: "textembedding-gecko".into(),
                currency: "usd".into(),
                character_is_token: true,
                prompt_token_cost_per_1k: 0.0001,
                completion_token_cost_per_1k: 0.0001,
                max_tokens: 3072,
                one_tpm: 1,
            },
        ])
    }

    /// Build a catalog from explicit entries. Later duplicates win.
    pub fn from_entries(entries: impl IntoIterator<Item = ModelEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.id.clone(), e)).collect(),
        }
    }

    /// Look up a model. Returns None if not found.
    pub fn lookup(&self, model: &str) -> Option<&ModelEntry> {
        self.entries.get(model)
    }

    /// Max context size for `model`, or `default` when the model is unknown.
    pub fn max_tokens_or(&self, model: &str, default: usize) -> usize {
        self.lookup(model).map_or(default, |e| e.max_tokens)
    }

    /// Estimated cost of a call, if the model is in the catalog.
    pub fn estimate_cost(&self, model: &str, usage: &Usage) -> Option<f64> {
        self.lookup(model).map(|e| e.cost(usage))
    }

    /// All entries, sorted by id.
    pub fn entries(&self) -> Vec<&ModelEntry> {
        let mut entries: Vec<&ModelEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        entries
    }

    /// Number of models in the catalog.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
