//! Google AI (Vertex AI PaLM) adapter.
//!
//! Features:
//! - Completion dialect for `text-bison`, chat dialect for `chat-bison`
//! - Embeddings via `textembedding-gecko`, one string per call
//! - Character-based usage accounting (the provider bills per character)
//!
//! The dialect is resolved once from the configured model when the adapter is
//! built. Inputs are validated before anything is dispatched; transport
//! failures are returned as-is.

use std::sync::Arc;

use async_trait::async_trait;
use promptwire_catalog::ModelCatalog;
use promptwire_config::GoogleConfig;
use promptwire_core::provider::char_count;
use promptwire_core::{
    ApiEndpoint, EmbedInput, EmbedResult, Error, GenerateResult, ModelConfig, ModelService, PromptConfig, Result,
    Transport, ValidationError,
};
use tracing::debug;

use crate::dialect::{DialectResponse, ModelVariant};
use crate::http::{DEFAULT_TIMEOUT, HttpTransport};
use crate::options::GoogleAiOptions;

const DEFAULT_BASE_URL: &str = "https://us-central1-aiplatform.googleapis.com/v1/projects/";
const LOCATION: &str = "us-central1";
/// Embedding size ceiling when the generation model is missing from the catalog.
const DEFAULT_EMBED_MAX_CHARS: usize = 512;
/// The provider embeds exactly one string per call.
const MAX_EMBED_INPUTS: usize = 1;

/// Google AI model adapter.
pub struct GoogleAi {
    api_key: String,
    project_id: String,
    base_url: String,
    generate_url: String,
    embed_url: String,
    options: GoogleAiOptions,
    variant: ModelVariant,
    catalog: ModelCatalog,
    transport: Arc<dyn Transport>,
}

impl GoogleAi {
    /// Create an adapter that talks HTTPS to Vertex AI.
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>, options: GoogleAiOptions) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(DEFAULT_TIMEOUT)?);
        Self::with_transport(api_key, project_id, options, transport)
    }

    /// Create an adapter that dispatches through a custom transport.
    pub fn with_transport(
        api_key: impl Into<String>,
        project_id: impl Into<String>,
        options: GoogleAiOptions,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::config("GoogleAI API key not set"));
        }

        let project_id = project_id.into();
        let base_url = DEFAULT_BASE_URL.to_string();
        let generate_url = predict_url(&base_url, &project_id, options.model.as_str());
        let embed_url = predict_url(&base_url, &project_id, options.embed_model.as_str());

        Ok(Self {
            api_key,
            project_id,
            base_url,
            generate_url,
            embed_url,
            variant: ModelVariant::for_model(options.model),
            options,
            catalog: ModelCatalog::google_ai(),
            transport,
        })
    }

    /// Build an adapter from the `[google]` config section.
    pub fn from_config(config: &GoogleConfig) -> Result<Self> {
        let options = GoogleAiOptions::from_config(config)?;
        let transport = Arc::new(HttpTransport::new(std::time::Duration::from_secs(config.timeout_secs))?);
        let api_key = config.api_key.clone().unwrap_or_default();
        let adapter = Self::with_transport(api_key, config.project_id.clone(), options, transport)?;
        Ok(match &config.base_url {
            Some(base_url) => adapter.with_base_url(base_url),
            None => adapter,
        })
    }

    /// Use a custom base URL (e.g., for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = format!("{}/", base_url.into().trim_end_matches('/'));
        self.generate_url = predict_url(&self.base_url, &self.project_id, self.options.model.as_str());
        self.embed_url = predict_url(&self.base_url, &self.project_id, self.options.embed_model.as_str());
        self
    }

    /// Replace the model catalog used for size checks.
    pub fn with_catalog(mut self, catalog: ModelCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn options(&self) -> &GoogleAiOptions {
        &self.options
    }

    /// The dialect used by [`generate`](Self::generate).
    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Prediction endpoint for the generation model.
    pub fn endpoint_url(&self) -> &str {
        &self.generate_url
    }

    /// Prediction endpoint for the embedding model.
    pub fn embed_endpoint_url(&self) -> &str {
        &self.embed_url
    }

    /// Sampling parameters. Never dispatches.
    pub fn model_config(&self) -> ModelConfig {
        self.options.model_config()
    }

    /// Generate text for a rendered prompt.
    pub async fn generate(
        &self,
        prompt: &str,
        config: &PromptConfig,
        session_id: Option<&str>,
    ) -> Result<GenerateResult> {
        let payload = self.variant.build(prompt, &self.options, &config.stop_sequences)?;

        debug!(
            model = %self.options.model,
            variant = ?self.variant,
            prompt_chars = prompt.chars().count(),
            "Sending generate request"
        );

        let body = self
            .transport
            .dispatch(&self.api(&self.generate_url), serde_json::to_value(&payload)?)
            .await?;

        let result = self
            .variant
            .parse(body)
            .and_then(|res: DialectResponse| res.into_generate_result(prompt, session_id.map(String::from)))?;

        debug!(
            results = result.results.len(),
            total_tokens = result.usage.total_tokens(),
            "Generate request completed"
        );
        Ok(result)
    }

    /// Embed one string.
    ///
    /// The request goes to the embedding model's own endpoint
    /// ([`embed_endpoint_url`](Self::embed_endpoint_url)), not the generation
    /// endpoint. The size ceiling is the generation model's catalog
    /// `max_tokens`, or 512 characters if the model has no entry.
    pub async fn embed(&self, input: impl Into<EmbedInput>, session_id: Option<&str>) -> Result<EmbedResult> {
        let texts = input.into().into_texts();

        if texts.len() > MAX_EMBED_INPUTS {
            return Err(ValidationError::EmbeddingBatchTooLarge {
                count: texts.len(),
                max: MAX_EMBED_INPUTS,
            }
            .into());
        }

        let max = self
            .catalog
            .max_tokens_or(self.options.model.as_str(), DEFAULT_EMBED_MAX_CHARS);
        if let Some(length) = texts.iter().map(|t| t.chars().count()).find(|len| *len > max) {
            return Err(ValidationError::EmbeddingInputTooLong { length, max }.into());
        }

        let text = texts.first().map(String::as_str).unwrap_or_default();
        let payload = ModelVariant::Embedding.build(text, &self.options, &[])?;

        debug!(
            model = %self.options.embed_model,
            chars = char_count(text),
            "Sending embedding request"
        );

        let body = self
            .transport
            .dispatch(&self.api(&self.embed_url), serde_json::to_value(&payload)?)
            .await?;

        let result = ModelVariant::Embedding
            .parse(body)?
            .into_embed_result(texts, session_id.map(String::from))?;
        Ok(result)
    }

    fn api(&self, url: &str) -> ApiEndpoint {
        ApiEndpoint::new(url, &self.api_key)
    }
}

fn predict_url(base_url: &str, project_id: &str, model: &str) -> String {
    format!("{base_url}{project_id}/locations/{LOCATION}/publishers/google/models/{model}:predict")
}

#[async_trait]
impl ModelService for GoogleAi {
    fn name(&self) -> &str {
        "GoogleAI"
    }

    async fn generate(
        &self,
        prompt: &str,
        config: &PromptConfig,
        session_id: Option<&str>,
    ) -> Result<GenerateResult> {
        GoogleAi::generate(self, prompt, config, session_id).await
    }

    async fn embed(&self, input: EmbedInput, session_id: Option<&str>) -> Result<EmbedResult> {
        GoogleAi::embed(self, input, session_id).await
    }

    fn model_config(&self) -> ModelConfig {
        GoogleAi::model_config(self)
    }
}
