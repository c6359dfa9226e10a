//! Error types for the PromptWire domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for adapter operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Input validation (raised before any dispatch) ---
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Inputs that exceed a hard provider limit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("provider supports at most {max} stop sequences, got {count}")]
    TooManyStopSequences { count: usize, max: usize },

    #[error("provider accepts {max} embedding input per call, got {count}")]
    EmbeddingBatchTooLarge { count: usize, max: usize },

    #[error("embedding input is {length} characters, limit is {max}")]
    EmbeddingInputTooLong { length: usize, max: usize },
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failure of a single context provider. Never escapes the augmentation pipeline.
#[derive(Debug, Clone, Error)]
pub enum ContextError {
    #[error("Context source unavailable: {0}")]
    Unavailable(String),

    #[error("Context lookup failed: {0}")]
    LookupFailed(String),

    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(String),
}
