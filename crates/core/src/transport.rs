//! Transport trait — the boundary between an adapter and the network.
//!
//! An adapter builds a JSON payload and an endpoint; the transport moves the
//! bytes and hands back the raw JSON body. Retry and backoff are not part of
//! this contract.

use async_trait::async_trait;
use crate::error::ProviderError;

/// Endpoint URL plus credential for one provider call.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiEndpoint {
    pub url: String,
    pub key: String,
}

impl ApiEndpoint {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
        }
    }
}

impl std::fmt::Debug for ApiEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiEndpoint")
            .field("url", &self.url)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Moves a request payload to an endpoint and returns the response payload.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn dispatch(
        &self,
        api: &ApiEndpoint,
        body: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, ProviderError>;
}
