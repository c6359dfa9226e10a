//! Session memory held by an external service.
//!
//! The service is asked for fragments relevant to the current query:
//!
//! ```text
//! POST {url}
//! {"sessionId": "...", "query": "..."}
//!
//! 200 OK
//! {"fragments": [{"role": "history", "text": "..."}]}
//! ```
//!
//! Requests without a session id have no remote memory and skip the call.

use std::time::Duration;

use async_trait::async_trait;
use promptwire_core::context::{ContextProvider, InboundRequest, PromptArgs, PromptFragment};
use promptwire_core::error::ContextError;
use promptwire_core::Error;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MemoryQuery<'a> {
    session_id: &'a str,
    query: &'a str,
}

#[derive(Deserialize)]
struct MemoryReply {
    #[serde(default)]
    fragments: Vec<PromptFragment>,
}

/// Context provider backed by a remote memory service.
pub struct RemoteMemory {
    client: reqwest::Client,
    url: String,
}

impl RemoteMemory {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ContextProvider for RemoteMemory {
    fn name(&self) -> &str {
        "remote_memory"
    }

    async fn fragments(
        &self,
        request: &InboundRequest,
        args: &PromptArgs,
    ) -> Result<Vec<PromptFragment>, ContextError> {
        let Some(session_id) = request.session_id.as_deref() else {
            return Ok(Vec::new());
        };

        let response = self
            .client
            .post(&self.url)
            .json(&MemoryQuery {
                session_id,
                query: &args.query,
            })
            .send()
            .await
            .map_err(|e| ContextError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContextError::LookupFailed(format!(
                "memory service returned {}",
                status.as_u16()
            )));
        }

        let reply: MemoryReply = response
            .json()
            .await
            .map_err(|e| ContextError::LookupFailed(format!("invalid memory reply: {e}")))?;

        debug!(session_id, fragments = reply.fragments.len(), "Remote memory recall");
        Ok(reply.fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptwire_core::FragmentRole;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn memory(server: &MockServer) -> RemoteMemory {
        RemoteMemory::new(format!("{}/memory", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn returns_fragments_for_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/memory"))
            .and(body_json(json!({"sessionId": "s-1", "query": "where do I live?"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "fragments": [
                    {"role": "history", "text": "Human: I moved to Lisbon"},
                    {"text": "User lives in Lisbon"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let fragments = memory(&server)
            .fragments(&InboundRequest::with_session("s-1"), &PromptArgs::new("where do I live?"))
            .await
            .unwrap();

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].role, FragmentRole::History);
        assert_eq!(fragments[1], PromptFragment::context("User lives in Lisbon"));
    }

    #[tokio::test]
    async fn no_session_skips_the_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"fragments": []})))
            .expect(0)
            .mount(&server)
            .await;

        let fragments = memory(&server)
            .fragments(&InboundRequest::default(), &PromptArgs::new("hello"))
            .await
            .unwrap();
        assert!(fragments.is_empty());
    }

    #[tokio::test]
    async fn error_status_is_lookup_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = memory(&server)
            .fragments(&InboundRequest::with_session("s-1"), &PromptArgs::new("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, ContextError::LookupFailed(_)));
    }

    #[tokio::test]
    async fn unreachable_service_is_unavailable() {
        let memory = RemoteMemory::new("http://127.0.0.1:1/memory", Duration::from_secs(2)).unwrap();
        let err = memory
            .fragments(&InboundRequest::with_session("s-1"), &PromptArgs::new("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, ContextError::Unavailable(_)));
    }
}
