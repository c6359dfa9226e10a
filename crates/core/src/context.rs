//! Context traits — external sources of prompt fragments and the prompt
//! builder they are merged into.
//!
//! A [`ContextProvider`] looks at an inbound request and returns pieces of
//! text worth adding to the prompt. A [`PromptBuilder`] owns the cumulative
//! prompt state and knows how to render it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::ContextError;

/// Where a fragment should be spliced into the rendered prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentRole {
    /// Appended to the system instructions.
    System,
    /// Background context for the current query (the default).
    #[default]
    Context,
    /// Prior conversation turns.
    History,
}

/// A unit of context text contributed by a context provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptFragment {
    #[serde(default)]
    pub role: FragmentRole,
    pub text: String,
}

impl PromptFragment {
    pub fn new(role: FragmentRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn context(text: impl Into<String>) -> Self {
        Self::new(FragmentRole::Context, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(FragmentRole::System, text)
    }

    pub fn history(text: impl Into<String>) -> Self {
        Self::new(FragmentRole::History, text)
    }
}

/// The inbound request a prompt is being built for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboundRequest {
    /// Caller-supplied session identifier, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Free-form request metadata (headers, user ids, routing hints).
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl InboundRequest {
    pub fn with_session(session_id: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            metadata: serde_json::Map::new(),
        }
    }
}

/// The arguments the prompt is currently being built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptArgs {
    /// The user's query.
    pub query: String,

    /// System instructions, if any.
    #[serde(default)]
    pub system: String,
}

impl PromptArgs {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            system: String::new(),
        }
    }
}

/// A source of prompt fragments (remote memory, vector memory, ...).
///
/// Providers are unreliable by nature; callers must treat an `Err` as
/// "nothing to add".
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// A short name used in logs (e.g., "remote_memory", "vector_memory").
    fn name(&self) -> &str;

    /// Fragments relevant to this request, in the order they should appear.
    async fn fragments(
        &self,
        request: &InboundRequest,
        args: &PromptArgs,
    ) -> std::result::Result<Vec<PromptFragment>, ContextError>;
}

/// Cumulative prompt state for one request.
pub trait PromptBuilder: Send {
    /// Append fragments, preserving order.
    fn add_fragments(&mut self, fragments: Vec<PromptFragment>);

    /// Whether the content changed since the last render.
    fn has_changed(&self) -> bool;

    /// Render the final prompt text. Resets the changed flag.
    fn render(&mut self) -> String;
}
