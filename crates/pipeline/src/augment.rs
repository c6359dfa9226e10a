//! Prompt augmentation from unreliable context sources.
//!
//! A request moves through three stages:
//!
//! 1. **Collecting**: each provider is asked for fragments, in priority
//!    order. A failing provider is logged and contributes nothing.
//! 2. **Merged**: collected fragments are handed to the prompt builder in
//!    that same order.
//! 3. **Rendered** or **Unchanged**: the prompt is re-rendered only if the
//!    builder reports a change.
//!
//! Providers are awaited one after another so fragment order is
//! deterministic.

use std::sync::Arc;

use promptwire_core::context::{ContextProvider, InboundRequest, PromptArgs, PromptBuilder, PromptFragment};
use tracing::{debug, warn};

/// Runs context providers for a request and merges their fragments.
#[derive(Clone, Default)]
pub struct AugmentationPipeline {
    providers: Vec<Arc<dyn ContextProvider>>,
}

impl AugmentationPipeline {
    /// An empty pipeline. Providers run in the order they are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard memory sources: remote memory first, then vector memory.
    pub fn memory_sources(
        remote: Option<Arc<dyn ContextProvider>>,
        vector: Option<Arc<dyn ContextProvider>>,
    ) -> Self {
        Self {
            providers: remote.into_iter().chain(vector).collect(),
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn ContextProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Provider names in priority order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Ask every provider for fragments. Never fails.
    pub async fn collect(&self, request: &InboundRequest, args: &PromptArgs) -> Vec<PromptFragment> {
        let mut fragments = Vec::new();
        for provider in &self.providers {
            fragments.extend(supervised(provider.as_ref(), request, args).await);
        }
        fragments
    }

    /// Augment `builder` for this request.
    ///
    /// Returns the re-rendered prompt, or `None` if nothing changed.
    pub async fn run(
        &self,
        request: &InboundRequest,
        args: &PromptArgs,
        builder: &mut dyn PromptBuilder,
    ) -> Option<String> {
        debug!(stage = "collecting", providers = self.providers.len(), "Augmenting prompt");
        let fragments = self.collect(request, args).await;

        if !fragments.is_empty() {
            debug!(stage = "merged", fragments = fragments.len(), "Augmenting prompt");
            builder.add_fragments(fragments);
        }

        if builder.has_changed() {
            debug!(stage = "rendered", "Augmenting prompt");
            Some(builder.render())
        } else {
            debug!(stage = "unchanged", "Augmenting prompt");
            None
        }
    }
}

/// Invoke one provider, turning any failure into an empty contribution.
async fn supervised(
    provider: &dyn ContextProvider,
    request: &InboundRequest,
    args: &PromptArgs,
) -> Vec<PromptFragment> {
    match provider.fragments(request, args).await {
        Ok(fragments) => {
            if !fragments.is_empty() {
                debug!(provider = provider.name(), count = fragments.len(), "Collected fragments");
            }
            fragments
        }
        Err(e) => {
            warn!(provider = provider.name(), "Context provider failed: {e}");
            vec![]
        }
    }
}
