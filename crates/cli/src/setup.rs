//! Wiring shared by the commands: config loading, the adapter, and the
//! memory sources behind the augmentation pipeline.

use std::sync::Arc;
use std::time::Duration;

use promptwire_config::AppConfig;
use promptwire_core::{ContextProvider, ModelService};
use promptwire_memory::{RemoteMemory, VectorMemory};
use promptwire_pipeline::AugmentationPipeline;
use promptwire_providers::GoogleAi;
use tracing::{debug, warn};

/// Load config and refuse to continue without credentials.
pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No Google AI API key configured!");
        eprintln!();
        eprintln!("  Set the environment variable:");
        eprintln!("    export PROMPTWIRE_API_KEY=\"$(gcloud auth print-access-token)\"");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    Ok(config)
}

pub fn build_adapter(config: &AppConfig) -> Result<Arc<GoogleAi>, Box<dyn std::error::Error>> {
    Ok(Arc::new(GoogleAi::from_config(&config.google)?))
}

/// Remote memory (if configured) followed by vector memory (if enabled).
///
/// A memory source that cannot be set up is skipped with a warning.
pub async fn build_pipeline(config: &AppConfig, model: Arc<dyn ModelService>) -> AugmentationPipeline {
    let remote: Option<Arc<dyn ContextProvider>> = match &config.memory.remote_url {
        Some(url) => match RemoteMemory::new(url.clone(), Duration::from_secs(config.google.timeout_secs)) {
            Ok(memory) => Some(Arc::new(memory)),
            Err(e) => {
                warn!("Remote memory disabled: {e}");
                None
            }
        },
        None => None,
    };

    let vector: Option<Arc<dyn ContextProvider>> = if config.memory.vector_enabled {
        let memory = VectorMemory::new(model)
            .with_limit(config.memory.recall_limit)
            .with_min_score(config.memory.min_score);
        for note in &config.memory.notes {
            if let Err(e) = memory.remember(note.as_str()).await {
                warn!("Failed to remember note: {e}");
            }
        }
        debug!(notes = memory.len().await, "Vector memory ready");
        Some(Arc::new(memory))
    } else {
        None
    };

    AugmentationPipeline::memory_sources(remote, vector)
}
