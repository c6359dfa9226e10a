//! `promptwire generate` — Augment a prompt from memory and generate a reply.

use promptwire_core::{InboundRequest, ModelService, PromptArgs, PromptBuilder};
use promptwire_pipeline::AssistantPrompt;
use uuid::Uuid;

use crate::setup;

pub async fn run(
    message: String,
    session: Option<String>,
    system: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = setup::load_config()?;
    let adapter = setup::build_adapter(&config)?;
    let pipeline = setup::build_pipeline(&config, adapter.clone()).await;

    let session_id = session.unwrap_or_else(|| Uuid::new_v4().to_string());
    let request = InboundRequest::with_session(session_id.as_str());
    let args = PromptArgs {
        query: message,
        system: system.unwrap_or_default(),
    };

    let mut prompt = AssistantPrompt::new(args.clone());
    let rendered = match pipeline.run(&request, &args, &mut prompt).await {
        Some(text) => text,
        None => prompt.render(),
    };
    tracing::debug!(chars = rendered.chars().count(), "Prompt rendered");

    let result = adapter
        .generate(&rendered, &prompt.prompt_config(), Some(&session_id))
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    for generated in &result.results {
        println!("{}", generated.text.trim());
    }

    let model = adapter.options().model.as_str();
    println!();
    println!("   Session: {session_id}");
    println!(
        "   Tokens:  {} prompt + {} completion = {}",
        result.usage.prompt_tokens(),
        result.usage.completion_tokens(),
        result.usage.total_tokens()
    );
    if let Some(entry) = adapter.catalog().lookup(model) {
        println!(
            "   Cost:    {:.6} {} ({model})",
            entry.cost(&result.usage),
            entry.currency
        );
    }
    tracing::debug!(service = adapter.name(), "Generation complete");

    Ok(())
}
