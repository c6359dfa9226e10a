//! `promptwire embed` — Embed a single piece of text.

use crate::setup;

pub async fn run(text: String, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = setup::load_config()?;
    let adapter = setup::build_adapter(&config)?;

    let result = adapter.embed(text, None).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let preview: Vec<String> = result.embedding.iter().take(8).map(|v| format!("{v:.4}")).collect();
    println!("   Dimensions: {}", result.embedding.len());
    println!("   Values:     [{}{}]", preview.join(", "), if result.embedding.len() > 8 { ", …" } else { "" });
    println!("   Tokens:     {}", result.usage.total_tokens());

    let model = adapter.options().embed_model.as_str();
    if let Some(cost) = adapter.catalog().estimate_cost(model, &result.usage) {
        println!("   Cost:       {cost:.6} ({model})");
    }

    Ok(())
}
