//! `promptwire config` — Configuration management commands.

use promptwire_config::AppConfig;
use promptwire_providers::GoogleAiOptions;

pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    let dir = AppConfig::config_dir();
    let path = dir.join("config.toml");

    if path.exists() {
        println!("   Config already exists at {}", path.display());
        return Ok(());
    }

    std::fs::create_dir_all(&dir)?;
    std::fs::write(&path, AppConfig::default_toml())?;
    println!("   ✅ Wrote default config to {}", path.display());
    println!("   Set google.project_id and PROMPTWIRE_API_KEY before generating.");
    Ok(())
}

pub fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();

            if !config.has_api_key() {
                warnings.push("No API key set (set PROMPTWIRE_API_KEY)".to_string());
            }
            if config.google.project_id.is_empty() {
                warnings.push("google.project_id is empty".to_string());
            }
            if let Err(e) = GoogleAiOptions::from_config(&config.google) {
                warnings.push(e.to_string());
            }
            if config.memory.vector_enabled && config.memory.recall_limit == 0 {
                warnings.push("Vector memory is enabled but memory.recall_limit is 0".to_string());
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Project:   {}", config.google.project_id);
            println!("   Model:     {}", config.google.model);
            println!("   Embedding: {}", config.google.embed_model);
            println!(
                "   Memory:    remote {}, vector {} ({} notes)",
                if config.memory.remote_url.is_some() { "on" } else { "off" },
                if config.memory.vector_enabled { "on" } else { "off" },
                config.memory.notes.len()
            );
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}
