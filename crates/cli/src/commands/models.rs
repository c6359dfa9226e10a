//! `promptwire models` — List the model catalog.

use promptwire_catalog::ModelCatalog;

pub fn run() {
    let catalog = ModelCatalog::google_ai();

    println!("{:<22} {:>12} {:>12} {:>8}", "MODEL", "PROMPT/1K", "COMPL/1K", "MAX");
    for entry in catalog.entries() {
        println!(
            "{:<22} {:>12} {:>12} {:>8}",
            entry.id,
            format!("{} {}", entry.prompt_token_cost_per_1k, entry.currency),
            format!("{} {}", entry.completion_token_cost_per_1k, entry.currency),
            entry.max_tokens
        );
    }
}
