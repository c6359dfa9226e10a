//! In-process vector memory.
//!
//! Notes are embedded once when remembered. At request time the query is
//! embedded through the same [`ModelService`] and the closest notes are
//! returned as context fragments.

use std::sync::Arc;

use async_trait::async_trait;
use promptwire_core::context::{ContextProvider, InboundRequest, PromptArgs, PromptFragment};
use promptwire_core::error::ContextError;
use promptwire_core::provider::{EmbedInput, ModelService};
use promptwire_core::Result;
use tokio::sync::RwLock;
use tracing::debug;

/// A remembered piece of text and its embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub text: String,
    pub embedding: Vec<f32>,
}

/// A note paired with its similarity to a query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredNote {
    pub note: Note,
    pub score: f32,
}

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 = opposite.
/// Returns 0.0 if the lengths differ or either vector is empty or all zeros.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

/// Rank notes by cosine similarity to a query embedding.
///
/// Returns at most `limit` notes with a score of at least `min_score`,
/// best match first. Ties keep insertion order.
pub fn vector_search(notes: &[Note], query_embedding: &[f32], limit: usize, min_score: f32) -> Vec<ScoredNote> {
    let mut scored: Vec<ScoredNote> = notes
        .iter()
        .filter_map(|note| {
            let score = cosine_similarity(&note.embedding, query_embedding);
            (score >= min_score).then(|| ScoredNote {
                note: note.clone(),
                score,
            })
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored
}

/// Notes recalled by embedding similarity.
pub struct VectorMemory {
    model: Arc<dyn ModelService>,
    notes: Arc<RwLock<Vec<Note>>>,
    limit: usize,
    min_score: f32,
}

impl VectorMemory {
    pub fn new(model: Arc<dyn ModelService>) -> Self {
        Self {
            model,
            notes: Arc::new(RwLock::new(Vec::new())),
            limit: 5,
            min_score: 0.5,
        }
    }

    /// Maximum notes returned per request.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Minimum cosine similarity for a note to be recalled.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    /// Embed `text` and store it.
    pub async fn remember(&self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        let result = self.model.embed(EmbedInput::from(text.as_str()), None).await?;
        self.notes.write().await.push(Note {
            text,
            embedding: result.embedding,
        });
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notes.read().await.is_empty()
    }
}

#[async_trait]
impl ContextProvider for VectorMemory {
    fn name(&self) -> &str {
        "vector_memory"
    }

    async fn fragments(
        &self,
        request: &InboundRequest,
        args: &PromptArgs,
    ) -> std::result::Result<Vec<PromptFragment>, ContextError> {
        if args.query.is_empty() || self.notes.read().await.is_empty() {
            return Ok(Vec::new());
        }

        // No lock is held while the query is embedded.
        let query = self
            .model
            .embed(EmbedInput::from(args.query.as_str()), request.session_id.as_deref())
            .await
            .map_err(|e| ContextError::EmbeddingFailed(e.to_string()))?;

        let notes = self.notes.read().await;
        let hits = vector_search(&notes, &query.embedding, self.limit, self.min_score);
        debug!(candidates = notes.len(), recalled = hits.len(), "Vector memory recall");
        drop(notes);

        Ok(hits
            .into_iter()
            .map(|hit| PromptFragment::context(hit.note.text))
            .collect())
    }
}
