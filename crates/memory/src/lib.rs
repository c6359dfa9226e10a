//! Memory-backed context providers for PromptWire.
//!
//! Two sources feed the augmentation pipeline, in this order:
//! - [`RemoteMemory`]: a per-session memory service reached over HTTP
//! - [`VectorMemory`]: in-process notes ranked by embedding similarity

pub mod remote;
pub mod vector;

pub use remote::RemoteMemory;
pub use vector::{cosine_similarity, vector_search, Note, ScoredNote, VectorMemory};
