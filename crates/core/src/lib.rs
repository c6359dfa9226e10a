//! # PromptWire Core
//!
//! Domain types, traits, and error definitions for the PromptWire model
//! adapter. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every seam is defined as a trait here. Implementations live in their
//! respective crates:
//! - [`ModelService`]: a generative-text backend (see `promptwire-providers`)
//! - [`Transport`]: the network boundary an adapter dispatches through
//! - [`ContextProvider`]: an unreliable source of prompt fragments
//! - [`PromptBuilder`]: cumulative prompt state that renders the final text

pub mod context;
pub mod error;
pub mod provider;
pub mod transport;

// Re-export key types at crate root for ergonomics
pub use context::{ContextProvider, FragmentRole, InboundRequest, PromptArgs, PromptBuilder, PromptFragment};
pub use error::{ContextError, Error, ProviderError, Result, ValidationError};
pub use provider::{
    EmbedInput, EmbedResult, GenerateResult, GeneratedText, ModelConfig, ModelService, PromptConfig, Usage,
};
pub use transport::{ApiEndpoint, Transport};
