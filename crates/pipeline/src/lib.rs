//! Prompt augmentation for PromptWire.
//!
//! The [`AugmentationPipeline`] asks every configured context provider for
//! fragments, merges whatever comes back into a [`PromptBuilder`], and
//! re-renders the prompt only when something changed. [`AssistantPrompt`]
//! is the conversational builder used by the CLI.
//!
//! [`PromptBuilder`]: promptwire_core::PromptBuilder

pub mod augment;
pub mod prompt;

pub use augment::AugmentationPipeline;
pub use prompt::{AssistantPrompt, STOP_SEQUENCES};
