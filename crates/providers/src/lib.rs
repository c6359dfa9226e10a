//! Model adapter implementations for PromptWire.
//!
//! [`GoogleAi`] implements `promptwire_core::ModelService` on top of a
//! pluggable `Transport`; [`HttpTransport`] is the default reqwest-backed one.

pub mod dialect;
pub mod googleai;
pub mod http;
pub mod options;

pub use dialect::{DialectRequest, DialectResponse, ModelVariant, MAX_STOP_SEQUENCES};
pub use googleai::GoogleAi;
pub use http::HttpTransport;
pub use options::{EmbedModel, GenerateModel, GoogleAiOptions};
