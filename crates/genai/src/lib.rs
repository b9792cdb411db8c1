//! Generative-text client used by the advice endpoints.
//!
//! [`TextGenerator`] is the seam handlers depend on. [`GeminiClient`] is the
//! production implementation against the Google Generative Language REST
//! API, with a per-call timeout and bounded exponential-backoff retry.

pub mod client;
pub mod config;
pub mod error;
pub mod response;
pub mod retry;

use async_trait::async_trait;

pub use client::GeminiClient;
pub use config::GeminiConfig;
pub use error::GenerationError;

/// Produces free-form text for a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
