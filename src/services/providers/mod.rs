/// External model providers
///
/// This module holds the seams to third-party services: text embeddings and
/// show concepts (OpenAI) and cover art (LightX). The recommendation core only
/// sees the traits, so tests and alternative backends can be swapped in.
use crate::{error::AppResult, models::ShowConcept};

pub mod lightx;
pub mod openai;

pub use lightx::LightxClient;
pub use openai::OpenAiClient;

/// Failure of a single call to an embedding or chat provider
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Turns text into a fixed-dimension vector
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single piece of text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Writes a fictional show concept inspired by a set of titles
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ConceptWriter: Send + Sync {
    async fn write_concept(&self, seed_titles: &[String]) -> Result<ShowConcept, ProviderError>;
}

/// Produces image bytes for a text prompt
///
/// Implementations may run an asynchronous job on the provider side; they
/// must surface `GenerationTimeout` / `GenerationFailed` rather than hang.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> AppResult<Vec<u8>>;
}
