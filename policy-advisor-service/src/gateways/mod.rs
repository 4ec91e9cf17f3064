//! Seams to the two external services. Flows only see these traits, so
//! tests can swap in canned implementations.

pub mod generation;
pub mod search;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::SearchResult;

pub use generation::{DEFAULT_GEMINI_MODEL, GEMINI_ENDPOINT, GeminiGeneration};
pub use search::{DEFAULT_SEARCH_RESULTS, SERPAPI_ENDPOINT, SerpApiSearch};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Generation(String),
}

/// Web search for insurance products
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Ranked hits, at most `num_results`. Empty when nothing matched or the
    /// upstream answer could not be used.
    async fn search(&self, query: &str, num_results: usize) -> Vec<SearchResult>;
}

/// Hosted LLM text generation
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError>;
}
