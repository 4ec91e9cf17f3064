use anyhow::Context as _;
use async_trait::async_trait;
use rig::{
    agent::Agent,
    client::CompletionClient,
    completion::Prompt,
    providers::gemini::{
        self,
        completion::gemini_api_types::{AdditionalParameters, GenerationConfig},
    },
};
use tracing::{error, info};

use super::{GatewayError, GenerationGateway};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Text generation through Gemini
pub struct GeminiGeneration {
    agent: Agent<gemini::completion::CompletionModel>,
    model: String,
}

impl GeminiGeneration {
    pub fn new(api_key: &str, model: &str) -> anyhow::Result<Self> {
        Self::with_base_url(api_key, model, GEMINI_ENDPOINT)
    }

    /// Talk to another Gemini-compatible endpoint
    pub fn with_base_url(api_key: &str, model: &str, base_url: &str) -> anyhow::Result<Self> {
        let client = gemini::Client::builder(api_key)
            .base_url(base_url)
            .build()
            .context("failed to build Gemini client")?;

        // The provider refuses to build a request without a generation config
        let params = serde_json::to_value(
            AdditionalParameters::default().with_config(GenerationConfig::default()),
        )
        .context("failed to encode Gemini generation config")?;

        let agent = client.agent(model).additional_params(params).build();
        Ok(Self {
            agent,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl GenerationGateway for GeminiGeneration {
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        info!(model = %self.model, prompt_length = prompt.len(), "Calling Gemini");

        let response = self.agent.prompt(prompt).await.map_err(|e| {
            error!(model = %self.model, error = %e, "Gemini request failed");
            GatewayError::Generation(e.to_string())
        })?;

        info!(response_length = response.len(), "Gemini responded");
        Ok(response)
    }
}
