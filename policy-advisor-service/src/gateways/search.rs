use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info, warn};

use super::SearchGateway;
use crate::models::SearchResult;

pub const SERPAPI_ENDPOINT: &str = "https://serpapi.com/search";
pub const DEFAULT_SEARCH_RESULTS: usize = 5;

/// Google organic results through SerpApi
pub struct SerpApiSearch {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl SerpApiSearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: SERPAPI_ENDPOINT.to_string(),
        }
    }

    /// Point the gateway at another SerpApi-compatible endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn fetch(&self, query: &str, num_results: usize) -> anyhow::Result<Value> {
        let num = num_results.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("SerpApi request failed: {}", e))?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse SerpApi response: {}", e))?;

        if !status.is_success() {
            warn!(%status, "SerpApi answered with an error status");
        }
        Ok(payload)
    }
}

/// Read `organic_results` from a SerpApi payload, tolerating missing fields
pub fn parse_organic_results(payload: &Value, num_results: usize) -> Vec<SearchResult> {
    let Some(items) = payload.get("organic_results").and_then(Value::as_array) else {
        if let Some(message) = payload.get("error").and_then(Value::as_str) {
            warn!(error = %message, "SerpApi returned no organic results");
        }
        return Vec::new();
    };

    let field = |item: &Value, key: &str| {
        item.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    items
        .iter()
        .take(num_results)
        .map(|item| SearchResult {
            title: field(item, "title"),
            link: field(item, "link"),
            snippet: field(item, "snippet"),
        })
        .collect()
}

#[async_trait]
impl SearchGateway for SerpApiSearch {
    async fn search(&self, query: &str, num_results: usize) -> Vec<SearchResult> {
        info!(query = %query, num_results, "Searching for insurance policies");

        match self.fetch(query, num_results).await {
            Ok(payload) => {
                let results = parse_organic_results(&payload, num_results);
                info!(found = results.len(), "Search completed");
                results
            }
            Err(e) => {
                error!(error = %e, "Policy search failed");
                Vec::new()
            }
        }
    }
}
