use advisor_flow::{Context, FlowError, NextAction, Result, Task, TaskResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use super::types::{NO_POLICY_DATA_MESSAGE, RecommendationStage, context_keys, record_stage};
use crate::gateways::SearchGateway;
use crate::models::{ApplicantProfile, Notice, SearchResult};
use crate::prompts::build_search_query;

/// Looks up live insurance products matching the applicant
pub struct PolicySearchTask {
    search: Arc<dyn SearchGateway>,
    num_results: usize,
}

impl PolicySearchTask {
    pub fn new(search: Arc<dyn SearchGateway>, num_results: usize) -> Self {
        Self {
            search,
            num_results,
        }
    }
}

#[async_trait]
impl Task for PolicySearchTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let profile: ApplicantProfile = context
            .get(context_keys::PROFILE)
            .await
            .ok_or_else(|| FlowError::ContextError("applicant_profile not found".to_string()))?;

        let query = build_search_query(&profile);
        context.set(context_keys::SEARCH_QUERY, &query).await;
        record_stage(&context, RecommendationStage::SearchIssued).await;

        let results = self.search.search(&query, self.num_results).await;
        let found = results.len();
        context.set(context_keys::SEARCH_RESULTS, results).await;

        if found == 0 {
            warn!(task_id = %self.id(), query = %query, "Search returned no policies");
            record_stage(&context, RecommendationStage::SearchEmpty).await;
        } else {
            info!(task_id = %self.id(), found, "Search returned policies");
            record_stage(&context, RecommendationStage::SearchComplete).await;
        }

        Ok(TaskResult::new_with_status(
            None,
            NextAction::Continue,
            Some(format!("Search returned {found} results")),
        ))
    }
}

/// Edge condition: the search produced something to work with
pub fn has_search_results(context: &Context) -> bool {
    context
        .get_sync::<Vec<SearchResult>>(context_keys::SEARCH_RESULTS)
        .is_some_and(|results| !results.is_empty())
}

/// Terminal branch when the search came back empty; no generation is attempted
pub struct NoPolicyDataTask;

#[async_trait]
impl Task for NoPolicyDataTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        context
            .set(context_keys::NOTICE, Notice::error(NO_POLICY_DATA_MESSAGE))
            .await;

        Ok(TaskResult::new_with_status(
            Some(NO_POLICY_DATA_MESSAGE.to_string()),
            NextAction::End,
            Some("Recommendation stopped - no search results".to_string()),
        ))
    }
}
