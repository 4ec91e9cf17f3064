use advisor_flow::{Context, FlowError, NextAction, Result, Task, TaskResult};
use async_trait::async_trait;
use tracing::info;

use super::types::{RecommendationStage, context_keys, record_stage};
use crate::models::{ApplicantProfile, SearchResult};
use crate::prompts::build_recommendation_prompt;

pub struct PromptAssemblyTask;

#[async_trait]
impl Task for PromptAssemblyTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let profile: ApplicantProfile = context
            .get(context_keys::PROFILE)
            .await
            .ok_or_else(|| FlowError::ContextError("applicant_profile not found".to_string()))?;

        let results: Vec<SearchResult> = context
            .get(context_keys::SEARCH_RESULTS)
            .await
            .ok_or_else(|| FlowError::ContextError("search_results not found".to_string()))?;

        let prompt = build_recommendation_prompt(&profile, &results);
        info!(task_id = %self.id(), prompt_length = prompt.len(), "Recommendation prompt built");

        context.set(context_keys::PROMPT, prompt).await;
        record_stage(&context, RecommendationStage::PromptBuilt).await;

        Ok(TaskResult::new(None, NextAction::Continue))
    }
}
