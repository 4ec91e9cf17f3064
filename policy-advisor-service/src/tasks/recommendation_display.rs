use advisor_flow::{Context, FlowError, NextAction, Result, Task, TaskResult};
use async_trait::async_trait;
use tracing::info;

use super::types::{RecommendationStage, context_keys, record_stage};
use crate::display::{RecommendationDisplay, parse_recommendation};

pub struct RecommendationDisplayTask;

#[async_trait]
impl Task for RecommendationDisplayTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let text: String = context
            .get(context_keys::RECOMMENDATION_TEXT)
            .await
            .ok_or_else(|| FlowError::ContextError("recommendation_text not found".to_string()))?;

        let display = parse_recommendation(&text);
        let status_message = match &display {
            RecommendationDisplay::Structured { policies, .. } => {
                format!("Recommendation ready - {} policies", policies.len())
            }
            RecommendationDisplay::Unstructured { .. } => {
                "Recommendation ready - unstructured".to_string()
            }
        };
        info!(task_id = %self.id(), "{}", status_message);

        context.set(context_keys::DISPLAY, display).await;
        record_stage(&context, RecommendationStage::Displayed).await;

        Ok(TaskResult::new_with_status(
            Some(text),
            NextAction::End,
            Some(status_message),
        ))
    }
}
