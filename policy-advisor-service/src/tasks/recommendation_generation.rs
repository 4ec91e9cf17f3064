use advisor_flow::{Context, FlowError, NextAction, Result, Task, TaskResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use super::types::{RecommendationStage, context_keys, record_stage};
use crate::gateways::GenerationGateway;
use crate::models::Notice;

/// Sends the assembled prompt to the model. A failed call ends the flow
/// with an error notice; it is never retried.
pub struct RecommendationGenerationTask {
    generation: Arc<dyn GenerationGateway>,
}

impl RecommendationGenerationTask {
    pub fn new(generation: Arc<dyn GenerationGateway>) -> Self {
        Self { generation }
    }
}

#[async_trait]
impl Task for RecommendationGenerationTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let prompt: String = context
            .get(context_keys::PROMPT)
            .await
            .ok_or_else(|| FlowError::ContextError("prompt not found".to_string()))?;

        record_stage(&context, RecommendationStage::GenerationIssued).await;

        match self.generation.generate(&prompt).await {
            Ok(text) => {
                info!(task_id = %self.id(), response_length = text.len(), "Recommendation generated");
                context.set(context_keys::RECOMMENDATION_TEXT, text).await;
                record_stage(&context, RecommendationStage::GenerationComplete).await;
                Ok(TaskResult::new(None, NextAction::Continue))
            }
            Err(e) => {
                error!(task_id = %self.id(), error = %e, "Recommendation generation failed");
                let message = format!("Gemini API Error: {e}");
                context
                    .set(context_keys::NOTICE, Notice::error(message.clone()))
                    .await;
                record_stage(&context, RecommendationStage::GenerationFailed).await;
                Ok(TaskResult::new_with_status(
                    Some(message),
                    NextAction::End,
                    Some("Recommendation stopped - generation failed".to_string()),
                ))
            }
        }
    }
}
