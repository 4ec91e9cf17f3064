use advisor_flow::{Context, FlowError, NextAction, Result, Task, TaskResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use super::types::context_keys;
use crate::gateways::GenerationGateway;
use crate::models::{Notice, PremiumRequest};
use crate::premium::{PremiumEstimate, estimate_premium};
use crate::prompts::build_premium_explanation_prompt;

pub struct PremiumEstimateTask;

#[async_trait]
impl Task for PremiumEstimateTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let request: PremiumRequest = context
            .get(context_keys::PREMIUM_REQUEST)
            .await
            .ok_or_else(|| FlowError::ContextError("premium_request not found".to_string()))?;

        let estimate = estimate_premium(&request);
        info!(
            task_id = %self.id(),
            plan_type = %request.plan_type,
            risk_score = estimate.risk_score,
            monthly = %estimate.monthly_display(),
            "Premium estimated"
        );

        let status_message = format!(
            "Estimated monthly premium {} at risk score {}/100",
            estimate.monthly_display(),
            estimate.risk_score
        );
        context.set(context_keys::PREMIUM_ESTIMATE, estimate).await;

        Ok(TaskResult::new_with_status(
            None,
            NextAction::Continue,
            Some(status_message),
        ))
    }
}

/// Asks the model to explain the estimate. Failure only produces a notice;
/// the numbers stored by [`PremiumEstimateTask`] are left untouched.
pub struct PremiumExplanationTask {
    generation: Arc<dyn GenerationGateway>,
}

impl PremiumExplanationTask {
    pub fn new(generation: Arc<dyn GenerationGateway>) -> Self {
        Self { generation }
    }
}

#[async_trait]
impl Task for PremiumExplanationTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let request: PremiumRequest = context
            .get(context_keys::PREMIUM_REQUEST)
            .await
            .ok_or_else(|| FlowError::ContextError("premium_request not found".to_string()))?;
        let estimate: PremiumEstimate = context
            .get(context_keys::PREMIUM_ESTIMATE)
            .await
            .ok_or_else(|| FlowError::ContextError("premium_estimate not found".to_string()))?;

        let prompt = build_premium_explanation_prompt(&request, &estimate);
        match self.generation.generate(&prompt).await {
            Ok(explanation) => {
                info!(task_id = %self.id(), "Premium explanation ready");
                context
                    .set(context_keys::PREMIUM_EXPLANATION, &explanation)
                    .await;
                Ok(TaskResult::new(Some(explanation), NextAction::End))
            }
            Err(e) => {
                error!(task_id = %self.id(), error = %e, "Premium explanation failed");
                let message = format!("Gemini Error: {e}");
                context
                    .set(context_keys::NOTICE, Notice::error(message.clone()))
                    .await;
                Ok(TaskResult::new(Some(message), NextAction::End))
            }
        }
    }
}
