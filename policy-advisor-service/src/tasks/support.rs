use advisor_flow::{Context, FlowError, NextAction, Result, Task, TaskResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::types::{EMPTY_QUESTION_MESSAGE, context_keys};
use crate::gateways::GenerationGateway;
use crate::models::Notice;
use crate::prompts::build_support_prompt;

/// Stops blank questions before they reach the model
pub struct SupportQuestionTask;

#[async_trait]
impl Task for SupportQuestionTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let question: String = context
            .get(context_keys::SUPPORT_QUESTION)
            .await
            .unwrap_or_default();

        if question.trim().is_empty() {
            warn!(task_id = %self.id(), "Rejected blank support question");
            context
                .set(context_keys::NOTICE, Notice::warning(EMPTY_QUESTION_MESSAGE))
                .await;
            return Ok(TaskResult::new(
                Some(EMPTY_QUESTION_MESSAGE.to_string()),
                NextAction::End,
            ));
        }

        Ok(TaskResult::new(None, NextAction::Continue))
    }
}

/// One-shot answer from the support persona; no memory between questions
pub struct SupportAnswerTask {
    generation: Arc<dyn GenerationGateway>,
}

impl SupportAnswerTask {
    pub fn new(generation: Arc<dyn GenerationGateway>) -> Self {
        Self { generation }
    }
}

#[async_trait]
impl Task for SupportAnswerTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let question: String = context
            .get(context_keys::SUPPORT_QUESTION)
            .await
            .ok_or_else(|| FlowError::ContextError("support_question not found".to_string()))?;

        let prompt = build_support_prompt(&question);
        match self.generation.generate(&prompt).await {
            Ok(answer) => {
                let answer = answer.trim().to_string();
                info!(task_id = %self.id(), answer_length = answer.len(), "Support answer ready");
                context.set(context_keys::SUPPORT_ANSWER, &answer).await;
                Ok(TaskResult::new(Some(answer), NextAction::End))
            }
            Err(e) => {
                error!(task_id = %self.id(), error = %e, "Support answer failed");
                let message = format!("Error: {e}");
                context
                    .set(context_keys::NOTICE, Notice::error(message.clone()))
                    .await;
                Ok(TaskResult::new(Some(message), NextAction::End))
            }
        }
    }
}
