use advisor_flow::{Context, FlowError, NextAction, Result, Task, TaskResult};
use async_trait::async_trait;
use tracing::info;

use super::types::{RecommendationStage, context_keys, record_stage};
use crate::models::ApplicantProfile;
use crate::risk::risk_points;

/// Entry point of the recommendation flow: checks the profile is in place
pub struct ProfileIntakeTask;

#[async_trait]
impl Task for ProfileIntakeTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let profile: ApplicantProfile = context
            .get(context_keys::PROFILE)
            .await
            .ok_or_else(|| FlowError::ContextError("applicant_profile not found".to_string()))?;

        info!(
            task_id = %self.id(),
            policy_type = %profile.policy_type,
            family_members = ?profile.family_members(),
            risk_points = risk_points(profile.age, profile.income, &profile.driving_record, profile.smoker),
            risk_label = %profile.risk_label,
            "Applicant profile collected"
        );
        record_stage(&context, RecommendationStage::ProfileCollected).await;

        Ok(TaskResult::new_with_status(
            None,
            NextAction::Continue,
            Some(format!("Profile collected - {}", profile.risk_label)),
        ))
    }
}
