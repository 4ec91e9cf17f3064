use advisor_flow::{Context, Graph, GraphBuilder, Result, Task};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::display::RecommendationDisplay;
use crate::gateways::{GenerationGateway, SearchGateway};
use crate::models::{ApplicantProfile, Notice, PremiumRequest, SearchResult};
use crate::premium::PremiumEstimate;
use crate::risk::RiskLabel;
use crate::tasks::types::record_stage;
use crate::tasks::*;

/// Everything the recommendation tab shows after one submission
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationOutcome {
    pub risk_label: RiskLabel,
    pub stages: Vec<RecommendationStage>,
    pub search_results: Vec<SearchResult>,
    pub recommendation: Option<String>,
    pub display: Option<RecommendationDisplay>,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SupportOutcome {
    pub answer: Option<String>,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PremiumOutcome {
    pub estimate: PremiumEstimate,
    pub monthly_premium: String,
    pub explanation: Option<String>,
    pub notice: Option<Notice>,
}

pub fn build_recommendation_workflow(
    search: Arc<dyn SearchGateway>,
    generation: Arc<dyn GenerationGateway>,
    search_result_count: usize,
) -> Graph {
    let intake_task = Arc::new(ProfileIntakeTask);
    let intake_id = intake_task.id().to_string();

    let search_task = Arc::new(PolicySearchTask::new(search, search_result_count));
    let search_id = search_task.id().to_string();

    let no_data_task = Arc::new(NoPolicyDataTask);
    let no_data_id = no_data_task.id().to_string();

    let prompt_task = Arc::new(PromptAssemblyTask);
    let prompt_id = prompt_task.id().to_string();

    let generation_task = Arc::new(RecommendationGenerationTask::new(generation));
    let generation_id = generation_task.id().to_string();

    let display_task = Arc::new(RecommendationDisplayTask);
    let display_id = display_task.id().to_string();

    GraphBuilder::new("policy_recommendation")
        .add_task(intake_task)
        .add_task(search_task)
        .add_task(no_data_task)
        .add_task(prompt_task)
        .add_task(generation_task)
        .add_task(display_task)
        .add_edge(&intake_id, &search_id)
        .add_conditional_edge(&search_id, has_search_results, &prompt_id, &no_data_id)
        .add_edge(&prompt_id, &generation_id)
        .add_edge(&generation_id, &display_id)
        .build()
}

pub fn build_support_workflow(generation: Arc<dyn GenerationGateway>) -> Graph {
    let question_task = Arc::new(SupportQuestionTask);
    let question_id = question_task.id().to_string();

    let answer_task = Arc::new(SupportAnswerTask::new(generation));
    let answer_id = answer_task.id().to_string();

    GraphBuilder::new("customer_support")
        .add_task(question_task)
        .add_task(answer_task)
        .add_edge(&question_id, &answer_id)
        .build()
}

pub fn build_premium_workflow(generation: Arc<dyn GenerationGateway>) -> Graph {
    let estimate_task = Arc::new(PremiumEstimateTask);
    let estimate_id = estimate_task.id().to_string();

    let explanation_task = Arc::new(PremiumExplanationTask::new(generation));
    let explanation_id = explanation_task.id().to_string();

    GraphBuilder::new("premium_estimator")
        .add_task(estimate_task)
        .add_task(explanation_task)
        .add_edge(&estimate_id, &explanation_id)
        .build()
}

/// The three advisory flows, built once and shared by all requests.
/// Each call runs on a fresh [`Context`]; nothing carries over between calls.
pub struct AdvisorFlows {
    recommendation: Graph,
    support: Graph,
    premium: Graph,
}

impl AdvisorFlows {
    pub fn new(
        search: Arc<dyn SearchGateway>,
        generation: Arc<dyn GenerationGateway>,
        search_result_count: usize,
    ) -> Self {
        Self {
            recommendation: build_recommendation_workflow(
                search,
                generation.clone(),
                search_result_count,
            ),
            support: build_support_workflow(generation.clone()),
            premium: build_premium_workflow(generation),
        }
    }

    pub async fn recommend(&self, profile: ApplicantProfile) -> Result<RecommendationOutcome> {
        let risk_label = profile.risk_label;
        let context = Context::new();
        record_stage(&context, RecommendationStage::Idle).await;
        context.set(context_keys::PROFILE, profile).await;

        let result = self.recommendation.execute(context.clone()).await?;
        info!(
            graph_id = %self.recommendation.id,
            steps = result.visited.len(),
            status = ?result.status_message,
            "Recommendation flow finished"
        );

        Ok(RecommendationOutcome {
            risk_label,
            stages: context.get(context_keys::STAGES).await.unwrap_or_default(),
            search_results: context
                .get(context_keys::SEARCH_RESULTS)
                .await
                .unwrap_or_default(),
            recommendation: context.get(context_keys::RECOMMENDATION_TEXT).await,
            display: context.get(context_keys::DISPLAY).await,
            notice: context.get(context_keys::NOTICE).await,
        })
    }

    pub async fn answer(&self, question: &str) -> Result<SupportOutcome> {
        let context = Context::new();
        context.set(context_keys::SUPPORT_QUESTION, question).await;

        self.support.execute(context.clone()).await?;

        Ok(SupportOutcome {
            answer: context.get(context_keys::SUPPORT_ANSWER).await,
            notice: context.get(context_keys::NOTICE).await,
        })
    }

    pub async fn estimate_premium(&self, request: PremiumRequest) -> Result<PremiumOutcome> {
        let context = Context::new();
        context.set(context_keys::PREMIUM_REQUEST, request).await;

        self.premium.execute(context.clone()).await?;

        let estimate: PremiumEstimate = context
            .get(context_keys::PREMIUM_ESTIMATE)
            .await
            .ok_or_else(|| {
                advisor_flow::FlowError::ContextError("premium_estimate not found".to_string())
            })?;

        Ok(PremiumOutcome {
            monthly_premium: estimate.monthly_display(),
            estimate,
            explanation: context.get(context_keys::PREMIUM_EXPLANATION).await,
            notice: context.get(context_keys::NOTICE).await,
        })
    }
}
