use advisor_flow::Context;
use serde::{Deserialize, Serialize};

/// Progress markers of the recommendation flow, recorded in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStage {
    Idle,
    ProfileCollected,
    SearchIssued,
    SearchComplete,
    SearchEmpty,
    PromptBuilt,
    GenerationIssued,
    GenerationComplete,
    GenerationFailed,
    Displayed,
}

pub async fn record_stage(context: &Context, stage: RecommendationStage) {
    context.push(context_keys::STAGES, stage).await;
}

pub mod context_keys {
    pub const PROFILE: &str = "applicant_profile";
    pub const STAGES: &str = "stages";
    pub const SEARCH_QUERY: &str = "search_query";
    pub const SEARCH_RESULTS: &str = "search_results";
    pub const PROMPT: &str = "prompt";
    pub const RECOMMENDATION_TEXT: &str = "recommendation_text";
    pub const DISPLAY: &str = "display";
    pub const NOTICE: &str = "notice";

    pub const SUPPORT_QUESTION: &str = "support_question";
    pub const SUPPORT_ANSWER: &str = "support_answer";

    pub const PREMIUM_REQUEST: &str = "premium_request";
    pub const PREMIUM_ESTIMATE: &str = "premium_estimate";
    pub const PREMIUM_EXPLANATION: &str = "premium_explanation";
}

pub const NO_POLICY_DATA_MESSAGE: &str = "❌ No policy data found from the web. Please try again later.";
pub const EMPTY_QUESTION_MESSAGE: &str = "Please type a question to proceed.";
