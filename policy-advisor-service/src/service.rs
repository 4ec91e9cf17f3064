use axum::{
    Router,
    extract::State,
    http::{HeaderValue, Request, StatusCode},
    middleware::{Next, from_fn},
    response::{Json, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info, warn};
use uuid::Uuid;

use crate::{
    config::Config,
    gateways::{GeminiGeneration, SerpApiSearch},
    models::{
        ApplicantProfile, ApplicantSubmission, MAX_AGE, MAX_FAMILY_MEMBERS, MIN_AGE,
        MIN_FAMILY_MEMBERS, Notice, PolicyType, PreExistingCondition, PremiumDrivingRecord,
        PremiumRequest, Severity,
    },
    reference::ReferenceData,
    workflow::{AdvisorFlows, PremiumOutcome, RecommendationOutcome, SupportOutcome},
};

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

type ApiResult<T> = Result<(StatusCode, Json<T>), ApiError>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn internal_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

/// A flow that stopped on a notice still answers with its body; only the status changes
fn notice_status(notice: Option<&Notice>) -> StatusCode {
    match notice.map(|n| n.severity) {
        None => StatusCode::OK,
        Some(Severity::Warning) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(Severity::Error) => StatusCode::BAD_GATEWAY,
    }
}

#[derive(Clone)]
pub struct AppState {
    pub flows: Arc<AdvisorFlows>,
    pub reference: Arc<ReferenceData>,
}

#[derive(Debug, Deserialize)]
pub struct SupportRequest {
    #[serde(default)]
    pub question: String,
}

/// Wire the real gateways and reference data from configuration
pub fn create_app(config: &Config) -> anyhow::Result<Router> {
    let reference = ReferenceData::from_path(&config.reference_data_path)?;
    let search = Arc::new(SerpApiSearch::new(config.serpapi_key.clone()));
    let generation = Arc::new(GeminiGeneration::new(
        &config.gemini_api_key,
        &config.gemini_model,
    )?);

    let state = AppState {
        flows: Arc::new(AdvisorFlows::new(
            search,
            generation,
            config.search_result_count,
        )),
        reference: Arc::new(reference),
    };

    Ok(build_router(state))
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/choices", get(choices))
        .route("/recommendations", post(recommend_policies))
        .route("/support", post(answer_support_question))
        .route("/premium", post(estimate_premium))
        .layer(from_fn(correlation_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Tag every request with a fresh correlation id and run it inside a span carrying it
async fn correlation_id_middleware(mut request: Request<axum::body::Body>, next: Next) -> Response {
    let correlation_id = Uuid::new_v4().to_string();
    let header = HeaderValue::from_str(&correlation_id).ok();

    if let Some(value) = &header {
        request
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, value.clone());
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    let mut response = next.run(request).instrument(span).await;

    if let Some(value) = header {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Policy Advisor Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Insurance policy recommendations, customer support answers and premium estimates",
        "endpoints": {
            "GET /choices": "Dropdown values for the request forms",
            "POST /recommendations": "Score an applicant and recommend policies from a live web search",
            "POST /support": "Ask the support agent a question",
            "POST /premium": "Estimate a monthly premium",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn choices(State(state): State<AppState>) -> Json<Value> {
    let reference = &state.reference;
    Json(json!({
        "genders": reference.genders,
        "marital_statuses": reference.marital_statuses,
        "occupations": reference.occupations,
        "education_levels": reference.education_levels,
        "locations": reference.locations,
        "driving_records": reference.driving_records,
        "policy_types": PolicyType::ALL,
        "pre_existing_conditions": PreExistingCondition::ALL,
        "smoker": ["Yes", "No"],
        "premium_driving_records": PremiumDrivingRecord::ALL,
        "age": { "min": MIN_AGE, "max": MAX_AGE },
        "family_members": { "min": MIN_FAMILY_MEMBERS, "max": MAX_FAMILY_MEMBERS }
    }))
}

async fn recommend_policies(
    State(state): State<AppState>,
    Json(submission): Json<ApplicantSubmission>,
) -> ApiResult<RecommendationOutcome> {
    let profile = ApplicantProfile::from_submission(submission).map_err(|e| {
        warn!(error = %e, "Rejected applicant submission");
        bad_request_error(&e.to_string())
    })?;

    info!(
        policy_type = %profile.policy_type,
        age = profile.age,
        risk_label = %profile.risk_label,
        "Starting policy recommendation"
    );

    let outcome = state.flows.recommend(profile).await.map_err(|e| {
        error!(error = %e, "Recommendation flow failed");
        internal_error("Recommendation flow failed", &e.to_string())
    })?;

    Ok((notice_status(outcome.notice.as_ref()), Json(outcome)))
}

async fn answer_support_question(
    State(state): State<AppState>,
    Json(request): Json<SupportRequest>,
) -> ApiResult<SupportOutcome> {
    info!(question_length = request.question.len(), "Support question received");

    let outcome = state.flows.answer(&request.question).await.map_err(|e| {
        error!(error = %e, "Support flow failed");
        internal_error("Support flow failed", &e.to_string())
    })?;

    Ok((notice_status(outcome.notice.as_ref()), Json(outcome)))
}

async fn estimate_premium(
    State(state): State<AppState>,
    Json(request): Json<PremiumRequest>,
) -> ApiResult<PremiumOutcome> {
    request.validate().map_err(|e| {
        warn!(error = %e, "Rejected premium request");
        bad_request_error(&e.to_string())
    })?;

    let outcome = state.flows.estimate_premium(request).await.map_err(|e| {
        error!(error = %e, "Premium flow failed");
        internal_error("Premium flow failed", &e.to_string())
    })?;

    // The explanation is optional; its notice never hides the numbers
    Ok((StatusCode::OK, Json(outcome)))
}
