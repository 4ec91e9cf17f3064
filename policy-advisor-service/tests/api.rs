use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use tower::ServiceExt;

use policy_advisor_service::{
    AdvisorFlows, AppState, ReferenceData, build_router,
    display::POLICY_LIST_HEADING,
    gateways::{GatewayError, GenerationGateway, SearchGateway},
    models::SearchResult,
};

struct FakeSearch {
    results: Vec<SearchResult>,
    queries: Mutex<Vec<String>>,
}

impl FakeSearch {
    fn with_hits(n: usize) -> Arc<Self> {
        let results = (1..=n)
            .map(|i| SearchResult {
                title: format!("Insurer plan {i}"),
                link: format!("https://insurer.example/plans/{i}"),
                snippet: format!("Affordable cover option {i}"),
            })
            .collect();
        Arc::new(Self {
            results,
            queries: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl SearchGateway for FakeSearch {
    async fn search(&self, query: &str, num_results: usize) -> Vec<SearchResult> {
        self.queries.lock().unwrap().push(query.to_string());
        self.results.iter().take(num_results).cloned().collect()
    }
}

struct FakeGeneration {
    reply: Result<String, String>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl FakeGeneration {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationGateway for FakeGeneration {
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(GatewayError::Generation)
    }
}

fn reference() -> ReferenceData {
    let csv = "Gender,Marital Status,Occupation,Education Level,Geographic Information,Driving Record\n\
               Male,Married,Engineer,Bachelor's Degree,Maharashtra,Clean\n\
               Female,Single,Teacher,Master's Degree,Karnataka,DUI\n\
               Male,Single,Engineer,Bachelor's Degree,Delhi,Clean\n";
    ReferenceData::from_reader(csv.as_bytes()).unwrap()
}

fn app(search: Arc<FakeSearch>, generation: Arc<FakeGeneration>) -> Router {
    build_router(AppState {
        flows: Arc::new(AdvisorFlows::new(search, generation, 5)),
        reference: Arc::new(reference()),
    })
}

fn submission() -> Value {
    json!({
        "age": 34,
        "gender": "Male",
        "marital_status": "Married",
        "occupation": "Engineer",
        "income": 650000.0,
        "education": "Bachelor's Degree",
        "location": "Maharashtra",
        "policy_type": "Health Insurance",
        "smoker": false,
        "driving_record": "Clean",
        "pre_existing_condition": "Diabetes"
    })
}

fn premium_request() -> Value {
    json!({
        "plan_type": "Term Life Insurance",
        "age": 40,
        "income": 200000.0,
        "coverage": 1000000.0,
        "smoker": true,
        "driving_record": "Minor Offenses"
    })
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .expect("route executes");
    read_response(response).await
}

async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .expect("route executes");
    read_response(response).await
}

async fn read_response(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn structured_reply() -> String {
    format!(
        "**Underwriting Analysis:** Low risk applicant.\n\n{POLICY_LIST_HEADING}\n\
         1. **Plan A** - ₹700/month\n\n2. **Plan B** - ₹900/month\n\n3. **Plan C** - ₹950/month"
    )
}

#[tokio::test]
async fn recommendation_returns_structured_cards() {
    let search = FakeSearch::with_hits(8);
    let generation = FakeGeneration::replying(&structured_reply());
    let (status, body) = post_json(
        app(search.clone(), generation.clone()),
        "/recommendations",
        submission(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risk_label"], "Low Risk");
    assert_eq!(
        body["stages"],
        json!([
            "idle",
            "profile_collected",
            "search_issued",
            "search_complete",
            "prompt_built",
            "generation_issued",
            "generation_complete",
            "displayed"
        ])
    );
    assert_eq!(body["search_results"].as_array().unwrap().len(), 5);
    assert_eq!(body["display"]["layout"], "structured");
    assert_eq!(
        body["display"]["policies"],
        json!([
            "**1.** **Plan A** - ₹700/month",
            "**2.** **Plan B** - ₹900/month",
            "**3.** **Plan C** - ₹950/month"
        ])
    );
    assert!(body["notice"].is_null());

    let queries = search.queries.lock().unwrap().clone();
    assert_eq!(
        queries,
        vec![
            "best insurance policy in India for 34 year old Engineer Male with income 650000"
                .to_string()
        ]
    );

    let prompts = generation.prompts.lock().unwrap().clone();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Insurer plan 5"));
    assert!(!prompts[0].contains("Insurer plan 6"));
    assert!(prompts[0].contains(POLICY_LIST_HEADING));
}

#[tokio::test]
async fn recommendation_without_search_hits_is_bad_gateway() {
    let generation = FakeGeneration::replying("unused");
    let (status, body) = post_json(
        app(FakeSearch::with_hits(0), generation.clone()),
        "/recommendations",
        submission(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["stages"].as_array().unwrap().last().unwrap(), "search_empty");
    assert_eq!(body["notice"]["severity"], "error");
    assert_eq!(
        body["notice"]["message"],
        "❌ No policy data found from the web. Please try again later."
    );
    assert!(body["display"].is_null());
    assert_eq!(generation.calls(), 0);
}

#[tokio::test]
async fn recommendation_generation_failure_is_bad_gateway() {
    let generation = FakeGeneration::failing("API key not valid");
    let (status, body) = post_json(
        app(FakeSearch::with_hits(3), generation.clone()),
        "/recommendations",
        submission(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["notice"]["message"], "Gemini API Error: API key not valid");
    assert_eq!(
        body["stages"].as_array().unwrap().last().unwrap(),
        "generation_failed"
    );
    assert!(body["recommendation"].is_null());
    assert_eq!(generation.calls(), 1);
}

#[tokio::test]
async fn recommendation_without_heading_is_shown_raw() {
    let generation = FakeGeneration::replying("Consider a basic health plan.");
    let (status, body) = post_json(
        app(FakeSearch::with_hits(2), generation),
        "/recommendations",
        submission(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["display"],
        json!({ "layout": "unstructured", "raw": "Consider a basic health plan." })
    );
}

#[tokio::test]
async fn family_floater_defaults_member_conditions() {
    let mut request = submission();
    request["policy_type"] = json!("Family Floater Plan");
    request["family_members"] = json!(3);
    request.as_object_mut().unwrap().remove("pre_existing_condition");

    let generation = FakeGeneration::replying(&structured_reply());
    let (status, _) = post_json(
        app(FakeSearch::with_hits(1), generation.clone()),
        "/recommendations",
        request,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let prompt = generation.prompts.lock().unwrap()[0].clone();
    assert!(prompt.contains("Family Members: 3"));
    assert!(prompt.contains("[None, None, None]"));
}

#[tokio::test]
async fn invalid_submission_is_rejected_before_search() {
    let search = FakeSearch::with_hits(3);
    let mut request = submission();
    request["age"] = json!(17);

    let (status, body) = post_json(
        app(search.clone(), FakeGeneration::replying("unused")),
        "/recommendations",
        request,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "age must be between 18 and 80, got 17");
    assert!(search.queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn family_floater_with_single_condition_is_rejected() {
    let search = FakeSearch::with_hits(3);
    let mut request = submission();
    request["policy_type"] = json!("Family Floater Plan");
    request["family_members"] = json!(2);

    let (status, body) = post_json(
        app(search.clone(), FakeGeneration::replying("unused")),
        "/recommendations",
        request,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("family_member_conditions"));
    assert!(search.queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn blank_support_question_is_unprocessable() {
    let generation = FakeGeneration::replying("unused");
    let (status, body) = post_json(
        app(FakeSearch::with_hits(0), generation.clone()),
        "/support",
        json!({ "question": "  \n " }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["notice"]["severity"], "warning");
    assert_eq!(body["notice"]["message"], "Please type a question to proceed.");
    assert_eq!(generation.calls(), 0);
}

#[tokio::test]
async fn support_question_is_answered() {
    let generation = FakeGeneration::replying("  A waiting period is the time before cover starts.\n");
    let (status, body) = post_json(
        app(FakeSearch::with_hits(0), generation.clone()),
        "/support",
        json!({ "question": "What is a waiting period?" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["answer"],
        "A waiting period is the time before cover starts."
    );
    let prompt = generation.prompts.lock().unwrap()[0].clone();
    assert!(prompt.ends_with("User: What is a waiting period?\n\nAgent:"));
}

#[tokio::test]
async fn support_generation_failure_is_bad_gateway() {
    let (status, body) = post_json(
        app(FakeSearch::with_hits(0), FakeGeneration::failing("quota exceeded")),
        "/support",
        json!({ "question": "Hello?" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["notice"]["message"], "Error: quota exceeded");
    assert!(body["answer"].is_null());
}

#[tokio::test]
async fn premium_estimate_with_explanation() {
    let (status, body) = post_json(
        app(
            FakeSearch::with_hits(0),
            FakeGeneration::replying("Smoking raises your premium."),
        ),
        "/premium",
        premium_request(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estimate"]["risk_score"], 80);
    assert_eq!(body["monthly_premium"], "₹1500.00");
    assert_eq!(body["explanation"], "Smoking raises your premium.");
    assert!(body["notice"].is_null());
}

#[tokio::test]
async fn premium_numbers_survive_explanation_failure() {
    let (status, body) = post_json(
        app(FakeSearch::with_hits(0), FakeGeneration::failing("timeout")),
        "/premium",
        premium_request(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["monthly_premium"], "₹1500.00");
    assert!(body["explanation"].is_null());
    assert_eq!(body["notice"]["message"], "Gemini Error: timeout");
}

#[tokio::test]
async fn negative_premium_income_is_rejected() {
    let mut request = premium_request();
    request["income"] = json!(-1.0);
    let generation = FakeGeneration::replying("unused");

    let (status, body) = post_json(
        app(FakeSearch::with_hits(0), generation.clone()),
        "/premium",
        request,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("income"));
    assert_eq!(generation.calls(), 0);
}

#[tokio::test]
async fn choices_list_dataset_and_fixed_values() {
    let (status, body) = get_json(
        app(FakeSearch::with_hits(0), FakeGeneration::replying("")),
        "/choices",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["genders"], json!(["Male", "Female"]));
    assert_eq!(body["occupations"], json!(["Engineer", "Teacher"]));
    assert_eq!(
        body["locations"],
        json!(["Maharashtra", "Karnataka", "Delhi"])
    );
    assert_eq!(body["driving_records"], json!(["Clean", "DUI"]));
    assert_eq!(body["policy_types"].as_array().unwrap().len(), 7);
    assert_eq!(body["pre_existing_conditions"][4], "Heart Disease");
    assert_eq!(
        body["premium_driving_records"],
        json!(["Clean", "Minor Offenses", "Major Violations"])
    );
    assert_eq!(body["age"], json!({ "min": 18, "max": 80 }));
    assert_eq!(body["family_members"], json!({ "min": 1, "max": 10 }));
}

#[tokio::test]
async fn health_check_reports_healthy_with_correlation_id() {
    let response = app(FakeSearch::with_hits(0), FakeGeneration::replying(""))
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-correlation-id"));
    let (status, body) = read_response(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}
