use anyhow::Context as _;
use policy_advisor_service::{Config, create_app};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured JSON tracing based on environment variables
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "policy_advisor_service=debug,advisor_flow=debug,tower_http=debug".into()
    });

    match log_format.as_str() {
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true),
                )
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so LOG_FORMAT and RUST_LOG from it apply
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;
    let app = create_app(&config)?;

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;
    let addr = listener.local_addr()?;

    info!(
        model = %config.gemini_model,
        search_results = config.search_result_count,
        "Policy Advisor Service starting on {}",
        addr
    );
    info!("API description available at http://{}/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
