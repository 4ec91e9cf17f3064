pub mod config;
pub mod display;
pub mod gateways;
pub mod models;
pub mod premium;
pub mod prompts;
pub mod reference;
pub mod risk;
pub mod service;
pub mod tasks;
pub mod workflow;

pub use config::Config;
pub use reference::ReferenceData;
pub use service::{AppState, build_router, create_app};
pub use workflow::{AdvisorFlows, PremiumOutcome, RecommendationOutcome, SupportOutcome};
