// Recommendation flow
pub mod policy_search;
pub mod profile_intake;
pub mod prompt_assembly;
pub mod recommendation_display;
pub mod recommendation_generation;

// Support and premium flows
pub mod premium;
pub mod support;

// Shared modules
pub mod types;

pub use policy_search::{NoPolicyDataTask, PolicySearchTask, has_search_results};
pub use premium::{PremiumEstimateTask, PremiumExplanationTask};
pub use profile_intake::ProfileIntakeTask;
pub use prompt_assembly::PromptAssemblyTask;
pub use recommendation_display::RecommendationDisplayTask;
pub use recommendation_generation::RecommendationGenerationTask;
pub use support::{SupportAnswerTask, SupportQuestionTask};

pub use types::{RecommendationStage, context_keys};
