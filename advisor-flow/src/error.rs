use thiserror::Error;

/// Errors raised while building or running a task graph
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Context error: {0}")]
    ContextError(String),

    #[error("Graph '{0}' has no start task")]
    MissingStartTask(String),

    #[error("Graph '{graph_id}' exceeded {limit} steps without ending")]
    StepLimitExceeded { graph_id: String, limit: usize },
}

pub type Result<T> = std::result::Result<T, FlowError>;
