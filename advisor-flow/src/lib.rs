pub mod context;
pub mod error;
pub mod graph;
pub mod task;

// Re-export commonly used types
pub use context::Context;
pub use error::{FlowError, Result};
pub use graph::{ExecutionResult, Graph, GraphBuilder};
pub use task::{NextAction, Task, TaskResult};

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct EchoTask;

    #[async_trait]
    impl Task for EchoTask {
        async fn run(&self, context: Context) -> Result<TaskResult> {
            let input: String = context.get("input").await.unwrap_or_default();
            context.set("output", format!("Processed: {}", input)).await;
            context.push("trail", "echo").await;
            Ok(TaskResult::new(None, NextAction::Continue))
        }
    }

    struct NamedTask {
        id: String,
        next: NextAction,
    }

    impl NamedTask {
        fn new(id: &str, next: NextAction) -> Arc<Self> {
            Arc::new(Self {
                id: id.to_string(),
                next,
            })
        }
    }

    #[async_trait]
    impl Task for NamedTask {
        fn id(&self) -> &str {
            &self.id
        }

        async fn run(&self, context: Context) -> Result<TaskResult> {
            context.push("trail", self.id.clone()).await;
            Ok(TaskResult::new_with_status(
                Some(format!("{} done", self.id)),
                self.next.clone(),
                Some(format!("ran {}", self.id)),
            ))
        }
    }

    #[tokio::test]
    async fn test_linear_graph_runs_to_end() {
        let echo = Arc::new(EchoTask);
        let echo_id = echo.id().to_string();

        let graph = GraphBuilder::new("linear")
            .add_task(echo)
            .add_task(NamedTask::new("finish", NextAction::End))
            .add_edge(echo_id.clone(), "finish")
            .build();

        let context = Context::new();
        context.set("input", "Hello, World!").await;

        let result = graph.execute(context.clone()).await.unwrap();

        assert_eq!(result.visited, vec![echo_id, "finish".to_string()]);
        assert_eq!(result.response.as_deref(), Some("finish done"));
        assert_eq!(result.status_message.as_deref(), Some("ran finish"));

        let output: String = context.get("output").await.unwrap();
        assert_eq!(output, "Processed: Hello, World!");
        let trail: Vec<String> = context.get_sync("trail").unwrap();
        assert_eq!(trail, vec!["echo", "finish"]);
    }

    #[test]
    fn test_default_task_id_is_type_name() {
        assert!(EchoTask.id().ends_with("EchoTask"));
    }

    #[tokio::test]
    async fn test_conditional_edge_routes_both_ways() {
        let build = || {
            GraphBuilder::new("branching")
                .add_task(NamedTask::new("check", NextAction::Continue))
                .add_task(NamedTask::new("happy", NextAction::End))
                .add_task(NamedTask::new("sad", NextAction::End))
                .add_conditional_edge(
                    "check",
                    |ctx| ctx.get_sync::<bool>("ok").unwrap_or(false),
                    "happy",
                    "sad",
                )
                .build()
        };

        let context = Context::new();
        context.set("ok", true).await;
        let result = build().execute(context).await.unwrap();
        assert_eq!(result.last_task_id(), Some("happy"));

        let result = build().execute(Context::new()).await.unwrap();
        assert_eq!(result.last_task_id(), Some("sad"));
    }

    #[tokio::test]
    async fn test_continue_without_edge_stops() {
        let graph = GraphBuilder::new("dangling")
            .add_task(NamedTask::new("only", NextAction::Continue))
            .build();

        let result = graph.execute(Context::new()).await.unwrap();
        assert_eq!(result.visited, vec!["only".to_string()]);
    }

    #[tokio::test]
    async fn test_execute_from_skips_earlier_tasks() {
        let graph = GraphBuilder::new("resume")
            .add_task(NamedTask::new("first", NextAction::Continue))
            .add_task(NamedTask::new("second", NextAction::Continue))
            .add_task(NamedTask::new("third", NextAction::End))
            .add_edge("first", "second")
            .add_edge("second", "third")
            .build();

        assert!(graph.get_task("second").is_some());
        assert!(graph.get_task("fourth").is_none());

        let context = Context::new();
        let result = graph.execute_from("second", context.clone()).await.unwrap();
        assert_eq!(result.visited, vec!["second".to_string(), "third".to_string()]);
        let trail: Vec<String> = context.get_sync("trail").unwrap();
        assert_eq!(trail, vec!["second", "third"]);

        let err = graph.execute_from("fourth", Context::new()).await.unwrap_err();
        assert!(matches!(err, FlowError::TaskNotFound(id) if id == "fourth"));
    }

    #[tokio::test]
    async fn test_goto_unknown_task_fails() {
        let graph = GraphBuilder::new("broken")
            .add_task(NamedTask::new("start", NextAction::GoTo("missing".into())))
            .build();

        let err = graph.execute(Context::new()).await.unwrap_err();
        assert!(matches!(err, FlowError::TaskNotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn test_cycle_hits_step_limit() {
        let graph = GraphBuilder::new("loop")
            .add_task(NamedTask::new("a", NextAction::Continue))
            .add_task(NamedTask::new("b", NextAction::Continue))
            .add_edge("a", "b")
            .add_edge("b", "a")
            .with_max_steps(5)
            .build();

        let err = graph.execute(Context::new()).await.unwrap_err();
        assert!(matches!(err, FlowError::StepLimitExceeded { limit: 5, .. }));
    }

    #[tokio::test]
    async fn test_empty_graph_has_no_start() {
        let graph = GraphBuilder::new("empty").build();
        let err = graph.execute(Context::new()).await.unwrap_err();
        assert!(matches!(err, FlowError::MissingStartTask(_)));
    }

    #[tokio::test]
    async fn test_push_replaces_scalar() {
        let context = Context::new();
        context.set("trail", 7).await;
        context.push("trail", "x").await;
        let trail: Vec<String> = context.get_sync("trail").unwrap();
        assert_eq!(trail, vec!["x"]);
        assert!(context.remove("trail").await.is_some());
        assert!(!context.contains("trail"));
    }
}
