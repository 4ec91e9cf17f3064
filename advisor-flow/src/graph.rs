use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    context::Context,
    error::{FlowError, Result},
    task::{NextAction, Task},
};

/// Upper bound on task executions in one run, guards against edge cycles
pub const DEFAULT_MAX_STEPS: usize = 32;

/// Type alias for edge condition functions
pub type EdgeCondition = Arc<dyn Fn(&Context) -> bool + Send + Sync>;

/// Edge between tasks in the graph
#[derive(Clone)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub condition: Option<EdgeCondition>,
}

/// An immutable graph of tasks. Built once, executed once per request.
pub struct Graph {
    pub id: String,
    tasks: HashMap<String, Arc<dyn Task>>,
    edges: Vec<Edge>,
    start_task_id: Option<String>,
    max_steps: usize,
}

/// Outcome of running a graph to its end
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Response of the last task that ran
    pub response: Option<String>,
    /// Status message of the last task that ran
    pub status_message: Option<String>,
    /// Ids of the tasks that ran, in order
    pub visited: Vec<String>,
}

impl ExecutionResult {
    pub fn last_task_id(&self) -> Option<&str> {
        self.visited.last().map(String::as_str)
    }
}

impl Graph {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tasks: HashMap::new(),
            edges: Vec::new(),
            start_task_id: None,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Run the graph from its start task until a task ends the run or no edge applies
    pub async fn execute(&self, context: Context) -> Result<ExecutionResult> {
        let start = self
            .start_task_id
            .clone()
            .ok_or_else(|| FlowError::MissingStartTask(self.id.clone()))?;
        self.execute_from(&start, context).await
    }

    /// Run the graph starting from a specific task
    pub async fn execute_from(&self, task_id: &str, context: Context) -> Result<ExecutionResult> {
        let mut current = task_id.to_string();
        let mut visited = Vec::new();

        loop {
            if visited.len() >= self.max_steps {
                return Err(FlowError::StepLimitExceeded {
                    graph_id: self.id.clone(),
                    limit: self.max_steps,
                });
            }

            let task = self
                .get_task(&current)
                .ok_or_else(|| FlowError::TaskNotFound(current.clone()))?;

            debug!(graph_id = %self.id, task_id = %current, "Running task");
            let mut result = task.run(context.clone()).await?;
            result.task_id = current.clone();
            visited.push(current.clone());

            let next = match &result.next_action {
                NextAction::Continue => self.find_next_task(&current, &context),
                NextAction::GoTo(target_id) => {
                    if !self.tasks.contains_key(target_id) {
                        return Err(FlowError::TaskNotFound(target_id.clone()));
                    }
                    Some(target_id.clone())
                }
                NextAction::End => None,
            };

            match next {
                Some(next_task_id) => current = next_task_id,
                None => {
                    info!(
                        graph_id = %self.id,
                        last_task = %result.task_id,
                        steps = visited.len(),
                        "Graph run finished"
                    );
                    return Ok(ExecutionResult {
                        response: result.response,
                        status_message: result.status_message,
                        visited,
                    });
                }
            }
        }
    }

    /// Find the next task based on edges and conditions.
    /// Edges are checked in insertion order; the first matching one wins.
    pub fn find_next_task(&self, current_task_id: &str, context: &Context) -> Option<String> {
        self.edges
            .iter()
            .filter(|edge| edge.from == current_task_id)
            .find(|edge| edge.condition.as_ref().is_none_or(|condition| condition(context)))
            .map(|edge| edge.to.clone())
    }

    pub fn get_task(&self, task_id: &str) -> Option<Arc<dyn Task>> {
        self.tasks.get(task_id).cloned()
    }
}

/// Builder for creating graphs
pub struct GraphBuilder {
    graph: Graph,
}

impl GraphBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            graph: Graph::new(id),
        }
    }

    /// Add a task; the first task added becomes the start task
    pub fn add_task(mut self, task: Arc<dyn Task>) -> Self {
        let task_id = task.id().to_string();
        if self.graph.start_task_id.is_none() {
            self.graph.start_task_id = Some(task_id.clone());
        }
        self.graph.tasks.insert(task_id, task);
        self
    }

    pub fn add_edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.graph.edges.push(Edge {
            from: from.into(),
            to: to.into(),
            condition: None,
        });
        self
    }

    /// Route from `from` to `yes` when `condition` holds, otherwise to `no`
    pub fn add_conditional_edge<F>(
        mut self,
        from: impl Into<String>,
        condition: F,
        yes: impl Into<String>,
        no: impl Into<String>,
    ) -> Self
    where
        F: Fn(&Context) -> bool + Send + Sync + 'static,
    {
        let from = from.into();
        self.graph.edges.push(Edge {
            from: from.clone(),
            to: yes.into(),
            condition: Some(Arc::new(condition)),
        });
        self.graph.edges.push(Edge {
            from,
            to: no.into(),
            condition: None,
        });
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.graph.max_steps = max_steps;
        self
    }

    pub fn build(self) -> Graph {
        self.graph
    }
}
