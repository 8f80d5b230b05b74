use crate::AgentRole;

// ---------------------------------------------------------------------------
// WorkflowError
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("duplicate task name: {0}")]
    DuplicateTask(&'static str),
    #[error("task '{task}' depends on task #{dependency}, which does not run before it")]
    ForwardDependency { task: &'static str, dependency: usize },
    #[error("workflow has no tasks")]
    Empty,
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// One stage of a workflow: a rendered prompt bound to a role.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Short identifier used in logs and hooks.
    pub name: &'static str,
    pub description: String,
    /// Natural-language rubric for the output. Shown to the model, never checked.
    pub expected_output: String,
    pub role: &'static AgentRole,
    /// Indices of earlier tasks whose output is appended to this task's prompt,
    /// in the order they are listed.
    pub context: Vec<usize>,
    /// Query used for web research when the role can search.
    pub search_query: Option<String>,
}

impl Task {
    pub fn new(
        name: &'static str,
        role: &'static AgentRole,
        description: impl Into<String>,
        expected_output: impl Into<String>,
    ) -> Self {
        Self {
            name,
            description: description.into(),
            expected_output: expected_output.into(),
            role,
            context: Vec::new(),
            search_query: None,
        }
    }

    pub fn with_context(mut self, deps: impl IntoIterator<Item = usize>) -> Self {
        self.context = deps.into_iter().collect();
        self
    }

    pub fn with_search_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }
}

// ---------------------------------------------------------------------------
// WorkflowBuilder
// ---------------------------------------------------------------------------

pub struct WorkflowBuilder {
    name: &'static str,
    tasks: Vec<Task>,
}

impl WorkflowBuilder {
    /// Append a task. Tasks run in the order they are added.
    pub fn task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn build(self) -> Result<Workflow, WorkflowError> {
        if self.tasks.is_empty() {
            return Err(WorkflowError::Empty);
        }

        for (i, task) in self.tasks.iter().enumerate() {
            if self.tasks[..i].iter().any(|t| t.name == task.name) {
                return Err(WorkflowError::DuplicateTask(task.name));
            }

            // Dependencies must point strictly backwards, so list order is
            // the only valid execution order.
            if let Some(&dependency) = task.context.iter().find(|&&d| d >= i) {
                return Err(WorkflowError::ForwardDependency {
                    task: task.name,
                    dependency,
                });
            }
        }

        Ok(Workflow {
            name: self.name,
            tasks: self.tasks,
        })
    }
}

// ---------------------------------------------------------------------------
// Workflow (validated, only constructed via build())
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Workflow {
    name: &'static str,
    tasks: Vec<Task>,
}

impl Workflow {
    pub fn builder(name: &'static str) -> WorkflowBuilder {
        WorkflowBuilder {
            name,
            tasks: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
