use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Workflow already registered: {0}")]
    DuplicateWorkflow(String),

    #[error("Workflow not found: {0}")]
    WorkflowNotFound(String),

    #[error("Task not found: {workflow_id}.{task_id}")]
    TaskNotFound { workflow_id: String, task_id: String },

    #[error("Task already defined in workflow {workflow_id}: {task_id}")]
    DuplicateTask { workflow_id: String, task_id: String },

    #[error("Invalid workflow definition: {0}")]
    InvalidDefinition(String),

    #[error("Invalid schedule expression '{expression}': {reason}")]
    InvalidSchedule { expression: String, reason: String },

    #[error("Task dependency cycle detected at {0}")]
    CycleDetected(String),

    #[error("Workflow {workflow_id} is not eligible before {start_date} (logical date {logical_date})")]
    NotYetEligible {
        workflow_id: String,
        start_date: DateTime<Utc>,
        logical_date: DateTime<Utc>,
    },

    #[error("Task {task_id} failed")]
    TaskFailed {
        task_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Run not found: {0}")]
    RunNotFound(uuid::Uuid),
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
