// Manual-trigger run engine
use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::error::{Result, WorkflowError};
use crate::registry::WorkflowRegistry;
use crate::run::{RunState, RunTrigger, TaskInstance, TaskState, WorkflowRun};
use crate::task::TaskUnit;
use crate::workflow::WorkflowDefinition;

/// Options for a single triggered run.
#[derive(Debug, Clone, Default)]
pub struct TriggerOptions {
    /// Instant the run is for; defaults to now.
    pub logical_date: Option<DateTime<Utc>>,
}

impl TriggerOptions {
    pub fn at(logical_date: DateTime<Utc>) -> Self {
        Self {
            logical_date: Some(logical_date),
        }
    }
}

/// Runs kept in memory by [`WorkflowEngine::new`].
pub const DEFAULT_RUN_HISTORY: usize = 1_000;

/// Executes registered workflows on explicit request and keeps run history.
///
/// History is bounded: once `history_limit` runs are stored, each new run
/// evicts the oldest one across all workflows.
pub struct WorkflowEngine {
    registry: Arc<WorkflowRegistry>,
    runs: RwLock<VecDeque<WorkflowRun>>,
    history_limit: usize,
}

impl WorkflowEngine {
    pub fn new(registry: Arc<WorkflowRegistry>) -> Self {
        Self::with_history_limit(registry, DEFAULT_RUN_HISTORY)
    }

    /// Engine keeping at most `limit` runs (at least one).
    pub fn with_history_limit(registry: Arc<WorkflowRegistry>, limit: usize) -> Self {
        Self {
            registry,
            runs: RwLock::new(VecDeque::new()),
            history_limit: limit.max(1),
        }
    }

    pub fn registry(&self) -> &Arc<WorkflowRegistry> {
        &self.registry
    }

    /// Run every task of a workflow once.
    ///
    /// Task failures do not make this return an error: the run comes back
    /// with state [`RunState::Failed`] and the failing task instance carries
    /// the error text.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::WorkflowNotFound`] for unknown ids and
    /// [`WorkflowError::NotYetEligible`] when the logical date precedes the
    /// workflow's start date.
    #[instrument(skip(self, options), fields(run_id))]
    pub async fn trigger(&self, workflow_id: &str, options: TriggerOptions) -> Result<WorkflowRun> {
        let workflow = self.registry.get(workflow_id)?;
        let logical_date = options.logical_date.unwrap_or_else(Utc::now);

        if logical_date < workflow.start_date() {
            return Err(WorkflowError::NotYetEligible {
                workflow_id: workflow_id.to_string(),
                start_date: workflow.start_date(),
                logical_date,
            });
        }

        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));
        info!(%logical_date, "Workflow run started");

        let mut run = WorkflowRun {
            run_id,
            workflow_id: workflow_id.to_string(),
            logical_date,
            trigger: RunTrigger::Manual,
            state: RunState::Running,
            started_at: Utc::now(),
            ended_at: None,
            task_instances: workflow
                .tasks()
                .iter()
                .map(|t| TaskInstance::pending(&t.id))
                .collect(),
        };

        Self::run_tasks(&workflow, &mut run).await;

        run.state = if run.task_instances.iter().any(|t| t.state.is_failure()) {
            RunState::Failed
        } else {
            RunState::Success
        };
        run.ended_at = Some(Utc::now());

        match run.state {
            RunState::Success => info!("Workflow run succeeded"),
            _ => warn!(
                failed_tasks = run.failures().count(),
                "Workflow run failed"
            ),
        }

        self.record(run.clone());
        Ok(run)
    }

    fn record(&self, run: WorkflowRun) {
        let mut runs = self.runs.write();
        while runs.len() >= self.history_limit {
            runs.pop_front();
        }
        runs.push_back(run);
    }

    async fn run_tasks(workflow: &WorkflowDefinition, run: &mut WorkflowRun) {
        for (idx, task) in workflow.ordered_tasks() {
            let upstream_failed = workflow.upstream_indices(idx).iter().any(|&u| {
                run.task_instances
                    .get(u)
                    .is_some_and(|ti| ti.state.is_failure())
            });

            let Some(instance) = run.task_instances.get_mut(idx) else {
                continue;
            };

            if upstream_failed {
                warn!(task_id = %task.id, "Skipping task, upstream failed");
                instance.state = TaskState::UpstreamFailed;
                continue;
            }

            instance.state = TaskState::Running;
            instance.started_at = Some(Utc::now());

            let outcome = Self::invoke(task).await;

            instance.ended_at = Some(Utc::now());
            match outcome {
                Ok(()) => instance.state = TaskState::Success,
                Err(WorkflowError::TaskFailed { source, .. }) => {
                    instance.state = TaskState::Failed;
                    instance.error = Some(format!("{source:#}"));
                }
                Err(other) => {
                    instance.state = TaskState::Failed;
                    instance.error = Some(other.to_string());
                }
            }
        }
    }

    /// Invoke one task of a workflow once, outside of any run.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::WorkflowNotFound`], [`WorkflowError::TaskNotFound`],
    /// or [`WorkflowError::TaskFailed`] wrapping the action's error unchanged.
    pub async fn execute_task(&self, workflow_id: &str, task_id: &str) -> Result<()> {
        let workflow = self.registry.get(workflow_id)?;
        let task = workflow.task(task_id).ok_or_else(|| WorkflowError::TaskNotFound {
            workflow_id: workflow_id.to_string(),
            task_id: task_id.to_string(),
        })?;

        Self::invoke(task).await
    }

    #[instrument(skip(task), fields(task_id = %task.id))]
    async fn invoke(task: &TaskUnit) -> Result<()> {
        info!("Task started");
        match task.invoke().await {
            Ok(()) => {
                info!("Task succeeded");
                Ok(())
            }
            Err(source) => {
                error!(error = %format!("{source:#}"), "Task failed");
                Err(WorkflowError::TaskFailed {
                    task_id: task.id.clone(),
                    source,
                })
            }
        }
    }

    /// Runs of one workflow, oldest first.
    pub fn runs(&self, workflow_id: &str) -> Vec<WorkflowRun> {
        self.runs
            .read()
            .iter()
            .filter(|r| r.workflow_id == workflow_id)
            .cloned()
            .collect()
    }

    /// # Errors
    ///
    /// [`WorkflowError::RunNotFound`] for unknown run ids.
    pub fn run(&self, run_id: Uuid) -> Result<WorkflowRun> {
        self.runs
            .read()
            .iter()
            .find(|r| r.run_id == run_id)
            .cloned()
            .ok_or(WorkflowError::RunNotFound(run_id))
    }
}
