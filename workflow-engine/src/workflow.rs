// Workflow definition and builder
use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkflowError};
use crate::schedule::Schedule;
use crate::task::TaskUnit;

/// Arguments every task of a workflow inherits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultArgs {
    pub owner: String,
    pub start_date: DateTime<Utc>,
    #[serde(flatten, default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl DefaultArgs {
    pub fn new(owner: &str, start_date: DateTime<Utc>) -> Self {
        Self {
            owner: owner.to_string(),
            start_date,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_extra<V: Into<serde_json::Value>>(mut self, key: &str, value: V) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

/// A registered workflow. Immutable once built.
#[derive(Debug)]
pub struct WorkflowDefinition {
    id: String,
    default_args: DefaultArgs,
    schedule: Schedule,
    description: Option<String>,
    tags: Vec<String>,
    tasks: Vec<TaskUnit>,
    // upstream task indices per task
    upstream: Vec<Vec<usize>>,
    execution_order: Vec<usize>,
}

impl WorkflowDefinition {
    pub fn builder(id: &str) -> WorkflowBuilder {
        WorkflowBuilder::new(id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn default_args(&self) -> &DefaultArgs {
        &self.default_args
    }

    pub fn owner(&self) -> &str {
        &self.default_args.owner
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.default_args.start_date
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Next scheduled fire time after `after`, never before the start date.
    /// Always `None` for manual workflows.
    pub fn next_run_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.next_after(after, self.start_date())
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn tasks(&self) -> &[TaskUnit] {
        &self.tasks
    }

    pub fn task(&self, task_id: &str) -> Option<&TaskUnit> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Ids of the tasks `task_id` directly depends on.
    pub fn upstream_of(&self, task_id: &str) -> Vec<&str> {
        self.tasks
            .iter()
            .position(|t| t.id == task_id)
            .and_then(|idx| self.upstream.get(idx))
            .map(|ups| {
                ups.iter()
                    .filter_map(|&u| self.tasks.get(u).map(|t| t.id.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Tasks in an order where every task follows its upstream tasks.
    pub fn ordered_tasks(&self) -> impl Iterator<Item = (usize, &TaskUnit)> + '_ {
        self.execution_order
            .iter()
            .filter_map(|&idx| self.tasks.get(idx).map(|t| (idx, t)))
    }

    pub(crate) fn upstream_indices(&self, idx: usize) -> &[usize] {
        self.upstream.get(idx).map_or(&[][..], Vec::as_slice)
    }

    pub fn summary(&self) -> WorkflowSummary {
        WorkflowSummary {
            id: self.id.clone(),
            owner: self.default_args.owner.clone(),
            start_date: self.default_args.start_date,
            schedule: self.schedule.to_string(),
            description: self.description.clone(),
            tags: self.tags.clone(),
            tasks: self
                .ordered_tasks()
                .map(|(_, t)| TaskSummary {
                    id: t.id.clone(),
                    upstream: self.upstream_of(&t.id).into_iter().map(String::from).collect(),
                })
                .collect(),
        }
    }
}

/// Serializable view of a workflow for listings.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSummary {
    pub id: String,
    pub owner: String,
    pub start_date: DateTime<Utc>,
    pub schedule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub tasks: Vec<TaskSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskSummary {
    pub id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub upstream: Vec<String>,
}

pub struct WorkflowBuilder {
    id: String,
    default_args: Option<DefaultArgs>,
    schedule: Schedule,
    description: Option<String>,
    tags: Vec<String>,
    tasks: Vec<TaskUnit>,
    edges: Vec<(String, String)>,
}

impl WorkflowBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            default_args: None,
            schedule: Schedule::Manual,
            description: None,
            tags: Vec::new(),
            tasks: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn default_args(mut self, args: DefaultArgs) -> Self {
        self.default_args = Some(args);
        self
    }

    pub fn schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    pub fn add_task(mut self, task: TaskUnit) -> Self {
        self.tasks.push(task);
        self
    }

    /// Declare that `downstream` runs after `upstream`.
    pub fn dependency(mut self, upstream: &str, downstream: &str) -> Self {
        self.edges.push((upstream.to_string(), downstream.to_string()));
        self
    }

    /// Validate and freeze the definition.
    ///
    /// # Errors
    ///
    /// Fails on an empty workflow or task id, missing default args,
    /// duplicate task ids, dependencies naming unknown tasks, or a
    /// dependency cycle.
    pub fn build(self) -> Result<WorkflowDefinition> {
        if self.id.trim().is_empty() {
            return Err(WorkflowError::InvalidDefinition(
                "workflow id must not be empty".to_string(),
            ));
        }

        let default_args = self.default_args.ok_or_else(|| {
            WorkflowError::InvalidDefinition(format!("workflow {} has no default args", self.id))
        })?;
        if default_args.owner.trim().is_empty() {
            return Err(WorkflowError::InvalidDefinition(format!(
                "workflow {} has an empty owner",
                self.id
            )));
        }

        let mut seen = HashSet::new();
        for task in &self.tasks {
            if task.id.trim().is_empty() {
                return Err(WorkflowError::InvalidDefinition(format!(
                    "workflow {} has a task with an empty id",
                    self.id
                )));
            }
            if !seen.insert(task.id.as_str()) {
                return Err(WorkflowError::DuplicateTask {
                    workflow_id: self.id.clone(),
                    task_id: task.id.clone(),
                });
            }
        }

        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..self.tasks.len()).map(|i| graph.add_node(i)).collect();
        let index_of: HashMap<&str, usize> = self
            .tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.as_str(), i))
            .collect();

        let mut upstream = vec![Vec::new(); self.tasks.len()];
        for (from, to) in &self.edges {
            let lookup = |task_id: &str| {
                index_of.get(task_id).copied().ok_or_else(|| WorkflowError::TaskNotFound {
                    workflow_id: self.id.clone(),
                    task_id: task_id.to_string(),
                })
            };
            let (from_idx, to_idx) = (lookup(from)?, lookup(to)?);
            if let (Some(&a), Some(&b)) = (nodes.get(from_idx), nodes.get(to_idx)) {
                graph.update_edge(a, b, ());
            }
            if let Some(ups) = upstream.get_mut(to_idx) {
                if !ups.contains(&from_idx) {
                    ups.push(from_idx);
                }
            }
        }

        let execution_order = toposort(&graph, None)
            .map_err(|cycle| {
                let task_id = graph
                    .node_weight(cycle.node_id())
                    .and_then(|&i| self.tasks.get(i))
                    .map_or_else(String::new, |t| t.id.clone());
                WorkflowError::CycleDetected(task_id)
            })?
            .into_iter()
            .filter_map(|n| graph.node_weight(n).copied())
            .collect();

        Ok(WorkflowDefinition {
            id: self.id,
            default_args,
            schedule: self.schedule,
            description: self.description,
            tags: self.tags,
            tasks: self.tasks,
            upstream,
            execution_order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::action_fn;
    use chrono::TimeZone;

    fn noop(id: &str) -> TaskUnit {
        TaskUnit::from_action(id, action_fn(|| async { Ok(()) }))
    }

    fn args() -> DefaultArgs {
        DefaultArgs::new("ops", Utc.with_ymd_and_hms(2024, 12, 4, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_single_task_workflow() {
        let workflow = WorkflowDefinition::builder("email_dag")
            .default_args(args())
            .add_task(noop("send_email"))
            .build()
            .unwrap();

        assert_eq!(workflow.id(), "email_dag");
        assert_eq!(workflow.owner(), "ops");
        assert!(workflow.schedule().is_manual());
        assert_eq!(workflow.tasks().len(), 1);
        assert!(workflow.upstream_of("send_email").is_empty());
    }

    #[test]
    fn test_empty_id_rejected() {
        let err = WorkflowDefinition::builder("  ")
            .default_args(args())
            .build()
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidDefinition(_)));
    }

    #[test]
    fn test_missing_default_args_rejected() {
        let err = WorkflowDefinition::builder("wf").build().unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidDefinition(_)));
    }

    #[test]
    fn test_duplicate_task_rejected() {
        let err = WorkflowDefinition::builder("wf")
            .default_args(args())
            .add_task(noop("a"))
            .add_task(noop("a"))
            .build()
            .unwrap_err();
        assert!(matches!(err, WorkflowError::DuplicateTask { task_id, .. } if task_id == "a"));
    }

    #[test]
    fn test_unknown_dependency_rejected() {
        let err = WorkflowDefinition::builder("wf")
            .default_args(args())
            .add_task(noop("a"))
            .dependency("a", "b")
            .build()
            .unwrap_err();
        assert!(matches!(err, WorkflowError::TaskNotFound { task_id, .. } if task_id == "b"));
    }

    #[test]
    fn test_cycle_rejected() {
        let err = WorkflowDefinition::builder("wf")
            .default_args(args())
            .add_task(noop("a"))
            .add_task(noop("b"))
            .dependency("a", "b")
            .dependency("b", "a")
            .build()
            .unwrap_err();
        assert!(matches!(err, WorkflowError::CycleDetected(_)));
    }

    #[test]
    fn test_execution_order_follows_dependencies() {
        let workflow = WorkflowDefinition::builder("wf")
            .default_args(args())
            .add_task(noop("report"))
            .add_task(noop("extract"))
            .add_task(noop("transform"))
            .dependency("extract", "transform")
            .dependency("transform", "report")
            .build()
            .unwrap();

        let order: Vec<&str> = workflow.ordered_tasks().map(|(_, t)| t.id.as_str()).collect();
        assert_eq!(order, vec!["extract", "transform", "report"]);
        assert_eq!(workflow.upstream_of("report"), vec!["transform"]);
    }

    #[test]
    fn test_summary_serializes_manual_schedule_as_none() {
        let workflow = WorkflowDefinition::builder("email_dag")
            .default_args(args().with_extra("retries", 0))
            .add_task(noop("send_email"))
            .build()
            .unwrap();

        let json = serde_json::to_value(workflow.summary()).unwrap();
        assert_eq!(json["schedule"], "none");
        assert_eq!(json["owner"], "ops");
        assert_eq!(json["tasks"][0]["id"], "send_email");
    }

    #[test]
    fn test_next_run_only_for_cron_schedules() {
        let manual = WorkflowDefinition::builder("manual")
            .default_args(args())
            .add_task(noop("a"))
            .build()
            .unwrap();
        let now = Utc.with_ymd_and_hms(2024, 12, 10, 12, 0, 0).unwrap();
        assert_eq!(manual.next_run_after(now), None);

        let daily = WorkflowDefinition::builder("daily")
            .default_args(args())
            .schedule(Schedule::cron("0 0 9 * * *").unwrap())
            .add_task(noop("a"))
            .build()
            .unwrap();
        assert_eq!(
            daily.next_run_after(now),
            Some(Utc.with_ymd_and_hms(2024, 12, 11, 9, 0, 0).unwrap())
        );
        let early = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(
            daily.next_run_after(early),
            Some(Utc.with_ymd_and_hms(2024, 12, 4, 9, 0, 0).unwrap())
        );
    }
}
