// Workflow registry
use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::{Result, WorkflowError};
use crate::workflow::WorkflowDefinition;

/// Namespace of workflow identifiers known to the engine.
///
/// Passed explicitly to whoever registers or triggers workflows; there is no
/// process-wide instance.
#[derive(Default)]
pub struct WorkflowRegistry {
    workflows: RwLock<BTreeMap<String, Arc<WorkflowDefinition>>>,
}

impl WorkflowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition and return its shared handle.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::DuplicateWorkflow`] if the id is taken.
    pub fn register(&self, definition: WorkflowDefinition) -> Result<Arc<WorkflowDefinition>> {
        let mut workflows = self.workflows.write();
        if workflows.contains_key(definition.id()) {
            return Err(WorkflowError::DuplicateWorkflow(definition.id().to_string()));
        }

        let handle = Arc::new(definition);
        workflows.insert(handle.id().to_string(), Arc::clone(&handle));

        info!(
            workflow_id = handle.id(),
            owner = handle.owner(),
            schedule = %handle.schedule(),
            tasks = handle.tasks().len(),
            "Workflow registered"
        );
        Ok(handle)
    }

    /// # Errors
    ///
    /// Returns [`WorkflowError::WorkflowNotFound`] for unknown ids.
    pub fn get(&self, workflow_id: &str) -> Result<Arc<WorkflowDefinition>> {
        self.workflows
            .read()
            .get(workflow_id)
            .cloned()
            .ok_or_else(|| WorkflowError::WorkflowNotFound(workflow_id.to_string()))
    }

    pub fn contains(&self, workflow_id: &str) -> bool {
        self.workflows.read().contains_key(workflow_id)
    }

    /// All registered workflows ordered by id.
    pub fn list(&self) -> Vec<Arc<WorkflowDefinition>> {
        self.workflows.read().values().cloned().collect()
    }

    /// Drop a definition from the namespace, freeing its id.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::WorkflowNotFound`] for unknown ids.
    pub fn remove(&self, workflow_id: &str) -> Result<Arc<WorkflowDefinition>> {
        let removed = self
            .workflows
            .write()
            .remove(workflow_id)
            .ok_or_else(|| WorkflowError::WorkflowNotFound(workflow_id.to_string()))?;
        debug!(workflow_id, "Workflow removed");
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.workflows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.read().is_empty()
    }
}
