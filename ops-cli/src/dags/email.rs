// Manually triggered workflow that sends the configured notification email
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use email_service::EmailService;
use tracing::info;
use workflow_engine::{
    DefaultArgs, Schedule, TaskAction, TaskUnit, WorkflowDefinition, WorkflowRegistry,
};

use crate::config::DagSettings;

pub const EMAIL_DAG_ID: &str = "PythonEmailDag";
pub const SEND_EMAIL_TASK_ID: &str = "start_dag";

/// Task action sending the configured notification.
pub struct SendEmailAction {
    service: Arc<EmailService>,
}

impl SendEmailAction {
    pub fn new(service: Arc<EmailService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl TaskAction for SendEmailAction {
    async fn execute(&self) -> anyhow::Result<()> {
        let message_id = self
            .service
            .send_notification()
            .await
            .context("sending notification email")?;
        info!(message_id = %message_id, "Notification email sent");
        Ok(())
    }
}

/// Register `PythonEmailDag`: manual trigger only, one task bound to `action`.
///
/// # Errors
///
/// [`workflow_engine::WorkflowError::DuplicateWorkflow`] if the id is
/// already registered, or definition validation errors.
pub fn register_email_dag(
    registry: &WorkflowRegistry,
    settings: &DagSettings,
    action: Arc<dyn TaskAction>,
) -> workflow_engine::Result<Arc<WorkflowDefinition>> {
    let definition = WorkflowDefinition::builder(EMAIL_DAG_ID)
        .default_args(DefaultArgs::new(&settings.owner, settings.start_date))
        .schedule(Schedule::Manual)
        .description("Send the configured notification email on request")
        .tag("email")
        .add_task(TaskUnit::new(SEND_EMAIL_TASK_ID, action))
        .build()?;

    registry.register(definition)
}
