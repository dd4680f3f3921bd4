//! Workflow definitions shipped with the CLI.

pub mod email;

use std::sync::Arc;

use email_service::EmailService;
use workflow_engine::WorkflowRegistry;

pub use email::{register_email_dag, SendEmailAction, EMAIL_DAG_ID, SEND_EMAIL_TASK_ID};

use crate::config::AppConfig;

/// Register every bundled workflow.
///
/// # Errors
///
/// The first registration error encountered.
pub fn register_all(
    registry: &WorkflowRegistry,
    config: &AppConfig,
    email: Arc<EmailService>,
) -> workflow_engine::Result<()> {
    register_email_dag(registry, &config.dag, Arc::new(SendEmailAction::new(email)))?;
    Ok(())
}
