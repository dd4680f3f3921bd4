//! Operations CLI for Mailflow
//!
//! Loads configuration, registers the bundled workflows and exposes them on
//! the command line:
//!
//! ```bash
//! # Inspect
//! mailflow dags list
//! mailflow dags show PythonEmailDag --json
//!
//! # Run the email workflow once
//! mailflow dags trigger PythonEmailDag
//! mailflow dags trigger PythonEmailDag --logical-date 2024-12-05T08:00:00Z
//!
//! # Run a single task, or check SMTP settings
//! mailflow tasks run PythonEmailDag start_dag
//! mailflow email verify
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod dags;
pub mod error;

pub use cli::*;
pub use config::*;
pub use error::*;

use std::sync::Arc;

use email_service::EmailService;
use workflow_engine::{WorkflowEngine, WorkflowRegistry};

/// Everything a command needs.
pub struct App {
    pub engine: WorkflowEngine,
    pub email: Arc<EmailService>,
}

impl App {
    /// Build the email service, register bundled workflows and create the engine.
    ///
    /// # Errors
    ///
    /// Invalid email settings or a workflow registration failure.
    pub fn bootstrap(config: &AppConfig) -> CliResult<Self> {
        let email = Arc::new(
            EmailService::new(config.email.clone())?.with_redactor(config.logging.redactor()),
        );

        let registry = Arc::new(WorkflowRegistry::new());
        dags::register_all(&registry, config, Arc::clone(&email))?;

        Ok(Self {
            engine: WorkflowEngine::new(registry),
            email,
        })
    }
}
