use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Workflow(#[from] workflow_engine::WorkflowError),

    #[error(transparent)]
    Email(#[from] email_service::EmailError),

    #[error(transparent)]
    Config(#[from] config_engine::ConfigError),

    #[error(transparent)]
    Logger(#[from] logger_redacted::LoggerError),

    #[error("Workflow {workflow_id} run {run_id} failed")]
    RunFailed { workflow_id: String, run_id: Uuid },

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;
