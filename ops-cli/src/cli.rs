// Command line definition
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

/// Mailflow operations CLI
#[derive(Parser, Debug)]
#[command(name = "mailflow", version)]
#[command(about = "Register, inspect and manually trigger Mailflow workflows")]
pub struct Cli {
    /// Configuration file path (default: ./mailflow.yaml if present)
    #[arg(short, long, global = true, env = "MAILFLOW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print machine readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect and trigger workflows
    #[command(subcommand)]
    Dags(DagsCommand),

    /// Run individual tasks
    #[command(subcommand)]
    Tasks(TasksCommand),

    /// Email delivery checks
    #[command(subcommand)]
    Email(EmailCommand),
}

#[derive(Subcommand, Debug)]
pub enum DagsCommand {
    /// List registered workflows
    List,
    /// Show one workflow
    Show { dag_id: String },
    /// Run a workflow once
    Trigger(TriggerArgs),
}

#[derive(Args, Debug)]
pub struct TriggerArgs {
    pub dag_id: String,

    /// Logical date of the run (RFC 3339); defaults to now
    #[arg(long)]
    pub logical_date: Option<DateTime<Utc>>,
}

#[derive(Subcommand, Debug)]
pub enum TasksCommand {
    /// Execute a single task once, outside of a workflow run
    Run { dag_id: String, task_id: String },
}

#[derive(Subcommand, Debug)]
pub enum EmailCommand {
    /// Connect to the configured SMTP server without sending
    Verify,
}
