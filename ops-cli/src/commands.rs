// Command handlers
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use workflow_engine::{RunState, TaskState, TriggerOptions, WorkflowRun, WorkflowSummary};

use crate::cli::{Command, DagsCommand, EmailCommand, TasksCommand, TriggerArgs};
use crate::error::{CliError, CliResult};
use crate::App;

/// Run one parsed command against a bootstrapped app.
///
/// # Errors
///
/// Any error of the underlying operation, or [`CliError::RunFailed`] when a
/// triggered run did not succeed.
pub async fn run(app: &App, command: Command, json: bool) -> CliResult<()> {
    match command {
        Command::Dags(DagsCommand::List) => list_dags(app, json),
        Command::Dags(DagsCommand::Show { dag_id }) => show_dag(app, &dag_id, json),
        Command::Dags(DagsCommand::Trigger(args)) => trigger_dag(app, args, json).await,
        Command::Tasks(TasksCommand::Run { dag_id, task_id }) => {
            app.engine.execute_task(&dag_id, &task_id).await?;
            if json {
                print_json(&serde_json::json!({
                    "dag_id": dag_id,
                    "task_id": task_id,
                    "state": TaskState::Success,
                }))?;
            } else {
                println!("{} {}.{}", "✔".bright_green(), dag_id, task_id);
            }
            Ok(())
        }
        Command::Email(EmailCommand::Verify) => {
            app.email.verify_email_config().await?;
            if json {
                print_json(&serde_json::json!({ "verified": true }))?;
            } else {
                println!("{} SMTP connection verified", "✔".bright_green());
            }
            Ok(())
        }
    }
}

fn list_dags(app: &App, json: bool) -> CliResult<()> {
    let summaries: Vec<WorkflowSummary> = app
        .engine
        .registry()
        .list()
        .iter()
        .map(|w| w.summary())
        .collect();

    if json {
        return print_json(&summaries);
    }

    for summary in &summaries {
        println!(
            "{:<24} owner={:<16} schedule={:<12} tasks={}",
            summary.id.bright_cyan(),
            summary.owner,
            summary.schedule,
            summary.tasks.len()
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct DagDetails {
    #[serde(flatten)]
    summary: WorkflowSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_run: Option<DateTime<Utc>>,
}

fn show_dag(app: &App, dag_id: &str, json: bool) -> CliResult<()> {
    let workflow = app.engine.registry().get(dag_id)?;
    let details = DagDetails {
        summary: workflow.summary(),
        next_run: workflow.next_run_after(Utc::now()),
    };

    if json {
        return print_json(&details);
    }

    let summary = &details.summary;

    println!("{}", summary.id.bright_cyan().bold());
    if let Some(description) = &summary.description {
        println!("  {}", description);
    }
    println!("  owner:      {}", summary.owner);
    println!("  start_date: {}", summary.start_date.to_rfc3339());
    println!("  schedule:   {}", summary.schedule);
    if let Some(next_run) = details.next_run {
        println!("  next run:   {}", next_run.to_rfc3339());
    }
    if !summary.tags.is_empty() {
        println!("  tags:       {}", summary.tags.join(", "));
    }
    println!("  tasks:");
    for task in &summary.tasks {
        if task.upstream.is_empty() {
            println!("    - {}", task.id);
        } else {
            println!("    - {} (after {})", task.id, task.upstream.join(", "));
        }
    }
    Ok(())
}

async fn trigger_dag(app: &App, args: TriggerArgs, json: bool) -> CliResult<()> {
    let options = TriggerOptions {
        logical_date: args.logical_date,
    };
    let run = app.engine.trigger(&args.dag_id, options).await?;

    if json {
        print_json(&run)?;
    } else {
        print_run(&run);
    }

    if run.state == RunState::Success {
        Ok(())
    } else {
        Err(CliError::RunFailed {
            workflow_id: run.workflow_id,
            run_id: run.run_id,
        })
    }
}

fn print_run(run: &WorkflowRun) {
    let state = match run.state {
        RunState::Success => "success".bright_green(),
        RunState::Failed => "failed".bright_red(),
        RunState::Running => "running".bright_yellow(),
    };
    println!("{} run {} [{}]", run.workflow_id.bright_cyan(), run.run_id, state);
    println!("  logical_date: {}", run.logical_date.to_rfc3339());

    for task in &run.task_instances {
        let marker = match task.state {
            TaskState::Success => "✔".bright_green(),
            TaskState::Failed => "✘".bright_red(),
            TaskState::UpstreamFailed => "↷".bright_yellow(),
            TaskState::Pending | TaskState::Running => "…".normal(),
        };
        println!("  {} {}", marker, task.task_id);
        if let Some(error) = &task.error {
            println!("      {}", error.red());
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
