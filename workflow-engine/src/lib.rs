//! Workflow registry and run engine for Mailflow
//!
//! A workflow is a named set of tasks with default arguments (`owner`,
//! `start_date`) and a schedule. Workflows without a recurrence only run
//! when explicitly triggered. This crate provides:
//! - [`WorkflowDefinition`] and its builder, validating ids, task
//!   dependencies and cron expressions
//! - [`WorkflowRegistry`], the namespace of workflow ids
//! - [`WorkflowEngine`], which runs each task once per trigger and records
//!   the outcome
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::{TimeZone, Utc};
//! use workflow_engine::{
//!     action_fn, DefaultArgs, Schedule, TaskUnit, TriggerOptions, WorkflowDefinition,
//!     WorkflowEngine, WorkflowRegistry,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Arc::new(WorkflowRegistry::new());
//!
//!     let start = Utc.with_ymd_and_hms(2024, 12, 4, 0, 0, 0).unwrap();
//!     let workflow = WorkflowDefinition::builder("email_dag")
//!         .default_args(DefaultArgs::new("ops", start))
//!         .schedule(Schedule::Manual)
//!         .add_task(TaskUnit::from_action("send_email", action_fn(|| async { Ok(()) })))
//!         .build()?;
//!     registry.register(workflow)?;
//!
//!     let engine = WorkflowEngine::new(registry);
//!     let run = engine.trigger("email_dag", TriggerOptions::default()).await?;
//!     assert!(run.is_success());
//!
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod registry;
pub mod run;
pub mod schedule;
pub mod task;
pub mod workflow;

pub use engine::*;
pub use error::*;
pub use registry::*;
pub use run::*;
pub use schedule::*;
pub use task::*;
pub use workflow::*;
