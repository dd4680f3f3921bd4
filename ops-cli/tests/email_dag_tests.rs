//! Registration and manual triggering of the bundled email workflow.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use email_service::{EmailConfig, EmailService};
use ops_cli::dags::{register_email_dag, SendEmailAction, EMAIL_DAG_ID, SEND_EMAIL_TASK_ID};
use ops_cli::{commands, App, AppConfig, Command, DagSettings, DagsCommand};
use workflow_engine::{
    action_fn, DefaultArgs, RunState, Schedule, TaskAction, TaskState, TaskUnit, TriggerOptions,
    WorkflowDefinition, WorkflowEngine, WorkflowError, WorkflowRegistry,
};

fn counting_action(calls: Arc<AtomicUsize>) -> Arc<dyn TaskAction> {
    Arc::new(action_fn(move || {
        let calls = Arc::clone(&calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }))
}

fn disabled_email(recipients: &[&str]) -> Arc<EmailService> {
    let mut config = EmailConfig {
        email_enabled: false,
        ..EmailConfig::default()
    };
    config.notification.to = recipients.iter().map(|r| (*r).to_string()).collect();
    Arc::new(EmailService::new(config).unwrap())
}

#[test]
fn test_email_dag_definition() {
    let registry = WorkflowRegistry::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let handle =
        register_email_dag(&registry, &DagSettings::default(), counting_action(calls)).unwrap();

    assert_eq!(handle.id(), "PythonEmailDag");
    assert_eq!(handle.owner(), "proyeksem3");
    assert_eq!(handle.start_date().to_rfc3339(), "2024-12-04T00:00:00+00:00");
    assert!(handle.schedule().is_manual());
    assert_eq!(handle.tasks().len(), 1);
    assert_eq!(handle.tasks()[0].id, "start_dag");
    assert!(handle.upstream_of(SEND_EMAIL_TASK_ID).is_empty());
}

#[test]
fn test_email_dag_cannot_be_registered_twice() {
    let registry = WorkflowRegistry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let settings = DagSettings::default();

    register_email_dag(&registry, &settings, counting_action(Arc::clone(&calls))).unwrap();
    let err = register_email_dag(&registry, &settings, counting_action(calls)).unwrap_err();

    assert!(matches!(err, WorkflowError::DuplicateWorkflow(id) if id == EMAIL_DAG_ID));
}

#[tokio::test]
async fn test_trigger_sends_once() {
    let registry = Arc::new(WorkflowRegistry::new());
    let calls = Arc::new(AtomicUsize::new(0));
    register_email_dag(
        &registry,
        &DagSettings::default(),
        counting_action(Arc::clone(&calls)),
    )
    .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let engine = WorkflowEngine::new(registry);
    let run = engine
        .trigger(EMAIL_DAG_ID, TriggerOptions::default())
        .await
        .unwrap();

    assert_eq!(run.state, RunState::Success);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_send_action_with_disabled_delivery_succeeds() {
    let registry = Arc::new(WorkflowRegistry::new());
    let action = Arc::new(SendEmailAction::new(disabled_email(&["ops@example.com"])));
    register_email_dag(&registry, &DagSettings::default(), action).unwrap();

    let engine = WorkflowEngine::new(registry);
    let run = engine
        .trigger(EMAIL_DAG_ID, TriggerOptions::default())
        .await
        .unwrap();

    assert!(run.is_success());
}

#[tokio::test]
async fn test_send_failure_is_reported_not_swallowed() {
    let registry = Arc::new(WorkflowRegistry::new());
    let action = Arc::new(SendEmailAction::new(disabled_email(&[])));
    register_email_dag(&registry, &DagSettings::default(), action).unwrap();

    let engine = WorkflowEngine::new(registry);
    let run = engine
        .trigger(EMAIL_DAG_ID, TriggerOptions::default())
        .await
        .unwrap();

    assert_eq!(run.state, RunState::Failed);
    let task = run.task(SEND_EMAIL_TASK_ID).unwrap();
    assert_eq!(task.state, TaskState::Failed);
    let error = task.error.as_deref().unwrap();
    assert!(error.contains("sending notification email"));
    assert!(error.contains("No recipients configured"));

    let err = engine
        .execute_task(EMAIL_DAG_ID, SEND_EMAIL_TASK_ID)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::TaskFailed { .. }));
}

#[tokio::test]
async fn test_bootstrap_registers_email_dag() {
    let mut config = AppConfig::default();
    config.email.email_enabled = false;
    config.email.notification.to = vec!["ops@example.com".to_string()];

    let app = App::bootstrap(&config).unwrap();
    let ids: Vec<String> = app
        .engine
        .registry()
        .list()
        .iter()
        .map(|w| w.id().to_string())
        .collect();
    assert_eq!(ids, vec![EMAIL_DAG_ID]);

    let run = app
        .engine
        .trigger(EMAIL_DAG_ID, TriggerOptions::default())
        .await
        .unwrap();
    assert!(run.is_success());
}

#[test]
fn test_config_env_overrides_dag_owner() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "mailflow.yaml",
            r#"
dag:
  owner: reporting
email:
  from_email: reports@example.com
  notification:
    to: ["ops@example.com"]
"#,
        )?;
        jail.set_env("MAILFLOW_DAG__OWNER", "night-shift");

        let config = AppConfig::load(None).map_err(|e| e.to_string())?;
        assert_eq!(config.dag.owner, "night-shift");
        assert_eq!(config.email.from_email, "reports@example.com");
        assert_eq!(config.email.notification.to, vec!["ops@example.com"]);
        assert_eq!(config.dag.start_date, DagSettings::default().start_date);
        Ok(())
    });
}

#[test]
fn test_numeric_env_overrides_load_as_text() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("MAILFLOW_EMAIL__PROVIDER__PASSWORD", "123456");
        jail.set_env("MAILFLOW_EMAIL__PROVIDER__PORT", "2525");
        jail.set_env("MAILFLOW_DAG__OWNER", "42");

        let config = AppConfig::load(None).map_err(|e| e.to_string())?;
        assert_eq!(config.dag.owner, "42");
        match config.email.provider {
            email_service::EmailProvider::Smtp { password, port, .. } => {
                assert_eq!(password.as_deref(), Some("123456"));
                assert_eq!(port, 2525);
            }
        }
        Ok(())
    });
}

#[test]
fn test_bootstrap_accepts_localhost_sender() {
    let mut config = AppConfig::default();
    config.email.from_email = "mailer@localhost".to_string();

    let app = App::bootstrap(&config).unwrap();
    assert!(app.engine.registry().contains(EMAIL_DAG_ID));
}

#[tokio::test]
async fn test_show_reports_next_run_for_cron_workflow() {
    let registry = Arc::new(WorkflowRegistry::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let definition = WorkflowDefinition::builder("daily_digest")
        .default_args(DefaultArgs::new("ops", DagSettings::default().start_date))
        .schedule(Schedule::cron("0 0 9 * * *").unwrap())
        .add_task(TaskUnit::new("digest", counting_action(Arc::clone(&calls))))
        .build()
        .unwrap();
    let handle = registry.register(definition).unwrap();
    assert!(handle.next_run_after(chrono::Utc::now()).is_some());

    let app = App {
        engine: WorkflowEngine::new(registry),
        email: disabled_email(&["ops@example.com"]),
    };
    for json in [false, true] {
        let command = Command::Dags(DagsCommand::Show {
            dag_id: "daily_digest".to_string(),
        });
        commands::run(&app, command, json).await.unwrap();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
