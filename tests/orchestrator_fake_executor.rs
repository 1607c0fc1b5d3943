// tests/orchestrator_fake_executor.rs

use std::error::Error;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use taskweave::config::ProjectConfig;
use taskweave::engine::{Orchestrator, RerunTask};
use taskweave::errors::{Result as TwResult, TaskweaveError};
use taskweave::fs::mock::MockFileSystem;
use taskweave::git::RepoGate;
use taskweave::shutdown;
use taskweave::types::{EnvMap, Project};
use taskweave::watch::WatchCallback;
use taskweave_test_utils::builders::{ProjectConfigBuilder, TaskConfigBuilder};
use taskweave_test_utils::{init_tracing, with_timeout, FakeExecutor, FakeGate};

type TestResult = Result<(), Box<dyn Error>>;

fn project() -> Project {
    Project::new("demo", "/proj")
}

fn base_env() -> EnvMap {
    let mut env = EnvMap::new();
    env.insert("PATH".into(), "/usr/bin".into());
    env.insert("LANG".into(), "C.UTF-8".into());
    env
}

fn orchestrator(exec: &FakeExecutor, gate: &FakeGate) -> Orchestrator<FakeExecutor, FakeGate> {
    Orchestrator::new(exec.clone(), gate.clone())
        .with_base_env(base_env())
        .with_fs(Arc::new(MockFileSystem::new()))
}

/// install, lint -> test
fn test_pipeline() -> ProjectConfig {
    ProjectConfigBuilder::new()
        .with_project("demo")
        .with_simple("install", "pip install -e .", &[])
        .with_simple("lint", "ruff check .", &[])
        .with_task(
            "test",
            TaskConfigBuilder::new("pytest {snip:pytest-flags}")
                .depends_on("install")
                .depends_on("lint")
                .timeout(300)
                .build(),
        )
        .build()
}

#[tokio::test]
async fn runs_plan_in_dependency_order() -> TestResult {
    init_tracing();

    let exec = FakeExecutor::new();
    let gate = FakeGate::clean();
    let mut orch = orchestrator(&exec, &gate);

    let code = orch
        .run_with_config(&project(), &test_pipeline(), "test", false)
        .await?;

    assert_eq!(code, 0);
    let names = exec.executed_names();
    assert_eq!(names.len(), 3);
    assert_eq!(names[2], "test");
    assert!(names[..2].contains(&"install".to_string()));
    assert!(names[..2].contains(&"lint".to_string()));
    assert_eq!(gate.calls(), 0, "gate consulted for a task that does not need it");
    Ok(())
}

#[tokio::test]
async fn every_step_shares_one_composed_environment() -> TestResult {
    init_tracing();

    let exec = FakeExecutor::new();
    let mut orch = orchestrator(&exec, &FakeGate::clean());

    orch.run_with_config(&project(), &test_pipeline(), "test", false)
        .await?;

    let runs = exec.executed();
    assert!(runs.windows(2).all(|w| Arc::ptr_eq(&w[0].env, &w[1].env)));
    assert_eq!(*runs[0].env, base_env());
    Ok(())
}

#[tokio::test]
async fn scheduled_tasks_carry_config_and_project_root() -> TestResult {
    let exec = FakeExecutor::new();
    let mut orch = orchestrator(&exec, &FakeGate::clean());

    orch.run_with_config(&project(), &test_pipeline(), "test", false)
        .await?;

    let last = exec.executed().pop().unwrap();
    assert_eq!(last.command, "pytest {snip:pytest-flags}");
    assert_eq!(last.timeout, Some(Duration::from_secs(300)));
    assert_eq!(last.cwd, project().root);
    Ok(())
}

#[tokio::test]
async fn first_failure_stops_the_run() -> TestResult {
    init_tracing();

    let cfg = ProjectConfigBuilder::new()
        .with_simple("a", "step a", &[])
        .with_simple("b", "step b", &["a"])
        .with_simple("c", "step c", &["b"])
        .build();

    let exec = FakeExecutor::new().with_exit_code("b", 2);
    let mut orch = orchestrator(&exec, &FakeGate::clean());

    let code = orch.run_with_config(&project(), &cfg, "c", false).await?;

    assert_eq!(code, 2);
    assert_eq!(exec.executed_names(), vec!["a", "b"]);
    Ok(())
}

#[tokio::test]
async fn dirty_repository_blocks_before_anything_runs() -> TestResult {
    init_tracing();

    let cfg = ProjectConfigBuilder::new()
        .with_simple("build", "make", &[])
        .with_task(
            "deploy",
            TaskConfigBuilder::new("./deploy.sh")
                .depends_on("build")
                .fail_on_dirty_branch(true)
                .build(),
        )
        .build();

    let exec = FakeExecutor::new();
    let gate = FakeGate::dirty();
    let mut orch = orchestrator(&exec, &gate);

    match orch.run_with_config(&project(), &cfg, "deploy", false).await {
        Err(TaskweaveError::GitDirty(msg)) => assert!(msg.contains("/proj")),
        other => panic!("Expected GitDirty, got: {:?}", other),
    }
    assert_eq!(exec.run_count(), 0);
    assert_eq!(gate.checked_paths(), vec![project().root]);
    Ok(())
}

#[tokio::test]
async fn force_skips_the_clean_check() -> TestResult {
    let cfg = ProjectConfigBuilder::new()
        .with_task(
            "deploy",
            TaskConfigBuilder::new("./deploy.sh")
                .fail_on_dirty_branch(true)
                .build(),
        )
        .build();

    let exec = FakeExecutor::new();
    let gate = FakeGate::dirty();
    let mut orch = orchestrator(&exec, &gate);

    let code = orch.run_with_config(&project(), &cfg, "deploy", true).await?;

    assert_eq!(code, 0);
    assert_eq!(exec.executed_names(), vec!["deploy"]);
    assert_eq!(gate.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn only_the_target_task_is_gated() -> TestResult {
    let cfg = ProjectConfigBuilder::new()
        .with_task(
            "publish",
            TaskConfigBuilder::new("twine upload")
                .fail_on_dirty_branch(true)
                .build(),
        )
        .with_simple("docs", "mkdocs build", &["publish"])
        .build();

    let exec = FakeExecutor::new();
    let gate = FakeGate::dirty();
    let mut orch = orchestrator(&exec, &gate);

    let code = orch.run_with_config(&project(), &cfg, "docs", false).await?;

    assert_eq!(code, 0);
    assert_eq!(gate.calls(), 0);
    assert_eq!(exec.executed_names(), vec!["publish", "docs"]);
    Ok(())
}

#[tokio::test]
async fn unknown_target_is_task_not_found() -> TestResult {
    let exec = FakeExecutor::new();
    let gate = FakeGate::dirty();
    let mut orch = orchestrator(&exec, &gate);

    match orch
        .run_with_config(&project(), &test_pipeline(), "deploy", false)
        .await
    {
        Err(TaskweaveError::TaskNotFound(name)) => assert_eq!(name, "deploy"),
        other => panic!("Expected TaskNotFound, got: {:?}", other),
    }
    assert_eq!(exec.run_count(), 0);
    assert_eq!(gate.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn missing_dependency_aborts_without_running() -> TestResult {
    let cfg = ProjectConfigBuilder::new()
        .with_simple("test", "pytest", &["install"])
        .build();

    let exec = FakeExecutor::new();
    let mut orch = orchestrator(&exec, &FakeGate::clean());

    match orch.run_with_config(&project(), &cfg, "test", false).await {
        Err(TaskweaveError::TaskNotFound(name)) => assert_eq!(name, "install"),
        other => panic!("Expected TaskNotFound, got: {:?}", other),
    }
    assert_eq!(exec.run_count(), 0);
    Ok(())
}

#[tokio::test]
async fn cycle_aborts_without_running() -> TestResult {
    let cfg = ProjectConfigBuilder::new()
        .with_simple("a", "echo a", &["b"])
        .with_simple("b", "echo b", &["a"])
        .build();

    let exec = FakeExecutor::new();
    let mut orch = orchestrator(&exec, &FakeGate::clean());

    let err = orch
        .run_with_config(&project(), &cfg, "a", false)
        .await
        .unwrap_err();
    assert!(matches!(err, TaskweaveError::CyclicDependency(_)));
    assert_eq!(exec.run_count(), 0);
    Ok(())
}

#[tokio::test]
async fn run_reloads_configuration_every_time() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file(
        "/proj/taskweave.toml",
        "[tasks.build]\ncommand = \"make v1\"\n",
    );

    let exec = FakeExecutor::new();
    let mut orch = Orchestrator::new(exec.clone(), FakeGate::clean())
        .with_base_env(base_env())
        .with_fs(Arc::new(fs.clone()));

    orch.run(&project(), "build", false).await?;

    fs.add_file(
        "/proj/taskweave.toml",
        "[tasks.build]\ncommand = \"make v2\"\n",
    );
    orch.run(&project(), "build", false).await?;

    let commands: Vec<String> = exec.executed().into_iter().map(|t| t.command).collect();
    assert_eq!(commands, vec!["make v1", "make v2"]);
    Ok(())
}

#[tokio::test]
async fn missing_configuration_is_a_runner_error() -> TestResult {
    let exec = FakeExecutor::new();
    let mut orch = orchestrator(&exec, &FakeGate::clean());

    match orch.run(&project(), "build", false).await {
        Err(TaskweaveError::Runner(msg)) => assert!(msg.contains("taskweave.toml")),
        other => panic!("Expected Runner error, got: {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn rerun_callback_swallows_failing_exit_codes() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/taskweave.toml", "[tasks.test]\ncommand = \"pytest\"\n");

    let exec = FakeExecutor::new().with_exit_code("test", 1);
    let orch = Orchestrator::new(exec.clone(), FakeGate::clean())
        .with_base_env(base_env())
        .with_fs(Arc::new(fs));

    let mut callback = RerunTask {
        orchestrator: orch,
        project: project(),
        task: "test".to_string(),
        force: false,
    };

    callback.on_change().await?;
    callback.on_change().await?;
    assert_eq!(exec.run_count(), 2);
    Ok(())
}

#[tokio::test]
async fn rerun_callback_reports_orchestration_errors() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/taskweave.toml", "[tasks.test]\ncommand = \"pytest\"\n");

    let orch = Orchestrator::new(FakeExecutor::new(), FakeGate::clean())
        .with_base_env(base_env())
        .with_fs(Arc::new(fs));

    let mut callback = RerunTask {
        orchestrator: orch,
        project: project(),
        task: "missing".to_string(),
        force: false,
    };

    let err = callback.on_change().await.unwrap_err();
    assert!(matches!(err, TaskweaveError::TaskNotFound(_)));
    Ok(())
}

/// Gate whose check never finishes, like `git` hanging on a network mount.
struct StuckGate;

impl RepoGate for StuckGate {
    fn is_dirty<'a>(
        &'a self,
        _path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = TwResult<bool>> + Send + 'a>> {
        Box::pin(std::future::pending())
    }
}

#[tokio::test]
async fn shutdown_is_observed_during_the_clean_check() -> TestResult {
    let cfg = ProjectConfigBuilder::new()
        .with_task(
            "deploy",
            TaskConfigBuilder::new("./deploy.sh")
                .fail_on_dirty_branch(true)
                .build(),
        )
        .build();

    let exec = FakeExecutor::new();
    let mut orch = Orchestrator::new(exec.clone(), StuckGate)
        .with_base_env(base_env())
        .with_fs(Arc::new(MockFileSystem::new()));

    let (trigger, shutdown) = shutdown::channel();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.trigger();
    });

    let res = with_timeout(shutdown::cancellable(
        shutdown,
        orch.run_with_config(&project(), &cfg, "deploy", false),
    ))
    .await;

    assert!(matches!(res, Err(TaskweaveError::Cancelled)), "{res:?}");
    assert_eq!(exec.run_count(), 0);
    Ok(())
}
