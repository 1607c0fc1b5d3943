// tests/config_loading.rs

use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;

use taskweave::config::{load_project_config, validate_config, CONFIG_FILE_NAME};
use taskweave::errors::TaskweaveError;
use taskweave::fs::RealFileSystem;
use taskweave::watch::{resolve_watch_dirs, IgnoreRules};

type TestResult = Result<(), Box<dyn Error>>;

const FULL_CONFIG: &str = r#"
[project]
name = "demo"
version = "1.2.0"
description = "example project"

[tasks.install]
command = "pip install -e ."

[tasks.test]
command = "pytest {snip:pytest-flags}"
depends_on = ["install"]
watch_dirs = ["app", "missing"]
timeout = 120
fail_on_dirty_branch = true
"#;

fn project_dir(config: &str) -> Result<TempDir, Box<dyn Error>> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join(CONFIG_FILE_NAME), config)?;
    Ok(dir)
}

#[test]
fn loads_every_task_field() -> TestResult {
    let dir = project_dir(FULL_CONFIG)?;
    let cfg = load_project_config(&RealFileSystem, dir.path())?;

    let meta = cfg.metadata();
    assert_eq!(meta.name, "demo");
    assert_eq!(meta.version, "1.2.0");

    let test = cfg.task("test").unwrap();
    assert_eq!(test.command, "pytest {snip:pytest-flags}");
    assert_eq!(test.depends_on, vec!["install"]);
    assert_eq!(test.timeout_duration(), Some(Duration::from_secs(120)));
    assert!(test.fail_on_dirty_branch);

    let install = cfg.task("install").unwrap();
    assert!(install.depends_on.is_empty());
    assert!(install.watch_dirs.is_none());
    assert!(!install.fail_on_dirty_branch);

    assert!(validate_config(&cfg).is_empty());
    Ok(())
}

#[test]
fn missing_config_file_is_a_runner_error() -> TestResult {
    let dir = TempDir::new()?;

    match load_project_config(&RealFileSystem, dir.path()) {
        Err(TaskweaveError::Runner(msg)) => {
            assert!(msg.contains(CONFIG_FILE_NAME));
        }
        other => panic!("Expected Runner error, got: {:?}", other),
    }
    Ok(())
}

#[test]
fn malformed_config_is_a_toml_error() -> TestResult {
    let dir = project_dir("[tasks.build\ncommand = ")?;

    let err = load_project_config(&RealFileSystem, dir.path()).unwrap_err();
    assert!(matches!(err, TaskweaveError::Toml(_)), "{err:?}");
    Ok(())
}

#[test]
fn task_without_command_is_rejected() -> TestResult {
    let dir = project_dir("[tasks.build]\ndepends_on = []\n")?;

    let err = load_project_config(&RealFileSystem, dir.path()).unwrap_err();
    assert!(matches!(err, TaskweaveError::Toml(_)), "{err:?}");
    Ok(())
}

#[test]
fn validation_reports_graph_problems_without_failing_load() -> TestResult {
    let dir = project_dir(
        r#"
[tasks.a]
command = "echo a"
depends_on = ["b", "ghost"]

[tasks.b]
command = "echo b"
depends_on = ["a"]
"#,
    )?;

    let cfg = load_project_config(&RealFileSystem, dir.path())?;
    let warnings = validate_config(&cfg);

    assert!(warnings.iter().any(|w| w.contains("Missing [project]")));
    assert!(warnings.iter().any(|w| w.contains("undefined task 'ghost'")));
    assert!(warnings.iter().any(|w| w.contains("Circular dependency")));
    Ok(())
}

#[test]
fn watch_setup_follows_task_and_ignore_file() -> TestResult {
    let dir = project_dir(FULL_CONFIG)?;
    fs::create_dir_all(dir.path().join("app"))?;
    fs::write(dir.path().join(".gitignore"), "# build output\n/dist/\n*.egg-info\n")?;

    let cfg = load_project_config(&RealFileSystem, dir.path())?;
    let dirs = resolve_watch_dirs(
        &RealFileSystem,
        dir.path(),
        cfg.task("test").unwrap().watch_dirs.as_deref(),
    );
    assert_eq!(dirs, vec![dir.path().join("app")]);

    let rules = IgnoreRules::load(&RealFileSystem, dir.path())?;
    let root: &Path = dir.path();
    assert!(rules.is_ignored(&root.join("dist/bundle.js")));
    assert!(rules.is_ignored(&root.join("demo.egg-info/PKG-INFO")));
    assert!(rules.is_ignored(&root.join(".git/HEAD")));
    assert!(!rules.is_ignored(&root.join("app/main.py")));
    Ok(())
}
