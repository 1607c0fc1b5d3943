// src/exec/task_runner.rs

//! Individual task process runner.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::errors::{Result, TaskweaveError};
use crate::shutdown::Shutdown;
use crate::types::EnvMap;

/// Build a shell command appropriate for the platform.
fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    }
}

/// Kills everything a task started unless disarmed.
///
/// On unix the shell is spawned as the leader of its own process group, so
/// pipelines and subshells it forks share the group id and die with it.
/// Elsewhere only the direct child is reached (through `kill_on_drop`).
struct ProcessGroupGuard {
    name: String,
    pgid: Option<u32>,
}

impl ProcessGroupGuard {
    fn new(name: &str, child: &Child) -> Self {
        Self {
            name: name.to_string(),
            pgid: child.id(),
        }
    }

    /// The task finished on its own; leave any background jobs alone.
    fn disarm(&mut self) {
        self.pgid = None;
    }

    /// SIGKILL the whole group. Returns `false` if nothing was signalled.
    fn kill_group(&mut self) -> bool {
        let Some(pgid) = self.pgid.take() else {
            return false;
        };
        signal_group(&self.name, pgid)
    }
}

impl Drop for ProcessGroupGuard {
    fn drop(&mut self) {
        if self.kill_group() {
            debug!(task = %self.name, "task dropped while running; process group killed");
        }
    }
}

#[cfg(unix)]
fn signal_group(name: &str, pgid: u32) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pgid) else {
        return false;
    };
    match killpg(Pid::from_raw(raw), Signal::SIGKILL) {
        Ok(()) => true,
        Err(Errno::ESRCH) => false,
        Err(e) => {
            warn!(task = %name, error = %e, "failed to signal process group");
            false
        }
    }
}

#[cfg(not(unix))]
fn signal_group(_name: &str, _pgid: u32) -> bool {
    false
}

/// Kill the task's processes and reap the shell.
async fn terminate(name: &str, child: &mut Child, guard: &mut ProcessGroupGuard) {
    if guard.kill_group() {
        if let Err(e) = child.wait().await {
            debug!(task = %name, error = %e, "failed to reap killed process");
        }
        return;
    }
    if let Err(e) = child.kill().await {
        debug!(task = %name, error = %e, "process already gone");
    }
}

/// Run `command` through the host shell and wait for it.
///
/// The child gets exactly `env` (not the parent's environment) and inherits
/// stdin/stdout/stderr, so its output appears live.
///
/// - Returns the exit code on normal completion, whatever it is. A process
///   terminated by a signal reports `-1`.
/// - If `timeout` elapses first, every process the task started is killed
///   and [`TaskweaveError::TaskTimeout`] is returned.
/// - If `shutdown` fires first, the same happens and
///   [`TaskweaveError::Cancelled`] is returned.
/// - Dropping the returned future also kills the task's processes.
pub async fn run_command(
    name: &str,
    command: &str,
    cwd: &Path,
    env: &EnvMap,
    timeout: Option<Duration>,
    mut shutdown: Shutdown,
) -> Result<i32> {
    info!(task = %name, cmd = %command, ?cwd, "starting task process");

    let mut cmd = shell_command(command);
    cmd.current_dir(cwd)
        .env_clear()
        .envs(env)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for task '{}'", name))?;
    let mut guard = ProcessGroupGuard::new(name, &child);

    let deadline = async {
        match timeout {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        status_res = child.wait() => {
            guard.disarm();
            let status = status_res
                .with_context(|| format!("waiting for process of task '{}'", name))?;
            let code = status.code().unwrap_or(-1);

            info!(
                task = %name,
                exit_code = code,
                success = status.success(),
                "task process exited"
            );
            Ok(code)
        }

        _ = deadline => {
            let limit = timeout.unwrap_or_default();
            warn!(task = %name, timeout_secs = limit.as_secs(), "task exceeded timeout; killing processes");
            terminate(name, &mut child, &mut guard).await;
            Err(TaskweaveError::TaskTimeout {
                task: name.to_string(),
                timeout: limit,
            })
        }

        _ = shutdown.triggered() => {
            info!(task = %name, "shutdown requested; killing processes");
            terminate(name, &mut child, &mut guard).await;
            Err(TaskweaveError::Cancelled)
        }
    }
}
