use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use taskweave::errors::Result;
use taskweave::exec::{ExecutorBackend, ScheduledTask};

/// A fake executor that:
/// - records every task handed to it (in call order)
/// - reports a configurable exit code per task name (default `0`)
///
/// Clones share the same record, so a test can keep a handle after moving
/// the executor into an orchestrator.
#[derive(Clone, Default)]
pub struct FakeExecutor {
    executed: Arc<Mutex<Vec<ScheduledTask>>>,
    exit_codes: Arc<Mutex<HashMap<String, i32>>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `task` exit with `code` when run.
    pub fn with_exit_code(self, task: &str, code: i32) -> Self {
        self.exit_codes
            .lock()
            .unwrap()
            .insert(task.to_string(), code);
        self
    }

    /// Names of executed tasks, in order.
    pub fn executed_names(&self) -> Vec<String> {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.name.clone())
            .collect()
    }

    /// Full records of executed tasks, in order.
    pub fn executed(&self) -> Vec<ScheduledTask> {
        self.executed.lock().unwrap().clone()
    }

    pub fn run_count(&self) -> usize {
        self.executed.lock().unwrap().len()
    }
}

impl ExecutorBackend for FakeExecutor {
    fn run_one(
        &mut self,
        task: ScheduledTask,
    ) -> Pin<Box<dyn Future<Output = Result<i32>> + Send + '_>> {
        let executed = Arc::clone(&self.executed);
        let code = self
            .exit_codes
            .lock()
            .unwrap()
            .get(&task.name)
            .copied()
            .unwrap_or(0);

        Box::pin(async move {
            executed.lock().unwrap().push(task);
            Ok(code)
        })
    }
}
