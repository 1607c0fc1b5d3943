use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use taskweave::errors::Result;
use taskweave::git::RepoGate;

/// A fake repository gate with a switchable dirty flag.
///
/// Clones share state, so tests can flip the flag or inspect calls after the
/// gate moved into an orchestrator.
#[derive(Clone, Default)]
pub struct FakeGate {
    dirty: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
    checked: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeGate {
    pub fn clean() -> Self {
        Self::default()
    }

    pub fn dirty() -> Self {
        let gate = Self::default();
        gate.set_dirty(true);
        gate
    }

    pub fn set_dirty(&self, dirty: bool) {
        self.dirty.store(dirty, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn checked_paths(&self) -> Vec<PathBuf> {
        self.checked.lock().unwrap().clone()
    }
}

impl RepoGate for FakeGate {
    fn is_dirty<'a>(
        &'a self,
        path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.checked.lock().unwrap().push(path.to_path_buf());
        let dirty = self.dirty.load(Ordering::SeqCst);
        Box::pin(async move { Ok(dirty) })
    }
}
