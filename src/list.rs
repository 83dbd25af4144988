// File: ./src/list.rs
use crate::model::Task;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::watch;

/// Handle to a task list owned by the screen that opens the dialog.
///
/// Clones share the same list. The only mutation is [`TaskList::append`],
/// which also hands back a snapshot taken under the same lock, so whatever
/// gets persisted is exactly the list as of that append.
#[derive(Clone, Debug)]
pub struct TaskList {
    inner: Arc<RwLock<Vec<Task>>>,
    revision: Arc<watch::Sender<u64>>,
}

/// Consistent copy of the list right after an append.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub revision: u64,
    pub tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(tasks)),
            revision: Arc::new(tx),
        }
    }

    pub fn append(&self, task: Task) -> Snapshot {
        // A panic elsewhere while holding the lock must not take the UI down with it.
        let mut tasks = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        tasks.push(task);
        let snapshot = tasks.clone();
        let mut revision = 0;
        self.revision.send_modify(|r| {
            *r += 1;
            revision = *r;
        });
        Snapshot {
            revision,
            tasks: snapshot,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<Task> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Runs `f` against the current contents without cloning them.
    pub fn with_tasks<R>(&self, f: impl FnOnce(&[Task]) -> R) -> R {
        let tasks = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&tasks)
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Notified with the new revision after every append.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

impl Default for TaskList {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
