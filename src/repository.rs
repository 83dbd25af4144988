// File: ./src/repository.rs
use crate::model::Task;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

/// Where the whole task list is persisted.
///
/// `save` receives the full list every time. Implementations must make
/// `load` return the last saved sequence in the same order with equal fields.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn save(&self, tasks: Vec<Task>) -> Result<()>;

    async fn load(&self) -> Result<Vec<Task>>;
}

/// Keeps the last saved list in memory.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tasks: Mutex<Vec<Task>>,
    saves: Mutex<usize>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl TaskRepository for MemoryRepository {
    async fn save(&self, tasks: Vec<Task>) -> Result<()> {
        *self.tasks.lock().unwrap_or_else(PoisonError::into_inner) = tasks;
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Task>> {
        Ok(self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}
