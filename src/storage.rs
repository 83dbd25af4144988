// File: ./src/storage.rs
use crate::model::Task;
use crate::repository::TaskRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

pub const TASKS_FILE_NAME: &str = "tasks.json";

/// Writes a sibling `.tmp` file and renames it over `path`. Readers never
/// see a half-written file.
pub fn atomic_write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("writing {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Stores the task list as pretty JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Holds an exclusive advisory lock on `<path>.lock` while `f` runs.
    pub fn with_lock<T, F>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let lock_path = path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .with_context(|| format!("opening lock file {}", lock_path.display()))?;
        lock_file.lock_exclusive()?;
        let result = f();
        let _ = FileExt::unlock(&lock_file);
        result
    }

    pub fn save_blocking(&self, tasks: &[Task]) -> Result<()> {
        Self::with_lock(&self.path, || {
            let json = serde_json::to_string_pretty(tasks)?;
            atomic_write(&self.path, json)
                .with_context(|| format!("writing {}", self.path.display()))
        })
    }

    /// A missing file is an empty list. A corrupt one is an error, so a bad
    /// file is never silently overwritten by the next save.
    pub fn load_blocking(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            return Ok(vec![]);
        }
        Self::with_lock(&self.path, || {
            let json = fs::read_to_string(&self.path)?;
            if json.trim().is_empty() {
                return Ok(vec![]);
            }
            let tasks: Vec<Task> = serde_json::from_str(&json)
                .with_context(|| format!("parsing {}", self.path.display()))?;
            Ok(tasks)
        })
    }
}

#[async_trait]
impl TaskRepository for JsonFileRepository {
    async fn save(&self, tasks: Vec<Task>) -> Result<()> {
        let repo = self.clone();
        tokio::task::spawn_blocking(move || repo.save_blocking(&tasks)).await?
    }

    async fn load(&self) -> Result<Vec<Task>> {
        let repo = self.clone();
        tokio::task::spawn_blocking(move || repo.load_blocking()).await?
    }
}
