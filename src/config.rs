// File: ./src/config.rs
use crate::model::TagMode;
use crate::storage::{self, JsonFileRepository, TASKS_FILE_NAME};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Overrides both the config and data directories (used by tests).
pub const DIR_ENV_VAR: &str = "TODOLIST_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tag_mode: TagMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    pub save_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tag_mode: TagMode::FreeText,
            data_file: None,
            save_attempts: 3,
            retry_delay_ms: 200,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "todolist", "todolist")
}

fn override_dir() -> Option<PathBuf> {
    env::var_os(DIR_ENV_VAR).map(PathBuf::from)
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        if let Some(dir) = override_dir() {
            return Some(dir.join("config.toml"));
        }
        project_dirs().map(|p| p.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Option<PathBuf> {
        if let Some(dir) = override_dir() {
            return Some(dir);
        }
        project_dirs().map(|p| p.data_dir().to_path_buf())
    }

    /// Missing file means defaults; a malformed one is reported.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => {
                let contents = fs::read_to_string(&path)?;
                let config: Config = toml::from_str(&contents)
                    .with_context(|| format!("parsing {}", path.display()))?;
                Ok(config)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().context("no config directory available")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        storage::atomic_write(&path, toml_str)?;
        Ok(())
    }

    pub fn tasks_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.data_file {
            return Some(path.clone());
        }
        Self::data_dir().map(|d| d.join(TASKS_FILE_NAME))
    }

    pub fn repository(&self) -> Result<JsonFileRepository> {
        let path = self
            .tasks_path()
            .context("no data directory available for the task file")?;
        Ok(JsonFileRepository::new(path))
    }

    pub fn save_attempts(&self) -> u32 {
        self.save_attempts.max(1)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_uses_defaults() {
        let cfg: Config = toml::from_str("tag_mode = \"single_enum\"").unwrap();
        assert_eq!(cfg.tag_mode, TagMode::SingleEnum);
        assert_eq!(cfg.save_attempts, 3);
        assert!(cfg.data_file.is_none());
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let cfg = Config {
            save_attempts: 0,
            ..Config::default()
        };
        assert_eq!(cfg.save_attempts(), 1);
    }

    #[test]
    fn explicit_data_file_wins() {
        let cfg = Config {
            data_file: Some(PathBuf::from("/tmp/x/tasks.json")),
            ..Config::default()
        };
        assert_eq!(cfg.tasks_path(), Some(PathBuf::from("/tmp/x/tasks.json")));
    }
}
