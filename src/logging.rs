// File: ./src/logging.rs
use anyhow::{Result, anyhow};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "todolist.log";

fn env_filter() -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))
}

/// Sends logs to `<dir>/todolist.log`. Terminal front ends use this so log
/// lines never land on the alternate screen.
pub fn init_file_logging(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE_NAME))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter()?)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
    Ok(())
}
