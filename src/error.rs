// File: ./src/error.rs
use crate::draft::DraftField;
use thiserror::Error;

/// A draft was missing required fields when a commit was requested.
/// The dialog stays open; `missing` lists the fields to highlight.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required field(s): {}", join_fields(.missing))]
pub struct ValidationError {
    pub missing: Vec<DraftField>,
}

impl ValidationError {
    pub fn is_missing(&self, field: DraftField) -> bool {
        self.missing.contains(&field)
    }
}

fn join_fields(fields: &[DraftField]) -> String {
    fields
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("saving {task_count} task(s) failed after {attempts} attempt(s): {source}")]
    Save {
        task_count: usize,
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },
    #[error("save queue stopped before the save completed")]
    QueueClosed,
}
