// File: ./src/model/item.rs
use crate::draft::DraftField;
use crate::error::ValidationError;
use crate::model::priority::Priority;
use serde::{Deserialize, Serialize};

/// A persisted to-do entry.
///
/// Title, description and date are guaranteed non-empty: the only ways in
/// are [`Task::new`] and deserialization, and both run the same check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    title: String,
    description: String,
    date: String,
    tags: Vec<String>,
    priority: Priority,
}

// Unchecked wire shape, validated into `Task`.
#[derive(Deserialize)]
struct TaskRecord {
    title: String,
    description: String,
    date: String,
    #[serde(default)]
    tags: Vec<String>,
    priority: Priority,
}

impl TryFrom<TaskRecord> for Task {
    type Error = ValidationError;

    fn try_from(r: TaskRecord) -> Result<Self, Self::Error> {
        Task::new(r.title, r.description, r.date, r.tags, r.priority)
    }
}

impl Task {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        date: impl Into<String>,
        tags: Vec<String>,
        priority: Priority,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        let description = description.into();
        let date = date.into();

        let mut missing = Vec::new();
        if title.is_empty() {
            missing.push(DraftField::Title);
        }
        if description.is_empty() {
            missing.push(DraftField::Description);
        }
        if date.is_empty() {
            missing.push(DraftField::Date);
        }
        if !missing.is_empty() {
            return Err(ValidationError { missing });
        }

        Ok(Self {
            title,
            description,
            date,
            tags,
            priority,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }
}
