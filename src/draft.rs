// File: ./src/draft.rs
// In-progress form state for the "Add New Task" dialog
use crate::error::ValidationError;
use crate::model::{Priority, TagField, TagMode, Task, TaskTag};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Title,
    Description,
    Date,
    Tags,
    Priority,
}

impl DraftField {
    pub fn name(self) -> &'static str {
        match self {
            DraftField::Title => "title",
            DraftField::Description => "description",
            DraftField::Date => "date",
            DraftField::Tags => "tags",
            DraftField::Priority => "priority",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field values are kept exactly as entered. Only tags are trimmed, and only
/// when the task is materialized; a whitespace-only title still counts as
/// filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub date: String,
    pub tags: TagField,
    pub priority: Priority,
}

impl TaskDraft {
    pub fn new(mode: TagMode) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            date: String::new(),
            tags: TagField::empty(mode),
            priority: Priority::Low,
        }
    }

    pub fn tag_mode(&self) -> TagMode {
        self.tags.mode()
    }

    pub fn is_committable(&self) -> bool {
        !self.title.is_empty() && !self.description.is_empty() && !self.date.is_empty()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing: Vec<DraftField> = [
            (DraftField::Title, &self.title),
            (DraftField::Description, &self.description),
            (DraftField::Date, &self.date),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }

    /// Builds the task this draft describes without touching the draft.
    pub fn materialize(&self) -> Result<Task, ValidationError> {
        self.validate()?;
        Task::new(
            self.title.clone(),
            self.description.clone(),
            self.date.clone(),
            self.tags.to_tags(),
            self.priority,
        )
    }

    /// Back to the blank form. The tag variant is kept and priority returns to `Low`.
    pub fn reset(&mut self) {
        self.title.clear();
        self.description.clear();
        self.date.clear();
        self.tags.clear();
        self.priority = Priority::Low;
    }

    pub fn set_priority_position(&mut self, position: f32) {
        self.priority = Priority::from_position(position);
    }

    pub fn priority_position(&self) -> f32 {
        self.priority.position()
    }

    /// Returns false when the draft uses free-text tags.
    pub fn select_tag(&mut self, tag: TaskTag) -> bool {
        match &mut self.tags {
            TagField::SingleEnum(sel) => {
                *sel = Some(tag);
                true
            }
            TagField::FreeText(_) => false,
        }
    }

    /// Mutable access to the comma-separated text, if this draft uses it.
    pub fn free_text_tags_mut(&mut self) -> Option<&mut String> {
        match &mut self.tags {
            TagField::FreeText(raw) => Some(raw),
            TagField::SingleEnum(_) => None,
        }
    }
}
