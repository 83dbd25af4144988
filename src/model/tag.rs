// File: ./src/model/tag.rs
// Tag input variants: comma-separated free text or a single fixed tag
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskTag {
    Work,
    Family,
    Health,
    Education,
}

impl TaskTag {
    pub const ALL: [TaskTag; 4] = [
        TaskTag::Work,
        TaskTag::Family,
        TaskTag::Health,
        TaskTag::Education,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskTag::Work => "Work",
            TaskTag::Family => "Family",
            TaskTag::Health => "Health",
            TaskTag::Education => "Education",
        }
    }
}

impl fmt::Display for TaskTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which tag widget a dialog is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagMode {
    #[default]
    FreeText,
    SingleEnum,
}

/// Tag state held by a draft. The variant is fixed when the draft is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagField {
    FreeText(String),
    SingleEnum(Option<TaskTag>),
}

impl TagField {
    pub fn empty(mode: TagMode) -> Self {
        match mode {
            TagMode::FreeText => TagField::FreeText(String::new()),
            TagMode::SingleEnum => TagField::SingleEnum(None),
        }
    }

    pub fn mode(&self) -> TagMode {
        match self {
            TagField::FreeText(_) => TagMode::FreeText,
            TagField::SingleEnum(_) => TagMode::SingleEnum,
        }
    }

    /// Tag labels as they will be stored on the task.
    pub fn to_tags(&self) -> Vec<String> {
        match self {
            TagField::FreeText(raw) => split_free_text_tags(raw),
            TagField::SingleEnum(Some(tag)) => vec![tag.label().to_string()],
            TagField::SingleEnum(None) => Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        *self = TagField::empty(self.mode());
    }
}

/// Splits on commas, trims each piece and drops empty ones.
/// Duplicates and input order are kept.
pub fn split_free_text_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
