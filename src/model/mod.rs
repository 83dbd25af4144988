// File: ./src/model/mod.rs
// Aggregates the split model files
pub mod date;
pub mod item;
pub mod priority;
pub mod tag;

// Re-export types so callers can use `crate::model::Task` directly
pub use date::{format_task_date, parse_task_date};
pub use item::Task;
pub use priority::Priority;
pub use tag::{TagField, TagMode, TaskTag, split_free_text_tags};
