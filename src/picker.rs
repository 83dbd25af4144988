// File: ./src/picker.rs
use async_trait::async_trait;
use chrono::{Local, NaiveDate};

/// Native date selection. `None` means the user backed out.
#[async_trait]
pub trait DatePicker: Send + Sync {
    async fn pick(&self, initial: Option<NaiveDate>) -> Option<NaiveDate>;
}

/// Accepts the initial date, or today when there is none. Interactive
/// hosts use it to pick where their calendar opens.
#[derive(Debug, Clone, Copy, Default)]
pub struct TodayPicker;

#[async_trait]
impl DatePicker for TodayPicker {
    async fn pick(&self, initial: Option<NaiveDate>) -> Option<NaiveDate> {
        Some(initial.unwrap_or_else(|| Local::now().date_naive()))
    }
}

/// Always answers with the same date, e.g. one already chosen in a popup.
#[derive(Debug, Clone, Copy)]
pub struct FixedPicker(pub Option<NaiveDate>);

#[async_trait]
impl DatePicker for FixedPicker {
    async fn pick(&self, _initial: Option<NaiveDate>) -> Option<NaiveDate> {
        self.0
    }
}
