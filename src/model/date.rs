// File: ./src/model/date.rs
// Task dates are stored as `YYYY-M-D` text without zero padding
use chrono::{Datelike, NaiveDate};

pub fn format_task_date(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.year(), date.month(), date.day())
}

/// Reads a stored date back. Zero-padded input is accepted as well.
pub fn parse_task_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.trim().splitn(3, '-');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = parts.next()?.parse::<u32>().ok()?;
    let day = parts.next()?.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
