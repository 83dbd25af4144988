pub mod config;
pub mod dialog;
pub mod draft;
pub mod error;
pub mod list;
pub mod logging;
pub mod model;
pub mod persist;
pub mod picker;
pub mod repository;
pub mod storage;

#[cfg(feature = "tui")]
pub mod tui;
