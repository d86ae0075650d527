//! osnote: a terminal notebook for studying operating systems concepts.
//!
//! The library holds the catalog, progress tracking, search, navigation and
//! persistence; `ui` drives them from a ratatui terminal front end.

pub mod app;
pub mod catalog;
pub mod config;
pub mod keybindings;
pub mod navigation;
pub mod notebook;
pub mod progress;
pub mod quiz;
pub mod search;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;
