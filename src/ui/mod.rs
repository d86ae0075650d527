//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `render` - Layout and view dispatch
//! - `helpers` - Shared widget helpers
//! - `sidebar` - Topic tree
//! - `home`, `topic`, `lesson` - Page views
//! - `results` - Search results
//! - `quiz`, `help` - Overlays
//! - `status` - Status bar

mod help;
mod helpers;
mod home;
mod input;
mod lesson;
mod loop_runner;
mod quiz;
mod render;
mod results;
mod sidebar;
mod status;
mod topic;

// Re-export the public API
pub use loop_runner::{run, Action};
