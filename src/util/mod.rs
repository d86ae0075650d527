//! Utility functions for common operations.
//!
//! - **Text processing**: Unicode-aware width calculation, truncation,
//!   wrapping and control-character stripping
//! - **Image references**: resolving catalog image sources to openable targets
//!
//! ```
//! use osnote::util::{display_width, truncate_to_width};
//!
//! let width = display_width("Hello 世界");
//! assert_eq!(width, 10);
//!
//! let truncated = truncate_to_width("Process Control Block", 10);
//! assert_eq!(truncated, "Process...");
//! ```

mod image_ref;
mod text;

pub use image_ref::{resolve_image, ImageRefError, ImageTarget};
pub use text::{display_width, strip_control_chars, truncate_to_width, wrap_to_width};

/// Maximum allowed search query length.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
