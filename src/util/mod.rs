//! Small shared helpers.
//!
//! - **Text**: Unicode-aware width measurement, truncation and padding, and
//!   stripping of terminal control sequences from captured text.

mod text;

pub use text::{display_width, pad_to_width, strip_control_chars, truncate_to_width};

/// Maximum search term length, enforced by the search box.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
