//! Terminal User Interface module.
//!
//! This module provides the interactive listing view, including:
//! - Main event loop (`run`)
//! - Input handling for the listing, the search box and the help overlay
//! - Rendering of the filter bar, the grouped entry list and the pager
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `render` - Layout and size checks
//! - `filters` - Search box and category links
//! - `posts` - Entry list with month headers
//! - `pager` - Prev/next controls and page indicator
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod filters;
mod help;
mod input;
mod loop_runner;
mod pager;
mod posts;
mod render;
mod status;

// Re-export the public API
pub use loop_runner::{run, Action};
