//! postdeck: a terminal browser for blog dashboard post listings.
//!
//! The library half holds everything that does not need a terminal:
//!
//! - [`listing`] - one-shot capture of post entries from the dashboard markup
//! - [`filter`] - category and free-text predicates
//! - [`grouping`] - calendar-month buckets, newest first
//! - [`pagination`] - fixed-size pages with clamped navigation
//! - [`view`] - the coordinator that owns the view state and rebuilds rows
//! - [`report`] - plain-text and JSON output of a rendered view
//! - [`config`] - `config.toml` loading

pub mod config;
pub mod filter;
pub mod grouping;
pub mod listing;
pub mod pagination;
pub mod report;
pub mod util;
pub mod view;
