//! Shared CLI presentation utilities.
//!
//! This module provides reusable display and formatting functions
//! for consistent CLI output across commands.
//!
//! # Guidelines
//!
//! - Keep this module format-only: no domain transforms
//! - Domain transforms belong in core services

pub mod tables;

// Re-export commonly used items
pub use tables::{format_list, format_optional, print_failures, render_table, truncate_string};
