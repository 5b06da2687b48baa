//! Path utilities for vent data directories.
//!
//! This module provides the canonical path resolution for all vent components:
//! - Base directory (`~/.vent` or `VENT_HOME`)
//! - Plugin checkouts
//! - Meta directory holding the plugin manifest
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O - adapters handle user prompts separately

mod error;
mod layout;

pub use error::PathError;
pub use layout::{BASE_DIR_ENV, PathDirs, ensure_directory, normalize_user_path};
