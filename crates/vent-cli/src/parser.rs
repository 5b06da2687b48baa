//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the vent tool inventory.
///
/// This is the top-level parser that handles global options and dispatches
/// to subcommands.
#[derive(Parser)]
#[command(name = "vent")]
#[command(about = "Inspect the tools, images and jobs of a vent deployment")]
#[command(version)]
pub struct Cli {
    /// Read the plugin manifest from this file instead of the meta directory
    #[arg(long = "manifest", global = true, env = "VENT_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
