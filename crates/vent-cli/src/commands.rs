//! Main commands enum.
//!
//! This module defines the available commands for the CLI tool.

use clap::Subcommand;

/// Available commands.
///
/// Every command is a read-only view; nothing here changes the runtime or
/// the checkouts beyond cloning and pinning them for `status`.
#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile manifest, checkouts and runtime into a tool inventory
    Status {
        /// Compute the core partition instead of plugins
        #[arg(long)]
        core: bool,
        /// Branch to check repositories out at (defaults to VENT_BRANCH or master)
        #[arg(long)]
        branch: Option<String>,
        /// Version to pin checkouts to (defaults to VENT_VERSION or HEAD)
        #[arg(long = "version")]
        version: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Count running and finished jobs
    Jobs {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show host and runtime facts
    Info {
        /// Pull the CUDA image if needed to detect GPUs
        #[arg(long)]
        gpu_pull: bool,
    },

    /// List images
    Images {
        /// Include images not labelled as vent images
        #[arg(long)]
        all: bool,
    },

    /// List containers
    Containers {
        /// Include containers not labelled as vent containers
        #[arg(long)]
        all: bool,
        /// Include stopped containers
        #[arg(long)]
        stopped: bool,
    },

    /// List running containers with published ports
    Services {
        /// Include containers not labelled as vent containers
        #[arg(long)]
        all: bool,
    },

    /// List the tools declared in the plugin manifest
    Tools,

    /// Show resolved paths for all vent directories
    Paths,
}
