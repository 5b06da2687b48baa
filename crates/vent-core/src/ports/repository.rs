//! Repository cache port.
//!
//! Fetch and checkout mechanics are opaque to the core: given a URL the
//! cache produces a local working copy, pins it at a ref, and enumerates the
//! tools it contains.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::AvailableTool;

/// Errors from repository cache operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The repository could not be cloned.
    #[error("Failed to clone {url}: {reason}")]
    CloneFailed { url: String, reason: String },

    /// The working copy could not be moved to the requested ref.
    #[error("Failed to check out {branch}@{version} in {path}: {reason}")]
    CheckoutFailed {
        path: PathBuf,
        branch: String,
        version: String,
        reason: String,
    },

    /// The URL does not map to a local checkout path.
    #[error("Invalid repository URL: {0}")]
    InvalidUrl(String),

    /// A git command did not finish in time.
    #[error("{command} timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    /// Walking the checkout failed.
    #[error("Failed to enumerate tools in {path}: {reason}")]
    EnumerationFailed { path: PathBuf, reason: String },
}

/// Port for local repository checkouts.
#[async_trait]
pub trait RepositoryCachePort: Send + Sync {
    /// Local working copy path for `repo_url`.
    ///
    /// Two URLs that resolve to the same path share one working tree.
    fn checkout_dir(&self, repo_url: &str) -> Result<PathBuf, RepositoryError>;

    /// Make sure a working copy of `repo_url` exists and return its path.
    async fn ensure_clone(&self, repo_url: &str) -> Result<PathBuf, RepositoryError>;

    /// Move the working copy at `path` to `branch` pinned at `version`.
    ///
    /// Mutates the working tree in place; callers serialize access per
    /// checkout.
    async fn checkout(
        &self,
        path: &Path,
        branch: &str,
        version: &str,
    ) -> Result<(), RepositoryError>;

    /// Enumerate tools under `path`, optionally restricted to a group tag.
    async fn available_tools(
        &self,
        path: &Path,
        version: &str,
        group: Option<&str>,
    ) -> Result<Vec<AvailableTool>, RepositoryError>;
}
