//! [`RepositoryCachePort`] over the `git` command line client.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};
use vent_core::{AvailableTool, RepositoryCachePort, RepositoryError};

use super::discover::discover_tools;
use crate::command::{CommandError, CommandOutput, CommandRunner, TokioCommandRunner, args};

/// Version value meaning "whatever the branch points at".
const HEAD: &str = "HEAD";

/// Working copies under `<plugins_dir>/<host>/<org>/<name>`.
pub struct GitRepositoryCache {
    plugins_dir: PathBuf,
    git_bin: String,
    timeout: Duration,
    runner: Arc<dyn CommandRunner>,
}

impl GitRepositoryCache {
    pub fn new(
        plugins_dir: impl Into<PathBuf>,
        git_bin: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self::with_runner(plugins_dir, git_bin, timeout, Arc::new(TokioCommandRunner))
    }

    pub fn with_runner(
        plugins_dir: impl Into<PathBuf>,
        git_bin: impl Into<String>,
        timeout: Duration,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            plugins_dir: plugins_dir.into(),
            git_bin: git_bin.into(),
            timeout,
            runner,
        }
    }

    async fn git(
        &self,
        args: Vec<String>,
        cwd: Option<&Path>,
    ) -> Result<CommandOutput, GitFailure> {
        let output = self
            .runner
            .run(&self.git_bin, &args, cwd, self.timeout)
            .await;
        match output {
            Ok(output) if output.success() => Ok(output),
            Ok(output) => Err(GitFailure::Exit(output.stderr.trim().to_string())),
            Err(CommandError::Spawn { reason, .. }) => Err(GitFailure::Exit(reason)),
            Err(CommandError::Timeout { command, timeout }) => {
                let err = RepositoryError::Timeout { command, timeout };
                Err(GitFailure::Timeout(err))
            }
        }
    }
}

/// A git invocation that did not succeed.
enum GitFailure {
    Exit(String),
    Timeout(RepositoryError),
}

impl GitFailure {
    fn into_error(self, build: impl FnOnce(String) -> RepositoryError) -> RepositoryError {
        match self {
            Self::Exit(reason) => build(reason),
            Self::Timeout(err) => err,
        }
    }
}

/// `<host>/<org>/<name>` for a repository URL.
///
/// Accepts `https://host/org/name(.git)` and `git@host:org/name(.git)`.
/// User info is dropped from the host and a port is kept as `host_port`.
pub fn relative_checkout_path(repo_url: &str) -> Result<PathBuf, RepositoryError> {
    let invalid = || RepositoryError::InvalidUrl(repo_url.to_string());

    let trimmed = repo_url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    let (authority, path) = match trimmed.split_once("://") {
        Some((_, rest)) => rest.split_once('/').ok_or_else(invalid)?,
        None => trimmed.split_once(':').ok_or_else(invalid)?,
    };
    let host = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host)
        .replace(':', "_");

    let mut segments = path.rsplit('/').filter(|segment| !segment.is_empty());
    let name = segments.next().ok_or_else(invalid)?;
    let org = segments.next().ok_or_else(invalid)?;

    let unsafe_segment = |s: &str| s.is_empty() || s == "." || s == ".." || s.contains('@');
    if [host.as_str(), org, name].into_iter().any(unsafe_segment) {
        return Err(invalid());
    }
    Ok([host.as_str(), org, name].iter().collect())
}

#[async_trait]
impl RepositoryCachePort for GitRepositoryCache {
    fn checkout_dir(&self, repo_url: &str) -> Result<PathBuf, RepositoryError> {
        Ok(self.plugins_dir.join(relative_checkout_path(repo_url)?))
    }

    async fn ensure_clone(&self, repo_url: &str) -> Result<PathBuf, RepositoryError> {
        let path = self.checkout_dir(repo_url)?;
        if path.join(".git").exists() {
            debug!(repo = repo_url, path = %path.display(), "Using existing checkout");
            return Ok(path);
        }

        let clone_failed = |reason: String| RepositoryError::CloneFailed {
            url: repo_url.to_string(),
            reason,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| clone_failed(e.to_string()))?;
        }

        info!(repo = repo_url, path = %path.display(), "Cloning repository");
        let target = path.to_string_lossy().into_owned();
        self.git(args(["clone", repo_url, target.as_str()]), None)
            .await
            .map_err(|f| f.into_error(clone_failed))?;
        Ok(path)
    }

    async fn checkout(
        &self,
        path: &Path,
        branch: &str,
        version: &str,
    ) -> Result<(), RepositoryError> {
        let checkout_failed = |reason: String| RepositoryError::CheckoutFailed {
            path: path.to_path_buf(),
            branch: branch.to_string(),
            version: version.to_string(),
            reason,
        };

        self.git(args(["checkout", branch]), Some(path))
            .await
            .map_err(|f| f.into_error(checkout_failed))?;

        if version != HEAD {
            self.git(args(["reset", "--hard", version]), Some(path))
                .await
                .map_err(|f| f.into_error(checkout_failed))?;
        }
        debug!(path = %path.display(), branch, version, "Checked out");
        Ok(())
    }

    async fn available_tools(
        &self,
        path: &Path,
        version: &str,
        group: Option<&str>,
    ) -> Result<Vec<AvailableTool>, RepositoryError> {
        let root = path.to_path_buf();
        let version = version.to_string();
        let group = group.map(str::to_string);
        tokio::task::spawn_blocking(move || discover_tools(&root, &version, group.as_deref()))
            .await
            .map_err(|e| RepositoryError::EnumerationFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
    }
}
