//! Inventory reconciler.
//!
//! Merges three sources that are never transactionally consistent with
//! each other: the manifest (declared tools), repository checkouts
//! (available tools) and the runtime label index (built and running
//! tools). Every pass recomputes everything; nothing is cached between
//! calls.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use crate::domain::labels::CORE_GROUP;
use crate::domain::{
    AvailableTool, Groups, JobsStatus, NormalTools, Partition, ProbeFailure, ProbeSource, Tool,
    ToolsStatus,
};
use crate::ports::{ContainerRuntimePort, ManifestPort, RepositoryCachePort, RepositoryError};

use super::checkout_locks::CheckoutLocks;
use super::snapshot::RuntimeSnapshot;

/// Computes classified tool inventories.
pub struct InventoryReconciler {
    manifest: Arc<dyn ManifestPort>,
    repositories: Arc<dyn RepositoryCachePort>,
    snapshot: RuntimeSnapshot,
    locks: Arc<CheckoutLocks>,
    core_repo: String,
}

impl InventoryReconciler {
    pub fn new(
        manifest: Arc<dyn ManifestPort>,
        repositories: Arc<dyn RepositoryCachePort>,
        runtime: Arc<dyn ContainerRuntimePort>,
        core_repo: impl Into<String>,
    ) -> Self {
        Self {
            manifest,
            repositories,
            snapshot: RuntimeSnapshot::new(runtime),
            locks: Arc::new(CheckoutLocks::new()),
            core_repo: core_repo.into(),
        }
    }

    /// Share checkout locks with other reconcilers working on the same
    /// plugins directory.
    #[must_use]
    pub fn with_locks(mut self, locks: Arc<CheckoutLocks>) -> Self {
        self.locks = locks;
        self
    }

    pub fn snapshot(&self) -> &RuntimeSnapshot {
        &self.snapshot
    }

    pub fn manifest(&self) -> &Arc<dyn ManifestPort> {
        &self.manifest
    }

    /// Repositories a pass over `partition` queries.
    ///
    /// Core: exactly the core repository. Plugin: every distinct `repo`
    /// declared by a manifest tool other than the core repository.
    pub fn repository_set(&self, partition: Partition) -> BTreeSet<String> {
        match partition {
            Partition::Core => BTreeSet::from([self.core_repo.clone()]),
            Partition::Plugin => self
                .manifest
                .sections()
                .tools
                .iter()
                .filter_map(|tool| self.manifest.option(tool, "repo"))
                .filter(|repo| *repo != self.core_repo)
                .collect(),
        }
    }

    /// Run one reconciliation pass over `partition`, pinning checkouts at
    /// `branch`/`version`.
    pub async fn tools_status(
        &self,
        partition: Partition,
        branch: &str,
        version: &str,
    ) -> ToolsStatus {
        let repos = self.repository_set(partition);
        info!(
            %partition,
            repos = repos.len(),
            branch,
            version,
            "Reconciling tool inventory"
        );

        let mut failures = Vec::new();
        let normal = self
            .normal_tools(&repos, partition, branch, version, &mut failures)
            .await;
        let installed = self.installed(&repos);
        let built = self.snapshot.built(partition).await.or_empty(&mut failures);
        let running = self
            .snapshot
            .running(partition)
            .await
            .or_empty(&mut failures);

        ToolsStatus {
            repo_count: repos.len(),
            installed,
            normal,
            built,
            running,
            failures,
        }
    }

    /// Job and tool counts over plugin containers.
    pub async fn jobs(&self) -> JobsStatus {
        let mut failures = Vec::new();
        let counts = self.snapshot.jobs(&mut failures).await;
        JobsStatus { counts, failures }
    }

    /// Tool section names declared in the manifest.
    pub fn manifest_tools(&self) -> Vec<String> {
        self.manifest.sections().tools
    }

    /// Manifest tools whose repository is in `repos` and whose `name`
    /// option resolves.
    fn installed(&self, repos: &BTreeSet<String>) -> Vec<Tool> {
        self.manifest
            .sections()
            .tools
            .iter()
            .filter_map(|section| {
                let repo = self.manifest.option(section, "repo")?;
                if !repos.contains(&repo) {
                    return None;
                }
                let Some(name) = self.manifest.option(section, "name") else {
                    debug!(tool = %section, "Skipping installed tool without a name");
                    return None;
                };
                let groups = self
                    .manifest
                    .option(section, "groups")
                    .map(|raw| Groups::parse(&raw))
                    .unwrap_or_default();
                Some(Tool::new(section.as_str(), name, repo).with_groups(groups))
            })
            .collect()
    }

    /// Identifiers of available tools across `repos`, or `Failed` when any
    /// repository could not be fetched.
    async fn normal_tools(
        &self,
        repos: &BTreeSet<String>,
        partition: Partition,
        branch: &str,
        version: &str,
        failures: &mut Vec<ProbeFailure>,
    ) -> NormalTools {
        let group = partition.is_core().then_some(CORE_GROUP);
        let results = join_all(
            repos
                .iter()
                .map(|url| self.fetch_repository(url, branch, version, group)),
        )
        .await;

        let mut normal = Vec::new();
        let mut failed = false;
        for (url, result) in repos.iter().zip(results) {
            match result {
                Ok(tools) => normal.extend(tools.into_iter().map(|t| t.identifier)),
                Err(e) => {
                    warn!(
                        repo = %url,
                        error = %e,
                        "Repository unavailable, marking normal tools as failed"
                    );
                    failures.push(ProbeFailure::new(
                        ProbeSource::Repository(url.clone()),
                        e.to_string(),
                    ));
                    failed = true;
                }
            }
        }

        if failed {
            NormalTools::Failed
        } else {
            NormalTools::Available(normal)
        }
    }

    async fn fetch_repository(
        &self,
        url: &str,
        branch: &str,
        version: &str,
        group: Option<&str>,
    ) -> Result<Vec<AvailableTool>, RepositoryError> {
        let checkout = self.repositories.checkout_dir(url)?;
        let _guard = self.locks.acquire(&checkout).await;
        let path = self.repositories.ensure_clone(url).await?;
        self.repositories.checkout(&path, branch, version).await?;
        let tools = self
            .repositories
            .available_tools(&path, version, group)
            .await?;
        debug!(repo = %url, count = tools.len(), "Enumerated available tools");
        Ok(tools)
    }
}
