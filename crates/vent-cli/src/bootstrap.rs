//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter. All concrete implementations are instantiated here:
//! - Docker runtime handle (via vent-runtime), built once and shared
//! - Git repository cache (via vent-runtime)
//! - Host probe (via vent-runtime)
//! - Manifest store, reconciler and host facts (via vent-core)
//!
//! Command handlers receive the fully-composed `CliContext`.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;
use vent_core::ports::{ContainerRuntimePort, ManifestPort};
use vent_core::{
    CoreError, HostFactsService, IniManifest, InventoryReconciler, PathDirs, RuntimeSnapshot,
    Settings,
};
use vent_runtime::{DefaultHostProbe, DockerCli, GitRepositoryCache};

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Validated settings.
    pub settings: Settings,
    /// Resolved directories.
    pub paths: PathDirs,
    /// Manifest file to load.
    pub manifest_path: PathBuf,
}

impl CliConfig {
    /// Settings from the environment, paths from `VENT_HOME` or the home
    /// directory, and the manifest from `manifest_override` when given.
    pub fn from_env(manifest_override: Option<PathBuf>) -> Result<Self, CliError> {
        let settings = Settings::from_env().map_err(CoreError::from)?;
        let paths = PathDirs::resolve().map_err(CoreError::from)?;
        Ok(Self::new(settings, paths, manifest_override))
    }

    pub fn new(settings: Settings, paths: PathDirs, manifest_override: Option<PathBuf>) -> Self {
        let manifest_path = manifest_override.unwrap_or_else(|| paths.manifest_path());
        Self {
            settings,
            paths,
            manifest_path,
        }
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// Settings the context was built from.
    pub settings: Settings,
    /// Resolved directories.
    pub paths: PathDirs,
    /// Manifest file the context loaded.
    pub manifest_path: PathBuf,
    /// Loaded manifest.
    pub manifest: Arc<dyn ManifestPort>,
    /// Inventory reconciler.
    pub reconciler: InventoryReconciler,
    /// Host and runtime facts.
    pub host: HostFactsService,
}

impl CliContext {
    /// Access the reconciler.
    pub fn reconciler(&self) -> &InventoryReconciler {
        &self.reconciler
    }

    /// Access the label-aware runtime reader.
    pub fn snapshot(&self) -> &RuntimeSnapshot {
        self.reconciler.snapshot()
    }

    /// Access the host facts collector.
    pub fn host(&self) -> &HostFactsService {
        &self.host
    }

    /// Access the manifest.
    pub fn manifest(&self) -> &dyn ManifestPort {
        self.manifest.as_ref()
    }
}

/// Bootstrap the CLI application.
///
/// This is the composition root. It:
/// 1. Loads the manifest (a missing file is an empty manifest)
/// 2. Creates the single docker runtime handle
/// 3. Creates the git repository cache under the plugins directory
/// 4. Assembles the reconciler and host facts services
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let CliConfig {
        settings,
        paths,
        manifest_path,
    } = config;

    // 1. Manifest
    let manifest: Arc<dyn ManifestPort> =
        Arc::new(IniManifest::load(&manifest_path).map_err(CoreError::from)?);
    debug!(
        path = %manifest_path.display(),
        tools = manifest.sections().tools.len(),
        "Loaded manifest"
    );

    // 2. Runtime handle, shared by every component
    let runtime: Arc<dyn ContainerRuntimePort> = Arc::new(DockerCli::new(
        settings.docker_bin.clone(),
        settings.runtime_timeout(),
    ));

    // 3. Repository cache
    let repositories = Arc::new(GitRepositoryCache::new(
        paths.plugins_dir.clone(),
        settings.git_bin.clone(),
        settings.repo_timeout(),
    ));

    // 4. Services
    let reconciler = InventoryReconciler::new(
        Arc::clone(&manifest),
        repositories,
        Arc::clone(&runtime),
        settings.core_repo.clone(),
    );
    let host_probe = Arc::new(DefaultHostProbe::new(settings.runtime_timeout()));
    let host = HostFactsService::new(host_probe, runtime);

    Ok(CliContext {
        settings,
        paths,
        manifest_path,
        manifest,
        reconciler,
        host,
    })
}
