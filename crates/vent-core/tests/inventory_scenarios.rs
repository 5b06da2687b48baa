//! End-to-end reconciliation scenarios over in-memory ports.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use vent_core::domain::labels::{
    FILE_LABEL, GROUPS_LABEL, NAME_LABEL, VENT_LABEL, VENT_PLUGIN_LABEL,
};
use vent_core::{
    AvailableTool, ContainerRuntimePort, ContainerSummary, ImageSummary, IniManifest,
    InventoryReconciler, Labels, NormalTools, Partition, ProbeSource, RepositoryCachePort,
    RepositoryError, RuntimeError, ServerVersion,
};

const CORE_REPO: &str = "https://github.com/cyberreboot/vent";

// =============================================================================
// Fakes
// =============================================================================

fn labels(pairs: &[(&str, &str)]) -> Labels {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn has_label(labels: &Labels, filter: Option<&str>) -> bool {
    filter.is_none_or(|key| labels.contains_key(key))
}

#[derive(Default)]
struct FakeRuntime {
    images: Vec<ImageSummary>,
    live: Vec<ContainerSummary>,
    exited: Vec<ContainerSummary>,
    down: bool,
}

impl FakeRuntime {
    fn image(mut self, pairs: &[(&str, &str)]) -> Self {
        let n = self.images.len();
        self.images.push(ImageSummary {
            id: format!("sha256:{n:064}"),
            short_id: format!("{n:012}"),
            tags: vec![format!("image-{n}:latest")],
            labels: labels(pairs),
        });
        self
    }

    fn container(mut self, live: bool, pairs: &[(&str, &str)]) -> Self {
        let n = self.live.len() + self.exited.len();
        let container = ContainerSummary {
            id: format!("{n:064}"),
            name: format!("container-{n}"),
            status: if live { "running" } else { "exited" }.to_string(),
            labels: labels(pairs),
            ports: Vec::new(),
        };
        if live {
            self.live.push(container);
        } else {
            self.exited.push(container);
        }
        self
    }

    fn check(&self) -> Result<(), RuntimeError> {
        if self.down {
            Err(RuntimeError::Unavailable(
                "Cannot connect to the Docker daemon".into(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ContainerRuntimePort for FakeRuntime {
    async fn list_images(&self, label: Option<&str>) -> Result<Vec<ImageSummary>, RuntimeError> {
        self.check()?;
        Ok(self
            .images
            .iter()
            .filter(|i| has_label(&i.labels, label))
            .cloned()
            .collect())
    }

    async fn list_containers(
        &self,
        all: bool,
        label: Option<&str>,
    ) -> Result<Vec<ContainerSummary>, RuntimeError> {
        self.check()?;
        let exited: &[ContainerSummary] = if all { &self.exited } else { &[] };
        Ok(self
            .live
            .iter()
            .chain(exited)
            .filter(|c| has_label(&c.labels, label))
            .cloned()
            .collect())
    }

    async fn find_images(&self, _reference: &str) -> Result<Vec<ImageSummary>, RuntimeError> {
        self.check()?;
        Ok(Vec::new())
    }

    async fn pull_image(&self, _name: &str, _tag: &str) -> Result<(), RuntimeError> {
        self.check()
    }

    async fn exec(&self, _container: &str, _command: &[String]) -> Result<String, RuntimeError> {
        self.check()?;
        Ok(String::new())
    }

    async fn run_ephemeral(
        &self,
        _image: &str,
        _command: &[String],
        _gpus: bool,
    ) -> Result<String, RuntimeError> {
        self.check()?;
        Ok(String::new())
    }

    async fn server_version(&self) -> Result<ServerVersion, RuntimeError> {
        self.check()?;
        Ok(ServerVersion::default())
    }
}

/// Repository cache backed by a map of URL to tool identifiers.
///
/// A URL missing from the map fails to clone.
#[derive(Default)]
struct FakeRepos {
    tools: HashMap<String, Vec<String>>,
    clones: AtomicUsize,
    checkouts: std::sync::Mutex<Vec<(PathBuf, String, String)>>,
}

impl FakeRepos {
    fn with(mut self, url: &str, tools: &[&str]) -> Self {
        let tools = tools.iter().map(|t| (*t).to_string()).collect();
        self.tools.insert(url.to_string(), tools);
        self
    }
}

#[async_trait]
impl RepositoryCachePort for FakeRepos {
    fn checkout_dir(&self, repo_url: &str) -> Result<PathBuf, RepositoryError> {
        Ok(PathBuf::from(repo_url))
    }

    async fn ensure_clone(&self, repo_url: &str) -> Result<PathBuf, RepositoryError> {
        self.clones.fetch_add(1, Ordering::SeqCst);
        if self.tools.contains_key(repo_url) {
            Ok(PathBuf::from(repo_url))
        } else {
            Err(RepositoryError::CloneFailed {
                url: repo_url.to_string(),
                reason: "repository not found".into(),
            })
        }
    }

    async fn checkout(
        &self,
        path: &Path,
        branch: &str,
        version: &str,
    ) -> Result<(), RepositoryError> {
        self.checkouts.lock().unwrap().push((
            path.to_path_buf(),
            branch.to_string(),
            version.to_string(),
        ));
        Ok(())
    }

    async fn available_tools(
        &self,
        path: &Path,
        version: &str,
        _group: Option<&str>,
    ) -> Result<Vec<AvailableTool>, RepositoryError> {
        let url = path.to_string_lossy();
        let tools = self.tools.get(url.as_ref()).cloned().unwrap_or_default();
        Ok(tools
            .into_iter()
            .map(|identifier| AvailableTool {
                path: path.join(&identifier),
                identifier,
                version: version.to_string(),
            })
            .collect())
    }
}

fn reconciler(manifest: &str, repos: FakeRepos, runtime: FakeRuntime) -> InventoryReconciler {
    InventoryReconciler::new(
        Arc::new(IniManifest::parse(manifest).unwrap()),
        Arc::new(repos),
        Arc::new(runtime),
        CORE_REPO,
    )
}

// =============================================================================
// Plugin pass
// =============================================================================

#[tokio::test]
async fn test_empty_repository_set_is_empty_not_failed() {
    let r = reconciler("", FakeRepos::default(), FakeRuntime::default());
    let status = r.tools_status(Partition::Plugin, "master", "HEAD").await;

    assert_eq!(status.repo_count, 0);
    assert_eq!(status.normal, NormalTools::Available(Vec::new()));
    assert!(status.installed.is_empty());
    assert!(status.failures.is_empty());
}

#[tokio::test]
async fn test_one_failing_clone_fails_normal() {
    let manifest = "\
[a]
name = a
repo = https://example.com/x

[b]
repo = https://example.com/y
";
    let repos = FakeRepos::default().with("https://example.com/x", &["a"]);
    let r = reconciler(manifest, repos, FakeRuntime::default());
    let status = r.tools_status(Partition::Plugin, "master", "HEAD").await;

    assert_eq!(status.repo_count, 2);
    let installed: Vec<_> = status
        .installed
        .iter()
        .map(|t| t.identifier.as_str())
        .collect();
    assert_eq!(installed, vec!["a"]);
    assert_eq!(status.normal, NormalTools::Failed);
    assert_eq!(
        serde_json::to_value(&status).unwrap()["normal"],
        serde_json::json!("failed")
    );
    assert_eq!(status.failures.len(), 1);
    assert_eq!(
        status.failures[0].source,
        ProbeSource::Repository("https://example.com/y".into())
    );
}

#[tokio::test]
async fn test_normal_tools_follow_repository_order() {
    let manifest = "\
[p1]
name = p1
repo = https://example.com/b

[p2]
name = p2
repo = https://example.com/a
";
    let repos = FakeRepos::default()
        .with("https://example.com/a", &["x", "y"])
        .with("https://example.com/b", &["z"]);
    let r = reconciler(manifest, repos, FakeRuntime::default());
    let status = r.tools_status(Partition::Plugin, "dev", "abc123").await;

    assert_eq!(
        status.normal,
        NormalTools::Available(vec!["x".into(), "y".into(), "z".into()])
    );
    assert_eq!(status.installed.len(), 2);
}

#[tokio::test]
async fn test_same_identifier_in_two_repositories_is_kept_twice() {
    let manifest = "\
[a-x]
name = a
repo = https://example.com/x

[a-y]
name = a
repo = https://example.com/y
";
    let repos = FakeRepos::default()
        .with("https://example.com/x", &["a"])
        .with("https://example.com/y", &["a"]);
    let r = reconciler(manifest, repos, FakeRuntime::default());
    let status = r.tools_status(Partition::Plugin, "master", "HEAD").await;

    assert_eq!(status.repo_count, 2);
    assert_eq!(
        status.normal,
        NormalTools::Available(vec!["a".into(), "a".into()])
    );
    assert_eq!(status.installed.len(), 2);
}

#[tokio::test]
async fn test_core_repo_excluded_from_plugin_pass() {
    let manifest = format!(
        "\
[file-drop]
name = file-drop
repo = {CORE_REPO}

[pcap]
name = pcap
repo = https://example.com/plugins
"
    );
    let repos = FakeRepos::default()
        .with(CORE_REPO, &["file-drop"])
        .with("https://example.com/plugins", &["pcap"]);
    let r = reconciler(&manifest, repos, FakeRuntime::default());

    let plugin = r.tools_status(Partition::Plugin, "master", "HEAD").await;
    assert_eq!(plugin.repo_count, 1);
    assert_eq!(plugin.installed[0].identifier, "pcap");

    let core = r.tools_status(Partition::Core, "master", "HEAD").await;
    assert_eq!(core.repo_count, 1);
    assert_eq!(core.installed[0].identifier, "file-drop");
    assert_eq!(
        core.normal,
        NormalTools::Available(vec!["file-drop".into()])
    );
}

#[tokio::test]
async fn test_checkout_receives_branch_and_version() {
    let manifest = "[a]\nname = a\nrepo = https://example.com/x\n";
    let repos = Arc::new(FakeRepos::default().with("https://example.com/x", &["a"]));
    let r = InventoryReconciler::new(
        Arc::new(IniManifest::parse(manifest).unwrap()),
        Arc::clone(&repos) as Arc<dyn RepositoryCachePort>,
        Arc::new(FakeRuntime::default()),
        CORE_REPO,
    );

    r.tools_status(Partition::Plugin, "experimental", "v0.4.0")
        .await;

    let checkouts = repos.checkouts.lock().unwrap();
    assert_eq!(checkouts.len(), 1);
    assert_eq!(checkouts[0].1, "experimental");
    assert_eq!(checkouts[0].2, "v0.4.0");
    assert_eq!(repos.clones.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Built / running
// =============================================================================

fn labelled_runtime() -> FakeRuntime {
    let rabbitmq = [
        (VENT_LABEL, ""),
        (NAME_LABEL, "rabbitmq"),
        (GROUPS_LABEL, "core"),
    ];
    let pcap = [
        (VENT_LABEL, ""),
        (NAME_LABEL, "pcap"),
        (GROUPS_LABEL, "network"),
    ];
    let nocore = [
        (VENT_LABEL, ""),
        (NAME_LABEL, "nocore-tool"),
        (GROUPS_LABEL, "nocore"),
    ];
    FakeRuntime::default()
        .image(&rabbitmq)
        .image(&rabbitmq)
        .image(&pcap)
        .image(&nocore)
        .image(&[(VENT_LABEL, "")])
        .image(&[(NAME_LABEL, "unlabelled")])
        .container(true, &rabbitmq)
        .container(true, &[(VENT_LABEL, ""), (NAME_LABEL, "pcap")])
        .container(true, &[(VENT_LABEL, ""), (NAME_LABEL, "pcap")])
        .container(false, &[(VENT_LABEL, ""), (NAME_LABEL, "exited-tool")])
}

#[tokio::test]
async fn test_built_and_running_are_deduplicated_and_partitioned() {
    let r = reconciler("", FakeRepos::default(), labelled_runtime());

    let core = r.tools_status(Partition::Core, "master", "HEAD").await;
    let plugin = r.tools_status(Partition::Plugin, "master", "HEAD").await;

    assert_eq!(core.built, vec!["rabbitmq"]);
    assert_eq!(plugin.built, vec!["pcap", "nocore-tool"]);
    assert_eq!(core.running, vec!["rabbitmq"]);
    assert_eq!(plugin.running, vec!["pcap"]);

    for name in &core.built {
        assert!(!plugin.built.contains(name));
    }
    let mut union: Vec<_> = core.built.iter().chain(&plugin.built).cloned().collect();
    union.sort();
    assert_eq!(union, vec!["nocore-tool", "pcap", "rabbitmq"]);
}

#[tokio::test]
async fn test_runtime_down_degrades_to_empty_with_failures() {
    let runtime = FakeRuntime {
        down: true,
        ..labelled_runtime()
    };
    let r = reconciler("", FakeRepos::default(), runtime);
    let status = r.tools_status(Partition::Plugin, "master", "HEAD").await;

    assert!(status.built.is_empty());
    assert!(status.running.is_empty());
    assert_eq!(status.normal, NormalTools::Available(Vec::new()));
    let sources: Vec<_> = status.failures.iter().map(|f| f.source.clone()).collect();
    assert_eq!(sources, vec![ProbeSource::Images, ProbeSource::Containers]);
}

#[tokio::test]
async fn test_reconciliation_is_idempotent() {
    let manifest = "\
[a]
name = a
repo = https://example.com/x
groups = files
";
    let repos = FakeRepos::default().with("https://example.com/x", &["a", "b"]);
    let r = reconciler(manifest, repos, labelled_runtime());

    let first = r.tools_status(Partition::Plugin, "master", "HEAD").await;
    let second = r.tools_status(Partition::Plugin, "master", "HEAD").await;
    assert_eq!(first, second);
}

// =============================================================================
// Jobs
// =============================================================================

#[tokio::test]
async fn test_jobs_without_plugin_containers() {
    let r = reconciler("", FakeRepos::default(), labelled_runtime());
    let jobs = r.jobs().await;
    assert_eq!(jobs.counts.as_tuple(), (0, 0, 0, 0));
    assert!(jobs.failures.is_empty());
}

#[tokio::test]
async fn test_jobs_counts_distinct_files() {
    let runtime = FakeRuntime::default()
        .container(true, &[(VENT_PLUGIN_LABEL, ""), (FILE_LABEL, "job1")])
        .container(true, &[(VENT_PLUGIN_LABEL, ""), (FILE_LABEL, "job1")])
        .container(true, &[(VENT_PLUGIN_LABEL, ""), (FILE_LABEL, "job2")])
        .container(false, &[(VENT_PLUGIN_LABEL, ""), (FILE_LABEL, "job3")])
        .container(false, &[(VENT_PLUGIN_LABEL, "")]);
    let r = reconciler("", FakeRepos::default(), runtime);

    let jobs = r.jobs().await;
    assert_eq!(jobs.counts.as_tuple(), (2, 3, 1, 2));
}

#[tokio::test]
async fn test_jobs_runtime_down() {
    let runtime = FakeRuntime {
        down: true,
        ..FakeRuntime::default()
    };
    let r = reconciler("", FakeRepos::default(), runtime);
    let jobs = r.jobs().await;
    assert_eq!(jobs.counts.as_tuple(), (0, 0, 0, 0));
    assert_eq!(jobs.failures.len(), 2);
}
