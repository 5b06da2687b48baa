//! Runtime snapshot reader.
//!
//! Wraps the runtime port and turns every failed call into an explicit
//! [`Probe::Unavailable`]. Callers that want the "nothing observed"
//! behaviour collapse probes with [`Probe::or_empty`], which keeps a record
//! of what failed.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::labels::{self, Labels, VENT_LABEL, VENT_PLUGIN_LABEL};
use crate::domain::{
    ContainerSummary, ExposedService, ImageSummary, JobCounts, Partition, PortBinding, Probe,
    ProbeFailure, ProbeSource,
};
use crate::ports::{ContainerRuntimePort, RuntimeError};

/// Label-aware reader over a runtime handle.
#[derive(Clone)]
pub struct RuntimeSnapshot {
    runtime: Arc<dyn ContainerRuntimePort>,
}

impl RuntimeSnapshot {
    pub fn new(runtime: Arc<dyn ContainerRuntimePort>) -> Self {
        Self { runtime }
    }

    pub fn runtime(&self) -> &Arc<dyn ContainerRuntimePort> {
        &self.runtime
    }

    /// Images, optionally filtered by label key.
    pub async fn images(&self, label: Option<&str>) -> Probe<Vec<ImageSummary>> {
        into_probe(
            ProbeSource::Images,
            self.runtime.list_images(label).await,
        )
    }

    /// Containers, optionally filtered by label key; `all` includes exited ones.
    pub async fn containers(&self, all: bool, label: Option<&str>) -> Probe<Vec<ContainerSummary>> {
        into_probe(
            ProbeSource::Containers,
            self.runtime.list_containers(all, label).await,
        )
    }

    /// Distinct tool names with an image in `partition`.
    pub async fn built(&self, partition: Partition) -> Probe<Vec<String>> {
        let images = self.images(Some(VENT_LABEL)).await;
        images.map(|images| {
            let labels = images.iter().map(|i| &i.labels);
            aggregate_names(partition, labels)
        })
    }

    /// Distinct tool names with a live container in `partition`.
    pub async fn running(&self, partition: Partition) -> Probe<Vec<String>> {
        let containers = self.containers(false, Some(VENT_LABEL)).await;
        containers.map(|containers| {
            let labels = containers.iter().map(|c| &c.labels);
            aggregate_names(partition, labels)
        })
    }

    /// `(first tag, short id)` for each image.
    pub async fn image_listing(&self, vent_only: bool) -> Probe<Vec<(String, String)>> {
        let filter = vent_only.then_some(VENT_LABEL);
        self.images(filter).await.map(|images| {
            images
                .iter()
                .map(|i| (i.primary_tag().to_string(), i.short_id.clone()))
                .collect()
        })
    }

    /// `(name, status)` for each container.
    pub async fn container_listing(
        &self,
        vent_only: bool,
        running_only: bool,
    ) -> Probe<Vec<(String, String)>> {
        let filter = vent_only.then_some(VENT_LABEL);
        let containers = self.containers(!running_only, filter).await;
        containers.map(|containers| {
            containers
                .into_iter()
                .map(|c| (c.name, c.status))
                .collect()
        })
    }

    /// Live containers with published ports.
    ///
    /// Platform containers are named by `vent.name` when they carry it.
    pub async fn services(&self, vent_only: bool) -> Probe<Vec<ExposedService>> {
        let filter = vent_only.then_some(VENT_LABEL);
        self.containers(false, filter).await.map(|containers| {
            containers
                .into_iter()
                .filter_map(|c| {
                    let addresses = published_addresses(&c);
                    if addresses.is_empty() {
                        return None;
                    }
                    let name = if vent_only {
                        labels::tool_name(&c.labels)
                            .map_or_else(|| c.name.clone(), str::to_string)
                    } else {
                        c.name.clone()
                    };
                    Some(ExposedService { name, addresses })
                })
                .collect()
        })
    }

    /// Job and tool counts over plugin containers.
    pub async fn jobs(&self, failures: &mut Vec<ProbeFailure>) -> JobCounts {
        let running = self
            .containers(false, Some(VENT_PLUGIN_LABEL))
            .await
            .or_empty(failures);
        let all = self
            .containers(true, Some(VENT_PLUGIN_LABEL))
            .await
            .or_empty(failures);
        count_jobs(&running, &all)
    }
}

fn into_probe<T>(source: ProbeSource, result: Result<T, RuntimeError>) -> Probe<T> {
    match result {
        Ok(value) => Probe::Observed(value),
        Err(e) => {
            warn!(source = %source, error = %e, "Runtime probe failed, treating as empty");
            Probe::Unavailable(ProbeFailure::new(source, e.to_string()))
        }
    }
}

/// Names of labelled objects in `partition`, first occurrence wins.
///
/// Objects without a `vent.name` label are skipped.
pub fn aggregate_names<'a>(
    partition: Partition,
    objects: impl IntoIterator<Item = &'a Labels>,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for object_labels in objects {
        if !partition.matches(labels::is_core(object_labels)) {
            continue;
        }
        if let Some(name) = labels::tool_name(object_labels)
            && seen.insert(name.to_string())
        {
            names.push(name.to_string());
        }
    }
    names
}

/// Derive job counts from live and all plugin containers.
///
/// The two lists come from separate runtime calls. A container that starts
/// between them can make a finished count negative; such counts are
/// clamped to zero.
pub fn count_jobs(running: &[ContainerSummary], all: &[ContainerSummary]) -> JobCounts {
    let running_files = distinct_files(running);
    let all_files = distinct_files(all);

    let jobs_running = running_files.len();
    let tools_running = running.len();

    if all_files.len() < jobs_running || all.len() < tools_running {
        warn!(
            running_jobs = jobs_running,
            total_jobs = all_files.len(),
            running_tools = tools_running,
            total_tools = all.len(),
            "Container state changed between enumerations, clamping finished counts"
        );
    }

    let counts = JobCounts {
        jobs_running,
        tools_running,
        jobs_finished: all_files.len().saturating_sub(jobs_running),
        tools_finished: all.len().saturating_sub(tools_running),
    };
    debug!(?counts, "Computed job counts");
    counts
}

/// One host address per container port, the first binding docker lists.
fn published_addresses(container: &ContainerSummary) -> Vec<String> {
    let mut seen = HashSet::new();
    container
        .ports
        .iter()
        .filter(|p| seen.insert(p.container_port.as_str()))
        .map(PortBinding::host_address)
        .collect()
}

fn distinct_files(containers: &[ContainerSummary]) -> HashSet<&str> {
    containers
        .iter()
        .filter_map(|c| labels::job_file(&c.labels))
        .collect()
}
