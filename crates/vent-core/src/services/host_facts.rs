//! Host facts collector.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::{DockerEnv, DockerSetup, GpuStatus, Uptime};
use crate::ports::{ContainerRuntimePort, HostProbePort};

/// Image used to probe GPUs when the host has no `nvidia-smi`.
pub const CUDA_IMAGE: &str = "nvidia/cuda:8.0-runtime";

const CUDA_IMAGE_NAME: &str = "nvidia/cuda";
const CUDA_IMAGE_TAG: &str = "8.0-runtime";

/// Collects display-only facts about the host and its runtime.
pub struct HostFactsService {
    probe: Arc<dyn HostProbePort>,
    runtime: Arc<dyn ContainerRuntimePort>,
}

impl HostFactsService {
    pub fn new(probe: Arc<dyn HostProbePort>, runtime: Arc<dyn ContainerRuntimePort>) -> Self {
        Self { probe, runtime }
    }

    /// Package version, `v`-prefixed.
    pub fn version(&self) -> String {
        format!("v{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn system(&self) -> String {
        self.probe.system()
    }

    pub fn cpu(&self) -> usize {
        self.probe.cpu_count()
    }

    pub fn uptime(&self) -> Uptime {
        self.probe.uptime()
    }

    /// Current UTC time, e.g. `2017-06-01 12:00:00.000000 UTC`.
    pub fn timestamp(&self) -> String {
        format!("{} UTC", Utc::now().format("%Y-%m-%d %H:%M:%S%.6f"))
    }

    /// Runtime server version and how the client reaches it.
    pub async fn docker(&self) -> DockerSetup {
        let server = match self.runtime.server_version().await {
            Ok(version) => Some(version),
            Err(e) => {
                warn!(error = %e, "Could not read runtime server version");
                None
            }
        };

        let machine_name = self.probe.env_var("DOCKER_MACHINE_NAME");
        let host = self.probe.env_var("DOCKER_HOST");
        let (kind, env) = DockerEnv {
            machine_name: machine_name.as_deref(),
            host: host.as_deref(),
        }
        .classify();

        DockerSetup {
            server,
            env,
            kind,
            os: self.probe.system(),
        }
    }

    /// Detect GPUs.
    ///
    /// Uses the host's `nvidia-smi` when present, otherwise runs it inside
    /// [`CUDA_IMAGE`]. With `pull` set, a missing image is pulled first.
    pub async fn gpu(&self, pull: bool) -> GpuStatus {
        match self.probe.nvidia_smi_list().await {
            Ok(Some(output)) => return GpuStatus::from_nvidia_smi(&output),
            Ok(None) => debug!("No nvidia-smi on host, probing through {CUDA_IMAGE}"),
            Err(e) => {
                warn!(error = %e, "nvidia-smi failed on host");
                return GpuStatus::Unknown;
            }
        }

        let mut images = match self.runtime.find_images(CUDA_IMAGE).await {
            Ok(images) => images,
            Err(e) => {
                warn!(error = %e, "Could not look up {CUDA_IMAGE}");
                return GpuStatus::Unknown;
            }
        };

        if pull && images.is_empty() {
            match self
                .runtime
                .pull_image(CUDA_IMAGE_NAME, CUDA_IMAGE_TAG)
                .await
            {
                Ok(()) => {
                    images = self
                        .runtime
                        .find_images(CUDA_IMAGE)
                        .await
                        .unwrap_or_default();
                }
                Err(e) => warn!(error = %e, "Failed to pull {CUDA_IMAGE}"),
            }
        }

        if images.is_empty() {
            return GpuStatus::None;
        }

        let command = ["nvidia-smi".to_string(), "-L".to_string()];
        match self.runtime.run_ephemeral(CUDA_IMAGE, &command, true).await {
            Ok(output) => GpuStatus::from_nvidia_smi(&output),
            Err(e) => {
                warn!(error = %e, "GPU probe container failed");
                GpuStatus::Unknown
            }
        }
    }
}
