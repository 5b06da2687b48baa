//! Container runtime observations.

use serde::{Deserialize, Serialize};

use super::labels::Labels;

/// An image as reported by the runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSummary {
    pub id: String,
    pub short_id: String,
    pub tags: Vec<String>,
    pub labels: Labels,
}

impl ImageSummary {
    /// First repository tag, or `<none>` for dangling images.
    pub fn primary_tag(&self) -> &str {
        self.tags.first().map_or("<none>", String::as_str)
    }
}

/// A published container port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortBinding {
    /// Container side, e.g. `80/tcp`.
    pub container_port: String,
    pub host_ip: String,
    pub host_port: String,
}

impl PortBinding {
    /// `HostIp:HostPort`.
    pub fn host_address(&self) -> String {
        format!("{}:{}", self.host_ip, self.host_port)
    }
}

/// A container as reported by the runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSummary {
    pub id: String,
    pub name: String,
    /// Runtime state, e.g. `running` or `exited`.
    pub status: String,
    pub labels: Labels,
    pub ports: Vec<PortBinding>,
}

/// A container with at least one published port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExposedService {
    pub name: String,
    pub addresses: Vec<String>,
}

/// Version information of the runtime server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerVersion {
    pub version: String,
    pub api_version: Option<String>,
    pub os: Option<String>,
    pub arch: Option<String>,
    pub kernel_version: Option<String>,
}
