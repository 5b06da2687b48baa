//! Host facts for display.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::runtime::ServerVersion;

/// How the runtime is reached from this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DockerEnvKind {
    /// `DOCKER_MACHINE_NAME` is set.
    DockerMachine,
    /// `DOCKER_HOST` points at a remote daemon.
    Remote,
    /// Local daemon.
    Native,
}

impl fmt::Display for DockerEnvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DockerMachine => write!(f, "docker-machine"),
            Self::Remote => write!(f, "remote"),
            Self::Native => write!(f, "native"),
        }
    }
}

/// Environment in which the runtime client operates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockerEnv<'a> {
    pub machine_name: Option<&'a str>,
    pub host: Option<&'a str>,
}

impl DockerEnv<'_> {
    /// Classify the environment and return the value shown as `env`.
    pub fn classify(&self) -> (DockerEnvKind, String) {
        if let Some(machine) = self.machine_name {
            (DockerEnvKind::DockerMachine, machine.to_string())
        } else if let Some(host) = self.host {
            (DockerEnvKind::Remote, host.to_string())
        } else {
            (DockerEnvKind::Native, String::new())
        }
    }
}

/// Runtime setup information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DockerSetup {
    /// `None` when the server could not be reached.
    pub server: Option<ServerVersion>,
    pub env: String,
    pub kind: DockerEnvKind,
    /// Operating system family of the client host.
    pub os: String,
}

/// GPU detection result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "devices", rename_all = "lowercase")]
pub enum GpuStatus {
    Devices(Vec<String>),
    None,
    Unknown,
}

impl GpuStatus {
    /// Parse `nvidia-smi -L` output.
    ///
    /// Each line looks like `GPU 0: Tesla K80 (UUID: GPU-...)`; the device
    /// label is everything before the UUID.
    pub fn from_nvidia_smi(output: &str) -> Self {
        let devices: Vec<String> = output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.split(" (UUID: ")
                    .next()
                    .unwrap_or(line)
                    .trim()
                    .to_string()
            })
            .collect();

        if devices.is_empty() {
            Self::None
        } else {
            Self::Devices(devices)
        }
    }
}

impl fmt::Display for GpuStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Devices(devices) => write!(f, "{}", devices.join(", ")),
            Self::None => write!(f, "None"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Uptime and load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Uptime {
    pub seconds: u64,
    pub load_one: f64,
    pub load_five: f64,
    pub load_fifteen: f64,
}

impl fmt::Display for Uptime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = self.seconds / 86_400;
        let hours = (self.seconds % 86_400) / 3_600;
        let minutes = (self.seconds % 3_600) / 60;
        write!(
            f,
            "up {days} days, {hours:02}:{minutes:02}, load average: {:.2}, {:.2}, {:.2}",
            self.load_one, self.load_five, self.load_fifteen
        )
    }
}
