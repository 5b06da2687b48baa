//! Host probe port.
//!
//! Read-only probes of the machine the platform runs on. These feed
//! display only; none of them take part in reconciliation.
//!
//! # Design Notes
//!
//! - Core owns the trait and types (pure)
//! - Runtime owns the implementation (sysinfo, `CommandRunner`)
//! - CLI injects the probe via bootstrap

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Uptime;

/// Errors that can occur during host probing.
#[derive(Debug, Error)]
pub enum HostProbeError {
    /// Failed to execute a probe command.
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// Probe output could not be interpreted.
    #[error("Unexpected output from {command}: {reason}")]
    UnexpectedOutput { command: String, reason: String },

    /// A probe command did not finish in time.
    #[error("{command} timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
}

/// Port for probing the host.
#[async_trait]
pub trait HostProbePort: Send + Sync {
    /// Operating system family, e.g. `Linux` or `Darwin`.
    fn system(&self) -> String;

    /// Number of logical CPUs.
    fn cpu_count(&self) -> usize;

    /// Time since boot and load averages.
    fn uptime(&self) -> Uptime;

    /// Value of an environment variable the runtime client honours.
    fn env_var(&self, key: &str) -> Option<String>;

    /// Output of `nvidia-smi -L` on the host.
    ///
    /// `Ok(None)` when the host has no `nvidia-smi`.
    async fn nvidia_smi_list(&self) -> Result<Option<String>, HostProbeError>;
}
