//! Host probe implementation for vent-runtime.
//!
//! This module provides the `DefaultHostProbe` which implements
//! `HostProbePort` from vent-core. It reads the OS family, CPU count,
//! uptime and load, and runs `nvidia-smi` when the host has it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sysinfo::System;
use tracing::debug;
use vent_core::{HostProbeError, HostProbePort, Uptime};

use crate::command::{CommandError, CommandRunner, TokioCommandRunner, args, display_command};

const NVIDIA_SMI: &str = "nvidia-smi";

/// Default implementation of `HostProbePort`.
///
/// Constructed in the CLI bootstrap and handed to `HostFactsService`.
pub struct DefaultHostProbe {
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
    nvidia_smi: Option<PathBuf>,
}

impl DefaultHostProbe {
    /// Resolves `nvidia-smi` on `PATH` once, up front.
    pub fn new(timeout: Duration) -> Self {
        let nvidia_smi = which::which(NVIDIA_SMI).ok();
        if nvidia_smi.is_none() {
            debug!("nvidia-smi not found on PATH");
        }
        Self::with_runner(Arc::new(TokioCommandRunner), timeout, nvidia_smi)
    }

    pub fn with_runner(
        runner: Arc<dyn CommandRunner>,
        timeout: Duration,
        nvidia_smi: Option<PathBuf>,
    ) -> Self {
        Self {
            runner,
            timeout,
            nvidia_smi,
        }
    }
}

#[async_trait]
impl HostProbePort for DefaultHostProbe {
    fn system(&self) -> String {
        os_family(std::env::consts::OS)
    }

    fn cpu_count(&self) -> usize {
        num_cpus::get()
    }

    fn uptime(&self) -> Uptime {
        let load = System::load_average();
        Uptime {
            seconds: System::uptime(),
            load_one: load.one,
            load_five: load.five,
            load_fifteen: load.fifteen,
        }
    }

    fn env_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }

    async fn nvidia_smi_list(&self) -> Result<Option<String>, HostProbeError> {
        let Some(path) = &self.nvidia_smi else {
            return Ok(None);
        };
        let program = path.to_string_lossy();
        let list_args = args(["-L"]);

        let output = self
            .runner
            .run(&program, &list_args, None, self.timeout)
            .await
            .map_err(|e| match e {
                CommandError::Spawn { reason, .. } => {
                    HostProbeError::CommandFailed(format!("{program}: {reason}"))
                }
                CommandError::Timeout { command, timeout } => {
                    HostProbeError::Timeout { command, timeout }
                }
            })?;

        if !output.success() {
            return Err(HostProbeError::UnexpectedOutput {
                command: display_command(&program, &list_args),
                reason: output.stderr.trim().to_string(),
            });
        }
        Ok(Some(output.stdout))
    }
}

/// Conventional family name for a Rust target OS.
fn os_family(os: &str) -> String {
    match os {
        "linux" => "Linux".to_string(),
        "macos" => "Darwin".to_string(),
        "windows" => "Windows".to_string(),
        "freebsd" => "FreeBSD".to_string(),
        other => other.to_string(),
    }
}
