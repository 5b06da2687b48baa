//! Container runtime port.
//!
//! A narrow capability over the runtime: list images and containers by
//! label filter, pull an image, exec in a container, read the server
//! version. One handle is built at the composition root and shared by
//! every component.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ContainerSummary, ImageSummary, ServerVersion};

/// Errors from runtime queries.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The runtime client could not be started or the daemon is unreachable.
    #[error("Runtime unavailable: {0}")]
    Unavailable(String),

    /// The runtime rejected a command.
    #[error("{command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// A runtime command did not finish in time.
    #[error("{command} timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    /// The runtime returned a payload that could not be decoded.
    #[error("Malformed runtime payload: {0}")]
    Parse(String),
}

/// Port for reading from and acting on the container runtime.
#[async_trait]
pub trait ContainerRuntimePort: Send + Sync {
    /// List images, optionally restricted to those carrying `label`.
    async fn list_images(&self, label: Option<&str>) -> Result<Vec<ImageSummary>, RuntimeError>;

    /// List containers; `all` includes exited ones.
    async fn list_containers(
        &self,
        all: bool,
        label: Option<&str>,
    ) -> Result<Vec<ContainerSummary>, RuntimeError>;

    /// List images matching a reference such as `nvidia/cuda:8.0-runtime`.
    async fn find_images(&self, reference: &str) -> Result<Vec<ImageSummary>, RuntimeError>;

    /// Pull `name:tag`.
    async fn pull_image(&self, name: &str, tag: &str) -> Result<(), RuntimeError>;

    /// Run `command` inside a running container and return its stdout.
    async fn exec(&self, container: &str, command: &[String]) -> Result<String, RuntimeError>;

    /// Run `command` in a throwaway container of `image` and return its
    /// stdout. With `gpus` set, all host GPUs are attached.
    async fn run_ephemeral(
        &self,
        image: &str,
        command: &[String],
        gpus: bool,
    ) -> Result<String, RuntimeError>;

    /// Version of the runtime server.
    async fn server_version(&self) -> Result<ServerVersion, RuntimeError>;
}
