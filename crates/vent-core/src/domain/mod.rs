//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! infrastructure concerns (docker, git, filesystem).
//!
//! # Structure
//!
//! - `labels` - Label namespace and group tag sets
//! - `tool` - Tools, partitions and repository tool listings
//! - `inventory` - Reconciliation output and probe failures
//! - `runtime` - Images and containers as observed at the runtime
//! - `host` - Host facts shown alongside the inventory

pub mod host;
pub mod inventory;
pub mod labels;
pub mod runtime;
mod tool;

pub use tool::{AvailableTool, Partition, Tool};

pub use inventory::{
    FAILED_SENTINEL, JobCounts, JobsStatus, NormalTools, Probe, ProbeFailure, ProbeSource,
    ToolsStatus,
};

pub use labels::{Groups, Labels};

pub use runtime::{ContainerSummary, ExposedService, ImageSummary, PortBinding, ServerVersion};

pub use host::{DockerEnv, DockerEnvKind, DockerSetup, GpuStatus, Uptime};
