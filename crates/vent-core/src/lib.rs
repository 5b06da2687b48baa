//! Core of the vent tool inventory.
//!
//! Domain types, port traits, the manifest store and the reconciliation
//! services. Adapters for docker, git and the host live in `vent-runtime`.
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod manifest;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    AvailableTool, ContainerSummary, DockerEnvKind, DockerSetup, ExposedService, GpuStatus,
    Groups, ImageSummary, JobCounts, JobsStatus, Labels, NormalTools, Partition, PortBinding,
    Probe, ProbeFailure, ProbeSource, ServerVersion, Tool, ToolsStatus, Uptime,
};
pub use manifest::{IniManifest, ManifestError, describe_tool};
pub use ports::{
    ContainerRuntimePort, CoreError, HostProbeError, HostProbePort, ManifestPort,
    ManifestSections, RepositoryCachePort, RepositoryError, RuntimeError,
};
pub use services::{CheckoutLocks, HostFactsService, InventoryReconciler, RuntimeSnapshot};
pub use settings::{Settings, SettingsError, validate_settings};

pub use paths::{PathDirs, PathError, ensure_directory, normalize_user_path};
