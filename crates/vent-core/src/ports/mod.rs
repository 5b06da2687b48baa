//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from
//! infrastructure. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No process/filesystem implementation details in signatures
//! - Every external collaborator the reconciler consults is a port
//! - Runtime and repository ports return explicit errors; the core decides
//!   how a failure degrades

pub mod container_runtime;
pub mod host_probe;
pub mod manifest;
pub mod repository;

use thiserror::Error;

pub use container_runtime::{ContainerRuntimePort, RuntimeError};
pub use host_probe::{HostProbeError, HostProbePort};
pub use manifest::{ManifestPort, ManifestSections};
pub use repository::{RepositoryCachePort, RepositoryError};

/// Core error type for semantic domain errors.
///
/// Reconciliation itself never returns this; it is raised only where the
/// edges cannot proceed at all (paths, settings, unreadable manifest).
/// Adapters map it to their own error types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Manifest could not be loaded.
    #[error(transparent)]
    Manifest(#[from] crate::manifest::ManifestError),

    /// Path resolution failed.
    #[error(transparent)]
    Path(#[from] crate::paths::PathError),

    /// Settings validation error.
    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),
}
