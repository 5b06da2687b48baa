//! Tool and partition types.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::labels::Groups;

/// Which half of the inventory a reconciliation pass computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    /// Tools from the platform's own repository, tagged `core`.
    Core,
    /// Tools from any other repository.
    Plugin,
}

impl Partition {
    pub const fn from_core_flag(core: bool) -> Self {
        if core { Self::Core } else { Self::Plugin }
    }

    pub const fn is_core(self) -> bool {
        matches!(self, Self::Core)
    }

    /// Whether an object classified as core/non-core falls in this partition.
    pub const fn matches(self, object_is_core: bool) -> bool {
        self.is_core() == object_is_core
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core => write!(f, "core"),
            Self::Plugin => write!(f, "plugin"),
        }
    }
}

/// A tool declared in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    /// Manifest section name.
    pub identifier: String,
    /// Human label.
    pub name: String,
    /// Repository the tool is declared to come from.
    pub repo_url: String,
    /// Classification tags.
    pub groups: Groups,
}

impl Tool {
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        repo_url: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            repo_url: repo_url.into(),
            groups: Groups::default(),
        }
    }

    #[must_use]
    pub fn with_groups(mut self, groups: Groups) -> Self {
        self.groups = groups;
        self
    }
}

/// A tool found in a repository checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableTool {
    /// Final path segment of the tool directory.
    pub identifier: String,
    /// Tool directory inside the checkout.
    pub path: PathBuf,
    /// The ref the checkout was pinned at when enumerated.
    pub version: String,
}
