//! Manifest accessor port.
//!
//! The manifest is a sectioned key/value store with one section per
//! declared tool. Lookups never fail: a missing section or key is `None`.

#[cfg(test)]
use mockall::automock;

/// Section listing of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestSections {
    /// Every section header, in file order.
    pub all: Vec<String>,
    /// Sections that declare tools.
    pub tools: Vec<String>,
}

/// Read-only access to a loaded manifest.
#[cfg_attr(test, automock)]
pub trait ManifestPort: Send + Sync {
    /// List all sections and the tool sections among them.
    fn sections(&self) -> ManifestSections;

    /// Look up `key` in `section`.
    fn option(&self, section: &str, key: &str) -> Option<String>;
}
