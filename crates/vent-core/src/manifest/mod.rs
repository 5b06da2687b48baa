//! Sectioned key/value manifest store.
//!
//! The plugin manifest declares one section per tool. `IniManifest` loads
//! it once and serves lookups through [`ManifestPort`]. The reserved
//! `DEFAULT` section supplies fallback values for every other section and
//! is not itself a tool.

mod parser;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::domain::{Groups, Tool};
use crate::ports::{ManifestPort, ManifestSections};

use parser::RawSection;

/// Section holding fallback values.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// File name of the plugin manifest inside the meta directory.
pub const MANIFEST_FILE_NAME: &str = "plugin_manifest.cfg";

/// Errors raised while loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Manifest syntax error on line {line}: {reason}")]
    Syntax { line: usize, reason: String },
}

/// An in-memory manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniManifest {
    sections: Vec<RawSection>,
}

impl IniManifest {
    /// Parse manifest text.
    pub fn parse(input: &str) -> Result<Self, ManifestError> {
        Ok(Self {
            sections: parser::parse(input)?,
        })
    }

    /// Load a manifest file. A missing file is an empty manifest.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).map_err(|e| match e {
                ManifestError::Syntax { line, reason } => ManifestError::Syntax {
                    line,
                    reason: format!("{reason} in {}", path.display()),
                },
                other => other,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Manifest not found, using empty manifest");
                Ok(Self::default())
            }
            Err(e) => Err(ManifestError::Read {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    fn section(&self, name: &str) -> Option<&RawSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    fn lookup(section: &RawSection, key: &str) -> Option<String> {
        section
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

impl ManifestPort for IniManifest {
    fn sections(&self) -> ManifestSections {
        let all: Vec<String> = self.sections.iter().map(|s| s.name.clone()).collect();
        let tools = all
            .iter()
            .filter(|name| name.as_str() != DEFAULT_SECTION)
            .cloned()
            .collect();
        ManifestSections { all, tools }
    }

    fn option(&self, section: &str, key: &str) -> Option<String> {
        let key = key.to_lowercase();
        let found = self.section(section)?;
        Self::lookup(found, &key).or_else(|| {
            self.section(DEFAULT_SECTION)
                .and_then(|defaults| Self::lookup(defaults, &key))
        })
    }
}

/// Build a display record for a manifest tool section.
///
/// `name` falls back to the section name here; reconciliation uses the raw
/// `name` option instead.
pub fn describe_tool(manifest: &dyn ManifestPort, section: &str) -> Tool {
    let name = manifest
        .option(section, "name")
        .unwrap_or_else(|| section.to_string());
    let repo = manifest.option(section, "repo").unwrap_or_default();
    let groups = manifest
        .option(section, "groups")
        .map(|raw| Groups::parse(&raw))
        .unwrap_or_default();
    Tool::new(section, name, repo).with_groups(groups)
}
