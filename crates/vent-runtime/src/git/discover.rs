//! Tool discovery inside a checkout.
//!
//! A tool is any directory holding a `Dockerfile`. Its groups come from the
//! `[info] groups` option of a `vent.template` next to the Dockerfile.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use vent_core::{AvailableTool, Groups, IniManifest, ManifestPort, RepositoryError};

pub const DOCKERFILE: &str = "Dockerfile";
pub const TEMPLATE_FILE: &str = "vent.template";

const INFO_SECTION: &str = "info";

/// Walk `root` for tool directories, optionally keeping only those tagged
/// with `group`. Hidden directories (including `.git`) are skipped.
///
/// Results are ordered by path.
pub fn discover_tools(
    root: &Path,
    version: &str,
    group: Option<&str>,
) -> Result<Vec<AvailableTool>, RepositoryError> {
    let mut dirs = Vec::new();
    walk(root, &mut dirs).map_err(|e| RepositoryError::EnumerationFailed {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;
    dirs.sort();

    let mut tools = Vec::new();
    for dir in dirs {
        if let Some(group) = group
            && !tool_groups(&dir)?.contains(group)
        {
            debug!(tool = %dir.display(), group, "Tool not in requested group");
            continue;
        }
        let Some(identifier) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        tools.push(AvailableTool {
            identifier,
            path: dir,
            version: version.to_string(),
        });
    }
    Ok(tools)
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) -> std::io::Result<()> {
    if dir.join(DOCKERFILE).is_file() {
        found.push(dir.to_path_buf());
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        walk(&entry.path(), found)?;
    }
    Ok(())
}

/// Groups declared by the tool's template; empty when there is none.
fn tool_groups(tool_dir: &Path) -> Result<Groups, RepositoryError> {
    let path = tool_dir.join(TEMPLATE_FILE);
    let template = IniManifest::load(&path).map_err(|e| RepositoryError::EnumerationFailed {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    Ok(template
        .option(INFO_SECTION, "groups")
        .map(|raw| Groups::parse(&raw))
        .unwrap_or_default())
}
