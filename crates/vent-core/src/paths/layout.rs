//! Directory layout under the vent base directory.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::PathError;
use crate::manifest::MANIFEST_FILE_NAME;

/// Environment variable overriding the base directory.
pub const BASE_DIR_ENV: &str = "VENT_HOME";

const DEFAULT_BASE_DIR: &str = ".vent";
const PLUGINS_DIR: &str = "plugins";

/// Resolved vent directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathDirs {
    /// Root of all vent state.
    pub base_dir: PathBuf,
    /// Repository checkouts, one per `<org>/<name>`.
    pub plugins_dir: PathBuf,
    /// Holds the plugin manifest.
    pub meta_dir: PathBuf,
}

impl PathDirs {
    /// Lay out directories under an explicit base.
    pub fn with_base(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            plugins_dir: base_dir.join(PLUGINS_DIR),
            meta_dir: base_dir.clone(),
            base_dir,
        }
    }

    /// Resolve the base directory.
    ///
    /// Resolution order:
    /// 1. `VENT_HOME` environment variable
    /// 2. `~/.vent`
    pub fn resolve() -> Result<Self, PathError> {
        if let Ok(raw) = env::var(BASE_DIR_ENV)
            && !raw.trim().is_empty()
        {
            return Ok(Self::with_base(normalize_user_path(&raw)?));
        }

        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        Ok(Self::with_base(home.join(DEFAULT_BASE_DIR)))
    }

    /// Path of the plugin manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.meta_dir.join(MANIFEST_FILE_NAME)
    }

    /// Create every directory in the layout.
    pub fn ensure(&self) -> Result<(), PathError> {
        ensure_directory(&self.base_dir)?;
        ensure_directory(&self.plugins_dir)?;
        ensure_directory(&self.meta_dir)
    }
}

impl std::fmt::Display for PathDirs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "base_dir = {}", self.base_dir.display())?;
        writeln!(f, "plugins_dir = {}", self.plugins_dir.display())?;
        writeln!(f, "meta_dir = {}", self.meta_dir.display())?;
        write!(f, "manifest = {}", self.manifest_path().display())
    }
}

/// Create `path` if needed and check it is a directory.
pub fn ensure_directory(path: &Path) -> Result<(), PathError> {
    if path.exists() {
        if path.is_dir() {
            return Ok(());
        }
        return Err(PathError::NotADirectory(path.to_path_buf()));
    }

    fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Normalize a user-provided path, expanding `~` and making it absolute.
pub fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed.starts_with("~/") || trimmed == "~" {
        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        if trimmed == "~" {
            home
        } else {
            home.join(trimmed.trim_start_matches("~/"))
        }
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(|e| PathError::CurrentDirError(e.to_string()))
    }
}
