//! Settings domain types and validation.
//!
//! Settings start from defaults and are overridden by `VENT_*` environment
//! variables. The CLI loads a `.env` file before reading them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Repository every core tool comes from.
pub const DEFAULT_CORE_REPO: &str = "https://github.com/cyberreboot/vent";

/// Branch checkouts are pinned to when none is given.
pub const DEFAULT_BRANCH: &str = "master";

/// Version checkouts are pinned to when none is given.
pub const DEFAULT_VERSION: &str = "HEAD";

pub const DEFAULT_RUNTIME_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REPO_TIMEOUT_SECS: u64 = 120;

/// Application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// URL of the core repository.
    pub core_repo: String,
    /// Default branch for checkouts.
    pub branch: String,
    /// Default version for checkouts.
    pub version: String,
    /// Upper bound for a single runtime command.
    pub runtime_timeout_secs: u64,
    /// Upper bound for a single git command.
    pub repo_timeout_secs: u64,
    /// Runtime client binary.
    pub docker_bin: String,
    /// Git binary.
    pub git_bin: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            core_repo: DEFAULT_CORE_REPO.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            version: DEFAULT_VERSION.to_string(),
            runtime_timeout_secs: DEFAULT_RUNTIME_TIMEOUT_SECS,
            repo_timeout_secs: DEFAULT_REPO_TIMEOUT_SECS,
            docker_bin: "docker".to_string(),
            git_bin: "git".to_string(),
        }
    }
}

impl Settings {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`, which maps variable names to values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let mut settings = Self::default();

        if let Some(v) = lookup("VENT_CORE_REPO") {
            settings.core_repo = v;
        }
        if let Some(v) = lookup("VENT_BRANCH") {
            settings.branch = v;
        }
        if let Some(v) = lookup("VENT_VERSION") {
            settings.version = v;
        }
        if let Some(v) = lookup("VENT_RUNTIME_TIMEOUT") {
            settings.runtime_timeout_secs = parse_secs("VENT_RUNTIME_TIMEOUT", &v)?;
        }
        if let Some(v) = lookup("VENT_REPO_TIMEOUT") {
            settings.repo_timeout_secs = parse_secs("VENT_REPO_TIMEOUT", &v)?;
        }
        if let Some(v) = lookup("VENT_DOCKER_BIN") {
            settings.docker_bin = v;
        }
        if let Some(v) = lookup("VENT_GIT_BIN") {
            settings.git_bin = v;
        }

        validate_settings(&settings)?;
        Ok(settings)
    }

    pub const fn runtime_timeout(&self) -> Duration {
        Duration::from_secs(self.runtime_timeout_secs)
    }

    pub const fn repo_timeout(&self) -> Duration {
        Duration::from_secs(self.repo_timeout_secs)
    }
}

fn parse_secs(var: &'static str, raw: &str) -> Result<u64, SettingsError> {
    raw.trim()
        .parse()
        .map_err(|_| SettingsError::InvalidNumber {
            var,
            value: raw.to_string(),
        })
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("{var} must be a whole number of seconds, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{0} timeout must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("Core repository URL cannot be empty")]
    EmptyCoreRepo,

    #[error("{0} cannot be empty")]
    EmptyValue(&'static str),
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if settings.core_repo.trim().is_empty() {
        return Err(SettingsError::EmptyCoreRepo);
    }
    if settings.runtime_timeout_secs == 0 {
        return Err(SettingsError::ZeroTimeout("Runtime"));
    }
    if settings.repo_timeout_secs == 0 {
        return Err(SettingsError::ZeroTimeout("Repository"));
    }
    if settings.branch.trim().is_empty() {
        return Err(SettingsError::EmptyValue("Branch"));
    }
    if settings.version.trim().is_empty() {
        return Err(SettingsError::EmptyValue("Version"));
    }
    if settings.docker_bin.trim().is_empty() {
        return Err(SettingsError::EmptyValue("Docker binary"));
    }
    if settings.git_bin.trim().is_empty() {
        return Err(SettingsError::EmptyValue("Git binary"));
    }
    Ok(())
}
