//! Reconciliation output records.
//!
//! Every record here is a plain value: the presentation layer renders it
//! as a table or serializes it as JSON. Probe failures are carried along
//! instead of being raised, so a pass always produces a (possibly degraded)
//! result.

use std::fmt;

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::tool::Tool;

/// Sentinel string a failed `normal` field serializes to.
pub const FAILED_SENTINEL: &str = "failed";

/// The external source a probe talked to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum ProbeSource {
    Images,
    Containers,
    Repository(String),
    Runtime,
}

impl fmt::Display for ProbeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Images => write!(f, "images"),
            Self::Containers => write!(f, "containers"),
            Self::Repository(url) => write!(f, "repository {url}"),
            Self::Runtime => write!(f, "runtime"),
        }
    }
}

/// A probe that degraded to an empty or sentinel value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeFailure {
    pub source: ProbeSource,
    pub reason: String,
}

impl ProbeFailure {
    pub fn new(source: ProbeSource, reason: impl Into<String>) -> Self {
        Self {
            source,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.reason)
    }
}

/// Result of reading one external source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T> {
    Observed(T),
    Unavailable(ProbeFailure),
}

impl<T: Default> Probe<T> {
    /// Collapse to the observed value, or the empty value when the probe
    /// failed; failures are appended to `failures`.
    pub fn or_empty(self, failures: &mut Vec<ProbeFailure>) -> T {
        match self {
            Self::Observed(value) => value,
            Self::Unavailable(failure) => {
                failures.push(failure);
                T::default()
            }
        }
    }
}

impl<T> Probe<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Probe<U> {
        match self {
            Self::Observed(value) => Probe::Observed(f(value)),
            Self::Unavailable(failure) => Probe::Unavailable(failure),
        }
    }
}

/// Tools available in the checked-out repositories.
///
/// `Failed` is all-or-nothing: one repository that could not be fetched
/// makes the whole field fail, so a partial list never passes for the
/// real one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalTools {
    Available(Vec<String>),
    Failed,
}

impl NormalTools {
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl Default for NormalTools {
    fn default() -> Self {
        Self::Available(Vec::new())
    }
}

impl Serialize for NormalTools {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Available(tools) => tools.serialize(serializer),
            Self::Failed => serializer.serialize_str(FAILED_SENTINEL),
        }
    }
}

/// Classified view of one partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToolsStatus {
    /// Number of distinct repositories queried.
    pub repo_count: usize,
    /// Manifest tools whose repository is in the queried set.
    pub installed: Vec<Tool>,
    /// Tools the checkouts provide at the requested ref.
    pub normal: NormalTools,
    /// Distinct tool names with an image.
    pub built: Vec<String>,
    /// Distinct tool names with a live container.
    pub running: Vec<String>,
    /// Probes that degraded while computing this view.
    pub failures: Vec<ProbeFailure>,
}

/// Job and tool counts derived from plugin containers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCounts {
    pub jobs_running: usize,
    pub tools_running: usize,
    pub jobs_finished: usize,
    pub tools_finished: usize,
}

impl JobCounts {
    /// `(jobs_running, tools_running, jobs_finished, tools_finished)`.
    pub const fn as_tuple(&self) -> (usize, usize, usize, usize) {
        (
            self.jobs_running,
            self.tools_running,
            self.jobs_finished,
            self.tools_finished,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobsStatus {
    pub counts: JobCounts,
    pub failures: Vec<ProbeFailure>,
}
