//! Label namespace and group tag handling.
//!
//! Images and containers owned by the platform carry a small set of labels.
//! The two filter keys select objects at the runtime; the remaining keys
//! carry tool identity, classification and job correlation.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Filter key present on every platform image and container.
pub const VENT_LABEL: &str = "vent";

/// Filter key present on plugin job containers.
pub const VENT_PLUGIN_LABEL: &str = "vent-plugin";

/// Tool identity.
pub const NAME_LABEL: &str = "vent.name";

/// Group tags of the tool.
pub const GROUPS_LABEL: &str = "vent.groups";

/// Job correlation key shared by all containers working on one file.
pub const FILE_LABEL: &str = "file";

/// The group tag that marks core platform tools.
pub const CORE_GROUP: &str = "core";

/// Raw label map as read from the runtime.
pub type Labels = HashMap<String, String>;

/// A set of classification tags.
///
/// Encoded as a comma and/or whitespace separated list, so `"core, files"`
/// and `"core files"` decode to the same set. Membership is exact: a tag
/// named `nocore` does not make an object core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Groups(BTreeSet<String>);

impl Groups {
    /// Decode a delimited tag list.
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(|c: char| c == ',' || c.is_whitespace())
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn is_core(&self) -> bool {
        self.contains(CORE_GROUP)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for Groups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(","))
    }
}

impl<S: Into<String>> FromIterator<S> for Groups {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Whether a labelled runtime object belongs to the core partition.
///
/// Objects without a `vent.groups` label are plugin objects.
pub fn is_core(labels: &Labels) -> bool {
    labels
        .get(GROUPS_LABEL)
        .is_some_and(|raw| Groups::parse(raw).is_core())
}

/// The tool identity of a labelled runtime object, if any.
pub fn tool_name(labels: &Labels) -> Option<&str> {
    labels.get(NAME_LABEL).map(String::as_str)
}

/// The job correlation key of a container, if any.
pub fn job_file(labels: &Labels) -> Option<&str> {
    labels.get(FILE_LABEL).map(String::as_str)
}
