//! Workspace/version coordinates for model reads

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_WORKSPACE: &str = "master";
pub const LATEST_VERSION: &str = "latest";

/// Identifies which branch and snapshot of the model a read targets.
///
/// The context is forwarded verbatim to the element store; nothing in this
/// crate interprets the version string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReadContext {
    pub workspace: String,
    pub version: String,
}

impl ReadContext {
    pub fn new(workspace: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            version: version.into(),
        }
    }

    /// Latest version of the given workspace
    pub fn latest(workspace: impl Into<String>) -> Self {
        Self::new(workspace, LATEST_VERSION)
    }

    /// Build a context from optional inputs, falling back to `master`/`latest`
    pub fn or_defaults(workspace: Option<&str>, version: Option<&str>) -> Self {
        Self::new(
            workspace.filter(|w| !w.is_empty()).unwrap_or(DEFAULT_WORKSPACE),
            version.filter(|v| !v.is_empty()).unwrap_or(LATEST_VERSION),
        )
    }

    pub fn is_latest(&self) -> bool {
        self.version == LATEST_VERSION
    }
}

impl Default for ReadContext {
    fn default() -> Self {
        Self::latest(DEFAULT_WORKSPACE)
    }
}

impl fmt::Display for ReadContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.workspace, self.version)
    }
}
