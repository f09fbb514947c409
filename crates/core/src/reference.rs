// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reference records and sentinel classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Outcome of repathing a single reference node.
///
/// Created once per processed reference and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepathedReference {
    pub node_name: String,
    pub previous_path: PathBuf,
    pub new_path: PathBuf,
}

impl RepathedReference {
    pub fn new(
        node_name: impl Into<String>,
        previous_path: impl Into<PathBuf>,
        new_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            node_name: node_name.into(),
            previous_path: previous_path.into(),
            new_path: new_path.into(),
        }
    }

    /// True if the new path differs from the previous one.
    pub fn was_updated(&self) -> bool {
        self.previous_path != self.new_path
    }
}

impl fmt::Display for RepathedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.node_name,
            self.previous_path.display(),
            self.new_path.display()
        )
    }
}

/// Pseudo-reference entries a host enumerates that are not file pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentinelKind {
    /// Implicit container shared by all references of a scene.
    SharedReference,
    /// Placeholder left behind for a reference the host could not resolve.
    UnknownPlaceholder,
}

impl SentinelKind {
    pub const ALL: [SentinelKind; 2] =
        [SentinelKind::SharedReference, SentinelKind::UnknownPlaceholder];

    /// Substring identifying this sentinel in a node name.
    pub fn marker(self) -> &'static str {
        match self {
            SentinelKind::SharedReference => "sharedReferenceNode",
            SentinelKind::UnknownPlaceholder => "_UNKNOWN_REF_NODE_",
        }
    }

    /// Classify a node name; `None` means it is a real reference.
    pub fn classify(node_name: &str) -> Option<SentinelKind> {
        Self::ALL.into_iter().find(|kind| node_name.contains(kind.marker()))
    }
}

impl fmt::Display for SentinelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentinelKind::SharedReference => write!(f, "shared reference"),
            SentinelKind::UnknownPlaceholder => write!(f, "unknown placeholder"),
        }
    }
}

#[cfg(test)]
#[path = "reference_tests.rs"]
mod tests;
